//! # Shades - Generative 2D Drawing Toolkit
//!
//! Shades draws shapes onto a raster canvas where every pixel's colour
//! comes from a *shade*: a colour rule such as a flat colour, a gradient,
//! or seeded Perlin noise. It provides:
//!
//! - **Noise**: seeded, deterministic 2D Perlin fields with batch sampling
//! - **Shades**: colour rules plus fill, line, rectangle, polygon, circle
//!   and pizza slice drawing, solid or outlined
//! - **Warp**: noise-driven displacement that makes hard edges organic
//! - **Scenes**: JSON scene files rendered to PNG
//!
//! ## Quick Start
//!
//! ```
//! use shades::{Canvas, Color, NoiseGradient, PerField, Shade, Warp, build_fields};
//!
//! let mut canvas = Canvas::new(200, 200, Color::WHITE)?;
//!
//! // One noise field per colour channel, reproducible from the seeds
//! let fields = build_fields(3, PerField::all(0.01), Some(PerField::each([1, 2, 3])))?;
//! let warp = build_fields(2, PerField::all(0.02), Some(PerField::each([4, 5])))?;
//!
//! let shade = Shade::new(NoiseGradient::new((200, 120, 60), fields)?)
//!     .with_warp(Warp::from_fields(8.0, warp)?);
//! shade.circle(&mut canvas, (100, 100), 60.0)?;
//! shade.rectangle_outline(&mut canvas, (10, 10), 180.0, 180.0, 3)?;
//! # Ok::<(), shades::ShadesError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`shader`] | Noise fields and numeric primitives |
//! | [`shade`] | Colour rules, warp and drawing operations |
//! | [`shape`] | Pixel enumeration for each primitive |
//! | [`canvas`] | The pixel buffer |
//! | [`scene`] | JSON scene files |
//! | [`demos`] | Built-in compositions |
//! | [`error`] | Error types |

pub mod canvas;
pub mod color;
pub mod demos;
pub mod error;
pub mod geometry;
pub mod scene;
pub mod shade;
pub mod shader;
pub mod shape;

// Re-exports for convenience
pub use canvas::Canvas;
pub use color::Color;
pub use error::{Result, ShadesError};
pub use geometry::Point;
pub use scene::SceneDocument;
pub use shade::{
    BlockColor, DomainWarpGradient, HorizontalGradient, LinearGradient, NoiseGradient,
    PointGradients, Shade, ShadeRule, SwirlBand, SwirlOfShades, VerticalGradient, Warp,
};
pub use shader::{NoiseField, PerField, build_fields, build_fields_with_rng};
pub use shape::Shape;

//! # Shader Primitives
//!
//! Numeric building blocks shared by noise fields, shades and shape
//! rasterisation.
//!
//! ## Categories
//!
//! - [`noise`]: Seeded Perlin [`NoiseField`] and batch construction
//! - [`distance`]: Euclidean distance and inverse-distance weights
//! - [`blend`]: Linear interpolation, quintic fade, channel clamping

pub mod blend;
pub mod distance;
pub mod noise;

pub use blend::*;
pub use distance::*;
pub use noise::*;

//! # Scenes
//!
//! Describe a whole picture as JSON and render it to a [`Canvas`](crate::Canvas).
//!
//! A scene names its shades once and then lists draw operations that
//! refer to them by name. Operations run in order, so later ones paint
//! over earlier ones.
//!
//! ## Example
//!
//! ```
//! use shades::scene::SceneDocument;
//! use shades::Color;
//!
//! let json = r#"{
//!     "width": 40,
//!     "height": 30,
//!     "background": [255, 255, 255],
//!     "seed": 7,
//!     "shades": {
//!         "ink": {"type": "block_color", "color": [20, 20, 20]},
//!         "sky": {"type": "vertical_gradient", "from": [40, 80, 200], "to": [250, 250, 250]}
//!     },
//!     "draw": [
//!         {"op": "fill", "shade": "sky"},
//!         {"op": "draw", "shade": "ink", "shape": {"type": "circle", "center": [20, 15], "radius": 5}}
//!     ]
//! }"#;
//!
//! let scene = SceneDocument::from_json(json)?;
//! let canvas = scene.render()?;
//! assert_eq!(canvas.get_pixel(20, 15), Some(Color::new(20, 20, 20)));
//! # Ok::<(), shades::ShadesError>(())
//! ```
//!
//! ## Randomness
//!
//! Noise fields without explicit seeds draw them from one rng seeded by
//! the scene `seed`, visiting shades in name order. A scene with a seed
//! therefore always renders the same image.

mod convert;
mod schema;

pub use schema::{BandSpec, RuleSpec, SceneDocument, SceneOp, ShadeSpec, WarpSpec};

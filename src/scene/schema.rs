//! JSON schema types for scene files.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::geometry::Point;
use crate::shape::Shape;

fn default_size() -> u32 {
    Canvas::DEFAULT_SIZE
}

fn default_background() -> Color {
    Canvas::DEFAULT_BACKGROUND
}

fn default_weight() -> u32 {
    1
}

/// Top-level scene file.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneDocument {
    #[serde(default = "default_size")]
    pub width: u32,
    #[serde(default = "default_size")]
    pub height: u32,
    #[serde(default = "default_background")]
    pub background: Color,
    /// Seed for every noise field that does not carry its own.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Named shades referenced by the draw operations.
    #[serde(default)]
    pub shades: BTreeMap<String, ShadeSpec>,
    /// Operations, applied in order.
    #[serde(default)]
    pub draw: Vec<SceneOp>,
}

/// A named shade: a colour rule and an optional warp.
#[derive(Debug, Clone, Deserialize)]
pub struct ShadeSpec {
    #[serde(flatten)]
    pub rule: RuleSpec,
    #[serde(default)]
    pub warp: Option<WarpSpec>,
}

/// Noise displacement applied before colouring.
#[derive(Debug, Clone, Deserialize)]
pub struct WarpSpec {
    pub size: f32,
    #[serde(default)]
    pub scale: Option<f32>,
    /// Seeds for the x and y fields.
    #[serde(default)]
    pub seeds: Option<Vec<u64>>,
}

/// A colour rule.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleSpec {
    BlockColor {
        color: Color,
    },
    /// Either explicit `stops` (`[[x, [r, g, b]], ...]`) or `from`/`to`
    /// spanning the canvas width.
    HorizontalGradient {
        #[serde(default)]
        stops: Vec<(f32, Color)>,
        #[serde(default)]
        from: Option<Color>,
        #[serde(default)]
        to: Option<Color>,
    },
    /// Same as `horizontal_gradient` along y.
    VerticalGradient {
        #[serde(default)]
        stops: Vec<(f32, Color)>,
        #[serde(default)]
        from: Option<Color>,
        #[serde(default)]
        to: Option<Color>,
    },
    PointGradients {
        anchors: Vec<(Point, Color)>,
        #[serde(default)]
        power: Option<f32>,
    },
    NoiseGradient {
        color: Color,
        #[serde(default)]
        variance: Option<f32>,
        #[serde(default)]
        scale: Option<f32>,
        /// One seed per channel.
        #[serde(default)]
        seeds: Option<Vec<u64>>,
    },
    DomainWarpGradient {
        color: Color,
        #[serde(default)]
        variance: Option<f32>,
        #[serde(default)]
        scale: Option<f32>,
        #[serde(default)]
        seeds: Option<Vec<u64>>,
        #[serde(default)]
        depth: Option<u32>,
        #[serde(default)]
        feedback: Option<f32>,
    },
    Swirl {
        bands: Vec<BandSpec>,
        #[serde(default)]
        scale: Option<f32>,
        #[serde(default)]
        seed: Option<u64>,
        #[serde(default)]
        depth: Option<u32>,
        #[serde(default)]
        feedback: Option<f32>,
    },
}

/// One band of a swirl: `rule` colours pixels whose swirl noise falls in
/// `[low, high)`.
#[derive(Debug, Clone, Deserialize)]
pub struct BandSpec {
    pub low: f32,
    pub high: f32,
    pub rule: RuleSpec,
}

/// A draw operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SceneOp {
    /// Colour the whole canvas.
    Fill { shade: String },
    /// Draw a solid shape.
    Draw { shade: String, shape: Shape },
    /// Draw a shape's boundary.
    Outline {
        shade: String,
        shape: Shape,
        #[serde(default = "default_weight")]
        weight: u32,
    },
}

impl SceneOp {
    pub fn shade(&self) -> &str {
        match self {
            SceneOp::Fill { shade }
            | SceneOp::Draw { shade, .. }
            | SceneOp::Outline { shade, .. } => shade,
        }
    }
}

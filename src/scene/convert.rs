//! Conversion from scene schema types to shades, and rendering.

use std::collections::BTreeMap;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use super::schema::*;
use crate::canvas::Canvas;
use crate::error::{Result, ShadesError};
use crate::shade::*;
use crate::shader::{NoiseField, PerField, build_fields_with_rng};

type BoxedShade = Shade<Box<dyn ShadeRule>>;

impl SceneDocument {
    /// Parse a scene from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ShadesError::Scene(e.to_string()))
    }

    /// Read and parse a scene file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| ShadesError::Scene(format!("{}: {}", path.display(), e)))
    }

    fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed.unwrap_or_else(rand::random))
    }

    /// Build every named shade.
    pub fn build_shades(&self) -> Result<BTreeMap<String, BoxedShade>> {
        let mut rng = self.rng();
        self.shades
            .iter()
            .map(|(name, spec)| {
                let shade = spec
                    .build(self, &mut rng)
                    .map_err(|e| annotate(e, &format!("shade '{}'", name)))?;
                Ok((name.clone(), shade))
            })
            .collect()
    }

    /// Render the scene onto a fresh canvas.
    pub fn render(&self) -> Result<Canvas> {
        let mut canvas = Canvas::new(self.width, self.height, self.background)?;
        let shades = self.build_shades()?;

        for (i, op) in self.draw.iter().enumerate() {
            let shade = shades.get(op.shade()).ok_or_else(|| {
                ShadesError::Scene(format!("draw[{}]: unknown shade '{}'", i, op.shade()))
            })?;
            let drawn = match op {
                SceneOp::Fill { .. } => shade.fill(&mut canvas),
                SceneOp::Draw { shape, .. } => shade.draw(&mut canvas, shape),
                SceneOp::Outline { shape, weight, .. } => shade.outline(&mut canvas, shape, *weight),
            };
            drawn.map_err(|e| annotate(e, &format!("draw[{}]", i)))?;
        }

        info!(
            width = self.width,
            height = self.height,
            shades = shades.len(),
            ops = self.draw.len(),
            "rendered scene"
        );
        Ok(canvas)
    }
}

/// Prefix the location inside the scene to a parameter error.
fn annotate(err: ShadesError, at: &str) -> ShadesError {
    match err {
        ShadesError::InvalidParameter(msg) => {
            ShadesError::InvalidParameter(format!("{}: {}", at, msg))
        }
        ShadesError::Scene(msg) => ShadesError::Scene(format!("{}: {}", at, msg)),
        other => other,
    }
}

fn missing(rule: &str, what: &str) -> ShadesError {
    ShadesError::Scene(format!("{}: {}", rule, what))
}

fn fields(
    count: usize,
    scale: Option<f32>,
    seeds: Option<&Vec<u64>>,
    rng: &mut StdRng,
) -> Result<Vec<NoiseField>> {
    build_fields_with_rng(
        count,
        PerField::all(scale.unwrap_or(NoiseField::DEFAULT_SCALE)),
        seeds.map(|s| PerField::each(s.clone())),
        rng,
    )
}

impl ShadeSpec {
    fn build(&self, scene: &SceneDocument, rng: &mut StdRng) -> Result<BoxedShade> {
        let shade = Shade::new(self.rule.build(scene, rng)?);
        match &self.warp {
            Some(w) => {
                let fields = fields(2, w.scale, w.seeds.as_ref(), rng)?;
                Ok(shade.with_warp(Warp::from_fields(w.size, fields)?))
            }
            None => Ok(shade),
        }
    }
}

impl RuleSpec {
    fn build(&self, scene: &SceneDocument, rng: &mut StdRng) -> Result<Box<dyn ShadeRule>> {
        match self {
            RuleSpec::BlockColor { color } => Ok(Box::new(BlockColor::new(*color))),

            RuleSpec::HorizontalGradient { stops, from, to } => {
                let g = if !stops.is_empty() {
                    HorizontalGradient::new(stops.clone())?
                } else {
                    let (Some(from), Some(to)) = (from, to) else {
                        return Err(missing("horizontal_gradient", "needs stops or from/to"));
                    };
                    HorizontalGradient::across(scene.width, *from, *to)?
                };
                Ok(Box::new(g))
            }

            RuleSpec::VerticalGradient { stops, from, to } => {
                let g = if !stops.is_empty() {
                    VerticalGradient::new(stops.clone())?
                } else {
                    let (Some(from), Some(to)) = (from, to) else {
                        return Err(missing("vertical_gradient", "needs stops or from/to"));
                    };
                    VerticalGradient::across(scene.height, *from, *to)?
                };
                Ok(Box::new(g))
            }

            RuleSpec::PointGradients { anchors, power } => {
                let mut g = PointGradients::new(anchors.clone())?;
                if let Some(power) = power {
                    g = g.with_power(*power)?;
                }
                Ok(Box::new(g))
            }

            RuleSpec::NoiseGradient {
                color,
                variance,
                scale,
                seeds,
            } => {
                let g = NoiseGradient::new(*color, fields(3, *scale, seeds.as_ref(), rng)?)?
                    .with_variance(variance.unwrap_or(NoiseGradient::DEFAULT_VARIANCE))?;
                Ok(Box::new(g))
            }

            RuleSpec::DomainWarpGradient {
                color,
                variance,
                scale,
                seeds,
                depth,
                feedback,
            } => {
                let g = DomainWarpGradient::new(*color, fields(3, *scale, seeds.as_ref(), rng)?)?
                    .with_variance(variance.unwrap_or(NoiseGradient::DEFAULT_VARIANCE))?
                    .with_depth(
                        depth.unwrap_or(DomainWarpGradient::DEFAULT_DEPTH),
                        feedback.unwrap_or(DomainWarpGradient::DEFAULT_FEEDBACK),
                    )?;
                Ok(Box::new(g))
            }

            RuleSpec::Swirl {
                bands,
                scale,
                seed,
                depth,
                feedback,
            } => {
                let swirl_field = NoiseField::with_rng(
                    scale.unwrap_or(NoiseField::DEFAULT_SCALE),
                    *seed,
                    rng,
                )?;
                let bands = bands
                    .iter()
                    .map(|b| SwirlBand::new(b.low, b.high, b.rule.build(scene, rng)?))
                    .collect::<Result<Vec<_>>>()?;
                let s = SwirlOfShades::new(swirl_field, bands)?.with_depth(
                    depth.unwrap_or(SwirlOfShades::DEFAULT_DEPTH),
                    feedback.unwrap_or(SwirlOfShades::DEFAULT_FEEDBACK),
                )?;
                Ok(Box::new(s))
            }
        }
    }
}

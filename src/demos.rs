//! # Demos
//!
//! Small built-in compositions that exercise every shade. Each demo is a
//! struct implementing [`Demo`]; randomness comes from the rng passed to
//! [`Demo::paint`], so a seeded rng reproduces the image exactly.
//!
//! ## Adding a New Demo
//!
//! 1. Add a unit struct implementing [`Demo`] below
//! 2. Add it to [`DEMOS`] and [`by_name`]

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::error::{Result, ShadesError};
use crate::geometry::{Point, randomly_shift_point};
use crate::shade::*;
use crate::shader::{NoiseField, PerField, build_fields_with_rng};

/// All available demos, in display order.
pub const DEMOS: &[&str] = &["palette", "marble", "swirl", "blobs", "slices", "gradients"];

/// A built-in composition.
pub trait Demo: Send + Sync {
    /// Demo name (lowercase, e.g., "marble").
    fn name(&self) -> &'static str;

    /// Canvas background.
    fn background(&self) -> Color {
        Canvas::DEFAULT_BACKGROUND
    }

    /// Draw onto `canvas`.
    fn paint(&self, canvas: &mut Canvas, rng: &mut StdRng) -> Result<()>;
}

/// Get a demo by name.
pub fn by_name(name: &str) -> Option<Box<dyn Demo>> {
    match name.to_lowercase().as_str() {
        "palette" => Some(Box::new(Palette)),
        "marble" => Some(Box::new(Marble)),
        "swirl" => Some(Box::new(Swirl)),
        "blobs" => Some(Box::new(Blobs)),
        "slices" => Some(Box::new(Slices)),
        "gradients" => Some(Box::new(Gradients)),
        _ => None,
    }
}

/// Render a demo onto a fresh `width` x `height` canvas.
pub fn render(name: &str, width: u32, height: u32, rng: &mut StdRng) -> Result<Canvas> {
    let demo = by_name(name).ok_or_else(|| {
        ShadesError::invalid(format!(
            "unknown demo '{}', expected one of: {}",
            name,
            DEMOS.join(", ")
        ))
    })?;
    let mut canvas = Canvas::new(width, height, demo.background())?;
    demo.paint(&mut canvas, rng)?;
    Ok(canvas)
}

const PALETTE: [Color; 5] = [
    Color::new(222, 152, 189),
    Color::new(255, 255, 255),
    Color::new(91, 159, 204),
    Color::new(206, 90, 51),
    Color::new(245, 221, 51),
];

fn warp<R: Rng>(size: f32, scale: f32, rng: &mut R) -> Result<Warp> {
    Warp::from_fields(size, build_fields_with_rng(2, PerField::all(scale), None, rng)?)
}

/// Grid of small rectangle outlines in random palette colours.
pub struct Palette;

impl Demo for Palette {
    fn name(&self) -> &'static str {
        "palette"
    }

    fn background(&self) -> Color {
        Color::new(242, 229, 212)
    }

    fn paint(&self, canvas: &mut Canvas, rng: &mut StdRng) -> Result<()> {
        let mut shade = Shade::new(BlockColor::new(PALETTE[0]));
        for p in canvas.grid(50, None) {
            if let Some(&color) = PALETTE.choose(rng) {
                shade.rule.color = color;
            }
            shade.rectangle_outline(canvas, p, 40.0, 20.0, 2)?;
        }
        Ok(())
    }
}

/// Whole canvas of domain-warped colour.
pub struct Marble;

impl Demo for Marble {
    fn name(&self) -> &'static str {
        "marble"
    }

    fn paint(&self, canvas: &mut Canvas, rng: &mut StdRng) -> Result<()> {
        let fields = build_fields_with_rng(3, PerField::all(0.004), None, rng)?;
        let shade = Shade::new(
            DomainWarpGradient::new((120, 110, 190), fields)?.with_variance(90.0)?,
        );
        shade.fill(canvas)
    }
}

/// Three noise-gradient bands picked by a swirl field.
pub struct Swirl;

impl Demo for Swirl {
    fn name(&self) -> &'static str {
        "swirl"
    }

    fn paint(&self, canvas: &mut Canvas, rng: &mut StdRng) -> Result<()> {
        let bands = vec![
            noise_band(0.0, 0.45, Color::new(30, 60, 110), rng)?,
            noise_band(0.45, 0.55, Color::new(230, 200, 150), rng)?,
            noise_band(0.55, 1.01, Color::new(170, 40, 60), rng)?,
        ];
        let swirl_field = NoiseField::with_rng(0.003, None, rng)?;
        Shade::new(SwirlOfShades::new(swirl_field, bands)?).fill(canvas)
    }
}

fn noise_band(low: f32, high: f32, color: Color, rng: &mut StdRng) -> Result<SwirlBand> {
    SwirlBand::new(low, high, NoiseGradient::from_rng(color, rng)?.with_variance(30.0)?)
}

/// Warped noisy circles scattered over a soft point gradient.
pub struct Blobs;

impl Demo for Blobs {
    fn name(&self) -> &'static str {
        "blobs"
    }

    fn paint(&self, canvas: &mut Canvas, rng: &mut StdRng) -> Result<()> {
        let (w, h) = (canvas.width() as f32, canvas.height() as f32);
        let backdrop = PointGradients::new(vec![
            (Point::new(0.0, 0.0), Color::new(250, 235, 215)),
            (Point::new(w, h), Color::new(180, 200, 230)),
            (Point::new(w, 0.0), Color::new(240, 240, 240)),
        ])?;
        Shade::new(backdrop).fill(canvas)?;

        let radius = w.min(h) / 8.0;
        let (rx, ry) = ((w / 2.0) as i32, (h / 2.0) as i32);
        for _ in 0..12 {
            let color = PALETTE.choose(rng).copied().unwrap_or(Color::BLACK);
            let shade = Shade::new(NoiseGradient::from_rng(color, rng)?.with_variance(40.0)?)
                .with_warp(warp(radius / 4.0, 0.02, rng)?);
            let center = randomly_shift_point(canvas.center(), (-rx, rx), (-ry, ry), rng);
            shade.circle(canvas, center, radius * rng.random_range(0.4..1.2))?;
        }
        Ok(())
    }
}

/// Pizza slices fanning around the centre over a horizontal gradient.
pub struct Slices;

impl Demo for Slices {
    fn name(&self) -> &'static str {
        "slices"
    }

    fn paint(&self, canvas: &mut Canvas, rng: &mut StdRng) -> Result<()> {
        let backdrop = HorizontalGradient::across(
            canvas.width(),
            Color::new(20, 20, 40),
            Color::new(60, 40, 80),
        )?;
        Shade::new(backdrop).fill(canvas)?;

        let center = canvas.center();
        let radius = canvas.width().min(canvas.height()) as f32 * 0.4;
        let mut start = 0.0;
        for color in PALETTE {
            let sweep = rng.random_range(40.0..90.0);
            let shade = Shade::new(NoiseGradient::from_rng(color, rng)?.with_variance(25.0)?);
            shade.pizza_slice(canvas, center, radius, start, start + sweep)?;
            Shade::new(BlockColor::new(Color::BLACK))
                .pizza_slice_outline(canvas, center, radius, start, start + sweep, 2)?;
            start += sweep;
        }
        Ok(())
    }
}

/// Vertical gradient sky with warped triangles and lines.
pub struct Gradients;

impl Demo for Gradients {
    fn name(&self) -> &'static str {
        "gradients"
    }

    fn paint(&self, canvas: &mut Canvas, rng: &mut StdRng) -> Result<()> {
        let (w, h) = (canvas.width() as f32, canvas.height() as f32);
        let sky = VerticalGradient::new(vec![
            (0.0, Color::new(250, 190, 120)),
            (h * 0.6, Color::new(220, 110, 130)),
            (h, Color::new(60, 50, 110)),
        ])?;
        Shade::new(sky).fill(canvas)?;

        let hills = Shade::new(NoiseGradient::from_rng((40, 60, 50), rng)?)
            .with_warp(warp(12.0, 0.01, rng)?);
        hills.triangle(canvas, (0.0, h), (w * 0.35, h * 0.45), (w * 0.7, h))?;
        hills.triangle(canvas, (w * 0.4, h), (w * 0.75, h * 0.55), (w, h))?;

        let ink = Shade::new(BlockColor::new((30, 25, 45)));
        for i in 0..6 {
            let y = h * (0.1 + 0.05 * i as f32);
            ink.line(canvas, (w * 0.1, y), (w * 0.3, y + 10.0), 2)?;
        }
        ink.square_outline(canvas, (w * 0.8, h * 0.1), w * 0.08, 3)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_all_demos_resolve() {
        for name in DEMOS {
            let demo = by_name(name).unwrap_or_else(|| panic!("missing demo {}", name));
            assert_eq!(demo.name(), *name);
        }
        assert!(by_name("nope").is_none());
    }

    #[test]
    fn test_all_demos_render() {
        for name in DEMOS {
            let canvas = render(name, 80, 60, &mut StdRng::seed_from_u64(1)).unwrap();
            assert_eq!((canvas.width(), canvas.height()), (80, 60));
        }
    }

    #[test]
    fn test_demo_reproducible() {
        let a = render("blobs", 64, 64, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = render("blobs", 64, 64, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_demo() {
        let err = render("nope", 10, 10, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, ShadesError::InvalidParameter(_)));
    }
}

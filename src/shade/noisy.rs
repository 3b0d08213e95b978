//! Noise-driven colour rules.
//!
//! [`NoiseGradient`] and [`DomainWarpGradient`] shift a base colour per
//! channel by one noise field each:
//!
//! ```text
//! channel_i = color_i + (n_i - 0.5) * 2 * color_variance    (clamped)
//! ```
//!
//! so a channel never moves more than `color_variance` away from the base.
//! [`SwirlOfShades`] uses one noise field to pick which of several rules
//! colours a pixel.

use std::fmt;

use rand::Rng;

use super::ShadeRule;
use crate::color::Color;
use crate::error::{Result, ShadesError};
use crate::geometry::Point;
use crate::shader::{NoiseField, PerField, build_fields_with_rng};

fn channel_fields(fields: Vec<NoiseField>) -> Result<[NoiseField; 3]> {
    fields.try_into().map_err(|f: Vec<NoiseField>| {
        ShadesError::invalid(format!(
            "expected 3 color fields (one per channel), got {}",
            f.len()
        ))
    })
}

fn random_channel_fields<R: Rng>(rng: &mut R) -> Result<[NoiseField; 3]> {
    channel_fields(build_fields_with_rng(
        3,
        PerField::all(NoiseField::DEFAULT_SCALE),
        None,
        rng,
    )?)
}

fn check_variance(variance: f32) -> Result<f32> {
    if !(variance.is_finite() && variance >= 0.0) {
        return Err(ShadesError::invalid(format!(
            "color variance must be non-negative, got {}",
            variance
        )));
    }
    Ok(variance)
}

#[inline]
fn vary(color: Color, variance: f32, n: [f32; 3]) -> Color {
    color.shifted(n.map(|n| (n - 0.5) * 2.0 * variance))
}

/// Base colour shifted per channel by plain noise.
#[derive(Debug, Clone)]
pub struct NoiseGradient {
    pub color: Color,
    pub color_variance: f32,
    color_fields: [NoiseField; 3],
}

impl NoiseGradient {
    pub const DEFAULT_VARIANCE: f32 = 70.0;

    /// One field per channel, in `r, g, b` order.
    pub fn new(color: impl Into<Color>, color_fields: Vec<NoiseField>) -> Result<Self> {
        Ok(Self {
            color: color.into(),
            color_variance: Self::DEFAULT_VARIANCE,
            color_fields: channel_fields(color_fields)?,
        })
    }

    /// Fields at [`NoiseField::DEFAULT_SCALE`] seeded from `rng`.
    pub fn from_rng<R: Rng>(color: impl Into<Color>, rng: &mut R) -> Result<Self> {
        Ok(Self {
            color: color.into(),
            color_variance: Self::DEFAULT_VARIANCE,
            color_fields: random_channel_fields(rng)?,
        })
    }

    pub fn with_variance(mut self, variance: f32) -> Result<Self> {
        self.color_variance = check_variance(variance)?;
        Ok(self)
    }

    pub fn color_fields(&self) -> &[NoiseField; 3] {
        &self.color_fields
    }
}

impl ShadeRule for NoiseGradient {
    fn determine_shade(&self, point: Point) -> Option<Color> {
        let n = self.color_fields.each_ref().map(|f| f.noise(point));
        Some(vary(self.color, self.color_variance, n))
    }

    fn determine_shades(&self, points: &[Point]) -> Vec<Option<Color>> {
        let [r, g, b] = self.color_fields.each_ref().map(|f| f.noise_batch(points));
        (0..points.len())
            .map(|i| Some(vary(self.color, self.color_variance, [r[i], g[i], b[i]])))
            .collect()
    }
}

/// Like [`NoiseGradient`] but each channel samples domain-warped noise,
/// giving turbulent, marbled variation.
#[derive(Debug, Clone)]
pub struct DomainWarpGradient {
    pub color: Color,
    pub color_variance: f32,
    depth: u32,
    feedback: f32,
    color_fields: [NoiseField; 3],
}

impl DomainWarpGradient {
    pub const DEFAULT_DEPTH: u32 = 2;
    pub const DEFAULT_FEEDBACK: f32 = 0.7;

    pub fn new(color: impl Into<Color>, color_fields: Vec<NoiseField>) -> Result<Self> {
        Ok(Self {
            color: color.into(),
            color_variance: NoiseGradient::DEFAULT_VARIANCE,
            depth: Self::DEFAULT_DEPTH,
            feedback: Self::DEFAULT_FEEDBACK,
            color_fields: channel_fields(color_fields)?,
        })
    }

    pub fn from_rng<R: Rng>(color: impl Into<Color>, rng: &mut R) -> Result<Self> {
        Ok(Self {
            color: color.into(),
            color_variance: NoiseGradient::DEFAULT_VARIANCE,
            depth: Self::DEFAULT_DEPTH,
            feedback: Self::DEFAULT_FEEDBACK,
            color_fields: random_channel_fields(rng)?,
        })
    }

    pub fn with_variance(mut self, variance: f32) -> Result<Self> {
        self.color_variance = check_variance(variance)?;
        Ok(self)
    }

    /// Recursion depth and per-level feedback, see
    /// [`NoiseField::recursive_noise`].
    pub fn with_depth(mut self, depth: u32, feedback: f32) -> Result<Self> {
        self.feedback = check_feedback(feedback)?;
        self.depth = depth;
        Ok(self)
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }
}

fn check_feedback(feedback: f32) -> Result<f32> {
    if !feedback.is_finite() {
        return Err(ShadesError::invalid(format!(
            "feedback must be finite, got {}",
            feedback
        )));
    }
    Ok(feedback)
}

impl ShadeRule for DomainWarpGradient {
    fn determine_shade(&self, point: Point) -> Option<Color> {
        let n = self
            .color_fields
            .each_ref()
            .map(|f| f.recursive_noise(point, self.depth, self.feedback));
        Some(vary(self.color, self.color_variance, n))
    }

    fn determine_shades(&self, points: &[Point]) -> Vec<Option<Color>> {
        let [r, g, b] = self
            .color_fields
            .each_ref()
            .map(|f| f.recursive_noise_batch(points, self.depth, self.feedback));
        (0..points.len())
            .map(|i| Some(vary(self.color, self.color_variance, [r[i], g[i], b[i]])))
            .collect()
    }
}

/// One selectable rule of a [`SwirlOfShades`], used when the swirl noise
/// falls in `[low, high)`.
pub struct SwirlBand {
    low: f32,
    high: f32,
    rule: Box<dyn ShadeRule>,
}

impl SwirlBand {
    pub fn new(low: f32, high: f32, rule: impl ShadeRule + 'static) -> Result<Self> {
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(ShadesError::invalid(format!(
                "swirl band needs low < high, got [{}, {})",
                low, high
            )));
        }
        Ok(Self {
            low,
            high,
            rule: Box::new(rule),
        })
    }

    #[inline]
    pub fn contains(&self, n: f32) -> bool {
        self.low <= n && n < self.high
    }
}

impl fmt::Debug for SwirlBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwirlBand")
            .field("low", &self.low)
            .field("high", &self.high)
            .finish_non_exhaustive()
    }
}

/// Picks a rule per pixel from the band its swirl noise falls in.
///
/// The first matching band wins. Where no band matches the pixel is left
/// untouched.
#[derive(Debug)]
pub struct SwirlOfShades {
    swirl_field: NoiseField,
    depth: u32,
    feedback: f32,
    bands: Vec<SwirlBand>,
}

impl SwirlOfShades {
    pub const DEFAULT_DEPTH: u32 = 1;
    pub const DEFAULT_FEEDBACK: f32 = 0.7;

    pub fn new(swirl_field: NoiseField, bands: Vec<SwirlBand>) -> Result<Self> {
        if bands.is_empty() {
            return Err(ShadesError::invalid("swirl needs at least one band"));
        }
        Ok(Self {
            swirl_field,
            depth: Self::DEFAULT_DEPTH,
            feedback: Self::DEFAULT_FEEDBACK,
            bands,
        })
    }

    pub fn with_depth(mut self, depth: u32, feedback: f32) -> Result<Self> {
        self.feedback = check_feedback(feedback)?;
        self.depth = depth;
        Ok(self)
    }

    pub fn bands(&self) -> &[SwirlBand] {
        &self.bands
    }

    fn band_for(&self, n: f32) -> Option<usize> {
        self.bands.iter().position(|b| b.contains(n))
    }
}

impl ShadeRule for SwirlOfShades {
    fn determine_shade(&self, point: Point) -> Option<Color> {
        let n = self
            .swirl_field
            .recursive_noise(point, self.depth, self.feedback);
        let band = self.band_for(n)?;
        self.bands[band].rule.determine_shade(point)
    }

    fn determine_shades(&self, points: &[Point]) -> Vec<Option<Color>> {
        let noise = self
            .swirl_field
            .recursive_noise_batch(points, self.depth, self.feedback);

        // Group point indices by band so each sub-rule sees one batch
        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); self.bands.len()];
        for (i, n) in noise.into_iter().enumerate() {
            if let Some(band) = self.band_for(n) {
                groups[band].push(i);
            }
        }

        let mut out = vec![None; points.len()];
        for (band, indices) in self.bands.iter().zip(&groups) {
            if indices.is_empty() {
                continue;
            }
            let subset: Vec<Point> = indices.iter().map(|&i| points[i]).collect();
            for (&i, color) in indices.iter().zip(band.rule.determine_shades(&subset)) {
                out[i] = color;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shade::BlockColor;
    use crate::shader::build_fields;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fields(seed: u64) -> Vec<NoiseField> {
        build_fields(3, PerField::all(0.05), Some(PerField::each([seed, seed + 1, seed + 2])))
            .unwrap()
    }

    fn sample_points() -> Vec<Point> {
        (0..300)
            .map(|i| Point::new((i % 20) as f32 * 3.7, (i / 20) as f32 * 5.3))
            .collect()
    }

    #[test]
    fn test_noise_gradient_zero_variance_is_flat() {
        let g = NoiseGradient::new((90, 120, 150), fields(1))
            .unwrap()
            .with_variance(0.0)
            .unwrap();
        for p in sample_points() {
            assert_eq!(g.determine_shade(p), Some(Color::new(90, 120, 150)));
        }
    }

    #[test]
    fn test_noise_gradient_bounded_by_variance() {
        let g = NoiseGradient::new((128, 10, 250), fields(2)).unwrap();
        for p in sample_points() {
            let c = g.determine_shade(p).unwrap();
            assert!((c.r as f32 - 128.0).abs() <= 70.0);
            assert!(c.g <= 80);
            assert!(c.b >= 180);
        }
    }

    #[test]
    fn test_noise_gradient_varies() {
        let g = NoiseGradient::new((128, 128, 128), fields(3)).unwrap();
        let colors = g.determine_shades(&sample_points());
        assert!(colors.iter().any(|c| *c != colors[0]));
    }

    #[test]
    fn test_noise_gradient_batch_matches_scalar() {
        let g = NoiseGradient::new((100, 100, 100), fields(4)).unwrap();
        let points = sample_points();
        let batch = g.determine_shades(&points);
        for (p, c) in points.iter().zip(batch) {
            assert_eq!(g.determine_shade(*p), c);
        }
    }

    #[test]
    fn test_noise_gradient_invalid() {
        let two = build_fields(2, PerField::all(0.1), Some(PerField::all(1))).unwrap();
        assert!(NoiseGradient::new(Color::BLACK, two).is_err());
        let g = NoiseGradient::new(Color::BLACK, fields(5)).unwrap();
        assert!(g.with_variance(-1.0).is_err());
    }

    #[test]
    fn test_noise_gradient_from_rng_reproducible() {
        let a = NoiseGradient::from_rng(Color::WHITE, &mut StdRng::seed_from_u64(8)).unwrap();
        let b = NoiseGradient::from_rng(Color::WHITE, &mut StdRng::seed_from_u64(8)).unwrap();
        let p = Point::new(321.0, 77.0);
        assert_eq!(a.determine_shade(p), b.determine_shade(p));
        assert_eq!(a.color_fields()[0].scale(), NoiseField::DEFAULT_SCALE);
    }

    #[test]
    fn test_domain_warp_depth_zero_matches_noise_gradient() {
        let warped = DomainWarpGradient::new((60, 60, 60), fields(6))
            .unwrap()
            .with_depth(0, 0.7)
            .unwrap();
        let plain = NoiseGradient::new((60, 60, 60), fields(6)).unwrap();
        for p in sample_points() {
            assert_eq!(warped.determine_shade(p), plain.determine_shade(p));
        }
    }

    #[test]
    fn test_domain_warp_defaults_and_batch() {
        let g = DomainWarpGradient::new((200, 50, 50), fields(7)).unwrap();
        assert_eq!(g.depth(), 2);
        assert_eq!(g.feedback(), 0.7);
        let points = sample_points();
        let batch = g.determine_shades(&points);
        for (p, c) in points.iter().zip(batch) {
            assert_eq!(g.determine_shade(*p), c);
        }
    }

    fn swirl(bands: Vec<SwirlBand>) -> SwirlOfShades {
        SwirlOfShades::new(NoiseField::new(0.03, Some(12)).unwrap(), bands).unwrap()
    }

    #[test]
    fn test_swirl_half_open_bands() {
        // depth 0 at the origin samples a lattice corner: exactly 0.5
        let s = swirl(vec![
            SwirlBand::new(0.0, 0.5, BlockColor::new(Color::WHITE)).unwrap(),
            SwirlBand::new(0.5, 1.01, BlockColor::new(Color::BLACK)).unwrap(),
        ])
        .with_depth(0, 0.7)
        .unwrap();
        assert_eq!(s.determine_shade(Point::new(0.0, 0.0)), Some(Color::BLACK));
    }

    #[test]
    fn test_swirl_covering_bands_color_everything() {
        let s = swirl(vec![
            SwirlBand::new(0.0, 0.5, BlockColor::new(Color::WHITE)).unwrap(),
            SwirlBand::new(0.5, 1.01, BlockColor::new(Color::BLACK)).unwrap(),
        ]);
        let colors = s.determine_shades(&sample_points());
        assert!(colors.iter().all(Option::is_some));
    }

    #[test]
    fn test_swirl_unmatched_is_untouched() {
        let s = swirl(vec![
            SwirlBand::new(2.0, 3.0, BlockColor::new(Color::WHITE)).unwrap(),
        ]);
        assert!(s.determine_shades(&sample_points()).iter().all(Option::is_none));
        assert_eq!(s.determine_shade(Point::new(4.0, 4.0)), None);
    }

    #[test]
    fn test_swirl_batch_matches_scalar() {
        let s = swirl(vec![
            SwirlBand::new(0.0, 0.45, NoiseGradient::new(Color::WHITE, fields(20)).unwrap())
                .unwrap(),
            SwirlBand::new(0.55, 1.01, BlockColor::new((1, 2, 3))).unwrap(),
        ]);
        let points = sample_points();
        let batch = s.determine_shades(&points);
        for (p, c) in points.iter().zip(batch) {
            assert_eq!(s.determine_shade(*p), c);
        }
    }

    #[test]
    fn test_swirl_invalid() {
        assert!(SwirlBand::new(0.5, 0.5, BlockColor::new(Color::WHITE)).is_err());
        assert!(SwirlOfShades::new(NoiseField::new(0.1, Some(1)).unwrap(), vec![]).is_err());
    }
}

//! Seeded coherent noise.
//!
//! [`NoiseField`] is classic 2D gradient (Perlin) noise over continuous
//! coordinates. The seed drives a shuffled 256 entry permutation table,
//! doubled to 512 so corner hashing never wraps, and the table never
//! changes after construction. Sampling is therefore a pure function of
//! `(x, y, scale, seed)`.
//!
//! ## Algorithm
//!
//! ```text
//! (x, y)      = point * scale
//! cell        = floor(x, y),  local = (x, y) - cell
//! corner grad = GRADIENTS[perm[perm[cx & 255] + (cy & 255)] & 7]
//! n_ij        = grad_ij . (local - (i, j))
//! raw         = lerp(lerp(n00, n10, fade(lx)), lerp(n01, n11, fade(lx)), fade(ly))
//! noise       = (raw * sqrt(2) + 1) / 2        -> [0, 1]
//! ```

use std::f32::consts::{FRAC_1_SQRT_2, SQRT_2};
use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::blend::{fade, lerp};
use crate::error::{Result, ShadesError};
use crate::geometry::Point;

/// Unit gradient vectors: the four axes and the four diagonals.
const GRADIENTS: [(f32, f32); 8] = [
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    (-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    (FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    (-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
];

/// Pixel displacement applied per unit of feedback at each level of
/// [`NoiseField::recursive_noise`].
pub const RECURSIVE_WARP_REACH: f32 = 200.0;

/// A deterministic 2D coherent noise function with output in `[0, 1]`.
#[derive(Clone)]
pub struct NoiseField {
    scale: f32,
    seed: u64,
    perm: [u8; 512],
}

impl NoiseField {
    /// Scale used when none is given. Low values give broad, slow
    /// variation across a canvas of a few hundred pixels.
    pub const DEFAULT_SCALE: f32 = 0.002;

    /// Create a noise field. Without a seed one is drawn from the thread
    /// rng, which is not reproducible across runs.
    pub fn new(scale: f32, seed: Option<u64>) -> Result<Self> {
        Self::with_rng(scale, seed, &mut rand::rng())
    }

    /// Create a noise field, drawing a missing seed from `rng`.
    pub fn with_rng<R: Rng>(scale: f32, seed: Option<u64>, rng: &mut R) -> Result<Self> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ShadesError::invalid(format!(
                "noise scale must be positive, got {}",
                scale
            )));
        }
        let seed = seed.unwrap_or_else(|| rng.random::<u32>() as u64);

        let mut table: [u8; 256] = std::array::from_fn(|i| i as u8);
        table.shuffle(&mut StdRng::seed_from_u64(seed));

        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&table);
        perm[256..].copy_from_slice(&table);

        Ok(Self { scale, seed, perm })
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    fn gradient(&self, cx: i64, cy: i64) -> (f32, f32) {
        let xi = (cx & 255) as usize;
        let yi = (cy & 255) as usize;
        let h = self.perm[self.perm[xi] as usize + yi];
        GRADIENTS[(h & 7) as usize]
    }

    /// Sample the field at a point. Always in `[0, 1]`.
    pub fn noise(&self, point: Point) -> f32 {
        let x = point.x * self.scale;
        let y = point.y * self.scale;

        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (cx, cy) = (x0 as i64, y0 as i64);

        let dot = |(gx, gy): (f32, f32), dx: f32, dy: f32| gx * dx + gy * dy;
        let n00 = dot(self.gradient(cx, cy), fx, fy);
        let n10 = dot(self.gradient(cx + 1, cy), fx - 1.0, fy);
        let n01 = dot(self.gradient(cx, cy + 1), fx, fy - 1.0);
        let n11 = dot(self.gradient(cx + 1, cy + 1), fx - 1.0, fy - 1.0);

        let u = fade(fx);
        let v = fade(fy);
        let raw = lerp(lerp(n00, n10, u), lerp(n01, n11, u), v);

        ((raw * SQRT_2 + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Sample the field at every point, in order.
    ///
    /// Element `i` equals `self.noise(points[i])` exactly.
    pub fn noise_batch(&self, points: &[Point]) -> Vec<f32> {
        points.iter().map(|&p| self.noise(p)).collect()
    }

    /// Sample a `width` x `height` block of integer coordinates starting at
    /// `origin`, row-major.
    pub fn noise_grid(&self, origin: Point, width: u32, height: u32) -> Vec<f32> {
        let mut out = Vec::with_capacity(width as usize * height as usize);
        for dy in 0..height {
            for dx in 0..width {
                out.push(self.noise(origin.offset(dx as f32, dy as f32)));
            }
        }
        out
    }

    /// Domain-warped noise.
    ///
    /// Level 0 is plain [`noise`](Self::noise). Each further level samples
    /// the field again at the point displaced on both axes by the previous
    /// level's value times `feedback * RECURSIVE_WARP_REACH`.
    pub fn recursive_noise(&self, point: Point, depth: u32, feedback: f32) -> f32 {
        let mut n = self.noise(point);
        for _ in 0..depth {
            let shift = n * feedback * RECURSIVE_WARP_REACH;
            n = self.noise(point.offset(shift, shift));
        }
        n
    }

    /// Batch form of [`recursive_noise`](Self::recursive_noise).
    pub fn recursive_noise_batch(&self, points: &[Point], depth: u32, feedback: f32) -> Vec<f32> {
        points
            .iter()
            .map(|&p| self.recursive_noise(p, depth, feedback))
            .collect()
    }
}

impl fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseField")
            .field("scale", &self.scale)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

/// One value shared by every field, or one value per field.
#[derive(Debug, Clone, PartialEq)]
pub enum PerField<T> {
    All(T),
    Each(Vec<T>),
}

impl<T: Clone> PerField<T> {
    pub fn all(value: T) -> Self {
        PerField::All(value)
    }

    pub fn each(values: impl Into<Vec<T>>) -> Self {
        PerField::Each(values.into())
    }

    fn expand(self, count: usize, what: &str) -> Result<Vec<T>> {
        match self {
            PerField::All(v) => Ok(vec![v; count]),
            PerField::Each(values) if values.len() == count => Ok(values),
            PerField::Each(values) => Err(ShadesError::invalid(format!(
                "expected {} {} values, got {}",
                count,
                what,
                values.len()
            ))),
        }
    }
}

/// Build `count` noise fields at once, e.g. one per colour channel or
/// one per warp axis.
///
/// Missing seeds are drawn from the thread rng.
pub fn build_fields(
    count: usize,
    scale: PerField<f32>,
    seed: Option<PerField<u64>>,
) -> Result<Vec<NoiseField>> {
    build_fields_with_rng(count, scale, seed, &mut rand::rng())
}

/// [`build_fields`] drawing missing seeds from `rng`, so a seeded rng
/// gives fully reproducible fields.
pub fn build_fields_with_rng<R: Rng>(
    count: usize,
    scale: PerField<f32>,
    seed: Option<PerField<u64>>,
    rng: &mut R,
) -> Result<Vec<NoiseField>> {
    if count == 0 {
        return Err(ShadesError::invalid("field count must be at least 1"));
    }
    let scales = scale.expand(count, "scale")?;
    let seeds: Vec<Option<u64>> = match seed {
        Some(seed) => seed.expand(count, "seed")?.into_iter().map(Some).collect(),
        None => vec![None; count],
    };

    scales
        .into_iter()
        .zip(seeds)
        .map(|(scale, seed)| NoiseField::with_rng(scale, seed, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(scale: f32, seed: u64) -> NoiseField {
        NoiseField::new(scale, Some(seed)).unwrap()
    }

    #[test]
    fn test_noise_deterministic() {
        let a = field(0.05, 42);
        let b = field(0.05, 42);
        for i in 0..200 {
            let p = Point::new(i as f32 * 1.7, i as f32 * -0.9);
            assert_eq!(a.noise(p), a.noise(p));
            assert_eq!(a.noise(p), b.noise(p));
        }
    }

    #[test]
    fn test_noise_range() {
        let f = field(0.13, 3);
        for y in -50..50 {
            for x in -50..50 {
                let v = f.noise(Point::new(x as f32 * 1.3, y as f32 * 0.7));
                assert!((0.0..=1.0).contains(&v), "noise out of range: {}", v);
            }
        }
    }

    #[test]
    fn test_noise_is_half_on_lattice() {
        // Gradient noise is zero at lattice corners
        let f = field(1.0, 11);
        for (x, y) in [(0.0, 0.0), (3.0, 7.0), (-4.0, 2.0)] {
            assert_eq!(f.noise(Point::new(x, y)), 0.5);
        }
    }

    #[test]
    fn test_noise_continuity() {
        let f = field(0.05, 9);
        let v1 = f.noise(Point::new(100.0, 100.0));
        let v2 = f.noise(Point::new(100.1, 100.0));
        assert!((v1 - v2).abs() < 0.05, "noise should be continuous");
    }

    #[test]
    fn test_noise_varies_across_space() {
        let f = field(0.1, 5);
        let first = f.noise(Point::new(3.3, 4.4));
        let varies = (0..100).any(|i| f.noise(Point::new(3.3 + i as f32 * 2.1, 4.4)) != first);
        assert!(varies);
    }

    #[test]
    fn test_seeds_differ() {
        let a = field(0.05, 1);
        let b = field(0.05, 2);
        let differs = (0..100).any(|i| {
            let p = Point::new(i as f32 * 3.1 + 0.5, i as f32 * 1.9 + 0.5);
            a.noise(p) != b.noise(p)
        });
        assert!(differs);
    }

    #[test]
    fn test_batch_matches_scalar() {
        let f = field(0.02, 77);
        let points: Vec<Point> = (0..500)
            .map(|i| Point::new((i % 37) as f32 * 3.5 - 20.0, (i / 37) as f32 * 4.25))
            .collect();
        let batch = f.noise_batch(&points);
        assert_eq!(batch.len(), points.len());
        for (p, v) in points.iter().zip(&batch) {
            assert_eq!(f.noise(*p), *v);
        }
    }

    #[test]
    fn test_noise_grid_row_major() {
        let f = field(0.1, 8);
        let grid = f.noise_grid(Point::new(-3.0, 5.0), 4, 3);
        assert_eq!(grid.len(), 12);
        assert_eq!(grid[0], f.noise(Point::new(-3.0, 5.0)));
        assert_eq!(grid[5], f.noise(Point::new(-2.0, 6.0)));
        assert_eq!(grid[11], f.noise(Point::new(0.0, 7.0)));
    }

    #[test]
    fn test_recursive_noise() {
        let f = field(0.01, 4);
        let p = Point::new(-2.0, -2.0);
        assert_eq!(f.recursive_noise(p, 0, 0.7), f.noise(p));
        for depth in 0..4 {
            let v = f.recursive_noise(Point::new(4.0, 4.0), depth, 0.7);
            assert!((0.0..=1.0).contains(&v));
        }
        let points = [Point::new(1.0, 2.0), Point::new(30.0, -8.0)];
        let batch = f.recursive_noise_batch(&points, 2, 0.5);
        assert_eq!(batch[1], f.recursive_noise(points[1], 2, 0.5));
    }

    #[test]
    fn test_invalid_scale() {
        for scale in [0.0, -0.1, f32::NAN, f32::INFINITY] {
            let err = NoiseField::new(scale, Some(1)).unwrap_err();
            assert!(matches!(err, ShadesError::InvalidParameter(_)));
        }
    }

    #[test]
    fn test_unseeded_uses_injected_rng() {
        let a = NoiseField::with_rng(0.1, None, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = NoiseField::with_rng(0.1, None, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a.seed(), b.seed());
    }

    #[test]
    fn test_build_fields_broadcast() {
        let fields = build_fields(3, PerField::all(0.1), Some(PerField::all(5))).unwrap();
        assert_eq!(fields.len(), 3);
        for f in &fields {
            assert_eq!(f.scale(), 0.1);
            assert_eq!(f.seed(), 5);
        }
        let p = Point::new(12.5, 3.25);
        assert_eq!(fields[0].noise(p), fields[2].noise(p));
    }

    #[test]
    fn test_build_fields_each_scale() {
        let fields = build_fields(2, PerField::each([0.1, 0.2]), Some(PerField::all(1))).unwrap();
        assert_eq!(fields[0].scale(), 0.1);
        assert_eq!(fields[1].scale(), 0.2);
    }

    #[test]
    fn test_build_fields_length_mismatch() {
        let err = build_fields(2, PerField::each([0.1]), Some(PerField::all(1))).unwrap_err();
        assert!(matches!(err, ShadesError::InvalidParameter(_)));

        let err = build_fields(2, PerField::all(0.1), Some(PerField::each([1, 2, 3]))).unwrap_err();
        assert!(matches!(err, ShadesError::InvalidParameter(_)));
    }

    #[test]
    fn test_build_fields_zero_count() {
        assert!(build_fields(0, PerField::all(0.1), None).is_err());
    }

    #[test]
    fn test_build_fields_reproducible_with_rng() {
        let seeds = |rng_seed| {
            let mut rng = StdRng::seed_from_u64(rng_seed);
            build_fields_with_rng(4, PerField::all(0.01), None, &mut rng)
                .unwrap()
                .iter()
                .map(NoiseField::seed)
                .collect::<Vec<_>>()
        };
        assert_eq!(seeds(3), seeds(3));
    }
}

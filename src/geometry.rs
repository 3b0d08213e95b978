//! Coordinates and small geometric helpers.

use rand::Rng;
use serde::Deserialize;

use crate::shader::{dist, dist_sq};

/// A continuous 2D coordinate in canvas space (x right, y down).
///
/// Coordinates stay fractional through warping and are only snapped to
/// integer pixel indices when written into a [`Canvas`](crate::Canvas).
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(from = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f32 {
        dist(self.x, self.y, other.x, other.y)
    }

    pub fn distance_sq(self, other: Point) -> f32 {
        dist_sq(self.x, self.y, other.x, other.y)
    }

    pub fn offset(self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Pixel indices containing this point, or `None` if it lies outside
    /// a `width` x `height` buffer.
    pub fn pixel(self, width: u32, height: u32) -> Option<(u32, u32)> {
        let (x, y) = (self.x.floor(), self.y.floor());
        if x < 0.0 || y < 0.0 || x >= width as f32 || y >= height as f32 {
            return None;
        }
        Some((x as u32, y as u32))
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x as f32, y as f32)
    }
}

impl From<[f32; 2]> for Point {
    fn from(p: [f32; 2]) -> Self {
        Point::new(p[0], p[1])
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x as f32, y as f32)
    }
}

/// Lattice points covering `0..=width` x `0..=height` with the given steps.
///
/// With `x_first` the x coordinate is the outer loop. Points are always
/// returned as `(x, y)`. The far edges are included so a grid of
/// rectangles covers the whole canvas.
pub fn grid(
    width: u32,
    height: u32,
    x_step: u32,
    y_step: u32,
    x_first: bool,
) -> impl Iterator<Item = Point> {
    let x_step = x_step.max(1) as usize;
    let y_step = y_step.max(1) as usize;
    let (outer, inner, outer_step, inner_step) = if x_first {
        (width, height, x_step, y_step)
    } else {
        (height, width, y_step, x_step)
    };
    (0..=outer).step_by(outer_step).flat_map(move |i| {
        (0..=inner).step_by(inner_step).map(move |j| {
            if x_first {
                Point::new(i as f32, j as f32)
            } else {
                Point::new(j as f32, i as f32)
            }
        })
    })
}

/// Move a point by a random integer amount on each axis, drawn from the
/// inclusive ranges `x_range` and `y_range`.
pub fn randomly_shift_point<R: Rng>(
    point: Point,
    x_range: (i32, i32),
    y_range: (i32, i32),
    rng: &mut R,
) -> Point {
    let pick = |rng: &mut R, (lo, hi): (i32, i32)| {
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        rng.random_range(lo..=hi) as f32
    };
    let dx = pick(rng, x_range);
    let dy = pick(rng, y_range);
    point.offset(dx, dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
        assert!((a.distance_sq(b) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_pixel_snapping() {
        assert_eq!(Point::new(2.9, 0.1).pixel(10, 10), Some((2, 0)));
        assert_eq!(Point::new(-0.1, 3.0).pixel(10, 10), None);
        assert_eq!(Point::new(10.0, 3.0).pixel(10, 10), None);
    }

    #[test]
    fn test_grid_includes_edges() {
        let points: Vec<Point> = grid(20, 10, 10, 10, true).collect();
        assert_eq!(points.len(), 3 * 2);
        assert_eq!(points[0], Point::new(0.0, 0.0));
        assert_eq!(points[1], Point::new(0.0, 10.0));
        assert_eq!(points[5], Point::new(20.0, 10.0));
    }

    #[test]
    fn test_grid_y_first_order() {
        let points: Vec<Point> = grid(10, 10, 10, 10, false).collect();
        assert_eq!(points[1], Point::new(10.0, 0.0));
    }

    #[test]
    fn test_randomly_shift_point_within_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let p = randomly_shift_point(Point::new(50.0, 50.0), (-5, 5), (2, 3), &mut rng);
            assert!(p.x >= 45.0 && p.x <= 55.0);
            assert!(p.y >= 52.0 && p.y <= 53.0);
        }
    }
}

//! Deterministic colour rules: flat colour and positional gradients.

use super::ShadeRule;
use crate::color::Color;
use crate::error::{Result, ShadesError};
use crate::geometry::Point;
use crate::shader::inverse_distance_weight;

/// The same colour everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockColor {
    pub color: Color,
}

impl BlockColor {
    pub fn new(color: impl Into<Color>) -> Self {
        Self {
            color: color.into(),
        }
    }
}

impl ShadeRule for BlockColor {
    fn determine_shade(&self, _point: Point) -> Option<Color> {
        Some(self.color)
    }

    fn determine_shades(&self, points: &[Point]) -> Vec<Option<Color>> {
        vec![Some(self.color); points.len()]
    }
}

/// Axis a [`LinearGradient`] runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// A colour anchored at a position along the gradient axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub position: f32,
    pub color: Color,
}

/// Piecewise linear gradient through colour stops along one axis.
///
/// Before the first stop the first colour holds, after the last stop the
/// last colour holds, and between neighbouring stops colours blend
/// linearly.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    axis: Axis,
    stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(axis: Axis, stops: Vec<(f32, Color)>) -> Result<Self> {
        if stops.is_empty() {
            return Err(ShadesError::invalid("gradient needs at least one color stop"));
        }
        if stops.iter().any(|(p, _)| !p.is_finite()) {
            return Err(ShadesError::invalid("gradient stop positions must be finite"));
        }
        let mut stops: Vec<ColorStop> = stops
            .into_iter()
            .map(|(position, color)| ColorStop { position, color })
            .collect();
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(Self { axis, stops })
    }

    /// Two-stop gradient from `from` at 0 to `to` at the last pixel of an
    /// `extent` pixels long canvas side.
    pub fn across(axis: Axis, extent: u32, from: Color, to: Color) -> Result<Self> {
        if extent == 0 {
            return Err(ShadesError::invalid("gradient extent must be positive"));
        }
        let last = (extent.saturating_sub(1)).max(1) as f32;
        Self::new(axis, vec![(0.0, from), (last, to)])
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    fn color_at(&self, v: f32) -> Color {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];
        if v <= first.position {
            return first.color;
        }
        if v >= last.position {
            return last.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if v >= a.position && v < b.position {
                let t = (v - a.position) / (b.position - a.position);
                return a.color.lerp(b.color, t);
            }
        }
        last.color
    }
}

impl ShadeRule for LinearGradient {
    fn determine_shade(&self, point: Point) -> Option<Color> {
        let v = match self.axis {
            Axis::X => point.x,
            Axis::Y => point.y,
        };
        Some(self.color_at(v))
    }
}

macro_rules! axis_gradient {
    ($(#[$doc:meta])* $name:ident, $axis:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(LinearGradient);

        impl $name {
            /// Gradient through `(position, colour)` stops.
            pub fn new(stops: Vec<(f32, Color)>) -> Result<Self> {
                LinearGradient::new($axis, stops).map(Self)
            }

            /// Blend from `from` to `to` across `extent` pixels.
            pub fn across(extent: u32, from: Color, to: Color) -> Result<Self> {
                LinearGradient::across($axis, extent, from, to).map(Self)
            }

            pub fn gradient(&self) -> &LinearGradient {
                &self.0
            }
        }

        impl ShadeRule for $name {
            fn determine_shade(&self, point: Point) -> Option<Color> {
                self.0.determine_shade(point)
            }
        }
    };
}

axis_gradient!(
    /// Gradient along x: colour depends only on the column.
    HorizontalGradient,
    Axis::X
);
axis_gradient!(
    /// Gradient along y: colour depends only on the row.
    VerticalGradient,
    Axis::Y
);

/// Inverse-distance-weighted blend of colours anchored at points.
#[derive(Debug, Clone, PartialEq)]
pub struct PointGradients {
    anchors: Vec<(Point, Color)>,
    power: f32,
}

impl PointGradients {
    pub const DEFAULT_POWER: f32 = 2.0;

    pub fn new(anchors: Vec<(Point, Color)>) -> Result<Self> {
        if anchors.is_empty() {
            return Err(ShadesError::invalid("point gradient needs at least one anchor"));
        }
        Ok(Self {
            anchors,
            power: Self::DEFAULT_POWER,
        })
    }

    /// Falloff exponent: higher values keep each anchor's colour local.
    pub fn with_power(mut self, power: f32) -> Result<Self> {
        if !(power.is_finite() && power > 0.0) {
            return Err(ShadesError::invalid(format!(
                "point gradient power must be positive, got {}",
                power
            )));
        }
        self.power = power;
        Ok(self)
    }
}

impl ShadeRule for PointGradients {
    fn determine_shade(&self, point: Point) -> Option<Color> {
        let mut sum = [0.0f32; 3];
        let mut total = 0.0;
        for (anchor, color) in &self.anchors {
            let Some(w) = inverse_distance_weight(point.distance(*anchor), self.power) else {
                return Some(*color);
            };
            let c = color.to_f32();
            for i in 0..3 {
                sum[i] += c[i] * w;
            }
            total += w;
        }
        if total <= 0.0 {
            // Every weight underflowed: far away from all anchors
            return Some(self.anchors[0].1);
        }
        Some(Color::from_f32([sum[0] / total, sum[1] / total, sum[2] / total]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_color_everywhere() {
        let rule = BlockColor::new((10, 20, 30));
        for p in [
            Point::new(0.0, 0.0),
            Point::new(-1e6, 3.0),
            Point::new(1e9, 1e9),
        ] {
            assert_eq!(rule.determine_shade(p), Some(Color::new(10, 20, 30)));
        }
        assert_eq!(rule.determine_shades(&[Point::default(); 4]).len(), 4);
    }

    #[test]
    fn test_horizontal_gradient_across() {
        let g = HorizontalGradient::across(11, Color::BLACK, Color::new(200, 100, 0)).unwrap();
        assert_eq!(g.determine_shade(Point::new(0.0, 5.0)), Some(Color::BLACK));
        assert_eq!(
            g.determine_shade(Point::new(10.0, 99.0)),
            Some(Color::new(200, 100, 0))
        );
        assert_eq!(
            g.determine_shade(Point::new(5.0, -3.0)),
            Some(Color::new(100, 50, 0))
        );
        // outside the extent holds the end colours
        assert_eq!(g.determine_shade(Point::new(-40.0, 0.0)), Some(Color::BLACK));
    }

    #[test]
    fn test_vertical_gradient_ignores_x() {
        let g = VerticalGradient::across(5, Color::WHITE, Color::BLACK).unwrap();
        let a = g.determine_shade(Point::new(0.0, 2.0));
        let b = g.determine_shade(Point::new(300.0, 2.0));
        assert_eq!(a, b);
        assert_eq!(a, Some(Color::new(127, 127, 127)));
    }

    #[test]
    fn test_multi_stop_gradient() {
        let g = LinearGradient::new(
            Axis::X,
            vec![
                (100.0, Color::WHITE),
                (50.0, Color::BLACK),
                (150.0, Color::new(0, 0, 250)),
            ],
        )
        .unwrap();
        assert_eq!(g.stops()[0].position, 50.0);
        assert_eq!(g.determine_shade(Point::new(10.0, 0.0)), Some(Color::BLACK));
        assert_eq!(g.determine_shade(Point::new(75.0, 0.0)), Some(Color::new(127, 127, 127)));
        assert_eq!(g.determine_shade(Point::new(100.0, 0.0)), Some(Color::WHITE));
        assert_eq!(g.determine_shade(Point::new(200.0, 0.0)), Some(Color::new(0, 0, 250)));
    }

    #[test]
    fn test_gradient_invalid() {
        assert!(LinearGradient::new(Axis::X, vec![]).is_err());
        assert!(LinearGradient::new(Axis::X, vec![(f32::NAN, Color::WHITE)]).is_err());
        assert!(HorizontalGradient::across(0, Color::WHITE, Color::BLACK).is_err());
    }

    #[test]
    fn test_point_gradients() {
        let g = PointGradients::new(vec![
            (Point::new(0.0, 0.0), Color::new(200, 0, 0)),
            (Point::new(10.0, 0.0), Color::new(0, 0, 200)),
        ])
        .unwrap();
        assert_eq!(g.determine_shade(Point::new(0.0, 0.0)), Some(Color::new(200, 0, 0)));
        let mid = g.determine_shade(Point::new(5.0, 0.0)).unwrap();
        assert!((99..=100).contains(&mid.r) && mid.r == mid.b);
        assert_eq!(mid.g, 0);
        let near_red = g.determine_shade(Point::new(2.0, 0.0)).unwrap();
        assert!(near_red.r > near_red.b);
    }

    #[test]
    fn test_point_gradients_invalid() {
        assert!(PointGradients::new(vec![]).is_err());
        let g = PointGradients::new(vec![(Point::default(), Color::WHITE)]).unwrap();
        assert!(g.with_power(0.0).is_err());
    }
}

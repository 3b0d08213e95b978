//! # Shades
//!
//! A shade is a colour rule plus the drawing operations that sample it.
//! The rule is the single extension point: anything implementing
//! [`ShadeRule::determine_shade`] can be wrapped in a [`Shade`] and gets
//! every drawing operation for free.
//!
//! ## Draw Pipeline
//!
//! Every drawing operation is one batch pass:
//!
//! ```text
//! shape ──pixels()──▶ [Point] ──Warp::apply_batch──▶ [Point]
//!       ──ShadeRule::determine_shades──▶ [Option<Color>] ──Canvas::set_pixels
//! ```
//!
//! 1. The shape enumerates its integer pixel coordinates, clipped to the
//!    canvas grown by the warp reach.
//! 2. With a [`Warp`], each coordinate is displaced by
//!    `size * (2 * noise - 1)` on each axis, one noise field per axis.
//! 3. The rule colours the whole (warped) coordinate array at once.
//!    `None` leaves a pixel untouched.
//! 4. Coloured coordinates are snapped to pixels and written in bulk;
//!    anything that landed off canvas is dropped.
//!
//! ## Example
//!
//! ```
//! use shades::{Canvas, Color, Shade, BlockColor};
//!
//! let mut canvas = Canvas::new(10, 10, Color::WHITE)?;
//! let shade = Shade::new(BlockColor::new(Color::new(50, 50, 50)));
//! shade.circle(&mut canvas, (5, 5), 3.0)?;
//! assert_eq!(canvas.get_pixel(5, 5), Some(Color::new(50, 50, 50)));
//! # Ok::<(), shades::ShadesError>(())
//! ```

pub mod gradient;
pub mod noisy;

pub use gradient::*;
pub use noisy::*;

use tracing::debug;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::error::{Result, ShadesError};
use crate::geometry::Point;
use crate::shader::NoiseField;
use crate::shape::{Bounds, Shape};

/// A colour rule: maps a coordinate to a colour.
pub trait ShadeRule: Send + Sync {
    /// Colour at `point`, or `None` to leave the pixel as it is.
    fn determine_shade(&self, point: Point) -> Option<Color>;

    /// Colour a whole coordinate array. Element `i` must equal
    /// `determine_shade(points[i])`; rules override this when they can
    /// share work across the batch.
    fn determine_shades(&self, points: &[Point]) -> Vec<Option<Color>> {
        points.iter().map(|&p| self.determine_shade(p)).collect()
    }
}

impl<R: ShadeRule + ?Sized> ShadeRule for Box<R> {
    fn determine_shade(&self, point: Point) -> Option<Color> {
        (**self).determine_shade(point)
    }

    fn determine_shades(&self, points: &[Point]) -> Vec<Option<Color>> {
        (**self).determine_shades(points)
    }
}

impl<R: ShadeRule + ?Sized> ShadeRule for &R {
    fn determine_shade(&self, point: Point) -> Option<Color> {
        (**self).determine_shade(point)
    }

    fn determine_shades(&self, points: &[Point]) -> Vec<Option<Color>> {
        (**self).determine_shades(points)
    }
}

/// Rule built from a closure, see [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F>(F);

/// Use a closure as a colour rule.
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn(Point) -> Option<Color> + Send + Sync,
{
    FromFn(f)
}

impl<F> ShadeRule for FromFn<F>
where
    F: Fn(Point) -> Option<Color> + Send + Sync,
{
    fn determine_shade(&self, point: Point) -> Option<Color> {
        (self.0)(point)
    }
}

/// Noise-driven coordinate displacement.
#[derive(Debug, Clone)]
pub struct Warp {
    size: f32,
    x_noise: NoiseField,
    y_noise: NoiseField,
}

impl Warp {
    /// Displace by at most `size` pixels per axis.
    pub fn new(size: f32, x_noise: NoiseField, y_noise: NoiseField) -> Result<Self> {
        if !(size.is_finite() && size >= 0.0) {
            return Err(ShadesError::invalid(format!(
                "warp size must be non-negative, got {}",
                size
            )));
        }
        Ok(Self {
            size,
            x_noise,
            y_noise,
        })
    }

    /// Build from exactly two fields, as returned by
    /// [`build_fields`](crate::shader::build_fields).
    pub fn from_fields(size: f32, fields: Vec<NoiseField>) -> Result<Self> {
        let [x_noise, y_noise]: [NoiseField; 2] = fields.try_into().map_err(|f: Vec<_>| {
            ShadesError::invalid(format!("warp needs 2 noise fields, got {}", f.len()))
        })?;
        Self::new(size, x_noise, y_noise)
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Largest whole-pixel displacement.
    pub fn reach(&self) -> u32 {
        self.size.ceil() as u32
    }

    pub fn apply(&self, point: Point) -> Point {
        if self.size == 0.0 {
            return point;
        }
        point.offset(
            self.size * (2.0 * self.x_noise.noise(point) - 1.0),
            self.size * (2.0 * self.y_noise.noise(point) - 1.0),
        )
    }

    pub fn apply_batch(&self, points: &[Point]) -> Vec<Point> {
        if self.size == 0.0 {
            return points.to_vec();
        }
        let dx = self.x_noise.noise_batch(points);
        let dy = self.y_noise.noise_batch(points);
        points
            .iter()
            .zip(dx.iter().zip(&dy))
            .map(|(p, (nx, ny))| {
                p.offset(self.size * (2.0 * nx - 1.0), self.size * (2.0 * ny - 1.0))
            })
            .collect()
    }
}

/// A colour rule with optional warp and the drawing operations built on it.
///
/// The rule is a public field so per-shape tweaks (say, a new colour for
/// each rectangle in a loop) are plain assignments between draws.
#[derive(Debug, Clone)]
pub struct Shade<R> {
    pub rule: R,
    pub warp: Option<Warp>,
}

impl<R: ShadeRule> Shade<R> {
    pub fn new(rule: R) -> Self {
        Self { rule, warp: None }
    }

    pub fn with_warp(mut self, warp: Warp) -> Self {
        self.warp = Some(warp);
        self
    }

    /// Box the rule so differently typed shades can share a collection.
    pub fn boxed(self) -> Shade<Box<dyn ShadeRule>>
    where
        R: 'static,
    {
        Shade {
            rule: Box::new(self.rule),
            warp: self.warp,
        }
    }

    pub fn determine_shade(&self, point: Point) -> Option<Color> {
        self.rule.determine_shade(point)
    }

    /// Warp and colour a coordinate array.
    ///
    /// Returns the (warped) coordinates paired with their colours, with
    /// uncoloured entries dropped.
    pub fn evaluate(&self, points: &[Point]) -> (Vec<Point>, Vec<Color>) {
        let warped = match &self.warp {
            Some(warp) => warp.apply_batch(points),
            None => points.to_vec(),
        };
        let colors = self.rule.determine_shades(&warped);
        warped
            .into_iter()
            .zip(colors)
            .filter_map(|(p, c)| c.map(|c| (p, c)))
            .unzip()
    }

    fn clip(&self, canvas: &Canvas) -> Bounds {
        let reach = self.warp.as_ref().map_or(0, Warp::reach);
        Bounds::canvas(canvas.width(), canvas.height(), reach)
    }

    fn paint(&self, canvas: &mut Canvas, what: &str, pixels: Vec<Point>) -> Result<()> {
        let (points, colors) = self.evaluate(&pixels);
        let written = canvas.set_pixels(&points, &colors)?;
        debug!(
            shape = what,
            enumerated = pixels.len(),
            written,
            warped = self.warp.is_some(),
            "drew shape"
        );
        Ok(())
    }

    /// Draw any solid shape.
    pub fn draw(&self, canvas: &mut Canvas, shape: &Shape) -> Result<()> {
        let pixels = shape.pixels(&self.clip(canvas))?;
        self.paint(canvas, shape.kind(), pixels)
    }

    /// Draw only the boundary of a shape, `weight` pixels thick.
    pub fn outline(&self, canvas: &mut Canvas, shape: &Shape, weight: u32) -> Result<()> {
        let pixels = shape.outline_pixels(&self.clip(canvas), weight)?;
        self.paint(canvas, shape.kind(), pixels)
    }

    /// Colour every pixel of the canvas.
    pub fn fill(&self, canvas: &mut Canvas) -> Result<()> {
        let clip = self.clip(canvas);
        let pixels = (clip.min_y..clip.max_y)
            .flat_map(|y| (clip.min_x..clip.max_x).map(move |x| Point::new(x as f32, y as f32)))
            .collect();
        self.paint(canvas, "fill", pixels)
    }

    pub fn line(
        &self,
        canvas: &mut Canvas,
        start: impl Into<Point>,
        end: impl Into<Point>,
        weight: u32,
    ) -> Result<()> {
        self.draw(canvas, &Shape::line(start, end, weight))
    }

    /// Rectangle with its top-left corner at `corner`.
    pub fn rectangle(
        &self,
        canvas: &mut Canvas,
        corner: impl Into<Point>,
        width: f32,
        height: f32,
    ) -> Result<()> {
        self.draw(canvas, &Shape::rectangle(corner, width, height))
    }

    pub fn rectangle_outline(
        &self,
        canvas: &mut Canvas,
        corner: impl Into<Point>,
        width: f32,
        height: f32,
        weight: u32,
    ) -> Result<()> {
        self.outline(canvas, &Shape::rectangle(corner, width, height), weight)
    }

    pub fn square(&self, canvas: &mut Canvas, corner: impl Into<Point>, size: f32) -> Result<()> {
        self.draw(canvas, &Shape::square(corner, size))
    }

    pub fn square_outline(
        &self,
        canvas: &mut Canvas,
        corner: impl Into<Point>,
        size: f32,
        weight: u32,
    ) -> Result<()> {
        self.outline(canvas, &Shape::square(corner, size), weight)
    }

    pub fn triangle(
        &self,
        canvas: &mut Canvas,
        a: impl Into<Point>,
        b: impl Into<Point>,
        c: impl Into<Point>,
    ) -> Result<()> {
        self.draw(canvas, &Shape::triangle(a, b, c))
    }

    pub fn triangle_outline(
        &self,
        canvas: &mut Canvas,
        a: impl Into<Point>,
        b: impl Into<Point>,
        c: impl Into<Point>,
        weight: u32,
    ) -> Result<()> {
        self.outline(canvas, &Shape::triangle(a, b, c), weight)
    }

    /// Filled polygon, even-odd rule.
    pub fn polygon(&self, canvas: &mut Canvas, vertices: &[Point]) -> Result<()> {
        self.draw(canvas, &Shape::polygon(vertices))
    }

    pub fn polygon_outline(
        &self,
        canvas: &mut Canvas,
        vertices: &[Point],
        weight: u32,
    ) -> Result<()> {
        self.outline(canvas, &Shape::polygon(vertices), weight)
    }

    pub fn circle(&self, canvas: &mut Canvas, center: impl Into<Point>, radius: f32) -> Result<()> {
        self.draw(canvas, &Shape::circle(center, radius))
    }

    pub fn circle_outline(
        &self,
        canvas: &mut Canvas,
        center: impl Into<Point>,
        radius: f32,
        weight: u32,
    ) -> Result<()> {
        self.outline(canvas, &Shape::circle(center, radius), weight)
    }

    /// Circle restricted to the bearings from `start_angle` clockwise to
    /// `end_angle`, in degrees with 0 at 12 o'clock.
    pub fn pizza_slice(
        &self,
        canvas: &mut Canvas,
        center: impl Into<Point>,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    ) -> Result<()> {
        self.draw(
            canvas,
            &Shape::pizza_slice(center, radius, start_angle, end_angle),
        )
    }

    pub fn pizza_slice_outline(
        &self,
        canvas: &mut Canvas,
        center: impl Into<Point>,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        weight: u32,
    ) -> Result<()> {
        self.outline(
            canvas,
            &Shape::pizza_slice(center, radius, start_angle, end_angle),
            weight,
        )
    }
}

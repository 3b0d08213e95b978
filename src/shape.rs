//! # Shape Rasterisation
//!
//! Turns drawing primitives into the set of integer pixel coordinates they
//! cover. Shades evaluate their colour rule over exactly these sets.
//!
//! ## Coverage Rules
//!
//! | Shape | Pixel `(x, y)` is covered when |
//! |-------|--------------------------------|
//! | Line | it is on the Bresenham path between the rounded end points (stamped `weight` x `weight`) |
//! | Rectangle | its centre `(x + 0.5, y + 0.5)` lies in `[x0, x0 + w) x [y0, y0 + h)` |
//! | Polygon | its centre is inside under the even-odd rule |
//! | Circle | `(x - cx)^2 + (y - cy)^2 <= r^2` |
//! | Pizza slice | it is in the circle and its bearing lies in the slice |
//!
//! Bearings are in degrees, 0 at 12 o'clock, increasing clockwise (y
//! points down). A slice runs clockwise from `start_angle` to
//! `end_angle`; spans of 360 degrees or more are full circles.
//!
//! Every enumeration is clipped to a [`Bounds`] window, so drawing a shape
//! that is mostly off canvas costs only what remains visible.

use serde::Deserialize;

use crate::error::{Result, ShadesError};
use crate::geometry::Point;

/// Half-open integer pixel window `[min_x, max_x) x [min_y, max_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl Bounds {
    /// A `width` x `height` canvas grown by `margin` pixels on every side.
    pub fn canvas(width: u32, height: u32, margin: u32) -> Self {
        let m = margin as i64;
        Self {
            min_x: -m,
            min_y: -m,
            max_x: width as i64 + m,
            max_y: height as i64 + m,
        }
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }

    /// Clip a fractional window to these bounds before snapping it to
    /// whole pixels, so far away or huge coordinates cannot overflow.
    fn intersect(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Bounds {
        let snap = |v: f64, lo: i64, hi: i64| v.clamp(lo as f64, hi as f64) as i64;
        Bounds {
            min_x: snap(min_x.floor(), self.min_x, self.max_x),
            min_y: snap(min_y.floor(), self.min_y, self.max_y),
            max_x: snap(max_x.ceil(), self.min_x, self.max_x),
            max_y: snap(max_y.ceil(), self.min_y, self.max_y),
        }
    }

    fn iter(self) -> impl Iterator<Item = (i64, i64)> {
        (self.min_y..self.max_y).flat_map(move |y| (self.min_x..self.max_x).map(move |x| (x, y)))
    }
}

fn default_weight() -> u32 {
    1
}

/// A drawable primitive.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Line {
        start: Point,
        end: Point,
        #[serde(default = "default_weight")]
        weight: u32,
    },
    Rectangle {
        corner: Point,
        width: f32,
        height: f32,
    },
    Polygon {
        vertices: Vec<Point>,
    },
    Circle {
        center: Point,
        radius: f32,
    },
    PizzaSlice {
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    },
}

impl Shape {
    pub fn line(start: impl Into<Point>, end: impl Into<Point>, weight: u32) -> Self {
        Shape::Line {
            start: start.into(),
            end: end.into(),
            weight,
        }
    }

    pub fn rectangle(corner: impl Into<Point>, width: f32, height: f32) -> Self {
        Shape::Rectangle {
            corner: corner.into(),
            width,
            height,
        }
    }

    pub fn square(corner: impl Into<Point>, size: f32) -> Self {
        Self::rectangle(corner, size, size)
    }

    pub fn triangle(a: impl Into<Point>, b: impl Into<Point>, c: impl Into<Point>) -> Self {
        Shape::Polygon {
            vertices: vec![a.into(), b.into(), c.into()],
        }
    }

    pub fn polygon(vertices: impl Into<Vec<Point>>) -> Self {
        Shape::Polygon {
            vertices: vertices.into(),
        }
    }

    pub fn circle(center: impl Into<Point>, radius: f32) -> Self {
        Shape::Circle {
            center: center.into(),
            radius,
        }
    }

    pub fn pizza_slice(
        center: impl Into<Point>,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    ) -> Self {
        Shape::PizzaSlice {
            center: center.into(),
            radius,
            start_angle,
            end_angle,
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Line { .. } => "line",
            Shape::Rectangle { .. } => "rectangle",
            Shape::Polygon { .. } => "polygon",
            Shape::Circle { .. } => "circle",
            Shape::PizzaSlice { .. } => "pizza_slice",
        }
    }

    /// Reject degenerate geometry.
    pub fn validate(&self) -> Result<()> {
        let finite = |p: &Point| p.x.is_finite() && p.y.is_finite();
        match self {
            Shape::Line { start, end, weight } => {
                if *weight == 0 {
                    return Err(ShadesError::invalid("line weight must be at least 1"));
                }
                if !finite(start) || !finite(end) {
                    return Err(ShadesError::invalid("line end points must be finite"));
                }
            }
            Shape::Rectangle { corner, width, height } => {
                if !(*width > 0.0 && *height > 0.0 && width.is_finite() && height.is_finite()) {
                    return Err(ShadesError::invalid(format!(
                        "rectangle must have positive size, got {}x{}",
                        width, height
                    )));
                }
                if !finite(corner) {
                    return Err(ShadesError::invalid("rectangle corner must be finite"));
                }
            }
            Shape::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return Err(ShadesError::invalid(format!(
                        "polygon needs at least 3 vertices, got {}",
                        vertices.len()
                    )));
                }
                if !vertices.iter().all(finite) {
                    return Err(ShadesError::invalid("polygon vertices must be finite"));
                }
            }
            Shape::Circle { center, radius } => check_circle(center, *radius)?,
            Shape::PizzaSlice {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                check_circle(center, *radius)?;
                if !(start_angle.is_finite() && end_angle.is_finite()) {
                    return Err(ShadesError::invalid("slice angles must be finite"));
                }
                if start_angle == end_angle {
                    return Err(ShadesError::invalid("slice start and end angles are equal"));
                }
            }
        }
        Ok(())
    }

    /// Bounding window `[min, max)` of the area shapes, with a pixel of
    /// slack on each side.
    fn extent(&self) -> (f64, f64, f64, f64) {
        match self {
            Shape::Line { start, end, weight } => {
                let w = *weight as f64;
                (
                    start.x.min(end.x) as f64 - 1.0,
                    start.y.min(end.y) as f64 - 1.0,
                    start.x.max(end.x) as f64 + w + 1.0,
                    start.y.max(end.y) as f64 + w + 1.0,
                )
            }
            Shape::Rectangle { corner, width, height } => {
                let (x, y) = (corner.x as f64, corner.y as f64);
                (x - 1.0, y - 1.0, x + *width as f64 + 1.0, y + *height as f64 + 1.0)
            }
            Shape::Polygon { vertices } => {
                let xs = vertices.iter().map(|p| p.x as f64);
                let ys = vertices.iter().map(|p| p.y as f64);
                (
                    xs.clone().fold(f64::MAX, f64::min) - 1.0,
                    ys.clone().fold(f64::MAX, f64::min) - 1.0,
                    xs.fold(f64::MIN, f64::max) + 1.0,
                    ys.fold(f64::MIN, f64::max) + 1.0,
                )
            }
            Shape::Circle { center, radius } | Shape::PizzaSlice { center, radius, .. } => {
                let (x, y, r) = (center.x as f64, center.y as f64, *radius as f64);
                (x - r - 1.0, y - r - 1.0, x + r + 2.0, y + r + 2.0)
            }
        }
    }

    /// Point membership for area shapes. Lines have no interior.
    fn covers(&self, x: i64, y: i64) -> bool {
        let (xf, yf) = (x as f32, y as f32);
        match self {
            Shape::Line { .. } => false,
            Shape::Rectangle { corner, width, height } => {
                let (cx, cy) = (xf + 0.5, yf + 0.5);
                cx >= corner.x && cx < corner.x + width && cy >= corner.y && cy < corner.y + height
            }
            Shape::Polygon { vertices } => even_odd(vertices, xf + 0.5, yf + 0.5),
            Shape::Circle { center, radius } => in_circle(center, *radius, xf, yf),
            Shape::PizzaSlice {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                in_circle(center, *radius, xf, yf)
                    && in_slice(xf - center.x, yf - center.y, *start_angle, *end_angle)
            }
        }
    }

    /// Every pixel the shape covers inside `clip`, in row-major order.
    pub fn pixels(&self, clip: &Bounds) -> Result<Vec<Point>> {
        self.validate()?;
        if let Shape::Line { start, end, weight } = self {
            return Ok(stamp(line_path(*start, *end, *weight, clip), *weight, clip));
        }
        let (min_x, min_y, max_x, max_y) = self.extent();
        Ok(clip
            .intersect(min_x, min_y, max_x, max_y)
            .iter()
            .filter(|&(x, y)| self.covers(x, y))
            .map(|(x, y)| Point::new(x as f32, y as f32))
            .collect())
    }

    /// Boundary pixels of the shape inside `clip`, each stamped into a
    /// `weight` x `weight` square.
    ///
    /// A pixel is on the boundary when it is covered and at least one of
    /// its four neighbours is not. A line is its own outline.
    pub fn outline_pixels(&self, clip: &Bounds, weight: u32) -> Result<Vec<Point>> {
        self.validate()?;
        if weight == 0 {
            return Err(ShadesError::invalid("outline weight must be at least 1"));
        }
        if let Shape::Line { .. } = self {
            return self.pixels(clip);
        }
        // Neighbours one pixel outside the clip still decide the boundary
        let grown = Bounds {
            min_x: clip.min_x - weight as i64,
            min_y: clip.min_y - weight as i64,
            max_x: clip.max_x + 1,
            max_y: clip.max_y + 1,
        };
        let (min_x, min_y, max_x, max_y) = self.extent();
        let edge: Vec<(i64, i64)> = grown
            .intersect(min_x, min_y, max_x, max_y)
            .iter()
            .filter(|&(x, y)| {
                self.covers(x, y)
                    && !(self.covers(x - 1, y)
                        && self.covers(x + 1, y)
                        && self.covers(x, y - 1)
                        && self.covers(x, y + 1))
            })
            .collect();
        Ok(stamp(edge, weight, clip))
    }
}

fn check_circle(center: &Point, radius: f32) -> Result<()> {
    if !(radius > 0.0 && radius.is_finite()) {
        return Err(ShadesError::invalid(format!(
            "radius must be positive, got {}",
            radius
        )));
    }
    if !(center.x.is_finite() && center.y.is_finite()) {
        return Err(ShadesError::invalid("circle center must be finite"));
    }
    Ok(())
}

#[inline]
fn in_circle(center: &Point, radius: f32, x: f32, y: f32) -> bool {
    let dx = x - center.x;
    let dy = y - center.y;
    dx * dx + dy * dy <= radius * radius
}

/// Bearing of `(dx, dy)` in degrees, 0 up, clockwise, in `[0, 360)`.
#[inline]
pub fn bearing(dx: f32, dy: f32) -> f32 {
    dx.atan2(-dy).to_degrees().rem_euclid(360.0)
}

fn in_slice(dx: f32, dy: f32, start: f32, end: f32) -> bool {
    if (end - start).abs() >= 360.0 || (dx == 0.0 && dy == 0.0) {
        return true;
    }
    let span = (end - start).rem_euclid(360.0);
    let rel = (bearing(dx, dy) - start).rem_euclid(360.0);
    rel <= span
}

/// Even-odd point in polygon test.
fn even_odd(vertices: &[Point], x: f32, y: f32) -> bool {
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (a, b) = (vertices[i], vertices[j]);
        if (a.y > y) != (b.y > y) && x < (b.x - a.x) * (y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Bresenham path of a line, restricted to the part that can reach `clip`
/// once stamped `weight` pixels wide.
fn line_path(start: Point, end: Point, weight: u32, clip: &Bounds) -> Vec<(i64, i64)> {
    let w = weight as f64;
    let window = (
        clip.min_x as f64 - w - 1.0,
        clip.min_y as f64 - w - 1.0,
        clip.max_x as f64 + 1.0,
        clip.max_y as f64 + 1.0,
    );
    let a = (start.x as f64, start.y as f64);
    let b = (end.x as f64, end.y as f64);
    match clip_segment(a, b, window) {
        Some((a, b)) => bresenham(
            (a.0.round() as i64, a.1.round() as i64),
            (b.0.round() as i64, b.1.round() as i64),
        ),
        None => Vec::new(),
    }
}

/// Liang-Barsky clipping of the segment `a`-`b` to the window
/// `(min_x, min_y, max_x, max_y)`. End points already inside are returned
/// unchanged.
fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    (min_x, min_y, max_x, max_y): (f64, f64, f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [
        (-dx, a.0 - min_x),
        (dx, max_x - a.0),
        (-dy, a.1 - min_y),
        (dy, max_y - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    let at = |t: f64| (a.0 + t * dx, a.1 + t * dy);
    let from = if t0 > 0.0 { at(t0) } else { a };
    let to = if t1 < 1.0 { at(t1) } else { b };
    Some((from, to))
}

/// Integer Bresenham path between two pixels, inclusive.
fn bresenham((mut x0, mut y0): (i64, i64), (x1, y1): (i64, i64)) -> Vec<(i64, i64)> {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut path = Vec::with_capacity((dx - dy + 1) as usize);
    loop {
        path.push((x0, y0));
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
    path
}

/// Expand each pixel into a `weight` x `weight` square (top-left at the
/// pixel), clip, and deduplicate in row-major order.
fn stamp(pixels: Vec<(i64, i64)>, weight: u32, clip: &Bounds) -> Vec<Point> {
    let w = weight as i64;
    let mut out: Vec<(i64, i64)> = pixels
        .into_iter()
        .flat_map(|(x, y)| {
            // Only the offsets that land inside the clip
            let xs = (clip.min_x - x).max(0)..(clip.max_x - x).min(w);
            let ys = (clip.min_y - y).max(0)..(clip.max_y - y).min(w);
            ys.flat_map(move |oy| xs.clone().map(move |ox| (x + ox, y + oy)))
        })
        .collect();
    out.sort_unstable_by_key(|&(x, y)| (y, x));
    out.dedup();
    out.into_iter()
        .map(|(x, y)| Point::new(x as f32, y as f32))
        .collect()
}

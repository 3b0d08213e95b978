//! # Canvas
//!
//! The pixel buffer every drawing operation writes into. A thin wrapper
//! around [`image::RgbImage`] that clips out-of-bounds writes instead of
//! panicking and adds a bulk write used by the batch drawing pipeline.
//!
//! ```
//! use shades::{Canvas, Color};
//!
//! let mut canvas = Canvas::new(10, 10, Color::WHITE)?;
//! canvas.set_pixel(3, 4, Color::BLACK);
//! canvas.set_pixel(-1, 40, Color::BLACK); // silently clipped
//! assert_eq!(canvas.get_pixel(3, 4), Some(Color::BLACK));
//! # Ok::<(), shades::ShadesError>(())
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::RgbImage;
use rand::Rng;
use tracing::info;

use crate::color::Color;
use crate::error::{Result, ShadesError};
use crate::geometry::{self, Point};

static SHOW_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// An RGB raster canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    image: RgbImage,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            image: RgbImage::from_pixel(
                Self::DEFAULT_SIZE,
                Self::DEFAULT_SIZE,
                Self::DEFAULT_BACKGROUND.into(),
            ),
        }
    }
}

impl Canvas {
    pub const DEFAULT_SIZE: u32 = 700;
    pub const DEFAULT_BACKGROUND: Color = Color::new(240, 240, 240);

    /// Create a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ShadesError::invalid(format!(
                "canvas must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        let bytes = (width as u64)
            .checked_mul(height as u64)
            .and_then(|n| n.checked_mul(3))
            .and_then(|n| usize::try_from(n).ok());
        if bytes.is_none() {
            return Err(ShadesError::invalid(format!(
                "canvas {}x{} is too large to allocate",
                width, height
            )));
        }
        Ok(Self {
            image: RgbImage::from_pixel(width, height, background.into()),
        })
    }

    /// Wrap an existing image.
    pub fn from_image(image: RgbImage) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(ShadesError::invalid("canvas image is empty"));
        }
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Centre pixel (integer division of the dimensions).
    pub fn center(&self) -> Point {
        Point::new((self.width() / 2) as f32, (self.height() / 2) as f32)
    }

    /// A uniformly random pixel coordinate inside the canvas.
    pub fn random_point<R: Rng>(&self, rng: &mut R) -> Point {
        Point::new(
            rng.random_range(0..self.width()) as f32,
            rng.random_range(0..self.height()) as f32,
        )
    }

    /// Whether integer coordinates address a pixel of this canvas.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64
    }

    /// Colour at `(x, y)`, or `None` outside the canvas.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image.get_pixel_checked(x, y).map(|p| Color::from(*p))
    }

    /// Set one pixel. Coordinates outside the canvas are ignored.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Color) {
        if self.contains(x, y) {
            self.image.put_pixel(x as u32, y as u32, color.into());
        }
    }

    /// Bulk write: `colors[i]` goes to `points[i]` snapped to its pixel.
    ///
    /// Points outside the canvas are skipped. Returns the number of pixels
    /// written.
    pub fn set_pixels(&mut self, points: &[Point], colors: &[Color]) -> Result<usize> {
        if points.len() != colors.len() {
            return Err(ShadesError::invalid(format!(
                "{} points but {} colors",
                points.len(),
                colors.len()
            )));
        }
        let (width, height) = (self.width(), self.height());
        let mut written = 0;
        for (point, color) in points.iter().zip(colors) {
            if let Some((x, y)) = point.pixel(width, height) {
                self.image.put_pixel(x, y, (*color).into());
                written += 1;
            }
        }
        Ok(written)
    }

    /// Lattice points over the canvas, see [`geometry::grid`].
    pub fn grid(&self, x_step: u32, y_step: Option<u32>) -> impl Iterator<Item = Point> + use<> {
        geometry::grid(
            self.width(),
            self.height(),
            x_step,
            y_step.unwrap_or(x_step),
            true,
        )
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Save to `path`; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.image
            .save(path)
            .map_err(|e| ShadesError::Image(format!("Failed to save {}: {}", path.display(), e)))?;
        info!(path = %path.display(), width = self.width(), height = self.height(), "saved canvas");
        Ok(())
    }

    /// Write the canvas to a temporary PNG and open it with the platform
    /// image viewer. Blocks until the launcher exits and returns the
    /// temporary file path.
    pub fn show(&self) -> Result<PathBuf> {
        let n = SHOW_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!("shades-{}-{}.png", std::process::id(), n));
        self.save(&path)?;

        run_viewer(viewer_command(&path)?)?;
        info!(path = %path.display(), "opened canvas in viewer");
        Ok(path)
    }
}

fn run_viewer(mut command: Command) -> Result<()> {
    let status = command.status()?;
    if !status.success() {
        return Err(ShadesError::Io(std::io::Error::other(format!(
            "image viewer {:?} exited with {}",
            command.get_program(),
            status
        ))));
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn viewer_command(path: &Path) -> Result<Command> {
    let mut c = Command::new("xdg-open");
    c.arg(path);
    Ok(c)
}

#[cfg(target_os = "macos")]
fn viewer_command(path: &Path) -> Result<Command> {
    let mut c = Command::new("open");
    c.arg(path);
    Ok(c)
}

#[cfg(target_os = "windows")]
fn viewer_command(path: &Path) -> Result<Command> {
    let mut c = Command::new("cmd");
    c.args(["/C", "start", ""]).arg(path);
    Ok(c)
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn viewer_command(path: &Path) -> Result<Command> {
    Err(ShadesError::NotImplemented(format!(
        "no image viewer known for this platform; canvas written to {}",
        path.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_new_fills_background() {
        let canvas = Canvas::new(4, 3, Color::new(1, 2, 3)).unwrap();
        assert_eq!(canvas.width(), 4);
        assert_eq!(canvas.height(), 3);
        assert!(canvas.image().pixels().all(|p| p.0 == [1, 2, 3]));
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            Canvas::new(0, 5, Color::WHITE),
            Err(ShadesError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_oversized_canvas_rejected() {
        assert!(matches!(
            Canvas::new(u32::MAX, u32::MAX, Color::WHITE),
            Err(ShadesError::InvalidParameter(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_viewer_waits_for_exit() {
        assert!(run_viewer(Command::new("true")).is_ok());
        assert!(matches!(
            run_viewer(Command::new("false")),
            Err(ShadesError::Io(_))
        ));
        assert!(run_viewer(Command::new("shades-no-such-viewer")).is_err());
    }

    #[test]
    fn test_default_canvas() {
        let canvas = Canvas::default();
        assert_eq!(canvas.width(), 700);
        assert_eq!(canvas.get_pixel(0, 0), Some(Canvas::DEFAULT_BACKGROUND));
        assert_eq!(canvas.center(), Point::new(350.0, 350.0));
    }

    #[test]
    fn test_set_pixel_clips() {
        let mut canvas = Canvas::new(5, 5, Color::WHITE).unwrap();
        canvas.set_pixel(-1, 0, Color::BLACK);
        canvas.set_pixel(5, 0, Color::BLACK);
        canvas.set_pixel(0, 5, Color::BLACK);
        assert!(canvas.image().pixels().all(|p| p.0 == [255, 255, 255]));
        assert_eq!(canvas.get_pixel(9, 9), None);
    }

    #[test]
    fn test_set_pixels_bulk() {
        let mut canvas = Canvas::new(5, 5, Color::WHITE).unwrap();
        let points = [Point::new(1.7, 2.2), Point::new(-3.0, 1.0), Point::new(4.0, 4.0)];
        let colors = [Color::BLACK, Color::BLACK, Color::new(9, 9, 9)];
        let written = canvas.set_pixels(&points, &colors).unwrap();
        assert_eq!(written, 2);
        assert_eq!(canvas.get_pixel(1, 2), Some(Color::BLACK));
        assert_eq!(canvas.get_pixel(4, 4), Some(Color::new(9, 9, 9)));
    }

    #[test]
    fn test_set_pixels_length_mismatch() {
        let mut canvas = Canvas::new(5, 5, Color::WHITE).unwrap();
        let err = canvas.set_pixels(&[Point::new(0.0, 0.0)], &[]).unwrap_err();
        assert!(matches!(err, ShadesError::InvalidParameter(_)));
    }

    #[test]
    fn test_random_point_in_bounds() {
        let canvas = Canvas::new(7, 3, Color::WHITE).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let p = canvas.random_point(&mut rng);
            assert!(canvas.contains(p.x as i64, p.y as i64));
        }
    }

    #[test]
    fn test_grid_covers_canvas() {
        let canvas = Canvas::new(100, 50, Color::WHITE).unwrap();
        let points: Vec<Point> = canvas.grid(50, None).collect();
        assert_eq!(points.len(), 3 * 2);
        assert_eq!(points.last(), Some(&Point::new(100.0, 50.0)));
    }

    #[test]
    fn test_save_png() {
        let canvas = Canvas::new(3, 3, Color::new(10, 20, 30)).unwrap();
        let path = std::env::temp_dir().join(format!("shades-test-save-{}.png", std::process::id()));
        canvas.save(&path).unwrap();
        let loaded = image::open(&path).unwrap().to_rgb8();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.get_pixel(1, 1).0, [10, 20, 30]);
    }
}

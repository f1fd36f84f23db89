use std::fmt;

use rand::Rng;

use crate::errors::Result;
use crate::geo_transform::{geo_to_pixel, GeoTransform};

/// An axis-aligned rectangle in geographic coordinate space, used to select
/// a sub-window of a raster.
///
/// Callers are expected to supply `min <= max` on each axis, but no ordering
/// is enforced here; window derivation tolerates a degenerate or inverted box
/// by clamping the resulting pixel extent (see
/// [`PixelWindow::from_bounding_box`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Draw a uniformly distributed geographic coordinate within the box.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> (f64, f64) {
        let x = self.xmin + rng.gen::<f64>() * (self.xmax - self.xmin);
        let y = self.ymin + rng.gen::<f64>() * (self.ymax - self.ymin);
        (x, y)
    }
}

/// An integer rectangle (offset + size) in pixel coordinate space.
///
/// `x_size` and `y_size` are at least 1 when constructed through
/// [`PixelWindow::from_bounding_box`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    pub x_off: isize,
    pub y_off: isize,
    pub x_size: usize,
    pub y_size: usize,
}

impl PixelWindow {
    pub fn new(x_off: isize, y_off: isize, x_size: usize, y_size: usize) -> Self {
        Self {
            x_off,
            y_off,
            x_size,
            y_size,
        }
    }

    /// Derive the pixel-space rectangle covering `bounding_box` on a raster
    /// with the given geo-transform.
    ///
    /// The box's `(xmin, ymax)` corner maps to the window's minimum pixel
    /// corner and `(xmax, ymin)` to its maximum: geographic y grows upward
    /// while pixel rows grow downward, so for a north-up raster the
    /// maximum-y corner yields the minimum pixel row. A degenerate or
    /// inverted box clamps to a 1x1 window rather than failing.
    ///
    /// The window is not validated against any raster extent; a window that
    /// falls outside the source surfaces as an error on the read path.
    pub fn from_bounding_box(geo_transform: &GeoTransform, bounding_box: &BoundingBox) -> Result<Self> {
        let (x_min_pix, y_min_pix) = geo_to_pixel(geo_transform, bounding_box.xmin, bounding_box.ymax)?;
        let (x_max_pix, y_max_pix) = geo_to_pixel(geo_transform, bounding_box.xmax, bounding_box.ymin)?;

        let x_size = (x_max_pix - x_min_pix).max(1) as usize;
        let y_size = (y_max_pix - y_min_pix).max(1) as usize;

        Ok(Self {
            x_off: x_min_pix,
            y_off: y_min_pix,
            x_size,
            y_size,
        })
    }

    /// Whether the window lies entirely within a raster of the given
    /// `(width, height)`.
    pub fn fits_within(&self, (width, height): (usize, usize)) -> bool {
        self.x_off >= 0
            && self.y_off >= 0
            && self.x_off as usize + self.x_size <= width
            && self.y_off as usize + self.y_size <= height
    }
}

impl fmt::Display for PixelWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.x_off, self.y_off, self.x_size, self.y_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const NORTH_UP: GeoTransform = [0.0, 1.0, 0.0, 10.0, 0.0, -1.0];

    #[test]
    fn test_window_from_bounding_box() {
        // Origin at geographic (0, 10), 1 unit per pixel, y flips downward.
        // Corner (2, 7) -> pixel (2, 3); corner (5, 3) -> pixel (5, 7).
        let bbox = BoundingBox::new(2.0, 3.0, 5.0, 7.0);
        let window = PixelWindow::from_bounding_box(&NORTH_UP, &bbox).unwrap();
        assert_eq!(window, PixelWindow::new(2, 3, 3, 4));
    }

    #[test]
    fn test_y_offset_comes_from_ymax_corner() {
        let bbox = BoundingBox::new(2.0, 3.0, 5.0, 7.0);
        let window = PixelWindow::from_bounding_box(&NORTH_UP, &bbox).unwrap();
        let (_, ymax_row) = geo_to_pixel(&NORTH_UP, bbox.xmin, bbox.ymax).unwrap();
        let (_, ymin_row) = geo_to_pixel(&NORTH_UP, bbox.xmin, bbox.ymin).unwrap();
        assert_eq!(window.y_off, ymax_row);
        assert!(ymax_row < ymin_row);
    }

    #[test]
    fn test_degenerate_box_clamps_to_one_pixel() {
        let flat = BoundingBox::new(2.0, 3.0, 5.0, 3.0);
        let window = PixelWindow::from_bounding_box(&NORTH_UP, &flat).unwrap();
        assert_eq!((window.x_size, window.y_size), (3, 1));

        let thin = BoundingBox::new(2.0, 3.0, 2.0, 7.0);
        let window = PixelWindow::from_bounding_box(&NORTH_UP, &thin).unwrap();
        assert_eq!((window.x_size, window.y_size), (1, 4));

        let point = BoundingBox::new(2.0, 3.0, 2.0, 3.0);
        let window = PixelWindow::from_bounding_box(&NORTH_UP, &point).unwrap();
        assert_eq!((window.x_size, window.y_size), (1, 1));
    }

    #[test]
    fn test_inverted_box_clamps_to_one_pixel() {
        let inverted = BoundingBox::new(5.0, 7.0, 2.0, 3.0);
        let window = PixelWindow::from_bounding_box(&NORTH_UP, &inverted).unwrap();
        assert_eq!((window.x_size, window.y_size), (1, 1));
    }

    #[test]
    fn test_fits_within() {
        let window = PixelWindow::new(2, 3, 3, 4);
        assert!(window.fits_within((5, 7)));
        assert!(!window.fits_within((4, 7)));
        assert!(!window.fits_within((5, 6)));
        assert!(!PixelWindow::new(-1, 0, 1, 1).fits_within((5, 7)));
    }

    #[test]
    fn test_sample_stays_within_box() {
        let bbox = BoundingBox::new(2.0, 3.0, 5.0, 7.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let (x, y) = bbox.sample(&mut rng);
            assert!((2.0..=5.0).contains(&x));
            assert!((3.0..=7.0).contains(&y));
        }
    }
}

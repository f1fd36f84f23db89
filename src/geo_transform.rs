use crate::errors::{ProbeError, Result};

/// An affine transform.
///
/// A six-element array storing the coefficients of an affine transform used
/// in mapping coordinates between pixel/line `(P, L)` (raster) space and
/// `(Xg, Yg)` (geographic) space.
///
/// # Interpretation
///
/// A `GeoTransform`'s components have the following meanings:
///
///   * `GeoTransform[0]`: x-coordinate of the upper-left corner of the upper-left pixel.
///   * `GeoTransform[1]`: W-E pixel resolution (pixel width).
///   * `GeoTransform[2]`: row rotation (typically zero).
///   * `GeoTransform[3]`: y-coordinate of the upper-left corner of the upper-left pixel.
///   * `GeoTransform[4]`: column rotation (typically zero).
///   * `GeoTransform[5]`: N-S pixel resolution (pixel height), negative value for a North-up image.
///
/// So the forward mapping is:
///
/// ```text
/// Xg = GT[0] + P*GT[1] + L*GT[2]
/// Yg = GT[3] + P*GT[4] + L*GT[5]
/// ```
///
/// # Usage
///  *  [`apply`](GeoTransformEx::apply): perform a `(P,L) -> (Xg,Yg)` transformation
///  *  [`invert`](GeoTransformEx::invert): construct the inverse transformation coefficients
///     for computing `(Xg,Yg) -> (P,L)` transformations
pub type GeoTransform = [f64; 6];

/// Extension methods on [`GeoTransform`]
pub trait GeoTransformEx {
    /// Apply the transform to a pixel/line coordinate.
    fn apply(&self, pixel: f64, line: f64) -> (f64, f64);

    /// Invert a [`GeoTransform`].
    ///
    /// Fails with [`ProbeError::NotInvertible`] when the determinant of the
    /// 2x2 linear part is within machine epsilon of zero.
    fn invert(&self) -> Result<GeoTransform>;
}

impl GeoTransformEx for GeoTransform {
    fn apply(&self, pixel: f64, line: f64) -> (f64, f64) {
        (
            self[0] + pixel * self[1] + line * self[2],
            self[3] + pixel * self[4] + line * self[5],
        )
    }

    fn invert(&self) -> Result<GeoTransform> {
        let det = self[1] * self[5] - self[2] * self[4];
        if det.abs() < f64::EPSILON {
            return Err(ProbeError::NotInvertible);
        }
        let inv_det = 1.0 / det;
        Ok([
            (self[2] * self[3] - self[0] * self[5]) * inv_det,
            self[5] * inv_det,
            -self[2] * inv_det,
            (self[0] * self[4] - self[1] * self[3]) * inv_det,
            -self[4] * inv_det,
            self[1] * inv_det,
        ])
    }
}

/// Map a geographic coordinate to integer pixel/line coordinates.
///
/// Applies the inverse of `geo_transform` to `(x, y)` and truncates the
/// fractional pixel coordinates toward zero. Fails with
/// [`ProbeError::NotInvertible`] for a singular transform; see
/// [`geo_to_pixel_or_origin`] for the lenient variant.
pub fn geo_to_pixel(geo_transform: &GeoTransform, x: f64, y: f64) -> Result<(isize, isize)> {
    let inverse = geo_transform.invert()?;
    let (pixel, line) = inverse.apply(x, y);
    Ok((pixel as isize, line as isize))
}

/// Lenient variant of [`geo_to_pixel`] that substitutes the pixel origin for
/// unmappable coordinates.
///
/// A singular transform yields `(0, 0)` and a warning instead of an error.
/// Prefer [`geo_to_pixel`] unless the zero-substitution behavior is required.
pub fn geo_to_pixel_or_origin(geo_transform: &GeoTransform, x: f64, y: f64) -> (isize, isize) {
    match geo_to_pixel(geo_transform, x, y) {
        Ok(coords) => coords,
        Err(_) => {
            tracing::warn!(x, y, "geo-transform is not invertible; substituting pixel origin");
            (0, 0)
        }
    }
}

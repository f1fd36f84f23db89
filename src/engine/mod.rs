//! The external raster engine abstraction.
//!
//! Everything this crate cannot compute on its own — decoding raster files,
//! materializing virtual views, reading pixel windows — is delegated to an
//! implementation of [`RasterEngine`]. Two implementations are provided:
//! [`mem::MemEngine`], an in-memory engine over synthetic rasters, and
//! [`gdal::GdalEngine`] (behind the `gdal` cargo feature), which delegates
//! to the GDAL library.
//!
//! Engines are used single-threaded and sequentially; handles hold no
//! interior mutability and callers own handle lifetimes.

#[cfg(feature = "gdal")]
pub mod gdal;
pub mod mem;

use std::path::Path;

use crate::errors::Result;
use crate::geo_transform::GeoTransform;
use crate::view::{DataType, ViewDescription};
use crate::window::PixelWindow;

/// An open raster with a size, an affine geo-transform and bands.
pub trait RasterDataset {
    type Band<'a>: RasterBand
    where
        Self: 'a;

    /// Raster size in `(width, height)` pixels.
    fn raster_size(&self) -> (usize, usize);

    /// The dataset's pixel-to-geographic affine transform.
    fn geo_transform(&self) -> Result<GeoTransform>;

    /// Fetch a band by 1-based index.
    fn band(&self, index: usize) -> Result<Self::Band<'_>>;
}

/// A single band of an open raster.
pub trait RasterBand {
    fn data_type(&self) -> DataType;

    /// Read a pixel window into an `f32` buffer in row-major order.
    ///
    /// Fails when the window reaches outside the raster extent.
    fn read_window_as_f32(&self, window: PixelWindow) -> Result<Vec<f32>>;
}

/// A raster engine: opens source rasters and materializes virtual
/// sub-window views of them.
pub trait RasterEngine {
    type Dataset: RasterDataset;

    /// Open the raster at `path` read-only.
    fn open(&self, path: &Path) -> Result<Self::Dataset>;

    /// Materialize a view from its textual description.
    fn open_view(&self, view: &ViewDescription) -> Result<Self::Dataset>;

    /// Materialize a view through the engine's object API, over an already
    /// open source dataset.
    fn create_view(&self, view: &ViewDescription, source: &Self::Dataset) -> Result<Self::Dataset>;
}

/// Convenience for the common single-pixel probe: the data type and value of
/// the band's pixel at `(column, line)`.
pub fn read_pixel<D: RasterDataset>(dataset: &D, band: usize, column: isize, line: isize) -> Result<f32> {
    let band = dataset.band(band)?;
    let buffer = band.read_window_as_f32(PixelWindow::new(column, line, 1, 1))?;
    Ok(buffer[0])
}

/// The data type of a dataset's band, looked up by 1-based index.
pub fn band_data_type<D: RasterDataset>(dataset: &D, band: usize) -> Result<DataType> {
    Ok(dataset.band(band)?.data_type())
}

use crate::window::PixelWindow;
use thiserror::Error;

/// Error variants surfaced by this crate.
///
/// Pure-computation failures ([`ProbeError::NotInvertible`]) are typed so the
/// caller can decide how to react; failures raised by the underlying raster
/// engine propagate unchanged.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The 2x2 linear part of a geo-transform is singular, so geographic
    /// coordinates cannot be mapped back to pixel space.
    #[error("geo-transform is not invertible")]
    NotInvertible,
    /// A pixel window does not fit within the extent of the raster being
    /// read. Raised by the read path, not by window construction.
    #[error("window {window} does not fit within raster extent {width}x{height}")]
    WindowOutOfBounds {
        window: PixelWindow,
        width: usize,
        height: usize,
    },
    /// No raster with the given name has been registered with the in-memory
    /// engine.
    #[error("no raster named '{0}' is registered with the engine")]
    UnknownRaster(String),
    /// A band index outside the range of the dataset.
    #[error("band index {index} out of range (dataset has {count} band(s))")]
    InvalidBand { index: usize, count: usize },
    /// A raster data type this crate cannot represent.
    #[error("unsupported raster data type '{0}'")]
    UnsupportedDataType(String),
    #[cfg(feature = "gdal")]
    #[error(transparent)]
    Gdal(#[from] gdal::errors::GdalError),
}

pub type Result<T> = std::result::Result<T, ProbeError>;

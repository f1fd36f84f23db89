//! Probing harness for sub-window virtual raster access patterns.
//!
//! This crate measures how a raster engine behaves when pixel values are
//! sampled at random geographic coordinates under different object-reuse
//! strategies: reading straight from the source raster (opening it per
//! sample or holding the dataset/band open), or reading through a
//! "virtual" view — a read-through projection exposing a rectangular
//! sub-window of the source as an independent raster with its own
//! coordinate origin.
//!
//! The pure core is small: inverting an affine geo-transform
//! ([`GeoTransformEx`]), resolving a geographic bounding box to a pixel
//! window ([`PixelWindow::from_bounding_box`]), and deriving the view's own
//! transform ([`build_view`]). Everything else — decoding, caching, the
//! virtual-raster indirection itself — is delegated to an implementation of
//! [`engine::RasterEngine`]: an in-memory engine for tests and benchmarks,
//! or GDAL behind the `gdal` cargo feature.
//!
//! # Usage
//!
//! ```
//! use vrt_probe::engine::mem::{MemEngine, MemRaster};
//! use vrt_probe::{run, BoundingBox, ProbeConfig, Strategy};
//!
//! # fn main() -> vrt_probe::Result<()> {
//! let mut engine = MemEngine::new();
//! engine.register(
//!     "demo.tif",
//!     MemRaster::with_values((64, 64), [0.0, 1.0, 0.0, 64.0, 0.0, -1.0], |col, line| {
//!         (line * 64 + col) as f32
//!     }),
//! );
//!
//! let config = ProbeConfig::new("demo.tif", BoundingBox::new(8.0, 8.0, 56.0, 56.0), 100, 42);
//! let report = run(&engine, &config, Strategy::ViewReuseSource)?;
//! println!("{} samples in {:?}", report.iterations, report.elapsed);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod errors;
mod geo_transform;
mod probe;
mod view;
mod window;

pub use errors::{ProbeError, Result};
pub use geo_transform::{geo_to_pixel, geo_to_pixel_or_origin, GeoTransform, GeoTransformEx};
pub use probe::{run, ProbeConfig, ProbeReport, Strategy};
pub use view::{build_view, DataType, ViewDescription};
pub use window::{BoundingBox, PixelWindow};

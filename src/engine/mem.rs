//! An in-memory raster engine.
//!
//! Serves as the engine test double: single-band `f32` rasters registered
//! under a name, with virtual views implemented as read-through sub-window
//! projections over the shared source data. Reads that reach outside the
//! source extent fail with
//! [`WindowOutOfBounds`](crate::errors::ProbeError::WindowOutOfBounds).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::engine::{RasterBand, RasterDataset, RasterEngine};
use crate::errors::{ProbeError, Result};
use crate::geo_transform::GeoTransform;
use crate::view::{DataType, ViewDescription};
use crate::window::PixelWindow;

/// A single-band raster held in memory, row-major `f32` pixels.
pub struct MemRaster {
    size: (usize, usize),
    geo_transform: GeoTransform,
    data: Vec<f32>,
}

impl MemRaster {
    /// Construct from `(width, height)`, a geo-transform and row-major
    /// pixel data.
    ///
    /// # Panics
    /// Panics if `data.len() != width * height`.
    pub fn new(size: (usize, usize), geo_transform: GeoTransform, data: Vec<f32>) -> Self {
        assert_eq!(
            size.0 * size.1,
            data.len(),
            "size {:?} does not match length {}",
            size,
            data.len()
        );
        Self {
            size,
            geo_transform,
            data,
        }
    }

    /// Construct by evaluating `value` at every `(column, line)`.
    pub fn with_values(
        size: (usize, usize),
        geo_transform: GeoTransform,
        value: impl Fn(usize, usize) -> f32,
    ) -> Self {
        let value = &value;
        let data = (0..size.1)
            .flat_map(|line| (0..size.0).map(move |column| value(column, line)))
            .collect();
        Self::new(size, geo_transform, data)
    }

    fn read(&self, window: PixelWindow) -> Result<Vec<f32>> {
        if !window.fits_within(self.size) {
            return Err(ProbeError::WindowOutOfBounds {
                window,
                width: self.size.0,
                height: self.size.1,
            });
        }
        let mut out = Vec::with_capacity(window.x_size * window.y_size);
        for line in 0..window.y_size {
            let start = (window.y_off as usize + line) * self.size.0 + window.x_off as usize;
            out.extend_from_slice(&self.data[start..start + window.x_size]);
        }
        Ok(out)
    }
}

/// A registry of named in-memory rasters implementing [`RasterEngine`].
#[derive(Default)]
pub struct MemEngine {
    rasters: HashMap<PathBuf, Arc<MemRaster>>,
}

impl MemEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `raster` under `name`, the "path" later passed to
    /// [`RasterEngine::open`].
    pub fn register(&mut self, name: impl Into<PathBuf>, raster: MemRaster) {
        self.rasters.insert(name.into(), Arc::new(raster));
    }

    fn lookup(&self, path: &Path) -> Result<Arc<MemRaster>> {
        self.rasters
            .get(path)
            .cloned()
            .ok_or_else(|| ProbeError::UnknownRaster(path.display().to_string()))
    }
}

/// An open in-memory dataset: the whole source raster, or a sub-window view
/// of it.
pub struct MemDataset {
    source: Arc<MemRaster>,
    /// Sub-window into `source` when this dataset is a view.
    window: Option<PixelWindow>,
    geo_transform: GeoTransform,
}

impl MemDataset {
    fn translate(&self, window: PixelWindow) -> PixelWindow {
        match self.window {
            Some(sub) => PixelWindow::new(
                window.x_off + sub.x_off,
                window.y_off + sub.y_off,
                window.x_size,
                window.y_size,
            ),
            None => window,
        }
    }
}

impl RasterDataset for MemDataset {
    type Band<'a>
        = MemBand<'a>
    where
        Self: 'a;

    fn raster_size(&self) -> (usize, usize) {
        match self.window {
            Some(sub) => (sub.x_size, sub.y_size),
            None => self.source.size,
        }
    }

    fn geo_transform(&self) -> Result<GeoTransform> {
        Ok(self.geo_transform)
    }

    fn band(&self, index: usize) -> Result<MemBand<'_>> {
        if index != 1 {
            return Err(ProbeError::InvalidBand { index, count: 1 });
        }
        Ok(MemBand { dataset: self })
    }
}

pub struct MemBand<'a> {
    dataset: &'a MemDataset,
}

impl RasterBand for MemBand<'_> {
    fn data_type(&self) -> DataType {
        DataType::Float32
    }

    fn read_window_as_f32(&self, window: PixelWindow) -> Result<Vec<f32>> {
        // A view is bounded by its own extent, not just the source's; a
        // window reaching past the view must not leak source pixels.
        let (width, height) = self.dataset.raster_size();
        if !window.fits_within((width, height)) {
            return Err(ProbeError::WindowOutOfBounds {
                window,
                width,
                height,
            });
        }
        self.dataset.source.read(self.dataset.translate(window))
    }
}

impl RasterEngine for MemEngine {
    type Dataset = MemDataset;

    fn open(&self, path: &Path) -> Result<MemDataset> {
        let source = self.lookup(path)?;
        let geo_transform = source.geo_transform;
        Ok(MemDataset {
            source,
            window: None,
            geo_transform,
        })
    }

    fn open_view(&self, view: &ViewDescription) -> Result<MemDataset> {
        let source = self.lookup(&view.source_path)?;
        Ok(MemDataset {
            source,
            window: Some(view.window),
            geo_transform: view.geo_transform,
        })
    }

    fn create_view(&self, view: &ViewDescription, source: &MemDataset) -> Result<MemDataset> {
        // The view window is relative to `source`; compose offsets so a view
        // over a view still reads through to the underlying raster.
        let window = source.translate(view.window);
        Ok(MemDataset {
            source: Arc::clone(&source.source),
            window: Some(window),
            geo_transform: view.geo_transform,
        })
    }
}

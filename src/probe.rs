//! The sampling harness: read pixel values at randomly sampled geographic
//! coordinates under several object-reuse strategies, timing the loop.
//!
//! Each strategy differs only in which engine handles are created per
//! sample and which are held open across the loop; handles live in the loop
//! frame and are passed explicitly, never retained in module state.
//! Formatting or printing the resulting timings is the caller's concern.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::{band_data_type, read_pixel, RasterBand, RasterDataset, RasterEngine};
use crate::errors::Result;
use crate::geo_transform::geo_to_pixel;
use crate::view::{build_view, ViewDescription};
use crate::window::{BoundingBox, PixelWindow};

/// Object-reuse strategies for the sampling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Open the source raster anew for every sample.
    Direct,
    /// Open the source raster once and reuse the dataset handle.
    DirectReuseDataset,
    /// Open the source raster once and reuse a band handle.
    DirectReuseBand,
    /// Build a sub-window view through the engine's object API for every
    /// sample, opening the source anew each time.
    ViewPerSample,
    /// Build a sub-window view from its textual description for every
    /// sample.
    ViewFromDescription,
    /// Build a sub-window view through the object API for every sample,
    /// over a source handle opened once.
    ViewReuseSource,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::Direct,
        Strategy::DirectReuseDataset,
        Strategy::DirectReuseBand,
        Strategy::ViewPerSample,
        Strategy::ViewFromDescription,
        Strategy::ViewReuseSource,
    ];
}

/// Configuration for a probe run.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Path (or engine-specific name) of the source raster.
    pub path: PathBuf,
    /// Geographic region to sample coordinates from; also the sub-window
    /// selected by the view strategies.
    pub bounding_box: BoundingBox,
    pub iterations: usize,
    /// Seed for the coordinate sampler; equal seeds yield equal coordinate
    /// sequences across strategies.
    pub seed: u64,
    /// 1-based band to read from the source raster.
    pub band: usize,
    /// Retain the sampled pixel values in the report.
    pub capture_values: bool,
}

impl ProbeConfig {
    pub fn new(
        path: impl Into<PathBuf>,
        bounding_box: BoundingBox,
        iterations: usize,
        seed: u64,
    ) -> Self {
        Self {
            path: path.into(),
            bounding_box,
            iterations,
            seed,
            band: 1,
            capture_values: false,
        }
    }
}

/// Outcome of a probe run.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub strategy: Strategy,
    pub iterations: usize,
    /// Wall time of the sampling loop.
    pub elapsed: Duration,
    /// Sampled pixel values, present when
    /// [`capture_values`](ProbeConfig::capture_values) was set.
    pub values: Option<Vec<f32>>,
}

impl ProbeReport {
    pub fn mean_per_iteration(&self) -> Duration {
        if self.iterations == 0 {
            return Duration::ZERO;
        }
        self.elapsed / self.iterations as u32
    }
}

/// Run the sampling loop against `engine` with the given reuse strategy.
pub fn run<E: RasterEngine>(
    engine: &E,
    config: &ProbeConfig,
    strategy: Strategy,
) -> Result<ProbeReport> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut values = config
        .capture_values
        .then(|| Vec::with_capacity(config.iterations));

    tracing::debug!(?strategy, iterations = config.iterations, "starting probe run");
    let start = Instant::now();

    match strategy {
        Strategy::Direct => {
            for _ in 0..config.iterations {
                let (x, y) = config.bounding_box.sample(&mut rng);
                let dataset = engine.open(&config.path)?;
                record(&mut values, read_at(&dataset, config.band, x, y)?);
            }
        }
        Strategy::DirectReuseDataset => {
            let dataset = engine.open(&config.path)?;
            for _ in 0..config.iterations {
                let (x, y) = config.bounding_box.sample(&mut rng);
                record(&mut values, read_at(&dataset, config.band, x, y)?);
            }
        }
        Strategy::DirectReuseBand => {
            let dataset = engine.open(&config.path)?;
            let geo_transform = dataset.geo_transform()?;
            let band = dataset.band(config.band)?;
            for _ in 0..config.iterations {
                let (x, y) = config.bounding_box.sample(&mut rng);
                let (column, line) = geo_to_pixel(&geo_transform, x, y)?;
                let buffer = band.read_window_as_f32(PixelWindow::new(column, line, 1, 1))?;
                record(&mut values, buffer[0]);
            }
        }
        Strategy::ViewPerSample => {
            for _ in 0..config.iterations {
                let (x, y) = config.bounding_box.sample(&mut rng);
                let source = engine.open(&config.path)?;
                let description = describe(&source, config)?;
                let view = engine.create_view(&description, &source)?;
                record(&mut values, read_at(&view, 1, x, y)?);
            }
        }
        Strategy::ViewFromDescription => {
            for _ in 0..config.iterations {
                let (x, y) = config.bounding_box.sample(&mut rng);
                let source = engine.open(&config.path)?;
                let description = describe(&source, config)?;
                let view = engine.open_view(&description)?;
                record(&mut values, read_at(&view, 1, x, y)?);
            }
        }
        Strategy::ViewReuseSource => {
            let source = engine.open(&config.path)?;
            for _ in 0..config.iterations {
                let (x, y) = config.bounding_box.sample(&mut rng);
                let description = describe(&source, config)?;
                let view = engine.create_view(&description, &source)?;
                record(&mut values, read_at(&view, 1, x, y)?);
            }
        }
    }

    let elapsed = start.elapsed();
    Ok(ProbeReport {
        strategy,
        iterations: config.iterations,
        elapsed,
        values,
    })
}

/// Resolve a geographic coordinate through `dataset`'s own geo-transform
/// and read the single pixel under it.
fn read_at<D: RasterDataset>(dataset: &D, band: usize, x: f64, y: f64) -> Result<f32> {
    let geo_transform = dataset.geo_transform()?;
    let (column, line) = geo_to_pixel(&geo_transform, x, y)?;
    read_pixel(dataset, band, column, line)
}

/// Build the sub-window view description covering the configured bounding
/// box of `source`.
fn describe<D: RasterDataset>(source: &D, config: &ProbeConfig) -> Result<ViewDescription> {
    let geo_transform = source.geo_transform()?;
    let data_type = band_data_type(source, config.band)?;
    let mut description = build_view(
        &geo_transform,
        &config.bounding_box,
        data_type,
        &config.path,
    )?;
    description.source_band = config.band;
    Ok(description)
}

fn record(values: &mut Option<Vec<f32>>, value: f32) {
    if let Some(values) = values.as_mut() {
        values.push(value);
    }
}

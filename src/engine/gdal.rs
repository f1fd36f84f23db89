//! The GDAL-backed raster engine, enabled by the `gdal` cargo feature.
//!
//! Delegates opening, virtual-raster materialization and pixel reads to the
//! [`gdal`] crate. Textual view descriptions are handed to GDAL verbatim
//! (GDAL accepts VRT XML in place of a file name); object-API views go
//! through the VRT driver plus the band-level `new_vrt_sources` metadata
//! domain, which registers a `<SimpleSource>` element on a band of an
//! otherwise empty VRT dataset.

use std::path::Path;

use gdal::raster::{GdalDataType, RasterBand as GdalRasterBand};
use gdal::{Dataset, DriverManager, Metadata};

use crate::engine::{RasterBand, RasterDataset, RasterEngine};
use crate::errors::{ProbeError, Result};
use crate::geo_transform::GeoTransform;
use crate::view::{DataType, ViewDescription};
use crate::window::PixelWindow;

impl DataType {
    fn from_gdal(data_type: GdalDataType) -> Result<Self> {
        match data_type {
            GdalDataType::UInt8 => Ok(DataType::Byte),
            GdalDataType::UInt16 => Ok(DataType::UInt16),
            GdalDataType::Int16 => Ok(DataType::Int16),
            GdalDataType::UInt32 => Ok(DataType::UInt32),
            GdalDataType::Int32 => Ok(DataType::Int32),
            GdalDataType::Float32 => Ok(DataType::Float32),
            GdalDataType::Float64 => Ok(DataType::Float64),
            other => Err(ProbeError::UnsupportedDataType(format!("{other:?}"))),
        }
    }
}

impl RasterDataset for Dataset {
    type Band<'a>
        = GdalRasterBand<'a>
    where
        Self: 'a;

    fn raster_size(&self) -> (usize, usize) {
        Dataset::raster_size(self)
    }

    fn geo_transform(&self) -> Result<GeoTransform> {
        Ok(Dataset::geo_transform(self)?)
    }

    fn band(&self, index: usize) -> Result<GdalRasterBand<'_>> {
        Ok(self.rasterband(index)?)
    }
}

impl RasterBand for GdalRasterBand<'_> {
    fn data_type(&self) -> DataType {
        // Reads go through f32 buffers regardless, so an exotic band type
        // only matters for the textual description; fall back to Float32.
        DataType::from_gdal(self.band_type()).unwrap_or(DataType::Float32)
    }

    fn read_window_as_f32(&self, window: PixelWindow) -> Result<Vec<f32>> {
        let size = (window.x_size, window.y_size);
        let buffer = self.read_as::<f32>((window.x_off, window.y_off), size, size, None)?;
        Ok(buffer.into_shape_and_vec().1)
    }
}

/// [`RasterEngine`] implementation delegating to GDAL.
#[derive(Debug, Default, Clone, Copy)]
pub struct GdalEngine;

impl RasterEngine for GdalEngine {
    type Dataset = Dataset;

    fn open(&self, path: &Path) -> Result<Dataset> {
        Ok(Dataset::open(path)?)
    }

    fn open_view(&self, view: &ViewDescription) -> Result<Dataset> {
        // GDAL resolves the XML text itself; no file is written.
        Ok(Dataset::open(Path::new(&view.to_xml()))?)
    }

    fn create_view(&self, view: &ViewDescription, _source: &Dataset) -> Result<Dataset> {
        // The source is referenced by path in the SimpleSource element;
        // sharing of the already open handle is left to GDAL's dataset
        // cache.
        let driver = DriverManager::get_driver_by_name("VRT")?;
        let (x_size, y_size) = view.raster_size();
        let mut dataset = match view.data_type {
            DataType::Byte => driver.create_with_band_type::<u8, _>("", x_size, y_size, 1)?,
            DataType::UInt16 => driver.create_with_band_type::<u16, _>("", x_size, y_size, 1)?,
            DataType::Int16 => driver.create_with_band_type::<i16, _>("", x_size, y_size, 1)?,
            DataType::UInt32 => driver.create_with_band_type::<u32, _>("", x_size, y_size, 1)?,
            DataType::Int32 => driver.create_with_band_type::<i32, _>("", x_size, y_size, 1)?,
            DataType::Float32 => driver.create_with_band_type::<f32, _>("", x_size, y_size, 1)?,
            DataType::Float64 => driver.create_with_band_type::<f64, _>("", x_size, y_size, 1)?,
        };
        dataset.set_geo_transform(&view.geo_transform)?;

        let mut band = dataset.rasterband(1)?;
        band.set_metadata_item("source_0", &view.source_xml(), "new_vrt_sources")?;
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::read_pixel;
    use crate::view::build_view;
    use crate::window::BoundingBox;
    use gdal::raster::Buffer;

    const NORTH_UP: GeoTransform = [0.0, 1.0, 0.0, 32.0, 0.0, -1.0];

    /// Write a 64x32 Float32 GeoTIFF whose pixel value is `line * 64 +
    /// column`.
    fn create_fixture(path: &Path) {
        let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
        let mut dataset = driver
            .create_with_band_type::<f32, _>(path, 64, 32, 1)
            .unwrap();
        dataset.set_geo_transform(&NORTH_UP).unwrap();

        let data: Vec<f32> = (0..64 * 32).map(|i| i as f32).collect();
        let mut buffer = Buffer::new((64, 32), data);
        let mut band = dataset.rasterband(1).unwrap();
        band.write((0, 0), (64, 32), &mut buffer).unwrap();
    }

    #[test]
    fn test_view_matches_direct_read() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("fixture.tif");
        create_fixture(&path);

        let engine = GdalEngine;
        let source = engine.open(&path).unwrap();
        let bbox = BoundingBox::new(4.0, 8.0, 20.0, 24.0);
        let description = build_view(
            &RasterDataset::geo_transform(&source).unwrap(),
            &bbox,
            DataType::Float32,
            &path,
        )
        .unwrap();

        let direct = read_pixel(&source, 1, 10, 12).unwrap();
        for view in [
            engine.create_view(&description, &source).unwrap(),
            engine.open_view(&description).unwrap(),
        ] {
            assert_eq!(RasterDataset::raster_size(&view), (16, 16));
            // Source pixel (10, 12) is view pixel (6, 4).
            let through_view = read_pixel(&view, 1, 6, 4).unwrap();
            assert_eq!(direct, through_view);
        }
    }

    #[test]
    fn test_view_survives_source_close() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("fixture.tif");
        create_fixture(&path);

        let engine = GdalEngine;
        let source = engine.open(&path).unwrap();
        let bbox = BoundingBox::new(4.0, 8.0, 20.0, 24.0);
        let description = build_view(
            &RasterDataset::geo_transform(&source).unwrap(),
            &bbox,
            DataType::Float32,
            &path,
        )
        .unwrap();
        let view = engine.create_view(&description, &source).unwrap();

        // The view references the source by path, so reads must keep
        // working after the source handle is closed.
        let before = read_pixel(&view, 1, 6, 4).unwrap();
        drop(source);
        let after = read_pixel(&view, 1, 6, 4).unwrap();
        assert_eq!(before, after);
        assert_eq!(after, 12.0 * 64.0 + 10.0);
    }
}

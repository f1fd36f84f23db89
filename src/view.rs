use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::geo_transform::{GeoTransform, GeoTransformEx};
use crate::window::{BoundingBox, PixelWindow};

/// Pixel data types understood by the raster engines.
///
/// Names follow the GDAL spelling used in textual virtual-raster
/// descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Byte,
    UInt16,
    Int16,
    UInt32,
    Int32,
    Float32,
    Float64,
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Byte => "Byte",
            DataType::UInt16 => "UInt16",
            DataType::Int16 => "Int16",
            DataType::UInt32 => "UInt32",
            DataType::Int32 => "Int32",
            DataType::Float32 => "Float32",
            DataType::Float64 => "Float64",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A description of a virtual raster exposing a sub-window of a source
/// raster as an independent raster with its own coordinate origin.
///
/// The view is a read-through projection: it references the source by path
/// and owns no pixel data. View pixel `(0, 0)` corresponds to
/// `(window.x_off, window.y_off)` in source pixel space. The description can
/// be materialized by a [`RasterEngine`](crate::engine::RasterEngine) either
/// through its object API ([`create_view`](crate::engine::RasterEngine::create_view))
/// or from the textual form ([`to_xml`](ViewDescription::to_xml)).
#[derive(Debug, Clone, PartialEq)]
pub struct ViewDescription {
    pub source_path: PathBuf,
    pub source_band: usize,
    pub window: PixelWindow,
    pub geo_transform: GeoTransform,
    pub data_type: DataType,
}

impl ViewDescription {
    /// The view's own raster size, equal to the sub-window size.
    pub fn raster_size(&self) -> (usize, usize) {
        (self.window.x_size, self.window.y_size)
    }

    /// Render the `<SimpleSource>` element describing the sub-window
    /// mapping, with the source rectangle at the window offset and the
    /// destination rectangle at the view origin.
    pub fn source_xml(&self) -> String {
        format!(
            "<SimpleSource>\
             <SourceFilename relativeToVRT=\"0\">{path}</SourceFilename>\
             <SourceBand>{band}</SourceBand>\
             <SrcRect xOff=\"{x_off}\" yOff=\"{y_off}\" xSize=\"{x_size}\" ySize=\"{y_size}\"/>\
             <DstRect xOff=\"0\" yOff=\"0\" xSize=\"{x_size}\" ySize=\"{y_size}\"/>\
             </SimpleSource>",
            path = self.source_path.display(),
            band = self.source_band,
            x_off = self.window.x_off,
            y_off = self.window.y_off,
            x_size = self.window.x_size,
            y_size = self.window.y_size,
        )
    }

    /// Render the full declarative virtual-raster description.
    ///
    /// This is a pass-through serialization target dictated by the engine;
    /// the engine accepts the text in place of a file name.
    pub fn to_xml(&self) -> String {
        let gt = &self.geo_transform;
        let (x_size, y_size) = self.raster_size();
        format!(
            "<VRTDataset rasterXSize=\"{x_size}\" rasterYSize=\"{y_size}\">\n\
             \x20 <GeoTransform>{:.15}, {:.15}, {:.15}, {:.15}, {:.15}, {:.15}</GeoTransform>\n\
             \x20 <VRTRasterBand dataType=\"{data_type}\" band=\"1\">\n\
             \x20   {source}\n\
             \x20 </VRTRasterBand>\n\
             </VRTDataset>\n",
            gt[0],
            gt[1],
            gt[2],
            gt[3],
            gt[4],
            gt[5],
            data_type = self.data_type,
            source = self.source_xml(),
        )
    }
}

/// Build a virtual sub-window view of a source raster from a geographic
/// bounding box.
///
/// Derives the pixel window covering `bounding_box` (degenerate boxes clamp
/// to 1x1) and a geo-transform anchored at the sub-window's origin: the
/// origin is the forward transform applied to the window offset, while the
/// linear (scale/rotation) coefficients carry over from the source
/// unchanged.
///
/// The window is not validated against the source raster's extent; reads
/// through a view that reaches outside the source fail at read time.
pub fn build_view(
    source_transform: &GeoTransform,
    bounding_box: &BoundingBox,
    data_type: DataType,
    source_path: impl AsRef<Path>,
) -> Result<ViewDescription> {
    let window = PixelWindow::from_bounding_box(source_transform, bounding_box)?;
    let (origin_x, origin_y) = source_transform.apply(window.x_off as f64, window.y_off as f64);

    let geo_transform = [
        origin_x,
        source_transform[1],
        source_transform[2],
        origin_y,
        source_transform[4],
        source_transform[5],
    ];

    tracing::debug!(%window, origin_x, origin_y, "derived sub-window view");

    Ok(ViewDescription {
        source_path: source_path.as_ref().to_path_buf(),
        source_band: 1,
        window,
        geo_transform,
        data_type,
    })
}

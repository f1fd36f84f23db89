//! End-to-end probing runs against the in-memory engine.

use vrt_probe::engine::mem::{MemEngine, MemRaster};
use vrt_probe::engine::{read_pixel, RasterDataset, RasterEngine};
use vrt_probe::{
    build_view, run, BoundingBox, DataType, GeoTransform, ProbeConfig, Strategy,
};

const WIDTH: usize = 100;
const HEIGHT: usize = 50;
const NORTH_UP: GeoTransform = [0.0, 1.0, 0.0, 50.0, 0.0, -1.0];

fn engine() -> MemEngine {
    let mut engine = MemEngine::new();
    engine.register(
        "source.tif",
        MemRaster::with_values((WIDTH, HEIGHT), NORTH_UP, |column, line| {
            (line * WIDTH + column) as f32
        }),
    );
    engine
}

#[test]
fn full_extent_view_matches_direct_reads() {
    let engine = engine();
    let source = engine.open("source.tif".as_ref()).unwrap();

    // Bounding box equal to the source's full geographic extent.
    let full_extent = BoundingBox::new(0.0, 0.0, WIDTH as f64, HEIGHT as f64);
    let description =
        build_view(&NORTH_UP, &full_extent, DataType::Float32, "source.tif").unwrap();
    let view = engine.create_view(&description, &source).unwrap();
    assert_eq!(view.raster_size(), (WIDTH, HEIGHT));

    for (column, line) in [(0, 0), (57, 23), (99, 49)] {
        let direct = read_pixel(&source, 1, column, line).unwrap();
        let through_view = read_pixel(&view, 1, column, line).unwrap();
        assert_eq!(direct, through_view);
    }
}

#[test]
fn strategies_agree_on_sampled_values() {
    let engine = engine();
    let mut config = ProbeConfig::new(
        "source.tif",
        BoundingBox::new(12.0, 6.0, 88.0, 44.0),
        200,
        987,
    );
    config.capture_values = true;

    let reference = run(&engine, &config, Strategy::DirectReuseBand).unwrap();
    let reference_values = reference.values.expect("values were captured");
    assert_eq!(reference_values.len(), 200);

    for strategy in Strategy::ALL {
        let report = run(&engine, &config, strategy).unwrap();
        assert_eq!(report.strategy, strategy);
        assert_eq!(
            report.values.as_deref(),
            Some(reference_values.as_slice()),
            "strategy {strategy:?} diverged"
        );
    }
}

#[test]
fn captured_values_match_the_raster_contents() {
    let engine = engine();
    let mut config = ProbeConfig::new(
        "source.tif",
        BoundingBox::new(12.0, 6.0, 88.0, 44.0),
        100,
        42,
    );
    config.capture_values = true;

    let report = run(&engine, &config, Strategy::DirectReuseDataset).unwrap();
    for value in report.values.unwrap() {
        // Every value encodes its own pixel position.
        let line = (value as usize) / WIDTH;
        let column = (value as usize) % WIDTH;
        assert!((12..88).contains(&column), "column {column} out of box");
        assert!((6..=44).contains(&line), "line {line} out of box");
    }
}

#[test]
fn probing_outside_the_raster_fails() {
    let engine = engine();
    let config = ProbeConfig::new(
        "source.tif",
        BoundingBox::new(400.0, 400.0, 500.0, 500.0),
        4,
        7,
    );
    assert!(run(&engine, &config, Strategy::Direct).is_err());
}

#[test]
fn unknown_raster_fails_before_sampling() {
    let engine = engine();
    let config = ProbeConfig::new("nope.tif", BoundingBox::new(0.0, 0.0, 1.0, 1.0), 4, 7);
    for strategy in Strategy::ALL {
        assert!(run(&engine, &config, strategy).is_err());
    }
}

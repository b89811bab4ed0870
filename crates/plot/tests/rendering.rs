//! Integration tests for rendering real CHGCAR files

use chgtools_field::{load_field, ScalarField};
use chgtools_plot::{render_request, write_series, Error, PaletteKind, PlotOptions};
use chgtools_slice::{Rgb, SliceRequest};
use rstest::{fixture, rstest};
use std::path::PathBuf;

#[fixture]
fn ref_cubic() -> ScalarField {
    load_field("../field/data/vasp4_cubic.chgcar").unwrap()
}

/// Plane through the centre of the 2x2x2 cell, half of it outside
fn xz_request() -> SliceRequest {
    SliceRequest::builder()
        .origin([1.0, 1.0, 2.0])
        .v1([1.0, 0.0, 0.0])
        .v2([0.0, 0.0, 1.0])
        .scale(10.0)
        .bounds([-1.0, 1.0, -1.0, 1.0])
        .build()
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("chgtools-plot-tests");
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[rstest]
#[case(true, (20, 11))] // case 1
#[case(false, (20, 20))] // case 2
fn image_size(ref_cubic: ScalarField, #[case] crop: bool, #[case] expected: (u32, u32)) {
    let options = PlotOptions {
        crop,
        ..Default::default()
    };
    let canvas = render_request(&ref_cubic, &xz_request(), &options).unwrap();
    assert_eq!((canvas.width(), canvas.height()), expected);
}

#[rstest]
fn margin_is_black(ref_cubic: ScalarField) {
    let options = PlotOptions {
        crop: false,
        ..Default::default()
    };
    let canvas = render_request(&ref_cubic, &xz_request(), &options).unwrap();
    assert_eq!(canvas.get_pixel(5, 19), Some(Rgb::BLACK));
    assert_ne!(canvas.get_pixel(5, 5), Some(Rgb::BLACK));
}

#[rstest]
fn plane_missing_the_cell(ref_cubic: ScalarField) {
    let request = SliceRequest::builder()
        .origin([10.0, 10.0, 10.0])
        .scale(5.0)
        .bounds([-1.0, 1.0, -1.0, 1.0])
        .build();
    let result = render_request(&ref_cubic, &request, &PlotOptions::default());
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[rstest]
fn write_single_image(ref_cubic: ScalarField) {
    let options = PlotOptions {
        isolines: 6,
        palette: PaletteKind::Diverging,
        low: 0.0,
        high: 2.0,
        ..Default::default()
    };
    let path = scratch("single.png");
    render_request(&ref_cubic, &xz_request(), &options)
        .unwrap()
        .write_png(&path)
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}

#[rstest]
fn write_parallel_frames(ref_cubic: ScalarField) {
    // three planes at y = 0.5, 1.0, 1.5
    let request = SliceRequest::builder()
        .origin([1.0, 0.5, 1.0])
        .v1([1.0, 0.0, 0.0])
        .v2([0.0, 0.0, 1.0])
        .scale(5.0)
        .bounds([-1.0, 1.0, -1.0, 1.0])
        .build();

    let output = scratch("series.png");
    let mut paths = write_series(
        &ref_cubic,
        &request,
        &PlotOptions::default(),
        3,
        -0.5,
        &output,
    )
    .unwrap();
    paths.sort();

    assert_eq!(paths.len(), 3);
    assert!(paths[0].ends_with("series_000.png"));
    assert!(paths[2].ends_with("series_002.png"));
    assert!(paths.iter().all(|p| p.exists()));
}

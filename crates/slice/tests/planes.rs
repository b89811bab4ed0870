//! Integration tests for slicing real CHGCAR files

use approx::assert_relative_eq;
use chgtools_field::{load_field, ScalarField};
use chgtools_slice::{isolines, slice, Palette, PlaneSlice, SliceRequest};
use rstest::{fixture, rstest};

#[fixture]
fn ref_cubic() -> ScalarField {
    // node values are x + 3y + 9z in a 2x2x2 cell
    load_field("../field/data/vasp4_cubic.chgcar").unwrap()
}

/// 20x20 px plane at height z, covering x and y from 0 to 1.9
fn xy_plane(field: &ScalarField, z: f64) -> PlaneSlice {
    let request = SliceRequest::builder()
        .origin([1.0, 1.0, z])
        .v1([1.0, 0.0, 0.0])
        .v2([0.0, 1.0, 0.0])
        .scale(10.0)
        .bounds([-1.0, 1.0, -1.0, 1.0])
        .build();
    slice(field, &request).unwrap()
}

#[rstest]
#[case(0.0)] // case 1
#[case(1.0)] // case 2
#[case(1.75)] // case 3
fn sampled_values(ref_cubic: ScalarField, #[case] z: f64) {
    let plane = xy_plane(&ref_cubic, z);
    assert_eq!((plane.ix(), plane.iy()), (20, 20));

    for (i, j) in [(1, 0), (7, 3), (10, 10), (19, 19)] {
        let point = plane.pixel_point(i, j);
        let expected = point.x + 3.0 * point.y + 9.0 * point.z;
        assert_relative_eq!(plane.get(i, j).unwrap(), expected, epsilon = 1.0e-9);
        assert_relative_eq!(
            plane.get_display(i, j).unwrap(),
            expected.log10(),
            epsilon = 1.0e-9
        );
    }
}

#[rstest]
fn crop_full_footprint(ref_cubic: ScalarField) {
    // only the origin of the cell is zero, so nothing is trimmed
    let mut plane = xy_plane(&ref_cubic, 0.0);
    let uncropped = plane.clone();
    plane.crop();
    assert_eq!(plane, uncropped);
}

#[rstest]
fn crop_plane_leaving_the_cell(ref_cubic: ScalarField) {
    // half of the plane is above the top of the cell
    let request = SliceRequest::builder()
        .origin([1.0, 1.0, 2.0])
        .v1([1.0, 0.0, 0.0])
        .v2([0.0, 0.0, 1.0])
        .scale(10.0)
        .bounds([-1.0, 1.0, -1.0, 1.0])
        .build();

    let mut plane = slice(&ref_cubic, &request).unwrap();
    plane.crop();
    assert_eq!((plane.ix(), plane.iy()), (20, 11));
    assert_eq!(plane.offset(), [0, 0]);
    assert_relative_eq!(plane.pixel_point(0, 10).z, 2.0);
}

#[rstest]
fn isoline_markers(ref_cubic: ScalarField) {
    let plane = xy_plane(&ref_cubic, 1.0);

    // a single level at 10^1, crossed along x + 3y = 1
    let markers = isolines(&plane, 0, 1.0, 1.0, false);
    assert!(markers.contains(&(7, 1)));
    assert!(!markers.contains(&(15, 15)));
    assert!(markers.iter().all(|(i, j)| *i > 0 && *j > 0 && *i < 19 && *j < 19));
}

#[rstest]
fn colour_every_pixel(ref_cubic: ScalarField) {
    let plane = xy_plane(&ref_cubic, 1.0);
    let (low, high) = plane.display_range().unwrap();
    let palette = Palette::sequential(low, high).unwrap();

    let first = palette.anchors()[0];
    let last = *palette.anchors().last().unwrap();

    // the smallest and largest values land exactly on the end anchors
    let colours: Vec<_> = plane.display().iter().map(|v| palette.get_color(*v)).collect();
    assert!(colours.contains(&first));
    assert!(colours.contains(&last));
}

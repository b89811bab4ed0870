//! Integration tests for reading CHGCAR files

use approx::assert_relative_eq;
use chgtools_field::{
    load_field, Error, FieldReader, GridScaling, ScalarField, Warning, OUT_OF_DOMAIN,
};
use nalgebra::Vector3;
use rstest::{fixture, rstest};
use std::path::Path;

#[fixture]
fn ref_cubic() -> ScalarField {
    load_field("./data/vasp4_cubic.chgcar").unwrap()
}

#[fixture]
fn ref_spin() -> ScalarField {
    load_field("./data/vasp5_spin.chgcar").unwrap()
}

#[rstest]
fn vasp4_header(ref_cubic: ScalarField) {
    assert_eq!(ref_cubic.comment(), "cubic test grid");
    assert_eq!(ref_cubic.scalar(), 2.0);
    assert!(ref_cubic.species_names().is_empty());
    assert_eq!(ref_cubic.species_counts(), &[1, 1]);
    assert_eq!(ref_cubic.n_atoms(), 2);
    assert_eq!(ref_cubic.dimensions(), [3, 3, 3]);
    assert_relative_eq!(ref_cubic.cell_volume(), 8.0);
    assert!(ref_cubic.warnings().is_empty());
    assert!(!ref_cubic.has_second_channel());
}

#[rstest]
fn vasp4_grid(ref_cubic: ScalarField) {
    // every value in the file is its own flat index
    for (n, v) in ref_cubic.values().iter().enumerate() {
        assert_eq!(*v, n as f64);
    }
    assert_eq!(ref_cubic.get_value(2, 1, 0).unwrap(), 5.0);
    assert_eq!(ref_cubic.get_value(0, 0, 2).unwrap(), 18.0);
    assert!(matches!(
        ref_cubic.get_value(0, 3, 0),
        Err(Error::OutOfBounds { .. })
    ));
}

#[rstest]
#[case([0.0, 0.0, 0.0], 0.0)] // case 1
#[case([2.0, 2.0, 2.0], 26.0)] // case 2
#[case([0.5, 1.0, 1.5], 17.0)] // case 3
#[case([1.25, 0.2, 0.7], 8.15)] // case 4
#[case([2.0, 0.0, 1.0], 11.0)] // case 5
fn sample_linear_grid(ref_cubic: ScalarField, #[case] point: [f64; 3], #[case] expected: f64) {
    // node values are x + 3y + 9z in a 2x2x2 cell
    let value = ref_cubic
        .sample(&Vector3::new(point[0], point[1], point[2]))
        .unwrap();
    assert_relative_eq!(value, expected, epsilon = 1.0e-12);
}

#[rstest]
#[case([-0.1, 1.0, 1.0])] // case 1
#[case([1.0, 2.1, 1.0])] // case 2
#[case([1.0, 1.0, 9.0])] // case 3
fn sample_outside(ref_cubic: ScalarField, #[case] point: [f64; 3]) {
    let value = ref_cubic
        .sample(&Vector3::new(point[0], point[1], point[2]))
        .unwrap();
    assert_eq!(value, OUT_OF_DOMAIN);
}

#[rstest]
fn vasp5_header(ref_spin: ScalarField) {
    assert_eq!(ref_spin.species_names(), &["Si", "O"]);
    assert_eq!(ref_spin.species_counts(), &[1, 2]);
    assert_eq!(ref_spin.dimensions(), [2, 2, 2]);
    assert_relative_eq!(ref_spin.cell_volume(), 64.0);
}

#[rstest]
fn vasp5_grid(ref_spin: ScalarField) {
    // run-on values are split and the augmentation block is never read
    assert_eq!(
        ref_spin.values(),
        &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, -8.0]
    );
    assert_eq!(ref_spin.value_range(), Some((-8.0, 7.0)));
    assert!(ref_spin.warnings().is_empty());
}

#[rstest]
fn second_channel(ref_spin: ScalarField) {
    assert!(ref_spin.has_second_channel());
    assert_eq!(ref_spin.second_channel_line(), Some(19));
}

#[test]
fn truncated_grid() {
    let field = load_field("./data/truncated.chgcar").unwrap();
    assert_eq!(
        field.warnings(),
        &[Warning::IncompleteGrid {
            expected: 8,
            found: 5
        }]
    );
    assert_eq!(field.values(), &[1.0, 2.0, 3.0, 4.0, 5.0, 0.0, 0.0, 0.0]);
    assert!(field.to_string().contains("read 5 of 8 values"));
}

#[test]
fn short_grid_then_second_channel() {
    let field = load_field("./data/short_spin.chgcar").unwrap();
    assert_eq!(
        field.warnings(),
        &[Warning::IncompleteGrid {
            expected: 8,
            found: 5
        }]
    );
    assert_eq!(field.values(), &[1.0, 2.0, 3.0, 4.0, 5.0, 0.0, 0.0, 0.0]);
    assert!(field.has_second_channel());
    assert_eq!(field.second_channel_line(), Some(11));
}

#[test]
fn target_volume() {
    let field = load_field("./data/target_volume.chgcar").unwrap();
    assert_relative_eq!(field.cell_volume(), 27.0, epsilon = 1.0e-9);
    assert_relative_eq!(field.max_extent(0), 3.0, epsilon = 1.0e-9);
}

#[rstest]
#[case("./data/bad_grid.chgcar", "grid dimensions")] // case 1
fn fatal_format_errors(#[case] path: &str, #[case] expected: &str) {
    match load_field(path) {
        Err(Error::FormatError { field, line, .. }) => {
            assert_eq!(field, expected);
            assert_eq!(line, 9);
        }
        other => panic!("expected FormatError, got {other:?}"),
    }
}

#[test]
fn degenerate_lattice() {
    let result = load_field("./data/bad_lattice.chgcar");
    assert!(matches!(result, Err(Error::DegenerateGeometry { .. })));
}

#[test]
fn missing_file() {
    let result = load_field("./data/does_not_exist.chgcar");
    assert!(matches!(result, Err(Error::IOError(_))));
}

#[test]
fn periodic_reader() {
    let mut reader = FieldReader::new();
    reader.disable_progress();
    reader.set_scaling(GridScaling::Periodic);
    let field = reader.parse(Path::new("./data/vasp4_cubic.chgcar")).unwrap();
    assert_eq!(field.scaling(), GridScaling::Periodic);

    // index 1 of 3 sits a third of the way across a periodic cell
    let value = field.sample(&Vector3::new(2.0 / 3.0, 0.0, 0.0)).unwrap();
    assert_relative_eq!(value, 1.0, epsilon = 1.0e-12);
}

mod support;

use nalgebra::Point2;
use pipeflat::unwrap::{FlatBoundary, FlatMesh, developed_ring_length, signed_area};
use pipeflat::{PipeSpec, TemplateError};
use support::{approx_eq_rel, bounds};

fn boundary(spec: &PipeSpec) -> FlatBoundary {
    FlatBoundary::from_spec(spec).expect("boundary derivation")
}

#[test]
fn default_boundary_matches_analytic_size() {
    let spec = PipeSpec::default();
    let b = boundary(&spec);
    let (expected_w, expected_h) = spec.wrap_flat_size();
    assert!(approx_eq_rel(b.width, expected_w, 1e-9));
    assert!(approx_eq_rel(b.height, expected_h, 1e-6));

    let (min_x, min_y, max_x, max_y) = bounds(&b.points);
    assert!(min_x.abs() < 1e-9);
    assert!(min_y.abs() < 1e-9);
    assert!(approx_eq_rel(max_x, b.width, 1e-9));
    assert!(approx_eq_rel(max_y, b.height, 1e-6));
}

#[test]
fn boundary_is_counter_clockwise_and_starts_at_seam_tail() {
    let b = boundary(&PipeSpec::default());
    assert!(signed_area(&b.points) > 0.0);
    assert!(b.points[0].0.abs() < 1e-9);
}

#[test]
fn derivation_holds_across_angle_and_segment_grid() {
    for segments in [1u32, 5, 20] {
        for angle in [10.0, 90.0, 360.0] {
            let spec = PipeSpec {
                bend_angle_deg: angle,
                segment_count: segments,
                ..PipeSpec::default()
            };
            spec.validate().expect("grid spec in range");
            let b = FlatBoundary::from_spec(&spec)
                .unwrap_or_else(|e| panic!("{segments} segs at {angle}°: {e}"));
            let (expected_w, expected_h) = spec.wrap_flat_size();
            assert!(approx_eq_rel(b.width, expected_w, 1e-9));
            assert!(approx_eq_rel(b.height, expected_h, 1e-4));
        }
    }
}

#[test]
fn zero_overlap_leaves_bare_circumference() {
    let spec = PipeSpec { tail_overlap: 0.0, ..PipeSpec::default() };
    let b = boundary(&spec);
    assert!(approx_eq_rel(b.width, spec.wrap_circumference(), 1e-9));
}

#[test]
fn overlap_widens_pattern_without_changing_height() {
    let without = boundary(&PipeSpec { tail_overlap: 0.0, ..PipeSpec::default() });
    let with = boundary(&PipeSpec { tail_overlap: 20.0, ..PipeSpec::default() });
    assert!(approx_eq_rel(with.width - without.width, 20.0, 1e-9));
    assert!(approx_eq_rel(with.height, without.height, 1e-9));
}

#[test]
fn reference_outline_nests_inside_boundary() {
    let spec = PipeSpec::default();
    let b = boundary(&spec);
    let (bx0, by0, bx1, by1) = bounds(&b.points);
    let (rx0, ry0, rx1, ry1) = bounds(&b.reference_points);
    assert!(rx0 >= bx0 && ry0 >= by0 && rx1 <= bx1 && ry1 <= by1);

    let (base_w, base_h) = spec.base_flat_size();
    assert!(approx_eq_rel(rx1 - rx0, base_w, 1e-9));
    assert!(approx_eq_rel(ry1 - ry0, base_h, 1e-9));
}

fn quad(corners: [(f64, f64); 4]) -> [Point2<f64>; 4] {
    corners.map(|(x, y)| Point2::new(x, y))
}

#[test]
fn flat_mesh_without_a_border_is_rejected() {
    // Two coincident faces cancel every edge, leaving no boundary to chain.
    let face = quad([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    let flat = FlatMesh { faces: vec![face, face] };
    let err = FlatBoundary::build(&PipeSpec::default(), &flat).expect_err("no border");
    assert!(matches!(err, TemplateError::UnwrapFailure(_)));
}

#[test]
fn self_crossing_flat_mesh_is_rejected() {
    // A bowtie quad spanning the full circumference passes the width gate
    // but has no usable developed edges between its seams.
    let spec = PipeSpec::default();
    let c = spec.wrap_circumference();
    let face = quad([(0.0, 0.0), (c, 10.0), (c, 0.0), (0.0, 10.0)]);
    let flat = FlatMesh { faces: vec![face] };
    let err = FlatBoundary::build(&spec, &flat).expect_err("crossed boundary");
    assert!(matches!(err, TemplateError::UnwrapFailure(_)));
}

#[test]
fn arc_length_deviation_is_rejected_not_repaired() {
    // A 10mm square is nowhere near the wrap circumference; the gate must
    // refuse it rather than rescale it into a plausible-looking pattern.
    let spec = PipeSpec::default();
    let face = quad([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    let flat = FlatMesh { faces: vec![face] };
    let err = FlatBoundary::build(&spec, &flat).expect_err("undersized mesh");
    assert!(matches!(err, TemplateError::ToleranceExceeded { .. }));
}

#[test]
fn ring_development_degenerates_to_circle_for_straight_pipe() {
    // As the bend angle goes to zero the developed ring edge is just the
    // wrap circumference.
    let length = developed_ring_length(100.0, 44.25, 1e-4);
    assert!(approx_eq_rel(length, std::f64::consts::TAU * 44.25, 1e-6));
}

#[test]
fn ring_development_grows_with_bend_angle() {
    let shallow = developed_ring_length(100.0, 44.25, 0.1);
    let steep = developed_ring_length(100.0, 44.25, 1.5);
    assert!(steep > shallow);
    assert!(shallow > std::f64::consts::TAU * 44.25);
}

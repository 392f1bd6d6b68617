use pipeflat::PipeSpec;

fn spec() -> PipeSpec {
    PipeSpec::default()
}

#[test]
fn default_spec_is_valid() {
    assert!(spec().validate().is_ok());
}

#[test]
fn outer_diameter_range() {
    let mut s = spec();
    s.outer_diameter = 10.0;
    assert!(s.validate().is_ok());
    s.outer_diameter = 500.0;
    assert!(s.validate().is_ok());
    s.outer_diameter = 9.9;
    assert!(s.validate().is_err());
    s.outer_diameter = 500.1;
    assert!(s.validate().is_err());
    s.outer_diameter = f64::NAN;
    assert!(s.validate().is_err());
}

#[test]
fn bend_radius_factor_range() {
    let mut s = spec();
    s.bend_radius_factor = 0.5;
    assert!(s.validate().is_ok());
    s.bend_radius_factor = 10.0;
    assert!(s.validate().is_ok());
    s.bend_radius_factor = 0.49;
    assert!(s.validate().is_err());
    s.bend_radius_factor = 10.01;
    assert!(s.validate().is_err());
}

#[test]
fn bend_angle_is_half_open() {
    let mut s = spec();
    s.bend_angle_deg = 360.0;
    assert!(s.validate().is_ok());
    s.bend_angle_deg = 0.0;
    assert!(s.validate().is_err());
    s.bend_angle_deg = 360.1;
    assert!(s.validate().is_err());
}

#[test]
fn segment_count_range() {
    let mut s = spec();
    s.segment_count = 1;
    assert!(s.validate().is_ok());
    s.segment_count = 20;
    assert!(s.validate().is_ok());
    s.segment_count = 0;
    assert!(s.validate().is_err());
    s.segment_count = 21;
    assert!(s.validate().is_err());
}

#[test]
fn wrap_thickness_and_overlap_ranges() {
    let mut s = spec();
    s.wrap_thickness = 0.1;
    assert!(s.validate().is_ok());
    s.wrap_thickness = 0.05;
    assert!(s.validate().is_err());
    s = spec();
    s.tail_overlap = 0.0;
    assert!(s.validate().is_ok());
    s.tail_overlap = 50.0;
    assert!(s.validate().is_ok());
    s.tail_overlap = -1.0;
    assert!(s.validate().is_err());
    s.tail_overlap = 50.1;
    assert!(s.validate().is_err());
}

#[test]
fn derived_dimensions() {
    let s = spec();
    assert!((s.pipe_radius() - 38.1).abs() < 1e-9);
    assert!((s.wrap_radius() - 44.25).abs() < 1e-9);
    assert!((s.centerline_radius() - 114.3).abs() < 1e-9);
    assert!((s.angle_per_segment_deg() - 18.0).abs() < 1e-9);

    let (base_w, base_h) = s.base_flat_size();
    assert!((base_w - std::f64::consts::PI * 76.2).abs() < 1e-9);
    assert!((base_h - 114.3 * 18f64.to_radians()).abs() < 1e-9);

    let (wrap_w, wrap_h) = s.wrap_flat_size();
    assert!((wrap_w - (s.wrap_circumference() + 10.0)).abs() < 1e-9);
    assert!((wrap_h - (114.3 + 44.25) * 18f64.to_radians()).abs() < 1e-9);
}

#[test]
fn file_name_carries_parameters() {
    assert_eq!(
        spec().file_name(),
        "exhaust_wrap_OD76.2_CLR1.5_S5_O10.0_MT6.15.pdf"
    );
}

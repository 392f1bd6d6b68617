mod support;

use geo::{Area, BooleanOps, LineString, Polygon};
use pipeflat::layout::{ClipWindow, LayoutMode, LayoutPlan, SheetConfig, SplitAxis, clip_outline};
use pipeflat::{FlatBoundary, PipeSpec};
use support::bounds;

fn sheet() -> SheetConfig {
    SheetConfig::default()
}

fn plan(width: f64, height: f64) -> LayoutPlan {
    LayoutPlan::plan(width, height, &sheet()).expect("layout")
}

#[test]
fn a4_landscape_usable_area() {
    let s = sheet();
    assert_eq!(s.usable_width(), 285.0);
    assert_eq!(s.usable_height(), 148.0);
}

#[test]
fn small_pattern_gets_two_copies_on_one_page() {
    let p = plan(155.0, 22.0);
    assert_eq!(p.mode, LayoutMode::SinglePageDual);
    assert_eq!(p.page_count(), 1);
    assert_eq!(p.pages[0].placements.len(), 2);
    for placement in &p.pages[0].placements {
        assert!(placement.window.covers(155.0, 22.0));
        assert!(placement.label.is_none());
    }
    // Stacked with the standard spacing, not overlapping.
    let low = &p.pages[0].placements[0];
    let high = &p.pages[0].placements[1];
    assert!((high.offset.1 - low.offset.1 - (22.0 + 15.0)).abs() < 1e-9);
}

#[test]
fn threshold_width_still_pairs() {
    assert_eq!(plan(247.0, 60.0).mode, LayoutMode::SinglePageDual);
    assert_eq!(plan(247.1, 60.0).mode, LayoutMode::SplitPageCombined);
}

#[test]
fn tall_pattern_gets_one_copy() {
    let p = plan(200.0, 100.0);
    assert_eq!(p.mode, LayoutMode::SinglePageIndividual);
    assert_eq!(p.page_count(), 1);
    assert_eq!(p.pages[0].placements.len(), 1);
}

#[test]
fn moderate_split_shares_one_page() {
    let p = plan(288.0, 38.0);
    assert_eq!(p.mode, LayoutMode::SplitPageCombined);
    assert_eq!(p.page_count(), 1);
    let placements = &p.pages[0].placements;
    assert_eq!(placements.len(), 2);
    // Each half carries the 10mm extension past the split line.
    assert!((placements[0].window.width() - 154.0).abs() < 1e-9);
    assert!((placements[1].window.width() - 154.0).abs() < 1e-9);
    assert_eq!(placements[0].label.as_deref(), Some("LEFT HALF"));
    assert_eq!(placements[1].label.as_deref(), Some("RIGHT HALF"));
}

#[test]
fn wide_split_takes_a_page_per_half() {
    let p = plan(520.0, 48.0);
    assert_eq!(p.mode, LayoutMode::SplitPageSeparate);
    assert_eq!(p.page_count(), 2);
    for (index, page) in p.pages.iter().enumerate() {
        assert_eq!(page.page_index, index);
        let placement = &page.placements[0];
        assert!((placement.window.width() - 270.0).abs() < 1e-9);
        assert_eq!(placement.centerlines[0].axis, SplitAxis::Vertical);
        assert!((placement.centerlines[0].at - 260.0).abs() < 1e-9);
    }
    assert_eq!(p.pages[0].placements[0].label.as_deref(), Some("LEFT HALF (1 of 2)"));
    assert_eq!(p.pages[1].placements[0].label.as_deref(), Some("RIGHT HALF (2 of 2)"));
}

#[test]
fn height_overflow_adds_a_row_split() {
    let p = plan(200.0, 160.0);
    assert_eq!(p.mode, LayoutMode::SinglePageIndividual);
    assert_eq!(p.page_count(), 2);
    for page in &p.pages {
        let placement = &page.placements[0];
        assert!((placement.window.height() - 90.0).abs() < 1e-9);
        assert_eq!(placement.centerlines[0].axis, SplitAxis::Horizontal);
    }
}

#[test]
fn double_split_yields_four_pages() {
    let p = plan(520.0, 160.0);
    assert_eq!(p.mode, LayoutMode::SplitPageSeparate);
    assert_eq!(p.page_count(), 4);
}

#[test]
fn oversized_pattern_is_rejected() {
    assert!(LayoutPlan::plan(600.0, 48.0, &sheet()).is_err());
    assert!(LayoutPlan::plan(200.0, 320.0, &sheet()).is_err());
    assert!(LayoutPlan::plan(0.0, 48.0, &sheet()).is_err());
}

#[test]
fn page_count_never_drops_as_bend_angle_grows() {
    // A wider unwound band never simplifies the layout. Driven through the
    // whole unwrapper with everything but the bend angle held fixed.
    let mut last = 0usize;
    for angle in [10.0, 45.0, 90.0, 180.0, 270.0, 360.0] {
        let spec = PipeSpec { bend_angle_deg: angle, ..PipeSpec::default() };
        let boundary = FlatBoundary::from_spec(&spec).expect("boundary");
        let count = plan(boundary.width, boundary.height).page_count();
        assert!(count >= last, "{angle}° dropped to {count} pages");
        last = count;
    }
}

#[test]
fn every_page_has_a_full_length_scale_bar_slot() {
    for p in [plan(155.0, 22.0), plan(288.0, 38.0), plan(520.0, 48.0)] {
        let s = sheet();
        for page in &p.pages {
            let (x, y) = page.scale_bar_origin;
            assert!(x >= s.margin && y >= s.margin);
            assert!(x + s.scale_bar_length <= s.page_width - s.margin);
        }
    }
}

fn to_polygon(points: &[(f64, f64)]) -> Polygon<f64> {
    Polygon::new(LineString::from(points.to_vec()), vec![])
}

#[test]
fn split_halves_rejoin_to_the_whole_pattern() {
    let spec = PipeSpec::default();
    let boundary = FlatBoundary::from_spec(&spec).expect("boundary");
    let p = plan(boundary.width, boundary.height);
    assert_eq!(p.mode, LayoutMode::SplitPageCombined);

    let whole = to_polygon(&boundary.points);
    let mut rejoined: geo::MultiPolygon<f64> = geo::MultiPolygon(vec![]);
    for placement in &p.pages[0].placements {
        for ring in clip_outline(&boundary.points, &placement.window) {
            let piece: geo::MultiPolygon<f64> = to_polygon(&ring).into();
            rejoined = rejoined.union(&piece);
        }
    }

    // Aligning the halves at the centerline reproduces the pattern within
    // the stated tolerances (0.1mm positional, 0.1% area).
    let whole_area = whole.unsigned_area();
    let rejoined_area = rejoined.unsigned_area();
    assert!((whole_area - rejoined_area).abs() / whole_area < 0.001);

    let rejoined_points: Vec<(f64, f64)> = rejoined
        .0
        .iter()
        .flat_map(|poly| poly.exterior().coords().map(|c| (c.x, c.y)))
        .collect();
    let (x0, y0, x1, y1) = bounds(&boundary.points);
    let (rx0, ry0, rx1, ry1) = bounds(&rejoined_points);
    for (a, b) in [(x0, rx0), (y0, ry0), (x1, rx1), (y1, ry1)] {
        assert!((a - b).abs() < 0.1);
    }
}

#[test]
fn clipping_conserves_total_area_outside_the_overlap() {
    let spec = PipeSpec::default();
    let boundary = FlatBoundary::from_spec(&spec).expect("boundary");
    let whole = to_polygon(&boundary.points);
    let whole_area = whole.unsigned_area();

    let window = ClipWindow { x0: 0.0, y0: 0.0, x1: boundary.width / 2.0, y1: boundary.height };
    let other = ClipWindow {
        x0: boundary.width / 2.0,
        y0: 0.0,
        x1: boundary.width,
        y1: boundary.height,
    };
    // Disjoint windows partition the area exactly.
    let mut total = 0.0;
    for w in [window, other] {
        for ring in clip_outline(&boundary.points, &w) {
            total += to_polygon(&ring).unsigned_area();
        }
    }
    assert!((total - whole_area).abs() / whole_area < 0.001);
}

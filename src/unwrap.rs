//! Flat-pattern boundary derivation.
//!
//! The curved wrap band is not exactly developable: it is cut at the seam
//! (minimum-radius edge) and relaxed onto the plane by the flatten oracle.
//! The oracle is treated strictly as a best-effort 2D point cloud — the
//! boundary loop is always re-derived here by walking border edges, then
//! validated and rejected (never repaired) when it is not a simple closed
//! polygon or its arc lengths drift from the analytic values.

use crate::band::{BandMesh, BandSampler, ParametricBand};
use crate::errors::TemplateError;
use crate::float_types::{Real, TAU};
use crate::spec::PipeSpec;
use nalgebra::Point2;
use std::collections::HashMap;

/// Maximum relative deviation between sampled and analytic arc length.
pub const ARC_LENGTH_TOLERANCE: Real = 0.005;

/// Flattened band surface: one 2D quad per mesh face, corners indexed
/// congruently with the mesh face corners. Seam-adjacent faces carry
/// duplicated (cut) coordinates, which is what makes the seam a border.
#[derive(Debug, Clone)]
pub struct FlatMesh {
    pub faces: Vec<[Point2<Real>; 4]>,
}

/// Maps a band mesh to a 2D point cloud. The core does not trust exact
/// planarity or boundary detection from implementations of this trait.
pub trait FlattenOracle {
    fn flatten(&self, mesh: &BandMesh) -> Result<FlatMesh, TemplateError>;
}

/// Chord-length development cut at the seam.
///
/// Each cross-section ring is unrolled along the x axis by cumulative chord
/// length from the seam; each vertex keeps its longitudinal arc as
/// `y = distance-from-axis · (φ − α/2)`, which preserves the arc length of
/// every longitudinal curve exactly and centers the pattern about y = 0.
#[derive(Debug, Clone)]
pub struct SeamDevelopment {
    segment_angle: Real,
}

impl SeamDevelopment {
    pub fn for_spec(spec: &PipeSpec) -> Self {
        SeamDevelopment { segment_angle: spec.segment_angle() }
    }
}

impl FlattenOracle for SeamDevelopment {
    fn flatten(&self, mesh: &BandMesh) -> Result<FlatMesh, TemplateError> {
        if mesh.rings < 2 || mesh.ring_len < 4 || mesh.seam.is_empty() {
            return Err(TemplateError::UnwrapFailure(
                "band mesh too coarse to flatten".into(),
            ));
        }
        let alpha = self.segment_angle;
        let seam_column = mesh.seam_column();
        let ring_len = mesh.ring_len;
        // Uniform rings, so one chord measures them all.
        let chord = (mesh.vertices[1] - mesh.vertices[0]).norm();

        let corner = |ring: usize, column: usize| -> Point2<Real> {
            // `column` is relative to the seam and may equal ring_len on the
            // far side of the cut.
            let vertex = &mesh.vertices[ring * ring_len + (seam_column + column) % ring_len];
            let radial = vertex.x.hypot(vertex.y);
            let phi = alpha * ring as Real / (mesh.rings - 1) as Real;
            Point2::new(chord * column as Real, radial * (phi - alpha / 2.0))
        };

        let mut faces = Vec::with_capacity(mesh.faces.len());
        for face in &mesh.faces {
            let ring = face[0] / ring_len;
            let column = (face[0] % ring_len + ring_len - seam_column) % ring_len;
            faces.push([
                corner(ring, column),
                corner(ring, column + 1),
                corner(ring + 1, column + 1),
                corner(ring + 1, column),
            ]);
        }
        Ok(FlatMesh { faces })
    }
}

/// The cuttable flat-pattern outline of one wrap segment.
///
/// `points` is a closed, counter-clockwise simple polygon (first vertex at
/// the seam tail corner, closing edge implicit); `reference_points` is the
/// unwrapped bare-pipe outline nested inside it.
#[derive(Debug, Clone)]
pub struct FlatBoundary {
    pub points: Vec<(Real, Real)>,
    pub reference_points: Vec<(Real, Real)>,
    pub width: Real,
    pub height: Real,
}

impl FlatBoundary {
    /// Full derivation with the built-in sampler and oracle.
    pub fn from_spec(spec: &PipeSpec) -> Result<Self, TemplateError> {
        let mesh = ParametricBand.sample(spec)?;
        let flat = SeamDevelopment::for_spec(spec).flatten(&mesh)?;
        Self::build(spec, &flat)
    }

    /// Derive the boundary from an already-flattened band.
    pub fn build(spec: &PipeSpec, flat: &FlatMesh) -> Result<Self, TemplateError> {
        let mut outline = extract_border_loop(flat)?;
        if outline.len() < 4 {
            return Err(TemplateError::UnwrapFailure(format!(
                "flattened boundary has only {} vertices",
                outline.len()
            )));
        }

        let (min_x, min_y, max_x, max_y) = bounds(&outline);
        let sampled_width = max_x - min_x;
        check_arc_length("wrap circumference", sampled_width, spec.wrap_circumference())?;

        let long_edges = long_edge_lengths(&outline, min_x, max_x)?;
        let analytic_edge = developed_ring_length(
            spec.centerline_radius(),
            spec.wrap_radius(),
            spec.segment_angle(),
        );
        for sampled in long_edges {
            check_arc_length("developed long edge", sampled, analytic_edge)?;
        }

        // Scale x so the printed width is the exact circumference; y is
        // arc-exact by construction. Shift into the first quadrant.
        let scale = spec.wrap_circumference() / sampled_width;
        for p in &mut outline {
            p.0 = (p.0 - min_x) * scale;
            p.1 -= min_y;
        }
        let height = max_y - min_y;

        let fishmouth = outline.clone();
        let outline = extend_tails(outline, spec.wrap_circumference(), spec.tail_overlap);
        let outline = canonicalize(outline);

        if let Some((a, b)) = first_self_intersection(&outline) {
            return Err(TemplateError::UnwrapFailure(format!(
                "flattened boundary self-intersects between segments {a} and {b}"
            )));
        }

        let width = spec.wrap_circumference() + spec.tail_overlap;
        let reference_points = reference_outline(&fishmouth, spec, width, height);

        Ok(FlatBoundary { points: outline, reference_points, width, height })
    }
}

/// Analytic length of one developed cross-section ring edge, by numeric
/// integration of `r·√(1 + (α·sin θ / 2)²)` over a full turn.
pub fn developed_ring_length(centerline_radius: Real, wrap_radius: Real, segment_angle: Real) -> Real {
    let _ = centerline_radius; // the ring curve's length is independent of it
    let steps = 4096;
    let h = TAU / steps as Real;
    let mut sum = 0.0;
    for i in 0..steps {
        let theta = (i as Real + 0.5) * h;
        let slope = segment_angle * theta.sin() / 2.0;
        sum += (1.0 + slope * slope).sqrt();
    }
    wrap_radius * sum * h
}

fn check_arc_length(edge: &'static str, sampled: Real, analytic: Real) -> Result<(), TemplateError> {
    let deviation = (sampled - analytic).abs() / analytic;
    if deviation > ARC_LENGTH_TOLERANCE {
        return Err(TemplateError::ToleranceExceeded {
            edge,
            sampled,
            analytic,
            deviation: deviation * 100.0,
            limit: ARC_LENGTH_TOLERANCE * 100.0,
        });
    }
    Ok(())
}

type PointKey = (u64, u64);

fn point_key(p: &Point2<Real>) -> PointKey {
    (p.x.to_bits(), p.y.to_bits())
}

/// Walk the flattened mesh's border edges (edges bordering exactly one
/// face) and chain them into a single closed loop.
fn extract_border_loop(flat: &FlatMesh) -> Result<Vec<(Real, Real)>, TemplateError> {
    // Corner coordinates are produced by one shared formula, so shared
    // edges compare bit-exact; the seam duplicates differ and stay borders.
    let mut edge_count: HashMap<(PointKey, PointKey), (u32, Point2<Real>, Point2<Real>)> =
        HashMap::new();
    for face in &flat.faces {
        for i in 0..4 {
            let a = face[i];
            let b = face[(i + 1) % 4];
            let (ka, kb) = (point_key(&a), point_key(&b));
            let key = if ka <= kb { (ka, kb) } else { (kb, ka) };
            edge_count
                .entry(key)
                .and_modify(|e| e.0 += 1)
                .or_insert((1, a, b));
        }
    }

    let mut adjacency: HashMap<PointKey, Vec<Point2<Real>>> = HashMap::new();
    let mut border_edges = 0usize;
    for (count, a, b) in edge_count.into_values() {
        if count == 1 {
            adjacency.entry(point_key(&a)).or_default().push(b);
            adjacency.entry(point_key(&b)).or_default().push(a);
            border_edges += 1;
        }
    }

    let Some((&start_key, start_neighbors)) = adjacency.iter().next() else {
        return Err(TemplateError::UnwrapFailure("flattened band has no border".into()));
    };
    if start_neighbors.len() != 2 {
        return Err(TemplateError::UnwrapFailure(
            "border vertex does not have exactly two border edges".into(),
        ));
    }
    let start = Point2::new(Real::from_bits(start_key.0), Real::from_bits(start_key.1));

    let mut outline = vec![(start.x, start.y)];
    let mut previous_key = start_key;
    let mut current = start_neighbors[0];
    loop {
        let current_key = point_key(&current);
        if current_key == start_key {
            break;
        }
        outline.push((current.x, current.y));
        let neighbors = adjacency.get(&current_key).ok_or_else(|| {
            TemplateError::UnwrapFailure("border chain escaped the border set".into())
        })?;
        if neighbors.len() != 2 {
            return Err(TemplateError::UnwrapFailure(
                "border vertex does not have exactly two border edges".into(),
            ));
        }
        let next = if point_key(&neighbors[0]) == previous_key {
            neighbors[1]
        } else {
            neighbors[0]
        };
        previous_key = current_key;
        current = next;
    }

    if outline.len() != border_edges {
        return Err(TemplateError::UnwrapFailure(format!(
            "boundary is not a single closed loop ({} of {} border edges chained)",
            outline.len(),
            border_edges
        )));
    }
    Ok(outline)
}

fn bounds(points: &[(Real, Real)]) -> (Real, Real, Real, Real) {
    let mut min_x = Real::MAX;
    let mut min_y = Real::MAX;
    let mut max_x = -Real::MAX;
    let mut max_y = -Real::MAX;
    for &(x, y) in points {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    (min_x, min_y, max_x, max_y)
}

/// Polyline length of each long (cross-section ring) edge: the two runs of
/// the loop strictly between the seam edges at `min_x` and `max_x`.
fn long_edge_lengths(
    outline: &[(Real, Real)],
    min_x: Real,
    max_x: Real,
) -> Result<[Real; 2], TemplateError> {
    let eps = (max_x - min_x) * 1e-9;
    let on_seam = |x: Real| (x - min_x).abs() < eps || (x - max_x).abs() < eps;

    // Rotate so index 0 lies on a seam edge, then measure the two runs
    // between seam visits (each run includes its seam endpoints).
    let n = outline.len();
    let Some(first_seam) = (0..n).find(|&i| on_seam(outline[i].0)) else {
        return Err(TemplateError::UnwrapFailure("seam edges missing from boundary".into()));
    };
    let at = |i: usize| outline[(first_seam + i) % n];

    let mut lengths = Vec::new();
    let mut run = 0.0;
    let mut in_run = false;
    for i in 0..n {
        let (ax, ay) = at(i);
        let (bx, by) = at((i + 1) % n);
        let segment = (bx - ax).hypot(by - ay);
        let crossing = on_seam(ax) != on_seam(bx);
        if on_seam(ax) && on_seam(bx) {
            continue; // seam edge itself
        }
        run += segment;
        if crossing && on_seam(bx) {
            lengths.push(run);
            run = 0.0;
            in_run = false;
        } else {
            in_run = true;
        }
    }
    if in_run || lengths.len() != 2 {
        return Err(TemplateError::UnwrapFailure(format!(
            "expected two long developed edges, found {}",
            lengths.len()
        )));
    }
    Ok([lengths[0], lengths[1]])
}

/// Extend the two short (tail) edges outward by half the overlap each,
/// preserving the long-edge shape exactly. The seam-edge vertices move to
/// the extended tail; the long edges continue horizontally at their end
/// heights.
fn extend_tails(outline: Vec<(Real, Real)>, circumference: Real, overlap: Real) -> Vec<(Real, Real)> {
    if overlap <= 0.0 {
        return outline;
    }
    let half = overlap / 2.0;
    let eps = circumference * 1e-9;
    let n = outline.len();

    // Start scanning from a point strictly between the seams so a seam run
    // never wraps around the vector end.
    let interior = (0..n)
        .find(|&i| outline[i].0 > eps && outline[i].0 < circumference - eps)
        .unwrap_or(0);

    let mut extended = Vec::with_capacity(n + 4);
    let mut i = 0;
    while i < n {
        let (x, y) = outline[(interior + i) % n];
        let seam_x = if x.abs() < eps {
            Some(0.0)
        } else if (x - circumference).abs() < eps {
            Some(circumference)
        } else {
            None
        };
        match seam_x {
            None => {
                extended.push((x + half, y));
                i += 1;
            }
            Some(seam) => {
                // Collect the whole seam run, emit entry corner, the run
                // shifted onto the extended tail, then the exit corner.
                let tail_x = if seam == 0.0 { 0.0 } else { circumference + overlap };
                let corner_x = seam + half;
                extended.push((corner_x, y));
                while i < n {
                    let (rx, ry) = outline[(interior + i) % n];
                    if (rx - seam).abs() < eps {
                        extended.push((tail_x, ry));
                        i += 1;
                    } else {
                        break;
                    }
                }
                let (_, last_y) = *extended.last().unwrap_or(&(corner_x, y));
                extended.push((corner_x, last_y));
            }
        }
    }
    extended
}

/// Counter-clockwise orientation, first vertex at the seam tail corner
/// (minimum x, then minimum y).
fn canonicalize(mut outline: Vec<(Real, Real)>) -> Vec<(Real, Real)> {
    if signed_area(&outline) < 0.0 {
        outline.reverse();
    }
    let start = outline
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (a.0, a.1)
                .partial_cmp(&(b.0, b.1))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0);
    outline.rotate_left(start);
    outline
}

/// Shoelace signed area of a closed (implicitly) polygon.
pub fn signed_area(points: &[(Real, Real)]) -> Real {
    let n = points.len();
    let mut area = 0.0;
    for i in 0..n {
        let (x1, y1) = points[i];
        let (x2, y2) = points[(i + 1) % n];
        area += x1 * y2 - x2 * y1;
    }
    area / 2.0
}

/// The bare-pipe outline: the fishmouth shape normalized to its bounding
/// box, scaled to the base flat size and centered inside the wrap boundary.
fn reference_outline(
    fishmouth: &[(Real, Real)],
    spec: &PipeSpec,
    width: Real,
    height: Real,
) -> Vec<(Real, Real)> {
    let (base_w, base_h) = spec.base_flat_size();
    let (min_x, min_y, max_x, max_y) = bounds(fishmouth);
    let span_x = (max_x - min_x).max(Real::EPSILON);
    let span_y = (max_y - min_y).max(Real::EPSILON);
    let offset_x = (width - base_w) / 2.0;
    let offset_y = (height - base_h) / 2.0;
    fishmouth
        .iter()
        .map(|&(x, y)| {
            (
                offset_x + (x - min_x) / span_x * base_w,
                offset_y + (y - min_y) / span_y * base_h,
            )
        })
        .collect()
}

/// Index pair of the first two non-adjacent segments that intersect, if any.
fn first_self_intersection(points: &[(Real, Real)]) -> Option<(usize, usize)> {
    let n = points.len();
    for i in 0..n {
        for j in i + 1..n {
            // Skip adjacent segments (shared endpoint) including the wrap pair.
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let a = points[i];
            let b = points[(i + 1) % n];
            let c = points[j];
            let d = points[(j + 1) % n];
            if segments_intersect(a, b, c, d) {
                return Some((i, j));
            }
        }
    }
    None
}

fn cross(o: (Real, Real), a: (Real, Real), b: (Real, Real)) -> Real {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

fn on_segment(a: (Real, Real), b: (Real, Real), p: (Real, Real), eps: Real) -> bool {
    p.0 >= a.0.min(b.0) - eps
        && p.0 <= a.0.max(b.0) + eps
        && p.1 >= a.1.min(b.1) - eps
        && p.1 <= a.1.max(b.1) + eps
}

/// Segment intersection including touching and collinear overlap; used only
/// between non-adjacent boundary segments, where any contact makes the
/// polygon non-simple.
fn segments_intersect(a: (Real, Real), b: (Real, Real), c: (Real, Real), d: (Real, Real)) -> bool {
    let eps = crate::float_types::tolerance();
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);

    if ((d1 > eps && d2 < -eps) || (d1 < -eps && d2 > eps))
        && ((d3 > eps && d4 < -eps) || (d3 < -eps && d4 > eps))
    {
        return true;
    }
    (d1.abs() <= eps && on_segment(c, d, a, eps))
        || (d2.abs() <= eps && on_segment(c, d, b, eps))
        || (d3.abs() <= eps && on_segment(a, b, c, eps))
        || (d4.abs() <= eps && on_segment(a, b, d, eps))
}

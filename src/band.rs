//! Curved-band surface sampling.
//!
//! The wrap material around one bend segment forms a torus-segment band at
//! the wrap radius. [`BandSampler`] is the seam to the surface-sampling
//! collaborator; [`ParametricBand`] is the built-in implementation that
//! sweeps circular cross-sections along the bend centerline.

use crate::errors::TemplateError;
use crate::float_types::{FRAC_PI_2, Real, TAU};
use crate::spec::PipeSpec;
use nalgebra::Point3;

/// Seam detection tolerance for the ground plane (z ≈ 0), millimetres.
const SEAM_Z_TOLERANCE: Real = 0.5;
/// Seam detection tolerance around the minimum radius, millimetres.
const SEAM_RADIUS_TOLERANCE: Real = 1.0;

/// A watertight triangulated band surface (stored as quads) with a
/// designated seam along the minimum-radius edge.
#[derive(Debug, Clone)]
pub struct BandMesh {
    /// Vertex positions, ring-major: index = ring · ring_len + j.
    pub vertices: Vec<Point3<Real>>,
    /// Quad faces, radially closed around each pair of adjacent rings.
    pub faces: Vec<[usize; 4]>,
    /// Number of cross-section rings along the bend.
    pub rings: usize,
    /// Vertices per cross-section ring.
    pub ring_len: usize,
    /// Vertex indices along the seam (minimum-radius edge), one per ring,
    /// in ring order.
    pub seam: Vec<usize>,
}

impl BandMesh {
    /// The radial column index shared by all seam vertices.
    pub fn seam_column(&self) -> usize {
        self.seam[0] % self.ring_len
    }
}

/// Produces the 3D band surface for a spec. The core treats any violation
/// of the watertight-band-with-identifiable-seam guarantee as
/// [`TemplateError::UnwrapFailure`].
pub trait BandSampler {
    fn sample(&self, spec: &PipeSpec) -> Result<BandMesh, TemplateError>;
}

/// Parametric torus-segment sampler.
///
/// A point at bend angle φ and cross-section angle θ sits at distance
/// `centerline_radius + wrap_radius·cos θ` from the bend's rotation axis,
/// with `z = wrap_radius·sin θ`. The seam is not assumed from the
/// construction: it is re-detected as the z ≈ 0 edge at minimum distance
/// from the axis, where curvature (and therefore flattening shear) is
/// locally smallest.
#[derive(Debug, Clone, Default)]
pub struct ParametricBand;

/// Sampling resolution for one segment sweeping `segment_angle` radians.
///
/// The base 13×32 matches a 90°-class segment; wider sweeps are sampled
/// finer in both directions so the chord-length development stays within
/// the arc-length tolerance gate.
pub(crate) fn resolutions(segment_angle: Real) -> (usize, usize) {
    let f = (segment_angle / FRAC_PI_2).max(1.0);
    let rings = ((12.0 * f).ceil() as usize).clamp(12, 96) + 1;
    let ring_len = ((32.0 * f).ceil() as usize).div_ceil(8) * 8;
    (rings, ring_len.clamp(32, 128))
}

impl BandSampler for ParametricBand {
    fn sample(&self, spec: &PipeSpec) -> Result<BandMesh, TemplateError> {
        let wrap_radius = spec.wrap_radius();
        let centerline_radius = spec.centerline_radius();
        let alpha = spec.segment_angle();
        let (rings, ring_len) = resolutions(alpha);

        let mut vertices = Vec::with_capacity(rings * ring_len);
        for i in 0..rings {
            let phi = alpha * i as Real / (rings - 1) as Real;
            let (sin_phi, cos_phi) = phi.sin_cos();
            for j in 0..ring_len {
                let theta = TAU * j as Real / ring_len as Real;
                let radial = centerline_radius + wrap_radius * theta.cos();
                vertices.push(Point3::new(
                    radial * cos_phi,
                    radial * sin_phi,
                    wrap_radius * theta.sin(),
                ));
            }
        }

        let mut faces = Vec::with_capacity((rings - 1) * ring_len);
        for i in 0..rings - 1 {
            for j in 0..ring_len {
                let next_j = (j + 1) % ring_len;
                faces.push([
                    i * ring_len + j,
                    i * ring_len + next_j,
                    (i + 1) * ring_len + next_j,
                    (i + 1) * ring_len + j,
                ]);
            }
        }

        let seam = find_seam(&vertices, rings, ring_len)?;

        Ok(BandMesh { vertices, faces, rings, ring_len, seam })
    }
}

/// Locate the seam: the edge of vertices on the ground plane at minimum
/// distance from the bend's rotation axis (the inside of the bend).
fn find_seam(
    vertices: &[Point3<Real>],
    rings: usize,
    ring_len: usize,
) -> Result<Vec<usize>, TemplateError> {
    let mut min_radius = Real::MAX;
    for v in vertices {
        let radius = v.x.hypot(v.y);
        if radius < min_radius {
            min_radius = radius;
        }
    }

    // One seam vertex per ring: the ground-plane vertex closest to the
    // axis. At fine sampling several columns can sit inside the tolerances,
    // so the minimum-radius candidate wins.
    let mut seam = Vec::with_capacity(rings);
    for ring in 0..rings {
        let mut best: Option<(usize, Real)> = None;
        for column in 0..ring_len {
            let v = &vertices[ring * ring_len + column];
            let radius = v.x.hypot(v.y);
            if v.z.abs() < SEAM_Z_TOLERANCE && (radius - min_radius).abs() < SEAM_RADIUS_TOLERANCE
            {
                match best {
                    Some((_, r)) if r <= radius => {}
                    _ => best = Some((column, radius)),
                }
            }
        }
        let Some((column, _)) = best else {
            return Err(TemplateError::UnwrapFailure(format!(
                "ring {ring} has no vertex on the minimum-radius seam"
            )));
        };
        seam.push(ring * ring_len + column);
    }

    let column = seam[0] % ring_len;
    if seam.iter().any(|&index| index % ring_len != column) {
        return Err(TemplateError::UnwrapFailure(
            "minimum-radius seam is not a contiguous edge".into(),
        ));
    }

    Ok(seam)
}

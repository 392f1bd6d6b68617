//! Pipe bend specification and derived dimensions.
//!
//! `PipeSpec` is the sole input to a generation request. It is immutable
//! once constructed; everything downstream (band mesh, flat boundary,
//! layout plan) is derived from it and owned by its stage.

use crate::errors::TemplateError;
use crate::float_types::{PI, Real, TAU, tolerance};

/// Parametric description of one segment of a bent, wrapped pipe.
///
/// All lengths are millimetres, angles degrees. Ranges mirror the input
/// form; [`PipeSpec::validate`] re-checks them as defense in depth.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeSpec {
    /// Pipe outer diameter, 10–500 mm.
    pub outer_diameter: Real,
    /// Bend centerline radius as a multiple of the diameter, 0.5–10.
    pub bend_radius_factor: Real,
    /// Total bend angle in degrees, (0, 360].
    pub bend_angle_deg: Real,
    /// Number of segments the bend is split into, 1–20.
    pub segment_count: u32,
    /// Wrap material thickness, 0.1–50 mm.
    pub wrap_thickness: Real,
    /// Overlap added at the seam tails, 0–50 mm.
    pub tail_overlap: Real,
}

impl Default for PipeSpec {
    /// 3" pipe, 1.5D mandrel bend, 90° in five segments, fiberglass +
    /// stainless wrap.
    fn default() -> Self {
        PipeSpec {
            outer_diameter: 76.2,
            bend_radius_factor: 1.5,
            bend_angle_deg: 90.0,
            segment_count: 5,
            wrap_thickness: 6.15,
            tail_overlap: 10.0,
        }
    }
}

fn check_range(name: &str, value: Real, min: Real, max: Real) -> Result<(), TemplateError> {
    if !value.is_finite() || value < min || value > max {
        return Err(TemplateError::InvalidSpecification(format!(
            "{name} = {value} outside [{min}, {max}]"
        )));
    }
    Ok(())
}

impl PipeSpec {
    /// Check every field against its declared range.
    ///
    /// The input form range-checks too, but the core never trusts it: a
    /// violated range or a numerically degenerate per-segment angle is
    /// [`TemplateError::InvalidSpecification`].
    pub fn validate(&self) -> Result<(), TemplateError> {
        check_range("outer diameter", self.outer_diameter, 10.0, 500.0)?;
        check_range("bend radius factor", self.bend_radius_factor, 0.5, 10.0)?;
        check_range("wrap thickness", self.wrap_thickness, 0.1, 50.0)?;
        check_range("tail overlap", self.tail_overlap, 0.0, 50.0)?;
        if !self.bend_angle_deg.is_finite()
            || self.bend_angle_deg <= 0.0
            || self.bend_angle_deg > 360.0
        {
            return Err(TemplateError::InvalidSpecification(format!(
                "bend angle = {} outside (0, 360]",
                self.bend_angle_deg
            )));
        }
        if self.segment_count < 1 || self.segment_count > 20 {
            return Err(TemplateError::InvalidSpecification(format!(
                "segment count = {} outside [1, 20]",
                self.segment_count
            )));
        }
        if self.segment_angle() < tolerance() {
            return Err(TemplateError::InvalidSpecification(format!(
                "per-segment angle {}° is numerically degenerate",
                self.angle_per_segment_deg()
            )));
        }
        Ok(())
    }

    /// Bare pipe radius, OD/2.
    #[inline]
    pub fn pipe_radius(&self) -> Real {
        self.outer_diameter / 2.0
    }

    /// Radius of the wrap surface: pipe radius plus wrap thickness.
    #[inline]
    pub fn wrap_radius(&self) -> Real {
        self.pipe_radius() + self.wrap_thickness
    }

    /// Bend centerline radius, OD × factor.
    #[inline]
    pub fn centerline_radius(&self) -> Real {
        self.outer_diameter * self.bend_radius_factor
    }

    /// Bend angle covered by one segment, degrees.
    #[inline]
    pub fn angle_per_segment_deg(&self) -> Real {
        self.bend_angle_deg / self.segment_count as Real
    }

    /// Bend angle covered by one segment, radians.
    #[inline]
    pub fn segment_angle(&self) -> Real {
        self.angle_per_segment_deg().to_radians()
    }

    /// Circumference of the bare pipe, π·OD.
    #[inline]
    pub fn pipe_circumference(&self) -> Real {
        PI * self.outer_diameter
    }

    /// Circumference of the wrap surface, 2π·wrap radius.
    #[inline]
    pub fn wrap_circumference(&self) -> Real {
        TAU * self.wrap_radius()
    }

    /// Flat size of the bare-pipe reference outline: circumference by the
    /// centerline arc of one segment. Drawn nested in blue inside the wrap
    /// boundary.
    pub fn base_flat_size(&self) -> (Real, Real) {
        (
            self.pipe_circumference(),
            self.centerline_radius() * self.segment_angle(),
        )
    }

    /// Bounding size of the wrap cutting boundary: circumference plus tail
    /// overlap, by the developed height at the outside of the bend.
    pub fn wrap_flat_size(&self) -> (Real, Real) {
        (
            self.wrap_circumference() + self.tail_overlap,
            (self.centerline_radius() + self.wrap_radius()) * self.segment_angle(),
        )
    }

    /// Output file name carrying the defining parameters, e.g.
    /// `exhaust_wrap_OD76.2_CLR1.5_S5_O10.0_MT6.15.pdf`.
    pub fn file_name(&self) -> String {
        format!(
            "exhaust_wrap_OD{:.1}_CLR{:.1}_S{}_O{:.1}_MT{:.2}.pdf",
            self.outer_diameter,
            self.bend_radius_factor,
            self.segment_count,
            self.tail_overlap,
            self.wrap_thickness,
        )
    }
}

//! Template generation errors
//!
//! Every pipeline stage fails fast and propagates upward unmodified; no
//! stage substitutes default geometry or a degraded layout, and nothing is
//! retried (all failures are deterministic for a given input).

use crate::float_types::Real;
use std::path::PathBuf;

/// All the ways a template generation request can fail.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A pipe specification field is outside its declared range, or the
    /// derived per-segment angle is numerically degenerate. Reported to the
    /// user; no file is written.
    #[error("invalid specification: {0}")]
    InvalidSpecification(String),

    /// The band sampler or flatten oracle returned unusable geometry: no
    /// identifiable minimum-radius seam, a boundary that is not a single
    /// closed loop, fewer than 4 vertices, or a self-intersection.
    #[error("unwrap failure: {0}")]
    UnwrapFailure(String),

    /// The sampled flat-pattern edge deviates from its analytic arc length
    /// beyond the allowed relative tolerance. Signals insufficient sampling
    /// resolution; a warped template is never shipped silently.
    #[error(
        "arc length tolerance exceeded on {edge}: sampled {sampled:.3}mm vs analytic {analytic:.3}mm ({deviation:.3}% > {limit:.3}%)"
    )]
    ToleranceExceeded {
        edge: &'static str,
        sampled: Real,
        analytic: Real,
        deviation: Real,
        limit: Real,
    },

    /// The boundary cannot be placed on the configured sheets even after
    /// splitting. Unreachable for practical inputs; kept as a detectable,
    /// reported failure rather than a silent degraded layout.
    #[error("layout unsatisfiable: {0}")]
    LayoutUnsatisfiable(String),

    /// Destination directory or file is unwritable.
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TemplateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TemplateError::Io { path: path.into(), source }
    }
}

//! Flat pattern cutting templates for exhaust-wrapped pipe bends.
//!
//! A bent pipe is fabricated from mitered segments; wrapping each segment
//! in insulating material needs a flat piece of wrap whose outline, when
//! rolled around the bend, covers the segment exactly. This crate samples
//! the wrap surface of one segment as a torus band, develops it onto the
//! plane cut at the inside-of-bend seam, validates the result against the
//! analytic arc lengths, and lays the outline out on A4 pages as a
//! print-at-100%-scale PDF, splitting across pages with taped overlap
//! zones when the pattern is larger than one sheet.
//!
//! ```no_run
//! use pipeflat::{PipeSpec, generate};
//!
//! let spec = PipeSpec::default();
//! let path = generate(&spec, std::path::Path::new("out"))?;
//! # Ok::<(), pipeflat::TemplateError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::dbg_macro, clippy::todo)]

pub mod band;
pub mod errors;
pub mod float_types;
pub mod io;
pub mod layout;
pub mod render;
pub mod spec;
pub mod template;
pub mod unwrap;

pub use errors::TemplateError;
pub use layout::{LayoutMode, LayoutPlan, SheetConfig};
pub use spec::PipeSpec;
pub use template::{generate, generate_on};
pub use unwrap::FlatBoundary;

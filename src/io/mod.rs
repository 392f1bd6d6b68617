//! Output backends.

pub mod pdf;

pub use pdf::PdfCanvas;

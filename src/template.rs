//! End-to-end template generation.

use crate::errors::TemplateError;
use crate::float_types::mm_to_pt;
use crate::io::PdfCanvas;
use crate::layout::{LayoutPlan, SheetConfig};
use crate::render::PageRenderer;
use crate::spec::PipeSpec;
use crate::unwrap::FlatBoundary;
use std::fs;
use std::path::{Path, PathBuf};

/// Run the whole pipeline for one spec and write the PDF into `out_dir`,
/// returning the path of the written file.
///
/// Stages run strictly in order and any failure aborts before the file is
/// touched: validate, derive the flat boundary, plan the layout, render,
/// save.
pub fn generate(spec: &PipeSpec, out_dir: &Path) -> Result<PathBuf, TemplateError> {
    let sheet = SheetConfig::default();
    generate_on(spec, &sheet, out_dir)
}

/// [`generate`] with an explicit sheet configuration.
pub fn generate_on(
    spec: &PipeSpec,
    sheet: &SheetConfig,
    out_dir: &Path,
) -> Result<PathBuf, TemplateError> {
    spec.validate()?;
    let boundary = FlatBoundary::from_spec(spec)?;
    let plan = LayoutPlan::plan(boundary.width, boundary.height, sheet)?;

    let mut canvas = PdfCanvas::new(mm_to_pt(sheet.page_width), mm_to_pt(sheet.page_height));
    PageRenderer::new(spec, &boundary, &plan, sheet).render(&mut canvas);

    fs::create_dir_all(out_dir).map_err(|e| TemplateError::io(out_dir, e))?;
    let path = out_dir.join(spec.file_name());
    canvas.save(&path)?;
    Ok(path)
}

//! PDF canvas backend.
//!
//! Buffers one content stream per page and assembles the document on
//! [`PdfCanvas::save`]. Text uses the built-in Type1 Helvetica faces with
//! WinAnsi encoding, so no font data is embedded and the files stay small.
//! The finished document is written to a temporary file and renamed into
//! place; a failed save never leaves a partial PDF behind.

use crate::errors::TemplateError;
use crate::float_types::Real;
use crate::render::{Canvas, Color, FontKind, Stroke, TextAlign};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};
use std::fs;
use std::path::Path;

const REGULAR_FONT: Name<'static> = Name(b"F1");
const BOLD_FONT: Name<'static> = Name(b"F2");

/// A buffering [`Canvas`] that renders to a multi-page PDF document.
pub struct PdfCanvas {
    /// Page size in points.
    width: Real,
    height: Real,
    pages: Vec<Content>,
}

impl PdfCanvas {
    /// A document of pages of the given size, in points.
    pub fn new(width: Real, height: Real) -> Self {
        PdfCanvas { width, height, pages: Vec::new() }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn content(&mut self) -> &mut Content {
        if self.pages.is_empty() {
            self.pages.push(Content::new());
        }
        // Non-empty by the guard above.
        self.pages.last_mut().unwrap()
    }

    /// Assemble the document and write it atomically.
    pub fn save(self, path: &Path) -> Result<(), TemplateError> {
        let mut pdf = Pdf::new();
        let mut next_ref = 1;
        let mut alloc = || {
            let id = Ref::new(next_ref);
            next_ref += 1;
            id
        };

        let catalog_id = alloc();
        let page_tree_id = alloc();
        let regular_font_id = alloc();
        let bold_font_id = alloc();
        let page_ids: Vec<Ref> = self.pages.iter().map(|_| alloc()).collect();
        let content_ids: Vec<Ref> = self.pages.iter().map(|_| alloc()).collect();

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        for (font_id, base) in [
            (regular_font_id, "Helvetica"),
            (bold_font_id, "Helvetica-Bold"),
        ] {
            pdf.type1_font(font_id)
                .base_font(Name(base.as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        let media_box = Rect::new(0.0, 0.0, self.width as f32, self.height as f32);
        for ((&page_id, &content_id), content) in
            page_ids.iter().zip(&content_ids).zip(self.pages)
        {
            let mut page = pdf.page(page_id);
            page.media_box(media_box);
            page.parent(page_tree_id);
            page.contents(content_id);
            page.resources()
                .fonts()
                .pair(REGULAR_FONT, regular_font_id)
                .pair(BOLD_FONT, bold_font_id);
            page.finish();
            pdf.stream(content_id, &content.finish());
        }

        let bytes = pdf.finish();
        let tmp = path.with_extension("pdf.tmp");
        fs::write(&tmp, bytes).map_err(|e| TemplateError::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| TemplateError::io(path, e))?;
        Ok(())
    }
}

impl Canvas for PdfCanvas {
    fn new_page(&mut self) {
        self.pages.push(Content::new());
    }

    fn polyline(&mut self, points: &[(Real, Real)], stroke: Stroke, close: bool) {
        if points.len() < 2 {
            return;
        }
        let content = self.content();
        apply_stroke(content, stroke);
        content.move_to(points[0].0 as f32, points[0].1 as f32);
        for &(x, y) in &points[1..] {
            content.line_to(x as f32, y as f32);
        }
        if close {
            content.close_path();
        }
        content.stroke();
    }

    fn line(&mut self, a: (Real, Real), b: (Real, Real), stroke: Stroke) {
        let content = self.content();
        apply_stroke(content, stroke);
        content.move_to(a.0 as f32, a.1 as f32);
        content.line_to(b.0 as f32, b.1 as f32);
        content.stroke();
    }

    fn dashed_line(&mut self, a: (Real, Real), b: (Real, Real), stroke: Stroke, dash: Real) {
        let content = self.content();
        apply_stroke(content, stroke);
        content.set_dash_pattern([dash as f32], 0.0);
        content.move_to(a.0 as f32, a.1 as f32);
        content.line_to(b.0 as f32, b.1 as f32);
        content.stroke();
        content.set_dash_pattern([], 0.0);
    }

    fn rect(&mut self, x: Real, y: Real, w: Real, h: Real, stroke: Stroke, fill: Option<Color>) {
        let content = self.content();
        if let Some(fill) = fill {
            content.set_fill_rgb(fill.r, fill.g, fill.b);
            content.rect(x as f32, y as f32, w as f32, h as f32);
            content.fill_nonzero();
        }
        apply_stroke(content, stroke);
        content.rect(x as f32, y as f32, w as f32, h as f32);
        content.stroke();
    }

    fn text(
        &mut self,
        text: &str,
        x: Real,
        y: Real,
        size: Real,
        font: FontKind,
        color: Color,
        align: TextAlign,
    ) {
        let encoded = encode_win_ansi(text);
        let x = match align {
            TextAlign::Near => x,
            TextAlign::Center => x - text_width(&encoded, size, font) / 2.0,
        };
        let name = match font {
            FontKind::Regular => REGULAR_FONT,
            FontKind::Bold => BOLD_FONT,
        };
        let content = self.content();
        content.set_fill_rgb(color.r, color.g, color.b);
        content.begin_text();
        content.set_font(name, size as f32);
        content.next_line(x as f32, y as f32);
        content.show(Str(&encoded));
        content.end_text();
    }
}

fn apply_stroke(content: &mut Content, stroke: Stroke) {
    content.set_line_width(stroke.width as f32);
    content.set_stroke_rgb(stroke.color.r, stroke.color.g, stroke.color.b);
}

/// Map text to WinAnsi bytes. The handful of non-ASCII characters the
/// renderer emits have WinAnsi code points except the left arrow, which
/// degrades to `<-`; anything else unexpected becomes `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '°' => bytes.push(0xB0),
            '×' => bytes.push(0xD7),
            '÷' => bytes.push(0xF7),
            '—' => bytes.push(0x97),
            '←' => bytes.extend_from_slice(b"<-"),
            c if c.is_ascii() => bytes.push(c as u8),
            _ => bytes.push(b'?'),
        }
    }
    bytes
}

/// Approximate advance width of encoded Helvetica text, points. Only used
/// to center text runs, so a few percent of error is invisible.
fn text_width(encoded: &[u8], size: Real, font: FontKind) -> Real {
    let mut units = 0.0;
    for &b in encoded {
        units += match b {
            b'i' | b'j' | b'l' | b'.' | b',' | b'\'' | b'|' | b':' => 0.26,
            b' ' | b'f' | b't' | b'r' | b'(' | b')' | b'-' | b'/' => 0.36,
            b'm' | b'M' | b'W' | b'w' => 0.86,
            b if b.is_ascii_uppercase() || b.is_ascii_digit() => 0.67,
            _ => 0.52,
        };
    }
    let weight = match font {
        FontKind::Regular => 1.0,
        FontKind::Bold => 1.05,
    };
    units * size * weight
}

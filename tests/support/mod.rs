//! Shared test helpers.

#![allow(dead_code)]

use pipeflat::render::{Canvas, Color, FontKind, Stroke, TextAlign};

pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() < eps
}

/// Relative comparison against `expected` (which must be nonzero).
pub fn approx_eq_rel(actual: f64, expected: f64, rel: f64) -> bool {
    (actual - expected).abs() / expected.abs() < rel
}

pub fn bounds(points: &[(f64, f64)]) -> (f64, f64, f64, f64) {
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;
    for &(x, y) in points {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    (min_x, min_y, max_x, max_y)
}

/// One recorded drawing call.
#[derive(Debug, Clone)]
pub enum Draw {
    Polyline { points: Vec<(f64, f64)>, stroke: Stroke, close: bool },
    Line { a: (f64, f64), b: (f64, f64), stroke: Stroke },
    DashedLine { a: (f64, f64), b: (f64, f64), stroke: Stroke, dash: f64 },
    Rect { x: f64, y: f64, w: f64, h: f64, stroke: Stroke, fill: Option<Color> },
    Text { content: String, x: f64, y: f64, size: f64, font: FontKind, align: TextAlign },
}

/// A canvas that records calls per page for assertions.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub pages: Vec<Vec<Draw>>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    fn page(&mut self) -> &mut Vec<Draw> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        self.pages.last_mut().unwrap()
    }

    pub fn texts(&self, page: usize) -> Vec<&str> {
        self.pages[page]
            .iter()
            .filter_map(|d| match d {
                Draw::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn rect_widths(&self, page: usize) -> Vec<f64> {
        self.pages[page]
            .iter()
            .filter_map(|d| match d {
                Draw::Rect { w, .. } => Some(*w),
                _ => None,
            })
            .collect()
    }

    pub fn polylines_with_color(&self, page: usize, color: Color) -> Vec<&Vec<(f64, f64)>> {
        self.pages[page]
            .iter()
            .filter_map(|d| match d {
                Draw::Polyline { points, stroke, .. } if stroke.color == color => Some(points),
                _ => None,
            })
            .collect()
    }

    pub fn dashed_count(&self, page: usize) -> usize {
        self.pages[page]
            .iter()
            .filter(|d| matches!(d, Draw::DashedLine { .. }))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn new_page(&mut self) {
        self.pages.push(Vec::new());
    }

    fn polyline(&mut self, points: &[(f64, f64)], stroke: Stroke, close: bool) {
        let points = points.to_vec();
        self.page().push(Draw::Polyline { points, stroke, close });
    }

    fn line(&mut self, a: (f64, f64), b: (f64, f64), stroke: Stroke) {
        self.page().push(Draw::Line { a, b, stroke });
    }

    fn dashed_line(&mut self, a: (f64, f64), b: (f64, f64), stroke: Stroke, dash: f64) {
        self.page().push(Draw::DashedLine { a, b, stroke, dash });
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, stroke: Stroke, fill: Option<Color>) {
        self.page().push(Draw::Rect { x, y, w, h, stroke, fill });
    }

    fn text(
        &mut self,
        content: &str,
        x: f64,
        y: f64,
        size: f64,
        font: FontKind,
        _color: Color,
        align: TextAlign,
    ) {
        let content = content.to_string();
        self.page().push(Draw::Text { content, x, y, size, font, align });
    }
}

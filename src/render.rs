//! Page rendering.
//!
//! [`PageRenderer`] turns a layout plan plus a flat boundary into drawing
//! calls against a [`Canvas`]. The canvas works in page-space points with
//! the origin at the bottom-left corner; every coordinate handed to it goes
//! through [`mm_to_pt`] so print accuracy hinges on exactly one constant.
//! The renderer never makes layout decisions, and the canvas never sees
//! template-space coordinates.

use crate::float_types::{Real, mm_to_pt};
use crate::layout::{
    ClipWindow, LayoutMode, LayoutPlan, OverlapZone, PagePlacement, Placement, SheetConfig,
    SplitAxis, clip_outline,
};
use crate::spec::PipeSpec;
use crate::unwrap::FlatBoundary;

/// RGB color, components in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    /// Pipe surface reference outline.
    pub const BLUE: Color = Color { r: 0.0, g: 0.0, b: 1.0 };
    /// Cutting boundary, #CC0000.
    pub const RED: Color = Color { r: 0.8, g: 0.0, b: 0.0 };
    /// Join centerlines, #00AA00.
    pub const GREEN: Color = Color { r: 0.0, g: 0.667, b: 0.0 };
    /// Overlap zones, #FFA500.
    pub const ORANGE: Color = Color { r: 1.0, g: 0.647, b: 0.0 };
    /// Secondary text and scale bar fill, #666666.
    pub const GRAY: Color = Color { r: 0.4, g: 0.4, b: 0.4 };
}

/// Stroke style; width in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: Real,
}

/// Reference outlines are thin, the cut line is the heaviest on the page.
pub const REFERENCE_STROKE: Stroke = Stroke { color: Color::BLUE, width: 1.0 };
pub const CUT_STROKE: Stroke = Stroke { color: Color::RED, width: 2.0 };
pub const CENTERLINE_STROKE: Stroke = Stroke { color: Color::GREEN, width: 1.0 };
pub const OVERLAP_STROKE: Stroke = Stroke { color: Color::ORANGE, width: 1.0 };
pub const SCALE_BAR_STROKE: Stroke = Stroke { color: Color::BLACK, width: 1.0 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKind {
    Regular,
    Bold,
}

/// Horizontal anchoring of a text run at its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Near,
    Center,
}

/// Drawing surface for one document. Coordinates are page-space points,
/// origin bottom-left. Implementations buffer; failures surface on save,
/// not per call.
pub trait Canvas {
    fn new_page(&mut self);
    fn polyline(&mut self, points: &[(Real, Real)], stroke: Stroke, close: bool);
    fn line(&mut self, a: (Real, Real), b: (Real, Real), stroke: Stroke);
    fn dashed_line(&mut self, a: (Real, Real), b: (Real, Real), stroke: Stroke, dash: Real);
    /// Rectangle by bottom-left corner and size, optionally filled.
    fn rect(&mut self, x: Real, y: Real, w: Real, h: Real, stroke: Stroke, fill: Option<Color>);
    fn text(
        &mut self,
        content: &str,
        x: Real,
        y: Real,
        size: Real,
        font: FontKind,
        color: Color,
        align: TextAlign,
    );
}

/// Renders every page of a layout plan for one spec onto a canvas.
pub struct PageRenderer<'a> {
    spec: &'a PipeSpec,
    boundary: &'a FlatBoundary,
    plan: &'a LayoutPlan,
    sheet: &'a SheetConfig,
}

impl<'a> PageRenderer<'a> {
    pub fn new(
        spec: &'a PipeSpec,
        boundary: &'a FlatBoundary,
        plan: &'a LayoutPlan,
        sheet: &'a SheetConfig,
    ) -> Self {
        PageRenderer { spec, boundary, plan, sheet }
    }

    pub fn render<C: Canvas>(&self, canvas: &mut C) {
        for page in &self.plan.pages {
            canvas.new_page();
            self.draw_header(canvas, page);
            for placement in &page.placements {
                self.draw_placement(canvas, placement);
            }
            self.draw_scale_bar(canvas, page.scale_bar_origin);
            self.draw_footer(canvas, page);
        }
    }

    fn draw_header<C: Canvas>(&self, canvas: &mut C, page: &PagePlacement) {
        let sheet = self.sheet;
        let center_x = mm_to_pt(sheet.page_width / 2.0);
        let mut y = sheet.page_height - sheet.margin - 6.0;

        canvas.text(
            "EXHAUST WRAP CUTTING TEMPLATE",
            center_x,
            mm_to_pt(y),
            16.0,
            FontKind::Bold,
            Color::BLACK,
            TextAlign::Center,
        );
        y -= 6.0;

        let spec = self.spec;
        let subtitle = format!(
            "OD {:.1}mm  |  CLR {:.1}D  |  {:.0}° in {} segments ({:.1}° each)  |  wrap {:.2}mm  |  overlap {:.1}mm",
            spec.outer_diameter,
            spec.bend_radius_factor,
            spec.bend_angle_deg,
            spec.segment_count,
            spec.angle_per_segment_deg(),
            spec.wrap_thickness,
            spec.tail_overlap,
        );
        canvas.text(
            &subtitle,
            center_x,
            mm_to_pt(y),
            9.0,
            FontKind::Regular,
            Color::BLACK,
            TextAlign::Center,
        );
        y -= 5.0;

        if self.plan.mode == LayoutMode::SplitPageCombined
            || self.plan.mode == LayoutMode::SplitPageSeparate
            || self.plan.page_count() > 1
        {
            canvas.text(
                "JOIN PAGES AT CENTERLINE (dashed green)",
                center_x,
                mm_to_pt(y),
                10.0,
                FontKind::Bold,
                Color::GREEN,
                TextAlign::Center,
            );
            y -= 5.0;
        }

        let (base_w, base_h) = spec.base_flat_size();
        let legend_x = mm_to_pt(sheet.margin);
        let mut legend_y = y;
        let legend = [
            (
                REFERENCE_STROKE,
                format!("Blue: pipe surface reference {base_w:.0}mm × {base_h:.0}mm"),
            ),
            (
                CUT_STROKE,
                format!(
                    "Red: wrap cut line {:.0}mm × {:.0}mm   Qty: {} pieces",
                    self.boundary.width, self.boundary.height, spec.segment_count,
                ),
            ),
        ];
        for (stroke, caption) in legend {
            canvas.line(
                (legend_x, mm_to_pt(legend_y + 1.0)),
                (legend_x + mm_to_pt(8.0), mm_to_pt(legend_y + 1.0)),
                stroke,
            );
            canvas.text(
                &caption,
                legend_x + mm_to_pt(10.0),
                mm_to_pt(legend_y),
                8.0,
                FontKind::Regular,
                Color::BLACK,
                TextAlign::Near,
            );
            legend_y -= 4.0;
        }

        let mut annotation_y = y;
        for annotation in &page.annotations {
            canvas.text(
                annotation,
                mm_to_pt(sheet.page_width - sheet.margin - 80.0),
                mm_to_pt(annotation_y),
                8.0,
                FontKind::Regular,
                Color::BLACK,
                TextAlign::Near,
            );
            annotation_y -= 4.0;
        }
    }

    fn draw_placement<C: Canvas>(&self, canvas: &mut C, placement: &Placement) {
        let window = &placement.window;
        let to_page = |(x, y): (Real, Real)| -> (Real, Real) {
            (
                mm_to_pt(placement.offset.0 + (x - window.x0)),
                mm_to_pt(placement.offset.1 + (y - window.y0)),
            )
        };

        for ring in clip_outline(&self.boundary.reference_points, window) {
            let page_points: Vec<(Real, Real)> = ring.iter().map(|&p| to_page(p)).collect();
            canvas.polyline(&page_points, REFERENCE_STROKE, true);
        }
        for ring in clip_outline(&self.boundary.points, window) {
            let page_points: Vec<(Real, Real)> = ring.iter().map(|&p| to_page(p)).collect();
            canvas.polyline(&page_points, CUT_STROKE, true);
        }

        for line in &placement.centerlines {
            let (a, b) = match line.axis {
                SplitAxis::Vertical => ((line.at, window.y0), (line.at, window.y1)),
                SplitAxis::Horizontal => ((window.x0, line.at), (window.x1, line.at)),
            };
            if !window_contains(window, a) {
                continue;
            }
            canvas.dashed_line(to_page(a), to_page(b), CENTERLINE_STROKE, mm_to_pt(3.0));
            let label_at = to_page(a);
            canvas.text(
                "CENTERLINE",
                label_at.0 + 2.0,
                label_at.1 + 2.0,
                7.0,
                FontKind::Regular,
                Color::GREEN,
                TextAlign::Near,
            );
        }

        for zone in &placement.overlaps {
            let Some(visible) = clip_zone(zone, window) else {
                continue;
            };
            let (x, y) = to_page((visible.x, visible.y));
            canvas.rect(
                x,
                y,
                mm_to_pt(visible.width),
                mm_to_pt(visible.height),
                OVERLAP_STROKE,
                None,
            );
            canvas.text(
                &format!("{:.0}mm overlap", self.sheet.split_overlap),
                x + mm_to_pt(visible.width / 2.0),
                y + mm_to_pt(visible.height / 2.0),
                7.0,
                FontKind::Regular,
                Color::ORANGE,
                TextAlign::Center,
            );
        }

        if let Some(label) = &placement.label {
            canvas.text(
                label,
                mm_to_pt(placement.offset.0),
                mm_to_pt(placement.offset.1 + window.height()) + 4.0,
                10.0,
                FontKind::Bold,
                Color::BLACK,
                TextAlign::Near,
            );
        }
    }

    /// The self-check every printed page carries: a bar whose drawn length
    /// is the true scale bar length, ticked at 0, half and full.
    fn draw_scale_bar<C: Canvas>(&self, canvas: &mut C, origin: (Real, Real)) {
        let length = self.sheet.scale_bar_length;
        let height = 10.0;
        let x = mm_to_pt(origin.0);
        let y = mm_to_pt(origin.1);
        let w = mm_to_pt(length);
        let h = mm_to_pt(height);

        // Left half filled so a washed-out print still shows the bar.
        canvas.rect(x, y, w / 2.0, h, SCALE_BAR_STROKE, Some(Color::GRAY));
        canvas.rect(x, y, w, h, SCALE_BAR_STROKE, None);
        for fraction in [0.0, 0.5, 1.0] {
            let tick_x = x + w * fraction;
            canvas.line((tick_x, y), (tick_x, y - mm_to_pt(2.0)), SCALE_BAR_STROKE);
        }
        for (fraction, label) in [(0.0, "0"), (0.5, "50mm"), (1.0, "100mm")] {
            canvas.text(
                label,
                x + w * fraction,
                y - mm_to_pt(5.5),
                7.0,
                FontKind::Regular,
                Color::BLACK,
                TextAlign::Center,
            );
        }
        canvas.text(
            "← MUST MEASURE 100mm EXACTLY",
            x + w + mm_to_pt(4.0),
            y + h / 2.0 - 3.0,
            9.0,
            FontKind::Bold,
            Color::RED,
            TextAlign::Near,
        );
    }

    fn draw_footer<C: Canvas>(&self, canvas: &mut C, page: &PagePlacement) {
        let sheet = self.sheet;
        let footer = format!(
            "{}  |  page {} of {}  |  Print at 100% scale (Actual Size), never Fit to Page",
            self.spec.file_name(),
            page.page_index + 1,
            self.plan.page_count(),
        );
        canvas.text(
            &footer,
            mm_to_pt(sheet.page_width / 2.0),
            mm_to_pt(sheet.margin),
            7.0,
            FontKind::Regular,
            Color::GRAY,
            TextAlign::Center,
        );
    }
}

fn window_contains(window: &ClipWindow, p: (Real, Real)) -> bool {
    p.0 >= window.x0 && p.0 <= window.x1 && p.1 >= window.y0 && p.1 <= window.y1
}

/// Visible part of an overlap zone inside a clip window, if any.
fn clip_zone(zone: &OverlapZone, window: &ClipWindow) -> Option<OverlapZone> {
    let x0 = zone.x.max(window.x0);
    let y0 = zone.y.max(window.y0);
    let x1 = (zone.x + zone.width).min(window.x1);
    let y1 = (zone.y + zone.height).min(window.y1);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(OverlapZone { x: x0, y: y0, width: x1 - x0, height: y1 - y0 })
}

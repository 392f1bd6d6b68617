//! Page layout planning.
//!
//! Decides how one or two copies of the flat boundary land on fixed-size
//! sheets, splitting with duplicated overlap zones when the boundary
//! exceeds sheet capacity. The decision procedure is an explicit
//! first-match-wins tree producing a tagged [`LayoutMode`], so the
//! tie-break rules stay auditable independently of rendering.

use crate::errors::TemplateError;
use crate::float_types::Real;
use geo::{BooleanOps, LineString, MultiPolygon, Polygon as GeoPolygon};

/// Sheet geometry and layout constants, millimetres. An explicit immutable
/// value passed into the planner, never ambient state, so alternative sheet
/// sizes can be laid out side by side in tests.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetConfig {
    /// Physical page size (landscape: width is the long edge).
    pub page_width: Real,
    pub page_height: Real,
    /// Outer margin on all sides.
    pub margin: Real,
    /// Space reserved at the top for title, subtitle and instructions.
    pub title_band: Real,
    /// Space reserved at the bottom for the scale bar and footer.
    pub scale_band: Real,
    /// Vertical gap between stacked placements.
    pub spacing: Real,
    /// Width beyond which two placements can no longer share one sheet.
    pub split_threshold: Real,
    /// Total width of the duplicated zone shared by two split halves.
    pub split_overlap: Real,
    /// True length of the scale-verification bar.
    pub scale_bar_length: Real,
}

impl Default for SheetConfig {
    /// A4 landscape.
    fn default() -> Self {
        SheetConfig {
            page_width: 297.0,
            page_height: 210.0,
            margin: 6.0,
            title_band: 30.0,
            scale_band: 20.0,
            spacing: 15.0,
            split_threshold: 247.0,
            split_overlap: 20.0,
            scale_bar_length: 100.0,
        }
    }
}

impl SheetConfig {
    /// Width available to template placements.
    pub fn usable_width(&self) -> Real {
        self.page_width - 2.0 * self.margin
    }

    /// Height available to template placements, clear of the title and
    /// scale bands.
    pub fn usable_height(&self) -> Real {
        self.page_height - self.title_band - self.scale_band - 2.0 * self.margin
    }

    /// Whether two placements of the given size can share one sheet,
    /// stacked with the standard spacing. A width of exactly the split
    /// threshold counts as fitting.
    fn fits_two(&self, width: Real, height: Real) -> bool {
        width <= self.split_threshold
            && width <= self.usable_width()
            && 2.0 * height + self.spacing <= self.usable_height()
    }

    fn fits_one(&self, width: Real, height: Real) -> bool {
        width <= self.usable_width() && height <= self.usable_height()
    }
}

/// The four placement strategies, in decision order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Two whole copies stacked on a single page.
    SinglePageDual,
    /// One whole copy, centered. Spans extra page rows on height overflow.
    SinglePageIndividual,
    /// Left and right halves stacked on a single page.
    SplitPageCombined,
    /// One half per page.
    SplitPageSeparate,
}

/// Orientation of a split centerline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitAxis {
    /// Width split: the centerline is vertical.
    Vertical,
    /// Height split: the centerline is horizontal.
    Horizontal,
}

/// A split centerline in template-space millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitLine {
    pub axis: SplitAxis,
    pub at: Real,
}

/// The duplicated overlap region in template-space millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapZone {
    pub x: Real,
    pub y: Real,
    pub width: Real,
    pub height: Real,
}

/// Axis-aligned window of the template shown by one placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipWindow {
    pub x0: Real,
    pub y0: Real,
    pub x1: Real,
    pub y1: Real,
}

impl ClipWindow {
    pub fn width(&self) -> Real {
        self.x1 - self.x0
    }

    pub fn height(&self) -> Real {
        self.y1 - self.y0
    }

    /// Whether the window covers the whole template bounding box.
    pub fn covers(&self, width: Real, height: Real) -> bool {
        self.x0 <= 0.0 && self.y0 <= 0.0 && self.x1 >= width && self.y1 >= height
    }
}

/// One copy (or part) of the boundary placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Template region shown.
    pub window: ClipWindow,
    /// Page-space millimetres where the window's origin lands.
    pub offset: (Real, Real),
    /// "LEFT HALF (1 of 2)" and friends; `None` for whole placements.
    pub label: Option<String>,
    /// Join centerlines to draw dashed green, template-space.
    pub centerlines: Vec<SplitLine>,
    /// Overlap zones to outline orange, template-space.
    pub overlaps: Vec<OverlapZone>,
}

/// Everything the renderer needs for one output page.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlacement {
    pub page_index: usize,
    pub placements: Vec<Placement>,
    /// Page-space origin of the scale bar, millimetres.
    pub scale_bar_origin: (Real, Real),
    /// Literal dimension annotations for the legend area.
    pub annotations: Vec<String>,
}

/// Immutable layout decision for one generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub mode: LayoutMode,
    pub pages: Vec<PagePlacement>,
}

impl LayoutPlan {
    /// Decide the layout for a boundary of the given bounding size.
    ///
    /// First match wins:
    /// 1. two stacked copies fit → [`LayoutMode::SinglePageDual`];
    /// 2. one copy fits → [`LayoutMode::SinglePageIndividual`];
    /// 3. boundary wider than the split threshold: halve at `width/2` with
    ///    ±overlap/2 extension; two stacked halves fit →
    ///    [`LayoutMode::SplitPageCombined`], else
    ///    [`LayoutMode::SplitPageSeparate`];
    /// 4. height overflow applies the same halving + overlap rule
    ///    orthogonally, adding page rows.
    ///
    /// A boundary that still cannot be placed is
    /// [`TemplateError::LayoutUnsatisfiable`].
    pub fn plan(width: Real, height: Real, sheet: &SheetConfig) -> Result<LayoutPlan, TemplateError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(TemplateError::LayoutUnsatisfiable(format!(
                "degenerate boundary size {width:.1} × {height:.1} mm"
            )));
        }

        if width <= sheet.split_threshold {
            plan_unsplit(width, height, sheet)
        } else {
            plan_width_split(width, height, sheet)
        }
    }

    /// Total number of output pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

fn whole_window(width: Real, height: Real) -> ClipWindow {
    ClipWindow { x0: 0.0, y0: 0.0, x1: width, y1: height }
}

fn cut_size_annotation(width: Real, height: Real) -> String {
    format!("CUT TO RED OUTLINE: {width:.0} × {height:.0} mm")
}

fn plan_unsplit(width: Real, height: Real, sheet: &SheetConfig) -> Result<LayoutPlan, TemplateError> {
    let content_left = sheet.margin + (sheet.usable_width() - width) / 2.0;
    let content_bottom = sheet.margin + sheet.scale_band;
    let scale_bar_origin = (sheet.margin, sheet.margin);

    if sheet.fits_two(width, height) {
        // Two copies so one can be cut as a spare.
        let placements = (0..2)
            .map(|copy| Placement {
                window: whole_window(width, height),
                offset: (
                    content_left,
                    content_bottom + copy as Real * (height + sheet.spacing),
                ),
                label: None,
                centerlines: Vec::new(),
                overlaps: Vec::new(),
            })
            .collect();
        return Ok(LayoutPlan {
            mode: LayoutMode::SinglePageDual,
            pages: vec![PagePlacement {
                page_index: 0,
                placements,
                scale_bar_origin,
                annotations: vec![cut_size_annotation(width, height)],
            }],
        });
    }

    if sheet.fits_one(width, height) {
        return Ok(LayoutPlan {
            mode: LayoutMode::SinglePageIndividual,
            pages: vec![PagePlacement {
                page_index: 0,
                placements: vec![Placement {
                    window: whole_window(width, height),
                    offset: (
                        content_left,
                        content_bottom + (sheet.usable_height() - height) / 2.0,
                    ),
                    label: None,
                    centerlines: Vec::new(),
                    overlaps: Vec::new(),
                }],
                scale_bar_origin,
                annotations: vec![cut_size_annotation(width, height)],
            }],
        });
    }

    // Height overflow: same halving + overlap rule, applied orthogonally.
    let rows = split_windows(height, sheet.split_overlap);
    let row_height = rows[0].1 - rows[0].0;
    if width > sheet.usable_width() || row_height > sheet.usable_height() {
        return Err(TemplateError::LayoutUnsatisfiable(format!(
            "boundary {width:.1} × {height:.1} mm exceeds the sheet even split in half"
        )));
    }
    let zone = OverlapZone {
        x: 0.0,
        y: height / 2.0 - sheet.split_overlap / 2.0,
        width,
        height: sheet.split_overlap,
    };
    let labels = ["LOWER HALF (1 of 2)", "UPPER HALF (2 of 2)"];
    let pages = rows
        .iter()
        .enumerate()
        .map(|(index, &(y0, y1))| PagePlacement {
            page_index: index,
            placements: vec![Placement {
                window: ClipWindow { x0: 0.0, y0, x1: width, y1 },
                offset: (
                    content_left,
                    content_bottom + (sheet.usable_height() - (y1 - y0)) / 2.0,
                ),
                label: Some(labels[index].to_string()),
                centerlines: vec![SplitLine { axis: SplitAxis::Horizontal, at: height / 2.0 }],
                overlaps: vec![zone],
            }],
            scale_bar_origin,
            annotations: vec![
                format!("TEMPLATE SIZE: {width:.0}mm × {height:.0}mm (FULL)"),
                format!("This section: {width:.0}mm × {:.0}mm", y1 - y0),
                format!("Overlap zone: {:.0}mm", sheet.split_overlap),
            ],
        })
        .collect();
    Ok(LayoutPlan { mode: LayoutMode::SinglePageIndividual, pages })
}

/// Lower and upper (or left and right) intervals induced by halving a span
/// with the shared overlap extension.
fn split_windows(span: Real, overlap: Real) -> [(Real, Real); 2] {
    let mid = span / 2.0;
    [(0.0, mid + overlap / 2.0), (mid - overlap / 2.0, span)]
}

fn plan_width_split(
    width: Real,
    height: Real,
    sheet: &SheetConfig,
) -> Result<LayoutPlan, TemplateError> {
    let split_x = width / 2.0;
    let halves = split_windows(width, sheet.split_overlap);
    let half_width = halves[0].1 - halves[0].0;
    if half_width > sheet.usable_width() {
        return Err(TemplateError::LayoutUnsatisfiable(format!(
            "boundary {width:.1} mm wide leaves {half_width:.1} mm halves, wider than the sheet"
        )));
    }

    let zone = OverlapZone {
        x: split_x - sheet.split_overlap / 2.0,
        y: 0.0,
        width: sheet.split_overlap,
        height,
    };
    let centerline = SplitLine { axis: SplitAxis::Vertical, at: split_x };
    let content_bottom = sheet.margin + sheet.scale_band;
    let scale_bar_origin = (sheet.margin, sheet.margin);
    let half_left = |w: Real| sheet.margin + (sheet.usable_width() - w) / 2.0;

    if sheet.fits_two(half_width, height) {
        // Left half below, right half above, joined at the centerline.
        let placements = halves
            .iter()
            .enumerate()
            .map(|(index, &(x0, x1))| Placement {
                window: ClipWindow { x0, y0: 0.0, x1, y1: height },
                offset: (
                    half_left(x1 - x0),
                    content_bottom + index as Real * (height + sheet.spacing),
                ),
                label: Some(if index == 0 { "LEFT HALF" } else { "RIGHT HALF" }.to_string()),
                centerlines: vec![centerline],
                overlaps: vec![zone],
            })
            .collect();
        return Ok(LayoutPlan {
            mode: LayoutMode::SplitPageCombined,
            pages: vec![PagePlacement {
                page_index: 0,
                placements,
                scale_bar_origin,
                annotations: vec![
                    format!("FULL SIZE: {width:.0}mm × {height:.0}mm"),
                    format!("Each half: {half_width:.0}mm × {height:.0}mm"),
                ],
            }],
        });
    }

    // One half per page, possibly further split by height into rows.
    let rows: Vec<(Real, Real, Option<SplitLine>, Option<OverlapZone>)> = if height
        <= sheet.usable_height()
    {
        vec![(0.0, height, None, None)]
    } else {
        let row_windows = split_windows(height, sheet.split_overlap);
        let row_height = row_windows[0].1 - row_windows[0].0;
        if row_height > sheet.usable_height() {
            return Err(TemplateError::LayoutUnsatisfiable(format!(
                "boundary {width:.1} × {height:.1} mm exceeds the sheet even split in half"
            )));
        }
        let row_zone = OverlapZone {
            x: 0.0,
            y: height / 2.0 - sheet.split_overlap / 2.0,
            width,
            height: sheet.split_overlap,
        };
        let row_line = SplitLine { axis: SplitAxis::Horizontal, at: height / 2.0 };
        row_windows
            .iter()
            .map(|&(y0, y1)| (y0, y1, Some(row_line), Some(row_zone)))
            .collect()
    };

    let total = halves.len() * rows.len();
    let mut pages = Vec::with_capacity(total);
    for (half_index, &(x0, x1)) in halves.iter().enumerate() {
        for (row_index, &(y0, y1, row_line, row_zone)) in rows.iter().enumerate() {
            let page_index = half_index * rows.len() + row_index;
            let side = if half_index == 0 { "LEFT HALF" } else { "RIGHT HALF" };
            let label = if rows.len() == 1 {
                format!("{side} ({} of {total})", page_index + 1)
            } else {
                let row = if row_index == 0 { "LOWER" } else { "UPPER" };
                format!("{side} — {row} ({} of {total})", page_index + 1)
            };
            let mut centerlines = vec![centerline];
            let mut overlaps = vec![zone];
            if let Some(line) = row_line {
                centerlines.push(line);
            }
            if let Some(zone) = row_zone {
                overlaps.push(zone);
            }
            pages.push(PagePlacement {
                page_index,
                placements: vec![Placement {
                    window: ClipWindow { x0, y0, x1, y1 },
                    offset: (
                        half_left(x1 - x0),
                        content_bottom + (sheet.usable_height() - (y1 - y0)) / 2.0,
                    ),
                    label: Some(label),
                    centerlines,
                    overlaps,
                }],
                scale_bar_origin,
                annotations: vec![
                    format!("TEMPLATE SIZE: {width:.0}mm × {height:.0}mm (FULL)"),
                    format!("This section: {:.0}mm × {:.0}mm", x1 - x0, y1 - y0),
                    format!("Overlap zone: {:.0}mm", sheet.split_overlap),
                ],
            });
        }
    }
    Ok(LayoutPlan { mode: LayoutMode::SplitPageSeparate, pages })
}

/// Clip a closed outline to a window, returning the exterior ring of each
/// resulting piece (closing vertex repeated, as geo emits them).
///
/// Splitting goes through real polygon intersection so the two halves of a
/// split template re-join to the unsplit outline exactly, up to the shared
/// overlap zone.
pub fn clip_outline(points: &[(Real, Real)], window: &ClipWindow) -> Vec<Vec<(Real, Real)>> {
    let subject = GeoPolygon::new(LineString::from(points.to_vec()), vec![]);
    let clip = GeoPolygon::new(
        LineString::from(vec![
            (window.x0, window.y0),
            (window.x1, window.y0),
            (window.x1, window.y1),
            (window.x0, window.y1),
            (window.x0, window.y0),
        ]),
        vec![],
    );
    let clipped: MultiPolygon<Real> = subject.intersection(&clip);
    clipped
        .0
        .iter()
        .map(|polygon| polygon.exterior().coords().map(|c| (c.x, c.y)).collect())
        .collect()
}

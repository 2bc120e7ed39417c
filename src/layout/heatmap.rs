use eframe::egui::{pos2, vec2, Align2, Color32, Pos2, Rect};

use crate::color::{DivergingScale, NO_DATA};
use crate::data::model::CorrelationTriple;
use crate::layout::band::BandScale;
use crate::layout::hover::{round2, InteractionCell};

// ---------------------------------------------------------------------------
// Chart geometry constants
// ---------------------------------------------------------------------------

/// Margins around the drawable area: the right margin leaves room for the
/// tooltip anchor, the bottom one for the x-axis labels.
#[derive(Debug, Clone, Copy)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

pub const MARGINS: Margins = Margins {
    top: 10.0,
    right: 50.0,
    bottom: 30.0,
    left: 30.0,
};

/// Fraction of a slot reserved as visual separation between cells.
pub const SLOT_PADDING: f32 = 0.01;
/// Cell fill opacity (the white stroke stays opaque).
const CELL_ALPHA: u8 = 178;
/// Corner rounding of each cell, in points.
pub const CELL_ROUNDING: u8 = 5;
/// Gap between the drawable area and the axis label baselines.
const LABEL_GAP: f32 = 10.0;

// ---------------------------------------------------------------------------
// Renderable scene graph
// ---------------------------------------------------------------------------

/// One rendered heatmap cell with its precomputed hover payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CellShape {
    pub rect: Rect,
    pub fill: Color32,
    pub coef: Option<f64>,
    pub hover: InteractionCell,
}

/// One axis tick label.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub text: String,
    pub pos: Pos2,
    pub anchor: Align2,
}

/// The full renderable layout for one (data, size) pair: cell rectangles,
/// axis labels, and the band scales they were placed with. Coordinates are
/// canvas-relative, margins already applied.
#[derive(Debug, Clone)]
pub struct CorrelationLayout {
    pub width: f32,
    pub height: f32,
    pub cells: Vec<CellShape>,
    pub x_labels: Vec<AxisLabel>,
    pub y_labels: Vec<AxisLabel>,
    pub x_scale: BandScale,
    pub y_scale: BandScale,
}

impl CorrelationLayout {
    /// Derive coordinate scales from the triples, mask the upper triangle,
    /// color each surviving cell, and place the axis labels.
    pub fn build(width: f32, height: f32, data: &[CorrelationTriple]) -> Self {
        let bounds_w = (width - MARGINS.left - MARGINS.right).max(0.0);
        let bounds_h = (height - MARGINS.top - MARGINS.bottom).max(0.0);

        // Label orderings preserve first-seen order, derived independently
        // per axis. The x sequence doubles as the shared ordering for
        // triangular masking.
        let x_groups = distinct_labels(data.iter().map(|d| d.x.as_str()));
        let y_groups = distinct_labels(data.iter().map(|d| d.y.as_str()));
        let x_scale = BandScale::new(x_groups, (0.0, bounds_w), SLOT_PADDING);
        let y_scale = BandScale::new(y_groups, (0.0, bounds_h), SLOT_PADDING);

        let color_scale = DivergingScale::default();
        let mut cells = Vec::with_capacity(data.len());
        for triple in data {
            // A label missing from either scale means the cell has nowhere
            // to go: skip it entirely (distinct from the no-data fill).
            let (Some(x), Some(y)) = (x_scale.position(&triple.x), y_scale.position(&triple.y))
            else {
                continue;
            };
            // Suppress the upper triangle; the grid is symmetric and one
            // half plus the diagonal carries all the information.
            let (Some(x_ord), Some(y_ord)) =
                (x_scale.index_of(&triple.x), x_scale.index_of(&triple.y))
            else {
                continue;
            };
            if x_ord > y_ord {
                continue;
            }

            let rect = Rect::from_min_size(
                pos2(MARGINS.left + x, MARGINS.top + y),
                vec2(x_scale.bandwidth(), y_scale.bandwidth()),
            );
            let base = match triple.coef {
                Some(coef) => color_scale.color_at(coef),
                None => NO_DATA,
            };
            let fill = Color32::from_rgba_unmultiplied(base.r(), base.g(), base.b(), CELL_ALPHA);
            let hover = InteractionCell {
                x_label: triple.x.clone(),
                y_label: triple.y.clone(),
                x_pos: MARGINS.left + x + x_scale.bandwidth(),
                y_pos: MARGINS.top + y + y_scale.bandwidth() / 2.0,
                value: triple.coef.map(round2),
            };
            cells.push(CellShape {
                rect,
                fill,
                coef: triple.coef,
                hover,
            });
        }

        let x_labels = x_scale
            .domain()
            .iter()
            .filter_map(|name| {
                let x = x_scale.position(name)?;
                Some(AxisLabel {
                    text: name.clone(),
                    pos: pos2(
                        MARGINS.left + x + x_scale.bandwidth() / 2.0,
                        MARGINS.top + bounds_h + LABEL_GAP,
                    ),
                    anchor: Align2::CENTER_CENTER,
                })
            })
            .collect();

        let y_labels = y_scale
            .domain()
            .iter()
            .filter_map(|name| {
                let y = y_scale.position(name)?;
                Some(AxisLabel {
                    text: name.clone(),
                    pos: pos2(
                        MARGINS.left - LABEL_GAP / 2.0,
                        MARGINS.top + y + y_scale.bandwidth() / 2.0,
                    ),
                    anchor: Align2::RIGHT_CENTER,
                })
            })
            .collect();

        CorrelationLayout {
            width,
            height,
            cells,
            x_labels,
            y_labels,
            x_scale,
            y_scale,
        }
    }

    /// The rendered cell under `pos` (canvas coordinates), if any.
    pub fn cell_at(&self, pos: Pos2) -> Option<&CellShape> {
        self.cells.iter().find(|c| c.rect.contains(pos))
    }
}

/// Distinct labels in first-seen order.
fn distinct_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = Vec::new();
    for label in labels {
        if !seen.iter().any(|s| s == label) {
            seen.push(label.to_string());
        }
    }
    seen
}

// ---------------------------------------------------------------------------
// Layout cache
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    revision: u64,
    width: u32,
    height: u32,
}

/// Memoizes the layout against (data revision, width, height). Hover state
/// never touches this; only new data or a resize invalidates it.
#[derive(Default)]
pub struct LayoutCache {
    key: Option<CacheKey>,
    layout: Option<CorrelationLayout>,
}

impl LayoutCache {
    pub fn new() -> Self {
        LayoutCache::default()
    }

    /// The layout for the given inputs, rebuilt only when the key changes.
    pub fn layout(
        &mut self,
        revision: u64,
        width: f32,
        height: f32,
        data: &[CorrelationTriple],
    ) -> &CorrelationLayout {
        let key = CacheKey {
            revision,
            width: width.to_bits(),
            height: height.to_bits(),
        };
        if self.key != Some(key) {
            self.key = Some(key);
            self.layout = None;
        }
        self.layout
            .get_or_insert_with(|| CorrelationLayout::build(width, height, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CorrelationTriple;

    const WIDTH: f32 = 500.0;
    const HEIGHT: f32 = 400.0;

    /// Full 3×3 grid over [a, b, c], symmetric halves plus diagonal.
    fn full_grid() -> Vec<CorrelationTriple> {
        let labels = ["a", "b", "c"];
        let coef = [
            [1.0, 0.4, -0.7],
            [0.4, 1.0, 0.2],
            [-0.7, 0.2, 1.0],
        ];
        let mut data = Vec::new();
        for (i, x) in labels.iter().enumerate() {
            for (j, y) in labels.iter().enumerate() {
                data.push(CorrelationTriple::new(x, y, Some(coef[i][j])));
            }
        }
        data
    }

    #[test]
    fn upper_triangle_is_masked() {
        let layout = CorrelationLayout::build(WIDTH, HEIGHT, &full_grid());
        // 3 diagonal + 3 lower-triangle cells survive out of 9.
        assert_eq!(layout.cells.len(), 6);
        for cell in &layout.cells {
            let x_ord = layout.x_scale.index_of(&cell.hover.x_label).unwrap();
            let y_ord = layout.x_scale.index_of(&cell.hover.y_label).unwrap();
            assert!(x_ord <= y_ord);
        }
    }

    #[test]
    fn label_order_is_first_seen_not_sorted() {
        let data = vec![
            CorrelationTriple::new("zeta", "zeta", Some(1.0)),
            CorrelationTriple::new("alpha", "zeta", Some(0.3)),
            CorrelationTriple::new("alpha", "alpha", Some(1.0)),
        ];
        let layout = CorrelationLayout::build(WIDTH, HEIGHT, &data);
        assert_eq!(layout.x_scale.domain(), ["zeta".to_string(), "alpha".to_string()]);
    }

    #[test]
    fn null_coefficient_renders_with_neutral_fill() {
        let data = vec![
            CorrelationTriple::new("a", "a", Some(1.0)),
            CorrelationTriple::new("a", "b", None),
            CorrelationTriple::new("b", "b", Some(1.0)),
        ];
        let layout = CorrelationLayout::build(WIDTH, HEIGHT, &data);
        let no_data_cell = layout
            .cells
            .iter()
            .find(|c| c.coef.is_none())
            .expect("null-coefficient cell must still be plotted");
        assert_eq!(
            (no_data_cell.fill.r(), no_data_cell.fill.g(), no_data_cell.fill.b()),
            (NO_DATA.r(), NO_DATA.g(), NO_DATA.b())
        );
        assert_eq!(no_data_cell.hover.value, None);
    }

    #[test]
    fn unmapped_y_label_skips_the_cell() {
        // "ghost" never appears as an x label, so the shared ordering and
        // the y scale both know it only through the y side; a label absent
        // from the combined ordering cannot be placed in the triangle.
        let data = vec![
            CorrelationTriple::new("a", "a", Some(1.0)),
            CorrelationTriple::new("a", "ghost", Some(0.5)),
        ];
        let layout = CorrelationLayout::build(WIDTH, HEIGHT, &data);
        assert!(layout
            .cells
            .iter()
            .all(|c| c.hover.y_label != "ghost"));
    }

    #[test]
    fn hover_payload_rounds_to_two_decimals() {
        let data = vec![CorrelationTriple::new("a", "a", Some(0.4567))];
        let layout = CorrelationLayout::build(WIDTH, HEIGHT, &data);
        assert_eq!(layout.cells[0].hover.value, Some(0.46));
    }

    #[test]
    fn hover_anchor_sits_right_of_the_band() {
        let layout = CorrelationLayout::build(WIDTH, HEIGHT, &full_grid());
        for cell in &layout.cells {
            assert!((cell.hover.x_pos - cell.rect.max.x).abs() < 1e-3);
            assert!((cell.hover.y_pos - cell.rect.center().y).abs() < 1e-3);
        }
    }

    #[test]
    fn cells_stay_inside_the_drawable_area() {
        let layout = CorrelationLayout::build(WIDTH, HEIGHT, &full_grid());
        for cell in &layout.cells {
            assert!(cell.rect.min.x >= MARGINS.left - 1e-3);
            assert!(cell.rect.min.y >= MARGINS.top - 1e-3);
            assert!(cell.rect.max.x <= WIDTH - MARGINS.right + 1e-3);
            assert!(cell.rect.max.y <= HEIGHT - MARGINS.bottom + 1e-3);
        }
    }

    #[test]
    fn axis_labels_cover_both_axes() {
        let layout = CorrelationLayout::build(WIDTH, HEIGHT, &full_grid());
        assert_eq!(layout.x_labels.len(), 3);
        assert_eq!(layout.y_labels.len(), 3);

        let bottom = HEIGHT - MARGINS.bottom;
        for label in &layout.x_labels {
            assert!(label.pos.y > bottom);
            assert_eq!(label.anchor, Align2::CENTER_CENTER);
        }
        for label in &layout.y_labels {
            assert!(label.pos.x < MARGINS.left);
            assert_eq!(label.anchor, Align2::RIGHT_CENTER);
        }
    }

    #[test]
    fn cell_at_hit_tests_rendered_cells_only() {
        let layout = CorrelationLayout::build(WIDTH, HEIGHT, &full_grid());
        let diagonal = layout.cells[0].rect.center();
        assert!(layout.cell_at(diagonal).is_some());
        // The top-right corner of the drawable area belongs to the masked
        // triangle.
        let masked = pos2(WIDTH - MARGINS.right - 5.0, MARGINS.top + 5.0);
        assert!(layout.cell_at(masked).is_none());
    }

    #[test]
    fn cache_reuses_layout_until_the_key_changes() {
        let mut cache = LayoutCache::new();
        let first = full_grid();
        let cells = cache.layout(1, WIDTH, HEIGHT, &first).cells.len();
        assert_eq!(cells, 6);

        // Same key, different data: the cached layout is returned as-is,
        // proving no rebuild happened.
        let smaller = vec![CorrelationTriple::new("a", "a", Some(1.0))];
        let cached = cache.layout(1, WIDTH, HEIGHT, &smaller);
        assert_eq!(cached.cells.len(), 6);

        // Revision bump rebuilds against the new data.
        let rebuilt = cache.layout(2, WIDTH, HEIGHT, &smaller);
        assert_eq!(rebuilt.cells.len(), 1);

        // Resize rebuilds too.
        let resized = cache.layout(2, WIDTH + 50.0, HEIGHT, &smaller);
        assert!((resized.width - (WIDTH + 50.0)).abs() < f32::EPSILON);
    }
}

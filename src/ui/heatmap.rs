use eframe::egui::{self, Color32, CornerRadius, FontId, Sense, Stroke, StrokeKind, Ui};

use crate::layout::heatmap::CELL_ROUNDING;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Correlation heatmap (central panel)
// ---------------------------------------------------------------------------

/// Paint the memoized layout, hit-test the pointer against rendered cells,
/// and show the tooltip for the hovered one.
pub fn correlation_heatmap(ui: &mut Ui, state: &mut AppState) {
    if state.triples.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No correlation data supplied");
        });
        return;
    }

    let available = ui.available_size();
    let (canvas, response) = ui.allocate_exact_size(available, Sense::hover());

    // Split borrows: the cached layout and the hover channel are separate
    // pieces of state.
    let AppState {
        layout,
        triples,
        revision,
        hover,
        ..
    } = state;
    let layout = layout.layout(*revision, canvas.width(), canvas.height(), triples);

    let origin = canvas.min.to_vec2();
    let painter = ui.painter();
    let rounding = CornerRadius::same(CELL_ROUNDING);
    let stroke = Stroke::new(1.0, Color32::WHITE);

    for cell in &layout.cells {
        let rect = cell.rect.translate(origin);
        painter.rect_filled(rect, rounding, cell.fill);
        painter.rect_stroke(rect, rounding, stroke, StrokeKind::Inside);
    }

    let text_color = ui.visuals().text_color();
    let font = FontId::proportional(10.0);
    for label in layout.x_labels.iter().chain(&layout.y_labels) {
        painter.text(
            label.pos + origin,
            label.anchor,
            &label.text,
            font.clone(),
            text_color,
        );
    }

    // Drive the interaction channel from the pointer position; only
    // rendered cells are interactive.
    match response.hover_pos() {
        Some(pointer) => match layout.cell_at(pointer - origin) {
            Some(cell) => hover.enter(cell.hover.clone()),
            None => hover.leave(),
        },
        None => hover.leave(),
    }

    if let Some(cell) = hover.current() {
        let anchor = canvas.min + egui::vec2(cell.x_pos, cell.y_pos);
        egui::Area::new(ui.id().with("hover_tooltip"))
            .order(egui::Order::Tooltip)
            .fixed_pos(anchor)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui: &mut Ui| {
                    ui.label(format!("{} × {}", cell.x_label, cell.y_label));
                    match cell.value {
                        Some(value) => ui.strong(format!("{value:.2}")),
                        None => ui.weak("no data"),
                    };
                });
            });
    }
}

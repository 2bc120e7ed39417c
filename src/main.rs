mod app;
mod color;
mod data;
mod layout;
mod sample;
mod state;
mod ui;

use anyhow::Context;
use app::CorrMapApp;
use eframe::egui;
use layout::hover::HoverChannel;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let dataset = sample::dataset()?;
    let triples = sample::triples().context("loading the demo correlation grid")?;
    log::info!(
        "sample dataset: {} rows, {} columns, {} correlation triples",
        dataset.len(),
        dataset.schema.len(),
        triples.len()
    );

    let mut state = AppState::new(dataset, Box::new(sample::StaticSource::new(triples)));
    state.hover = HoverChannel::new(|cell| match cell {
        Some(c) => log::debug!("hovering {} × {}", c.x_label, c.y_label),
        None => log::debug!("hover cleared"),
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "corrmap – Correlation Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(CorrMapApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("starting the UI: {e}"))
}

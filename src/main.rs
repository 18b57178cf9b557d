use std::sync::Arc;

use anyhow::Context;
use eframe::egui;
use log::info;

mod api;
mod config;
mod gui;
mod models;
mod survey;

use config::AppConfig;
use gui::state::AppState;

struct SurveyApp {
    state: AppState,
}

impl eframe::App for SurveyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        gui::ui_main(ctx, &mut self.state);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    info!("Using survey API at {}", config.api_base_url);

    let builder = egui::ViewportBuilder::default()
        .with_title("Survey UMKM Imogiri")
        .with_inner_size(egui::vec2(720.0, 640.0));

    let options = eframe::NativeOptions {
        viewport: builder,
        ..Default::default()
    };

    eframe::run_native(
        "Survey UMKM Imogiri",
        options,
        Box::new(move |cc| {
            gui::style::register(&cc.egui_ctx);
            let ctx = cc.egui_ctx.clone();
            let mut state = AppState::new(config, Arc::new(move || ctx.request_repaint()))
                .context("failed to initialise application state")?;
            state.fetch_surveys();
            Ok(Box::new(SurveyApp { state }))
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI terminated with an error: {}", e))
}

use crate::survey::catalog;
use crate::survey::types::SurveyId;

use self::form::FormAction;
use self::state::{AppState, Catalog};

pub mod form;
pub mod state;
pub mod style;

pub fn ui_main(ctx: &egui::Context, state: &mut AppState) {
    state.poll();

    egui::TopBottomPanel::top("header").show(ctx, |ui| {
        egui::Frame::default()
            .outer_margin(egui::vec2(0.0, 4.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::left_to_right(egui::Align::Center), |ui| {
                        ui.heading("Survey UMKM Imogiri");
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if state.form.is_some() {
                            if ui.button("Close form").clicked() {
                                state.close_form();
                            }
                        } else if ui.button("Refresh").clicked() {
                            state.fetch_surveys();
                        }
                    });
                });
            });
    });

    egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("Server: {}", state.base_url()));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(&state.status_message);
            });
        });
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if let Some(form) = &mut state.form {
                    if form.show(ui) == FormAction::Close {
                        state.close_form();
                    }
                } else if let Some(id) = survey_list(ui, state) {
                    state.open_form(id);
                }
            });
    });
}

/// Returns the survey the user picked, if any.
fn survey_list(ui: &mut egui::Ui, state: &mut AppState) -> Option<SurveyId> {
    let mut picked = None;
    let mut retry = false;

    egui::Grid::new("server_grid").num_columns(3).show(ui, |ui| {
        ui.label("API Server:");
        ui.text_edit_singleline(&mut state.server_address);
        if ui.button("Apply").clicked() {
            state.apply_server_address();
        }
        ui.end_row();
    });
    ui.separator();

    match &state.catalog {
        Catalog::Idle | Catalog::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading surveys...");
            });
        }
        Catalog::Failed(message) => {
            ui.colored_label(ui.visuals().error_fg_color, message.as_str());
            retry = ui.button("Try again").clicked();
        }
        Catalog::Loaded(surveys) if surveys.is_empty() => {
            ui.label("No surveys are available right now.");
        }
        Catalog::Loaded(surveys) => {
            if let Some(featured) = catalog::featured(surveys) {
                ui.group(|ui| {
                    ui.set_width(ui.available_width());
                    ui.label(egui::RichText::new("Your feedback on our public services").strong());
                    if ui.button(format!("Fill in: {}", featured.name)).clicked() {
                        picked = Some(featured.id);
                    }
                });
                ui.add_space(8.0);
            }

            ui.heading("Choose a survey");
            for survey in surveys {
                ui.group(|ui| {
                    ui.set_width(ui.available_width());
                    if ui
                        .link(egui::RichText::new(&survey.name).strong())
                        .clicked()
                    {
                        picked = Some(survey.id);
                    }
                    ui.label(catalog::summary_description(survey));
                });
            }
        }
    }

    if retry {
        state.fetch_surveys();
    }
    picked
}

use std::collections::HashMap;

use log::warn;

use crate::api::client::ApiClient;
use crate::survey::answers::RATING_RANGE;
use crate::survey::controller::FormController;
use crate::survey::engine::{FormEngine, FormState};
use crate::survey::error::{EngineError, ValidationError};
use crate::survey::types::{QuestionId, QuestionKind};

pub type SurveyForm = FormController<ApiClient, ApiClient>;

const DEFAULT_TITLE: &str = "Survey UMKM";
const DEFAULT_DESCRIPTION: &str = "Please fill in the following survey honestly and completely.";

#[derive(Debug, PartialEq, Eq)]
pub enum FormAction {
    None,
    Close,
}

enum Edit {
    Set(QuestionId, String),
    Clear(QuestionId),
}

/// Screen state around one form session: text drafts and the last
/// validation result live here, answers live in the engine.
pub struct FormView {
    controller: SurveyForm,
    drafts: HashMap<QuestionId, String>,
    validation: Option<ValidationError>,
    notice: Option<String>,
}

impl FormView {
    pub fn new(controller: SurveyForm) -> Self {
        Self {
            controller,
            drafts: HashMap::new(),
            validation: None,
            notice: None,
        }
    }

    pub fn poll(&mut self) -> usize {
        self.controller.poll()
    }

    pub fn status(&self) -> &'static str {
        match self.controller.engine().state() {
            FormState::Loading => "Loading survey...",
            FormState::LoadFailed(_) => "Failed to load survey",
            FormState::Editing => "Survey loaded",
            FormState::Submitting => "Sending answers...",
            FormState::Error(_) => "Sending failed",
            FormState::Submitted => "Answers sent",
            FormState::Closed => "Form closed",
        }
    }

    pub fn close(&mut self) {
        self.controller.close();
        self.drafts.clear();
        self.validation = None;
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> FormAction {
        match self.controller.engine().state().clone() {
            FormState::Loading => {
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);
                    ui.spinner();
                    ui.label("Loading survey questions...");
                });
                self.close_button(ui, "Cancel")
            }
            FormState::LoadFailed(e) => {
                ui.colored_label(ui.visuals().error_fg_color, format!("Could not load the survey: {}", e));
                let mut action = FormAction::None;
                ui.horizontal(|ui| {
                    if ui.button("Retry").clicked() {
                        if let Err(e) = self.controller.retry_load() {
                            warn!("Retry refused: {}", e);
                        }
                    }
                    if ui.button("Close").clicked() {
                        action = FormAction::Close;
                    }
                });
                action
            }
            FormState::Submitted => {
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);
                    ui.heading("Thank you!");
                    ui.label("Your answers have been sent.");
                });
                self.close_button(ui, "Close")
            }
            FormState::Closed => FormAction::Close,
            FormState::Editing | FormState::Submitting | FormState::Error(_) => {
                self.show_questions(ui)
            }
        }
    }

    fn close_button(&mut self, ui: &mut egui::Ui, label: &str) -> FormAction {
        let mut action = FormAction::None;
        ui.vertical_centered(|ui| {
            if ui.button(label).clicked() {
                action = FormAction::Close;
            }
        });
        action
    }

    fn show_questions(&mut self, ui: &mut egui::Ui) -> FormAction {
        let mut edits = Vec::new();
        let mut submit = false;
        let mut action = FormAction::None;

        {
            let Self {
                controller,
                drafts,
                validation,
                notice,
            } = self;
            let engine = controller.engine();
            let Some(survey) = engine.survey() else {
                return FormAction::None;
            };
            let answers = engine.answers();
            let missing: &[QuestionId] = validation
                .as_ref()
                .map(|v| v.unanswered.as_slice())
                .unwrap_or_default();

            ui.heading(non_blank(&survey.name, DEFAULT_TITLE));
            ui.label(non_blank(&survey.description, DEFAULT_DESCRIPTION));
            ui.small(progress(engine));
            ui.separator();

            ui.add_enabled_ui(engine.is_editable(), |ui| {
                for (index, question) in engine.display_order().into_iter().enumerate() {
                    ui.group(|ui| {
                        ui.set_width(ui.available_width());
                        ui.small(format!("Question {}", index + 1));
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new(&question.prompt).strong());
                            ui.colored_label(ui.visuals().error_fg_color, "*");
                        });
                        if missing.contains(&question.id) {
                            ui.colored_label(
                                ui.visuals().warn_fg_color,
                                "This question needs an answer",
                            );
                        }

                        let current = answers.get(question.id);
                        match &question.kind {
                            QuestionKind::ShortText | QuestionKind::LongText => {
                                let draft = drafts
                                    .entry(question.id)
                                    .or_insert_with(|| current.unwrap_or_default().to_owned());
                                let editor = if question.kind == QuestionKind::LongText {
                                    egui::TextEdit::multiline(&mut *draft).desired_rows(4)
                                } else {
                                    egui::TextEdit::singleline(&mut *draft)
                                };
                                let response = ui.add(
                                    editor
                                        .hint_text("Type your answer...")
                                        .desired_width(f32::INFINITY),
                                );
                                if response.changed() {
                                    if draft.trim().is_empty() {
                                        edits.push(Edit::Clear(question.id));
                                    } else {
                                        edits.push(Edit::Set(question.id, draft.clone()));
                                    }
                                }
                            }
                            QuestionKind::SingleChoice { options } => {
                                for option in options {
                                    let selected = current == Some(option.as_str());
                                    if ui.radio(selected, option.as_str()).clicked() && !selected {
                                        edits.push(Edit::Set(question.id, option.clone()));
                                    }
                                }
                            }
                            QuestionKind::Rating => {
                                ui.horizontal(|ui| {
                                    for rating in RATING_RANGE {
                                        let value = rating.to_string();
                                        let selected = current == Some(value.as_str());
                                        if ui.selectable_label(selected, value.as_str()).clicked() {
                                            edits.push(Edit::Set(question.id, value));
                                        }
                                    }
                                });
                            }
                            QuestionKind::Unrenderable(reason) => {
                                ui.colored_label(
                                    ui.visuals().error_fg_color,
                                    format!("This question cannot be displayed: {}", reason),
                                );
                            }
                        }
                    });
                }
            });

            if let FormState::Error(e) = engine.state() {
                ui.colored_label(
                    ui.visuals().error_fg_color,
                    format!("Failed to send answers: {}", e),
                );
            }
            if let Some(v) = validation.as_ref() {
                ui.colored_label(ui.visuals().warn_fg_color, v.to_string());
            }
            if let Some(n) = notice.as_ref() {
                ui.label(n);
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    action = FormAction::Close;
                }
                if *engine.state() == FormState::Submitting {
                    ui.spinner();
                    ui.label("Sending...");
                } else if ui
                    .add_enabled(engine.can_submit(), egui::Button::new("Send answers"))
                    .clicked()
                {
                    submit = true;
                }
            });
        }

        for edit in edits {
            self.apply(edit);
        }
        if submit {
            self.submit();
        }
        action
    }

    fn apply(&mut self, edit: Edit) {
        let (id, result) = match edit {
            Edit::Set(id, value) => (id, self.controller.set_answer(id, value)),
            Edit::Clear(id) => (id, self.controller.clear_answer(id)),
        };
        match result {
            Ok(()) => {
                self.notice = None;
                if let Some(v) = self.validation.as_mut() {
                    if self.controller.engine().answers().contains(id) {
                        v.unanswered.retain(|q| *q != id);
                    }
                    if v.unanswered.is_empty() {
                        self.validation = None;
                    }
                }
            }
            Err(e) => {
                warn!("Answer for question {} rejected: {}", id, e);
                self.notice = Some(e.to_string());
            }
        }
    }

    fn submit(&mut self) {
        match self.controller.submit() {
            Ok(()) => {
                self.validation = None;
                self.notice = None;
            }
            Err(EngineError::Validation(v)) => self.validation = Some(v),
            Err(e) => {
                warn!("Submit refused: {}", e);
                self.notice = Some(e.to_string());
            }
        }
    }
}

fn progress(engine: &FormEngine) -> String {
    let total = engine.survey().map_or(0, |s| s.questions.len());
    if engine.answers().is_empty() {
        return format!("All {} questions are required", total);
    }
    match engine.unanswered().len() {
        0 => "All questions answered".to_owned(),
        left => format!("{} of {} questions left", left, total),
    }
}

fn non_blank<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::error::RenderError;
    use crate::survey::types::{Question, Survey, SurveyId};

    fn question(id: i64, kind: QuestionKind) -> Question {
        Question {
            id: QuestionId(id),
            prompt: format!("Pertanyaan {id}"),
            kind,
            profile: None,
        }
    }

    #[test]
    fn progress_counts_unrenderable_questions_as_left() {
        let (mut engine, ticket) = FormEngine::open(SurveyId(1));
        assert!(engine.finish_load(
            ticket,
            Ok(Survey {
                id: SurveyId(1),
                name: "Survei UMKM".into(),
                description: String::new(),
                questions: vec![
                    question(1, QuestionKind::ShortText),
                    question(2, QuestionKind::Rating),
                    question(3, QuestionKind::Unrenderable(RenderError::MissingOptions)),
                ],
            })
        ));
        assert_eq!(progress(&engine), "All 3 questions are required");

        engine.set_answer(QuestionId(1), "Batik tulis").unwrap();
        assert_eq!(progress(&engine), "2 of 3 questions left");

        engine.set_answer(QuestionId(2), "5").unwrap();
        assert_eq!(progress(&engine), "1 of 3 questions left");
    }

    #[test]
    fn blank_header_fields_fall_back() {
        assert_eq!(non_blank("  ", DEFAULT_TITLE), DEFAULT_TITLE);
        assert_eq!(non_blank("Survei IKM", DEFAULT_TITLE), "Survei IKM");
    }
}

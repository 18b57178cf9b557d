use std::collections::HashMap;

use super::error::AnswerError;
use super::types::{AnswerEntry, Question, QuestionId, QuestionKind, Survey};

pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// In-progress answers for one form session, one value per question.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerSet {
    values: HashMap<QuestionId, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: QuestionId) -> Option<&str> {
        self.values.get(&id).map(String::as_str)
    }

    pub fn contains(&self, id: QuestionId) -> bool {
        self.values.contains_key(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn insert(&mut self, id: QuestionId, value: String) {
        self.values.insert(id, value);
    }

    pub(crate) fn remove(&mut self, id: QuestionId) {
        self.values.remove(&id);
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
    }

    /// Questions of `survey` with no answer, in survey order. Unrenderable
    /// questions can never be answered, so they always show up here.
    pub fn unanswered(&self, survey: &Survey) -> Vec<QuestionId> {
        survey
            .questions
            .iter()
            .filter(|q| !q.kind.is_renderable() || !self.values.contains_key(&q.id))
            .map(|q| q.id)
            .collect()
    }

    pub fn entries(&self, survey: &Survey) -> Vec<AnswerEntry> {
        survey
            .questions
            .iter()
            .filter_map(|q| {
                self.values.get(&q.id).map(|answer| AnswerEntry {
                    question_id: q.id,
                    answer: answer.clone(),
                })
            })
            .collect()
    }
}

/// Checks `value` against the question's input shape and returns the form it
/// is stored in.
pub fn accept(question: &Question, value: &str) -> Result<String, AnswerError> {
    match &question.kind {
        QuestionKind::ShortText | QuestionKind::LongText => {
            if value.trim().is_empty() {
                Err(AnswerError::Empty(question.id))
            } else {
                Ok(value.to_owned())
            }
        }
        QuestionKind::SingleChoice { options } => {
            if options.iter().any(|o| o == value) {
                Ok(value.to_owned())
            } else {
                Err(AnswerError::NotAnOption {
                    question: question.id,
                    value: value.to_owned(),
                })
            }
        }
        QuestionKind::Rating => match value.trim().parse::<u8>() {
            Ok(rating) if RATING_RANGE.contains(&rating) => Ok(rating.to_string()),
            _ => Err(AnswerError::RatingOutOfRange {
                question: question.id,
                value: value.to_owned(),
            }),
        },
        QuestionKind::Unrenderable(reason) => Err(AnswerError::Unrenderable {
            question: question.id,
            source: reason.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::error::RenderError;
    use crate::survey::types::SurveyId;

    fn question(id: i64, kind: QuestionKind) -> Question {
        Question {
            id: QuestionId(id),
            prompt: format!("Question {id}"),
            kind,
            profile: None,
        }
    }

    #[test]
    fn text_answers_must_not_be_blank() {
        let q = question(1, QuestionKind::ShortText);
        assert_eq!(accept(&q, "Budi").unwrap(), "Budi");
        assert_eq!(accept(&q, "   "), Err(AnswerError::Empty(QuestionId(1))));

        let q = question(2, QuestionKind::LongText);
        assert_eq!(accept(&q, "line one\nline two").unwrap(), "line one\nline two");
    }

    #[test]
    fn choice_answers_must_match_an_option() {
        let q = question(
            1,
            QuestionKind::SingleChoice {
                options: vec!["Laki-laki".into(), "Perempuan".into()],
            },
        );
        assert_eq!(accept(&q, "Perempuan").unwrap(), "Perempuan");
        assert!(matches!(
            accept(&q, "perempuan"),
            Err(AnswerError::NotAnOption { .. })
        ));
    }

    #[test]
    fn ratings_are_normalized_integers_in_range() {
        let q = question(1, QuestionKind::Rating);
        assert_eq!(accept(&q, "3").unwrap(), "3");
        assert_eq!(accept(&q, " 05 ").unwrap(), "5");
        for bad in ["0", "6", "2.5", "lima", ""] {
            assert!(
                matches!(accept(&q, bad), Err(AnswerError::RatingOutOfRange { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn unrenderable_questions_reject_every_value() {
        let q = question(
            1,
            QuestionKind::Unrenderable(RenderError::UnknownType("slider".into())),
        );
        assert!(matches!(
            accept(&q, "anything"),
            Err(AnswerError::Unrenderable { .. })
        ));
    }

    #[test]
    fn unanswered_and_entries_follow_survey_order() {
        let survey = Survey {
            id: SurveyId(7),
            name: "S".into(),
            description: String::new(),
            questions: vec![
                question(3, QuestionKind::ShortText),
                question(1, QuestionKind::Rating),
                question(
                    2,
                    QuestionKind::Unrenderable(RenderError::MissingOptions),
                ),
            ],
        };
        let mut answers = AnswerSet::new();
        answers.insert(QuestionId(1), "4".into());
        answers.insert(QuestionId(3), "Budi".into());

        assert_eq!(answers.unanswered(&survey), vec![QuestionId(2)]);
        let entries = answers.entries(&survey);
        assert_eq!(entries[0].question_id, QuestionId(3));
        assert_eq!(entries[1].question_id, QuestionId(1));
    }
}

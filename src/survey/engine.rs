use super::answers::{self, AnswerSet};
use super::error::{EngineError, FetchError, SubmissionError, ValidationError};
use super::order;
use super::types::{Question, QuestionId, SubmissionPayload, Survey, SurveyId};

/// Identifies one outstanding request. Completions carrying a ticket other
/// than the pending one are stale and get dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormState {
    Loading,
    LoadFailed(FetchError),
    Editing,
    Submitting,
    Error(SubmissionError),
    Submitted,
    Closed,
}

impl FormState {
    pub fn name(&self) -> &'static str {
        match self {
            FormState::Loading => "loading",
            FormState::LoadFailed(_) => "failed to load",
            FormState::Editing => "editing",
            FormState::Submitting => "submitting",
            FormState::Error(_) => "showing a submission error",
            FormState::Submitted => "submitted",
            FormState::Closed => "closed",
        }
    }
}

/// Form session state machine. It never performs I/O itself: `open`,
/// `retry_load` and `begin_submit` hand out a [`Ticket`] for the request the
/// caller should make, and `finish_load` / `finish_submit` feed the result
/// back in.
#[derive(Debug)]
pub struct FormEngine {
    survey_id: SurveyId,
    survey: Option<Survey>,
    answers: AnswerSet,
    state: FormState,
    pending: Option<Ticket>,
    next_ticket: u64,
}

impl FormEngine {
    pub fn open(survey_id: SurveyId) -> (Self, Ticket) {
        let mut engine = Self {
            survey_id,
            survey: None,
            answers: AnswerSet::new(),
            state: FormState::Loading,
            pending: None,
            next_ticket: 0,
        };
        let ticket = engine.issue_ticket();
        (engine, ticket)
    }

    pub fn survey_id(&self) -> SurveyId {
        self.survey_id
    }

    pub fn survey(&self) -> Option<&Survey> {
        self.survey.as_ref()
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_editable(&self) -> bool {
        matches!(self.state, FormState::Editing | FormState::Error(_))
    }

    /// Submit control is live only when nothing is in flight.
    pub fn can_submit(&self) -> bool {
        self.is_editable() && self.pending.is_none()
    }

    pub fn display_order(&self) -> Vec<&Question> {
        self.survey
            .as_ref()
            .map(|s| order::display_order(&s.questions))
            .unwrap_or_default()
    }

    pub fn unanswered(&self) -> Vec<QuestionId> {
        self.survey
            .as_ref()
            .map(|s| self.answers.unanswered(s))
            .unwrap_or_default()
    }

    pub fn retry_load(&mut self) -> Result<Ticket, EngineError> {
        if !matches!(self.state, FormState::LoadFailed(_)) {
            return Err(self.invalid("retry loading"));
        }
        self.state = FormState::Loading;
        Ok(self.issue_ticket())
    }

    /// Returns `false` when the completion was stale and ignored.
    pub fn finish_load(&mut self, ticket: Ticket, result: Result<Survey, FetchError>) -> bool {
        if self.state != FormState::Loading || !self.take_pending(ticket) {
            return false;
        }
        match result {
            Ok(survey) => {
                self.survey = Some(survey);
                self.answers.clear();
                self.state = FormState::Editing;
            }
            Err(e) => self.state = FormState::LoadFailed(e),
        }
        true
    }

    pub fn set_answer(
        &mut self,
        question_id: QuestionId,
        value: impl AsRef<str>,
    ) -> Result<(), EngineError> {
        let question = self.editable_question(question_id, "answer a question")?;
        let value = answers::accept(question, value.as_ref())?;
        self.answers.insert(question_id, value);
        Ok(())
    }

    pub fn clear_answer(&mut self, question_id: QuestionId) -> Result<(), EngineError> {
        self.editable_question(question_id, "clear an answer")?;
        self.answers.remove(question_id);
        Ok(())
    }

    /// Validates completeness and, if everything is answered, moves to
    /// `Submitting` and returns the payload to deliver.
    pub fn begin_submit(&mut self) -> Result<(Ticket, SubmissionPayload), EngineError> {
        if !self.can_submit() {
            return Err(self.invalid("submit"));
        }
        let Some(survey) = self.survey.as_ref() else {
            return Err(self.invalid("submit"));
        };
        let unanswered = self.answers.unanswered(survey);
        if !unanswered.is_empty() {
            return Err(ValidationError { unanswered }.into());
        }
        let payload = SubmissionPayload {
            survey_id: self.survey_id,
            answers: self.answers.entries(survey),
        };
        self.state = FormState::Submitting;
        Ok((self.issue_ticket(), payload))
    }

    pub fn finish_submit(&mut self, ticket: Ticket, result: Result<(), SubmissionError>) -> bool {
        if self.state != FormState::Submitting || !self.take_pending(ticket) {
            return false;
        }
        self.state = match result {
            Ok(()) => {
                self.answers.clear();
                FormState::Submitted
            }
            Err(e) => FormState::Error(e),
        };
        true
    }

    pub fn close(&mut self) {
        self.answers.clear();
        self.pending = None;
        self.state = FormState::Closed;
    }

    fn editable_question(
        &self,
        question_id: QuestionId,
        operation: &'static str,
    ) -> Result<&Question, EngineError> {
        if !self.is_editable() {
            return Err(self.invalid(operation));
        }
        self.survey
            .as_ref()
            .and_then(|s| s.question(question_id))
            .ok_or(EngineError::UnknownQuestion(question_id))
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.pending = Some(ticket);
        ticket
    }

    fn take_pending(&mut self, ticket: Ticket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    fn invalid(&self, operation: &'static str) -> EngineError {
        EngineError::InvalidState {
            operation,
            state: self.state.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::error::RenderError;
    use crate::survey::types::{AnswerEntry, ProfileCategory, QuestionKind};

    fn survey(questions: Vec<Question>) -> Survey {
        Survey {
            id: SurveyId(1),
            name: "Survei Kepuasan Masyarakat".into(),
            description: "Layanan kelurahan".into(),
            questions,
        }
    }

    fn question(id: i64, kind: QuestionKind) -> Question {
        Question {
            id: QuestionId(id),
            prompt: format!("Pertanyaan {id}"),
            kind,
            profile: None,
        }
    }

    fn editing(questions: Vec<Question>) -> FormEngine {
        let (mut engine, ticket) = FormEngine::open(SurveyId(1));
        assert!(engine.finish_load(ticket, Ok(survey(questions))));
        engine
    }

    #[test]
    fn starts_loading_without_controls() {
        let (engine, _) = FormEngine::open(SurveyId(1));
        assert_eq!(engine.state(), &FormState::Loading);
        assert!(!engine.is_editable());
        assert!(engine.display_order().is_empty());
    }

    #[test]
    fn setting_answers_while_loading_is_rejected() {
        let (mut engine, _) = FormEngine::open(SurveyId(1));
        assert!(matches!(
            engine.set_answer(QuestionId(1), "x"),
            Err(EngineError::InvalidState { .. })
        ));
    }

    #[test]
    fn failed_load_can_be_retried() {
        let (mut engine, ticket) = FormEngine::open(SurveyId(1));
        engine.finish_load(ticket, Err(FetchError::NotFound(SurveyId(1))));
        assert_eq!(
            engine.state(),
            &FormState::LoadFailed(FetchError::NotFound(SurveyId(1)))
        );

        let retry = engine.retry_load().unwrap();
        assert_eq!(engine.state(), &FormState::Loading);
        assert!(!engine.finish_load(ticket, Ok(survey(vec![]))), "old ticket is stale");
        assert!(engine.finish_load(retry, Ok(survey(vec![]))));
        assert_eq!(engine.state(), &FormState::Editing);
    }

    #[test]
    fn submit_requires_every_question() {
        let mut engine = editing(vec![
            question(1, QuestionKind::ShortText),
            question(2, QuestionKind::Rating),
        ]);
        engine.set_answer(QuestionId(2), "4").unwrap();

        let err = engine.begin_submit().unwrap_err();
        assert_eq!(
            err,
            EngineError::Validation(ValidationError {
                unanswered: vec![QuestionId(1)]
            })
        );
        assert_eq!(engine.state(), &FormState::Editing);

        engine.set_answer(QuestionId(1), "Budi").unwrap();
        let (_, payload) = engine.begin_submit().unwrap();
        assert_eq!(payload.answers.len(), 2);
        assert_eq!(engine.state(), &FormState::Submitting);
    }

    #[test]
    fn repeated_identical_answer_is_idempotent() {
        let mut engine = editing(vec![question(1, QuestionKind::ShortText)]);
        engine.set_answer(QuestionId(1), "Budi").unwrap();
        let once = engine.answers().clone();
        engine.set_answer(QuestionId(1), "Budi").unwrap();
        assert_eq!(engine.answers(), &once);
    }

    #[test]
    fn later_answer_overwrites_earlier_one() {
        let mut engine = editing(vec![
            question(1, QuestionKind::Rating),
            question(
                2,
                QuestionKind::SingleChoice {
                    options: vec!["Ya".into(), "Tidak".into()],
                },
            ),
        ]);
        engine.set_answer(QuestionId(1), "3").unwrap();
        engine.set_answer(QuestionId(1), "5").unwrap();
        engine.set_answer(QuestionId(2), "Ya").unwrap();
        engine.set_answer(QuestionId(2), "Tidak").unwrap();

        assert_eq!(engine.answers().get(QuestionId(1)), Some("5"));
        assert_eq!(engine.answers().get(QuestionId(2)), Some("Tidak"));
        let (_, payload) = engine.begin_submit().unwrap();
        assert_eq!(
            payload.answers[0],
            AnswerEntry {
                question_id: QuestionId(1),
                answer: "5".into()
            }
        );
    }

    #[test]
    fn unknown_questions_are_rejected() {
        let mut engine = editing(vec![question(1, QuestionKind::ShortText)]);
        assert_eq!(
            engine.set_answer(QuestionId(9), "x"),
            Err(EngineError::UnknownQuestion(QuestionId(9)))
        );
    }

    #[test]
    fn clearing_an_answer_makes_it_required_again() {
        let mut engine = editing(vec![question(1, QuestionKind::LongText)]);
        engine.set_answer(QuestionId(1), "Pelayanan cepat").unwrap();
        engine.clear_answer(QuestionId(1)).unwrap();
        assert!(matches!(
            engine.begin_submit(),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn unrenderable_question_blocks_submission() {
        let mut engine = editing(vec![
            question(1, QuestionKind::ShortText),
            question(2, QuestionKind::Unrenderable(RenderError::UnknownType("slider".into()))),
        ]);
        engine.set_answer(QuestionId(1), "Budi").unwrap();
        assert!(engine.set_answer(QuestionId(2), "3").is_err());
        assert_eq!(engine.unanswered(), vec![QuestionId(2)]);
        assert!(engine.begin_submit().is_err());
    }

    #[test]
    fn no_second_submit_while_one_is_in_flight() {
        let mut engine = editing(vec![question(1, QuestionKind::ShortText)]);
        engine.set_answer(QuestionId(1), "Budi").unwrap();
        engine.begin_submit().unwrap();

        assert!(!engine.can_submit());
        assert!(matches!(
            engine.begin_submit(),
            Err(EngineError::InvalidState { .. })
        ));
        assert!(engine.set_answer(QuestionId(1), "Siti").is_err());
    }

    #[test]
    fn failed_submission_keeps_answers_for_retry() {
        let mut engine = editing(vec![question(1, QuestionKind::ShortText)]);
        engine.set_answer(QuestionId(1), "Budi").unwrap();
        let (ticket, first) = engine.begin_submit().unwrap();

        assert!(engine.finish_submit(ticket, Err(SubmissionError::new("timeout"))));
        assert_eq!(
            engine.state(),
            &FormState::Error(SubmissionError::new("timeout"))
        );
        assert_eq!(engine.answers().get(QuestionId(1)), Some("Budi"));

        let (retry, second) = engine.begin_submit().unwrap();
        assert_eq!(first, second);
        assert!(engine.finish_submit(retry, Ok(())));
        assert_eq!(engine.state(), &FormState::Submitted);
        assert!(!engine.is_editable());
    }

    #[test]
    fn completions_after_close_are_ignored() {
        let mut engine = editing(vec![question(1, QuestionKind::ShortText)]);
        engine.set_answer(QuestionId(1), "Budi").unwrap();
        let (ticket, _) = engine.begin_submit().unwrap();

        engine.close();
        assert!(!engine.finish_submit(ticket, Ok(())));
        assert_eq!(engine.state(), &FormState::Closed);
        assert!(engine.answers().is_empty());

        let (mut loading, ticket) = FormEngine::open(SurveyId(2));
        loading.close();
        assert!(!loading.finish_load(ticket, Ok(survey(vec![]))));
        assert!(loading.survey().is_none());
    }

    #[test]
    fn display_order_leaves_payload_order_alone() {
        let mut profile = question(2, QuestionKind::ShortText);
        profile.prompt = "Jenis kelamin".into();
        profile.profile = Some(ProfileCategory::Gender);
        let mut engine = editing(vec![question(1, QuestionKind::ShortText), profile]);

        let shown: Vec<QuestionId> = engine.display_order().iter().map(|q| q.id).collect();
        assert_eq!(shown, vec![QuestionId(2), QuestionId(1)]);

        engine.set_answer(QuestionId(2), "Perempuan").unwrap();
        engine.set_answer(QuestionId(1), "Imogiri").unwrap();
        let (_, payload) = engine.begin_submit().unwrap();
        let sent: Vec<QuestionId> = payload.answers.iter().map(|a| a.question_id).collect();
        assert_eq!(sent, vec![QuestionId(1), QuestionId(2)]);
    }
}

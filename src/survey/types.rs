use std::fmt;

use super::error::RenderError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurveyId(pub i64);

impl fmt::Display for SurveyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuestionId(pub i64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input shape a question accepts.
///
/// `Unrenderable` carries questions whose upstream definition could not be
/// mapped onto one of the supported shapes. They stay in the survey so they
/// keep blocking submission until the data is fixed upstream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionKind {
    ShortText,
    LongText,
    SingleChoice { options: Vec<String> },
    Rating,
    Unrenderable(RenderError),
}

impl QuestionKind {
    pub fn is_renderable(&self) -> bool {
        !matches!(self, QuestionKind::Unrenderable(_))
    }
}

/// Demographic categories pinned to the top of a form, in display priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProfileCategory {
    Gender,
    Age,
    Education,
    Occupation,
    ServiceType,
}

impl ProfileCategory {
    pub fn priority(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub kind: QuestionKind,
    pub profile: Option<ProfileCategory>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Survey {
    pub id: SurveyId,
    pub name: String,
    pub description: String,
    pub questions: Vec<Question>,
}

impl Survey {
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// Listing entry for the survey picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurveySummary {
    pub id: SurveyId,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerEntry {
    pub question_id: QuestionId,
    pub answer: String,
}

/// What gets handed to the submission sink. Answers follow the survey's own
/// question order, not the display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub survey_id: SurveyId,
    pub answers: Vec<AnswerEntry>,
}

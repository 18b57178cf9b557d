use thiserror::Error;

use super::types::{QuestionId, SurveyId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("survey {0} was not found")]
    NotFound(SurveyId),
    #[error("{0}")]
    Network(String),
    #[error("server responded with {status}: {message}")]
    Server { status: u16, message: String },
    #[error("could not read the server response: {0}")]
    Decode(String),
}

/// Raised locally when `submit` finds questions without an answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("please answer all questions ({} left unanswered)", unanswered.len())]
pub struct ValidationError {
    pub unanswered: Vec<QuestionId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmissionError {
    pub status: Option<u16>,
    pub message: String,
}

impl SubmissionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("unsupported question type `{0}`")]
    UnknownType(String),
    #[error("choice question has no options")]
    MissingOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("answer for question {0} must not be empty")]
    Empty(QuestionId),
    #[error("`{value}` is not an option of question {question}")]
    NotAnOption { question: QuestionId, value: String },
    #[error("rating for question {question} must be a whole number from 1 to 5, got `{value}`")]
    RatingOutOfRange { question: QuestionId, value: String },
    #[error("question {question} cannot be answered: {source}")]
    Unrenderable {
        question: QuestionId,
        source: RenderError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("cannot {operation} while the form is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
    #[error("question {0} is not part of this survey")]
    UnknownQuestion(QuestionId),
    #[error(transparent)]
    InvalidAnswer(#[from] AnswerError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

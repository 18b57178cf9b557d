use std::future::Future;

use super::error::{FetchError, SubmissionError};
use super::types::{SubmissionPayload, Survey, SurveyId};

/// Read side: hands out surveys already normalized into domain types.
pub trait SurveyRepository: Send + Sync + 'static {
    fn get_survey_by_id(
        &self,
        id: SurveyId,
    ) -> impl Future<Output = Result<Survey, FetchError>> + Send;
}

/// Write side: durably records a completed answer set.
pub trait SubmissionSink: Send + Sync + 'static {
    fn submit(
        &self,
        payload: SubmissionPayload,
    ) -> impl Future<Output = Result<(), SubmissionError>> + Send;
}

use log::{error, info};
use reqwest::Client;

use crate::models::result::SubmitResultRequest;
use crate::survey::error::SubmissionError;
use crate::survey::types::SubmissionPayload;

use super::client::{error_message, transport_message};

pub async fn submit_results(
    client: &Client,
    base_url: &str,
    payload: &SubmissionPayload,
) -> Result<(), SubmissionError> {
    let url = format!("{}/api/results", base_url);
    let request = SubmitResultRequest::from(payload);
    let resp = client.post(&url).json(&request).send().await.map_err(|e| {
        error!("Failed to reach {}: {}", url, e);
        SubmissionError::new(transport_message(&e))
    })?;

    let status = resp.status();
    if status.is_success() {
        info!("Answers for survey {} submitted successfully", payload.survey_id);
        Ok(())
    } else {
        let message = error_message(&resp.bytes().await.unwrap_or_default());
        error!(
            "Submitting answers for survey {} failed: {} {}",
            payload.survey_id, status, message
        );
        Err(SubmissionError {
            status: Some(status.as_u16()),
            message,
        })
    }
}

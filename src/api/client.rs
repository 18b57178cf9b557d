use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;

use crate::config::{normalize_base_url, AppConfig};
use crate::models::envelope::ApiErrorBody;
use crate::survey::error::{FetchError, SubmissionError};
use crate::survey::repository::{SubmissionSink, SurveyRepository};
use crate::survey::types::{SubmissionPayload, Survey, SurveyId, SurveySummary};

use super::{results, surveys};

pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error - please check your connection";

/// REST client for the survey backend. Serves as both the survey repository
/// and the submission sink.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("API token contains characters not allowed in a header")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: normalize_base_url(&config.api_base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_surveys(&self) -> Result<Vec<SurveySummary>, FetchError> {
        surveys::get_surveys(&self.client, &self.base_url).await
    }
}

impl SurveyRepository for ApiClient {
    async fn get_survey_by_id(&self, id: SurveyId) -> Result<Survey, FetchError> {
        surveys::get_survey_by_id(&self.client, &self.base_url, id).await
    }
}

impl SubmissionSink for ApiClient {
    async fn submit(&self, payload: SubmissionPayload) -> Result<(), SubmissionError> {
        results::submit_results(&self.client, &self.base_url, &payload).await
    }
}

/// Pulls `message` out of an error body, falling back to a generic text.
pub fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_owned())
}

pub fn transport_message(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("{} (request timed out)", NETWORK_ERROR_MESSAGE)
    } else if e.is_connect() || e.is_request() {
        NETWORK_ERROR_MESSAGE.to_owned()
    } else {
        e.to_string()
    }
}

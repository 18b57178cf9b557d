use log::{error, info};
use reqwest::{Client, StatusCode};

use crate::models::envelope::ApiEnvelope;
use crate::models::survey::{SurveyDto, SurveySummaryDto};
use crate::survey::error::FetchError;
use crate::survey::types::{Survey, SurveyId, SurveySummary};

use super::client::{error_message, transport_message};
use super::normalize;

pub async fn get_surveys(client: &Client, base_url: &str) -> Result<Vec<SurveySummary>, FetchError> {
    let url = format!("{}/api/surveys", base_url);
    let resp = client.get(&url).send().await.map_err(|e| {
        error!("Failed to reach {}: {}", url, e);
        FetchError::Network(transport_message(&e))
    })?;
    let status = resp.status();
    if status.is_success() {
        let response = resp
            .json::<ApiEnvelope<Vec<SurveySummaryDto>>>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        info!(
            "Survey list received successfully: {}",
            response.message.as_deref().unwrap_or("no message")
        );
        Ok(normalize::summaries(response.data))
    } else {
        let message = error_message(&resp.bytes().await.unwrap_or_default());
        error!("Failed to get survey list: {} {}", status, message);
        Err(FetchError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

pub async fn get_survey_by_id(
    client: &Client,
    base_url: &str,
    id: SurveyId,
) -> Result<Survey, FetchError> {
    let url = format!("{}/api/surveys/{}", base_url, id);
    let resp = client.get(&url).send().await.map_err(|e| {
        error!("Failed to reach {}: {}", url, e);
        FetchError::Network(transport_message(&e))
    })?;
    let status = resp.status();
    if status.is_success() {
        let response = resp
            .json::<ApiEnvelope<SurveyDto>>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        let survey = normalize::survey(response.data)?;
        info!(
            "Survey {} received successfully ({} questions)",
            id,
            survey.questions.len()
        );
        Ok(survey)
    } else if status == StatusCode::NOT_FOUND {
        error!("Survey {} not found", id);
        Err(FetchError::NotFound(id))
    } else {
        let message = error_message(&resp.bytes().await.unwrap_or_default());
        error!("Failed to get survey {}: {} {}", id, status, message);
        Err(FetchError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::{test_server, NETWORK_ERROR_MESSAGE};
    use crate::survey::types::{QuestionId, QuestionKind};

    #[tokio::test]
    async fn fetches_and_normalizes_a_survey() {
        let body = r#"{
            "message": "ok",
            "data": {
                "id": 2,
                "namaSurvey": "Survei Kepuasan Masyarakat",
                "deskripsi": "Kelurahan Imogiri",
                "pertanyaan": [
                    { "id": 11, "teks": "Jenis kelamin", "tipe": "multiple-choice", "opsi": ["Laki-laki", "Perempuan"] },
                    { "id": 12, "teks": "Nilai pelayanan", "tipe": "rating" }
                ]
            }
        }"#;
        let (base_url, server) = test_server::respond_once(200, body).await;

        let survey = get_survey_by_id(&Client::new(), &base_url, SurveyId(2))
            .await
            .unwrap();
        assert!(server.await.unwrap().starts_with("GET /api/surveys/2 "));
        assert_eq!(survey.name, "Survei Kepuasan Masyarakat");
        assert_eq!(survey.questions[1].id, QuestionId(12));
        assert_eq!(survey.questions[1].kind, QuestionKind::Rating);
        assert!(survey.questions[0].profile.is_some());
    }

    #[tokio::test]
    async fn missing_survey_is_not_found() {
        let (base_url, _server) =
            test_server::respond_once(404, r#"{"message":"Survey not found"}"#).await;
        let err = get_survey_by_id(&Client::new(), &base_url, SurveyId(99))
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::NotFound(SurveyId(99)));
    }

    #[tokio::test]
    async fn server_errors_carry_the_body_message() {
        let (base_url, _server) =
            test_server::respond_once(500, r#"{"message":"Database down"}"#).await;
        let err = get_surveys(&Client::new(), &base_url).await.unwrap_err();
        assert_eq!(
            err,
            FetchError::Server {
                status: 500,
                message: "Database down".into()
            }
        );
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let (base_url, _server) = test_server::respond_once(200, r#"{"data": 5}"#).await;
        let err = get_survey_by_id(&Client::new(), &base_url, SurveyId(1))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let base_url = test_server::refused().await;
        let err = get_surveys(&Client::new(), &base_url).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
        assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
    }
}

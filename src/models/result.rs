use serde::Serialize;

use crate::survey::types::SubmissionPayload;

#[derive(Serialize, Debug, PartialEq)]
pub struct SubmitResultRequest {
    #[serde(rename = "surveyId")]
    pub survey_id: i64,
    pub jawaban: Vec<JawabanItem>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct JawabanItem {
    #[serde(rename = "pertanyaanId")]
    pub pertanyaan_id: i64,
    pub jawaban: String,
}

impl From<&SubmissionPayload> for SubmitResultRequest {
    fn from(payload: &SubmissionPayload) -> Self {
        Self {
            survey_id: payload.survey_id.0,
            jawaban: payload
                .answers
                .iter()
                .map(|a| JawabanItem {
                    pertanyaan_id: a.question_id.0,
                    jawaban: a.answer.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::types::{AnswerEntry, QuestionId, SurveyId};
    use serde_json::json;

    #[test]
    fn serializes_the_results_endpoint_shape() {
        let payload = SubmissionPayload {
            survey_id: SurveyId(4),
            answers: vec![
                AnswerEntry {
                    question_id: QuestionId(10),
                    answer: "Budi".into(),
                },
                AnswerEntry {
                    question_id: QuestionId(11),
                    answer: "5".into(),
                },
            ],
        };
        let body = serde_json::to_value(SubmitResultRequest::from(&payload)).unwrap();
        assert_eq!(
            body,
            json!({
                "surveyId": 4,
                "jawaban": [
                    { "pertanyaanId": 10, "jawaban": "Budi" },
                    { "pertanyaanId": 11, "jawaban": "5" }
                ]
            })
        );
    }
}

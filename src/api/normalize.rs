use std::collections::HashSet;

use log::warn;
use serde_json::Value;

use crate::models::survey::{QuestionDto, RawId, SurveyDto, SurveySummaryDto};
use crate::survey::error::{FetchError, RenderError};
use crate::survey::types::{
    ProfileCategory, Question, QuestionId, QuestionKind, Survey, SurveyId, SurveySummary,
};

/// Prompt phrases that mark a profile question when the backend sends no
/// explicit category. Matched on whole words.
const PROFILE_KEYWORDS: [(ProfileCategory, &[&str]); 5] = [
    (ProfileCategory::Gender, &["jenis kelamin", "kelamin", "gender"]),
    (ProfileCategory::Age, &["usia", "umur", "age"]),
    (ProfileCategory::Education, &["pendidikan", "education"]),
    (ProfileCategory::Occupation, &["pekerjaan", "profesi", "occupation"]),
    (
        ProfileCategory::ServiceType,
        &["jenis layanan", "jenis pelayanan", "service type"],
    ),
];

pub fn survey(mut dto: SurveyDto) -> Result<Survey, FetchError> {
    let id = SurveyId(numeric_id(&dto.id, "survey")?);
    let mut seen = HashSet::new();
    let mut questions = Vec::new();
    for q in dto.take_questions() {
        let question = question(q)?;
        if !seen.insert(question.id) {
            return Err(FetchError::Decode(format!(
                "survey {} repeats question id {}",
                id, question.id
            )));
        }
        questions.push(question);
    }
    Ok(Survey {
        id,
        name: dto.take_name().unwrap_or_default(),
        description: dto.take_description().unwrap_or_default(),
        questions,
    })
}

pub fn summaries(dtos: Vec<SurveySummaryDto>) -> Vec<SurveySummary> {
    dtos.into_iter()
        .filter_map(|mut dto| match dto.id.to_i64() {
            Some(id) => Some(SurveySummary {
                id: SurveyId(id),
                name: dto.take_name().unwrap_or_default(),
                description: dto.take_description(),
            }),
            None => {
                warn!("Skipping survey with unusable id {:?}", dto.id);
                None
            }
        })
        .collect()
}

fn question(mut dto: QuestionDto) -> Result<Question, FetchError> {
    let id = QuestionId(numeric_id(&dto.id, "question")?);
    let prompt = dto.take_prompt().unwrap_or_default();
    let kind = kind(dto.type_tag(), dto.option_values());
    if let QuestionKind::Unrenderable(reason) = &kind {
        warn!("Question {} cannot be rendered: {}", id, reason);
    }
    let profile = profile(&prompt, dto.category(), dto.is_profile);
    Ok(Question {
        id,
        prompt,
        kind,
        profile,
    })
}

fn numeric_id(raw: &RawId, what: &str) -> Result<i64, FetchError> {
    raw.to_i64()
        .ok_or_else(|| FetchError::Decode(format!("{what} id {raw:?} is not a number")))
}

fn kind(tag: Option<&str>, options: Option<&Value>) -> QuestionKind {
    let tag = tag.map(|t| t.trim().to_lowercase()).unwrap_or_default();
    match tag.as_str() {
        "text" | "short-text" | "short_text" => QuestionKind::ShortText,
        "textarea" | "long-text" | "long_text" => QuestionKind::LongText,
        "rating" => QuestionKind::Rating,
        "multiple-choice" | "single-choice" | "radio" => {
            let options = options.map(option_labels).unwrap_or_default();
            if options.is_empty() {
                QuestionKind::Unrenderable(RenderError::MissingOptions)
            } else {
                QuestionKind::SingleChoice { options }
            }
        }
        _ => QuestionKind::Unrenderable(RenderError::UnknownType(tag)),
    }
}

fn option_labels(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_owned()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        // Some rows store the list as a JSON string, older ones comma separated.
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(inner @ Value::Array(_)) => option_labels(&inner),
            _ => s
                .split(',')
                .map(|part| part.trim().to_owned())
                .filter(|part| !part.is_empty())
                .collect(),
        },
        _ => Vec::new(),
    }
}

fn profile(
    prompt: &str,
    category: Option<&str>,
    is_profile: Option<bool>,
) -> Option<ProfileCategory> {
    if is_profile == Some(false) {
        return None;
    }
    match category {
        Some(tag) if !tag.trim().is_empty() => {
            let parsed = parse_category(tag);
            if parsed.is_none() && is_profile == Some(true) {
                classify_prompt(prompt)
            } else {
                parsed
            }
        }
        _ => classify_prompt(prompt),
    }
}

fn parse_category(tag: &str) -> Option<ProfileCategory> {
    let tag = tag.trim().to_lowercase().replace(['_', ' '], "-");
    match tag.as_str() {
        "gender" | "jenis-kelamin" | "kelamin" => Some(ProfileCategory::Gender),
        "age" | "usia" | "umur" => Some(ProfileCategory::Age),
        "education" | "pendidikan" => Some(ProfileCategory::Education),
        "occupation" | "pekerjaan" | "profesi" => Some(ProfileCategory::Occupation),
        "service-type" | "jenis-layanan" | "layanan" => Some(ProfileCategory::ServiceType),
        _ => None,
    }
}

fn classify_prompt(prompt: &str) -> Option<ProfileCategory> {
    let prompt_words = words(prompt);
    PROFILE_KEYWORDS
        .iter()
        .find(|(_, phrases)| {
            phrases.iter().any(|phrase| {
                let phrase = words(phrase);
                prompt_words
                    .windows(phrase.len())
                    .any(|w| w == phrase.as_slice())
            })
        })
        .map(|(category, _)| *category)
}

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_owned)
        .collect()
}

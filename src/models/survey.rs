use serde::Deserialize;

/// Ids arrive as numbers from most endpoints and as strings from some.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            RawId::Number(n) => Some(*n),
            RawId::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct SurveySummaryDto {
    pub id: RawId,
    #[serde(rename = "namaSurvey")]
    pub nama_survey: Option<String>,
    pub name: Option<String>,
    pub deskripsi: Option<String>,
    pub description: Option<String>,
}

impl SurveySummaryDto {
    pub fn take_name(&mut self) -> Option<String> {
        self.nama_survey.take().or_else(|| self.name.take())
    }

    pub fn take_description(&mut self) -> Option<String> {
        self.deskripsi.take().or_else(|| self.description.take())
    }
}

#[derive(Deserialize, Debug)]
pub struct SurveyDto {
    pub id: RawId,
    #[serde(rename = "namaSurvey")]
    pub nama_survey: Option<String>,
    pub name: Option<String>,
    pub deskripsi: Option<String>,
    pub description: Option<String>,
    pub pertanyaan: Option<Vec<QuestionDto>>,
    pub questions: Option<Vec<QuestionDto>>,
}

impl SurveyDto {
    pub fn take_name(&mut self) -> Option<String> {
        self.nama_survey.take().or_else(|| self.name.take())
    }

    pub fn take_description(&mut self) -> Option<String> {
        self.deskripsi.take().or_else(|| self.description.take())
    }

    pub fn take_questions(&mut self) -> Vec<QuestionDto> {
        self.pertanyaan
            .take()
            .or_else(|| self.questions.take())
            .unwrap_or_default()
    }
}

/// Question as the backend sends it. Field names vary between backend
/// versions and some rows carry more than one spelling, so every spelling is
/// its own field and the accessors pick the first one present.
#[derive(Deserialize, Debug)]
pub struct QuestionDto {
    pub id: RawId,
    pub teks: Option<String>,
    pub text: Option<String>,
    pub pertanyaan: Option<String>,
    pub tipe: Option<String>,
    pub r#type: Option<String>,
    pub jenis: Option<String>,
    pub opsi: Option<serde_json::Value>,
    pub options: Option<serde_json::Value>,
    pub kategori: Option<String>,
    pub section: Option<String>,
    #[serde(rename = "isProfile")]
    pub is_profile: Option<bool>,
}

impl QuestionDto {
    pub fn take_prompt(&mut self) -> Option<String> {
        self.teks
            .take()
            .or_else(|| self.text.take())
            .or_else(|| self.pertanyaan.take())
    }

    pub fn type_tag(&self) -> Option<&str> {
        self.tipe
            .as_deref()
            .or(self.r#type.as_deref())
            .or(self.jenis.as_deref())
    }

    pub fn option_values(&self) -> Option<&serde_json::Value> {
        self.opsi.as_ref().or(self.options.as_ref())
    }

    pub fn category(&self) -> Option<&str> {
        self.kategori.as_deref().or(self.section.as_deref())
    }
}

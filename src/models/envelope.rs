use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct ApiEnvelope<T> {
    pub message: Option<String>,
    pub data: T,
}

#[derive(Deserialize, Debug, Default)]
pub struct ApiErrorBody {
    pub message: Option<String>,
}

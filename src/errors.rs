// src/errors.rs
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StyleSeerError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Empty result: {0}")]
    EmptyResult(String),

    #[error("LLM service error: {0}")]
    LLM(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Nothing to analyze: {0}")]
    NothingToAnalyze(String),
}

impl StyleSeerError {
    /// Short label shown to users next to the detailed message.
    pub fn label(&self) -> &'static str {
        match self {
            StyleSeerError::Network(_) => "Shopping service error",
            StyleSeerError::Validation(_) => "Validation error",
            StyleSeerError::EmptyResult(_) => "No results",
            StyleSeerError::LLM(_) => "AI service error",
            StyleSeerError::Storage(_) => "History storage error",
            StyleSeerError::ImageProcessing(_) => "Image processing error",
            StyleSeerError::Serialization(_) => "Data processing error",
            StyleSeerError::Config(_) => "Configuration error",
            StyleSeerError::NothingToAnalyze(_) => "Nothing to analyze",
        }
    }
}

impl ResponseError for StyleSeerError {
    fn status_code(&self) -> StatusCode {
        match self {
            StyleSeerError::Network(_) => StatusCode::BAD_GATEWAY,
            StyleSeerError::Validation(_) => StatusCode::BAD_REQUEST,
            StyleSeerError::EmptyResult(_) => StatusCode::NOT_FOUND,
            StyleSeerError::LLM(_) => StatusCode::SERVICE_UNAVAILABLE,
            StyleSeerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StyleSeerError::ImageProcessing(_) => StatusCode::BAD_REQUEST,
            StyleSeerError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StyleSeerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StyleSeerError::NothingToAnalyze(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.label(),
            "message": self.to_string()
        }))
    }
}

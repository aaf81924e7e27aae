use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::engine::ScoreError;
use crate::catalog::ResolveError;

const ROLE_NOT_FOUND_HINT: &str = "Job title not found in database. Try common roles like Software Engineer, Data Analyst, Data Scientist, etc.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// No catalog role matched and the fallback policy allows no substitute.
    /// A normal outcome for the request, surfaced to the user as a warning.
    #[error("Role not found: {0}")]
    RoleNotFound(String),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),
}

// Extractor rejections answer with the same JSON error body as everything else.

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<ScoreError> for AppError {
    fn from(err: ScoreError) -> Self {
        match err {
            ScoreError::Resolve(ResolveError::RoleNotFound { title }) => {
                AppError::RoleNotFound(title)
            }
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::RoleNotFound(title) => {
                tracing::warn!("Role not found: {title}");
                (
                    StatusCode::NOT_FOUND,
                    "ROLE_NOT_FOUND",
                    format!("'{title}': {ROLE_NOT_FOUND_HINT}"),
                )
            }
            AppError::Multipart(e) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("Malformed upload: {e}"),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::engine::ScoringMode;

    #[test]
    fn test_role_not_found_maps_to_404() {
        let err: AppError = ScoreError::Resolve(ResolveError::RoleNotFound {
            title: "Astronaut".to_string(),
        })
        .into();
        assert!(matches!(err, AppError::RoleNotFound(ref t) if t == "Astronaut"));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_missing_target_maps_to_400() {
        let err: AppError = ScoreError::MissingDescription(ScoringMode::WeightedComposite).into();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_no_skills_in_description_maps_to_400() {
        let err: AppError = ScoreError::Resolve(ResolveError::NoSkillsInDescription).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}

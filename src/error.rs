use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::recommendations::RecommendError;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session store error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error(transparent)]
    Recommendation(#[from] RecommendError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Recommendation(e) => match e {
                RecommendError::UnknownTitle(_) => StatusCode::NOT_FOUND,
                RecommendError::ZeroWeightRatings | RecommendError::NonFiniteScores => {
                    StatusCode::BAD_REQUEST
                }
                RecommendError::EmptyCatalog => StatusCode::SERVICE_UNAVAILABLE,
                RecommendError::CatalogMismatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Database(_) | AppError::Cache(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            AppError::NotFound(msg)
            | AppError::InvalidInput(msg)
            | AppError::Unauthorized(msg)
            | AppError::Conflict(msg) => msg,
            AppError::Database(_) | AppError::Cache(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                self.to_string()
            }
            AppError::Recommendation(e) => e.to_string(),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_errors_map_to_client_statuses() {
        let unknown: AppError = RecommendError::UnknownTitle("Nope".to_string()).into();
        assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);

        let zero: AppError = RecommendError::ZeroWeightRatings.into();
        assert_eq!(zero.status_code(), StatusCode::BAD_REQUEST);

        let overflow: AppError = RecommendError::NonFiniteScores.into();
        assert_eq!(overflow.status_code(), StatusCode::BAD_REQUEST);

        let empty: AppError = RecommendError::EmptyCatalog.into();
        assert_eq!(empty.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_auth_errors_map_to_statuses() {
        assert_eq!(
            AppError::Unauthorized("x".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Conflict("x".to_string()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_into_response_keeps_status() {
        let response = AppError::InvalidInput("bad rating".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Rate limited")]
    RateLimited,

    /// The LLM or news provider failed (network error or non-2xx status).
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Upstream request timed out")]
    UpstreamTimeout,

    /// The upstream answered, but not in the shape we asked for.
    #[error("Upstream format error: {0}")]
    UpstreamFormat(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream(_) | AppError::UpstreamFormat(_) => StatusCode::BAD_GATEWAY,
            AppError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound(msg) | AppError::Validation(msg) | AppError::InvalidArgument(msg) => {
                msg.clone()
            }
            AppError::Upstream(detail) => {
                tracing::warn!(error = %detail, "Upstream request failed");
                "Upstream service unavailable".into()
            }
            AppError::UpstreamFormat(detail) => {
                tracing::warn!(error = %detail, "Upstream returned an unexpected format");
                "Upstream service returned an invalid response".into()
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "Internal server error".into()
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                "Internal server error".into()
            }
            AppError::Unauthorized | AppError::RateLimited | AppError::UpstreamTimeout => {
                self.to_string()
            }
        };

        let body = json!({
            "error": {
                "message": message,
                "code": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_upstream_failures_map_to_gateway_statuses() {
        assert_eq!(AppError::Upstream("boom".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::UpstreamFormat("no json".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(AppError::UpstreamTimeout.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_upstream_detail_is_not_leaked() {
        let response = AppError::UpstreamFormat("raw model text".into()).into_response();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"]["code"], 502);
        assert!(!body.to_string().contains("raw model text"));
    }
}

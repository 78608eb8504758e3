use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as RespJson, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // Mileage range rejected before any mutation is attempted
    #[error("Invalid mileage range: {0}")]
    InvalidRange(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // Only RESERVED records can be canceled or returned
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Batch stopped after {completed} of {total} records: {message}")]
    BatchInterrupted {
        completed: usize,
        total: usize,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRange(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::BatchInterrupted { .. }
            | AppError::Config(_)
            | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AppError::BatchInterrupted { completed, total, .. } => serde_json::json!({
                "error": self.to_string(),
                "completed": completed,
                "total": total,
            }),
            // Driver messages stay in the log
            AppError::Database(e) => {
                tracing::error!("🚨 Database error: {}", e);
                serde_json::json!({ "error": "Database error" })
            }
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        (status, RespJson(body)).into_response()
    }
}

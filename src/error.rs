use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")] Database(#[from] sea_orm::DbErr),

    #[error("Invalid input: {0}")] InvalidInput(String),

    #[error("{0}")] NotFound(String),

    #[error("Missing or invalid bearer token")]
    Unauthorized,

    #[error("Auth provider error: {0}")] Auth(String),

    #[error("External service error: {0}")] External(String),

    #[error("Configuration error: {0}")] Config(String),

    #[error("Internal error: {0}")] Internal(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// Shorthand for a 400 tied to one request field.
    pub fn missing(field: &str) -> Self {
        AppError::InvalidInput(format!("{} is required", field))
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        let (code, message, field) = match self {
            // Row-level failures are passed through verbatim, the way the hosted store reports them.
            AppError::Database(e) => ("DATABASE_ERROR", e.to_string(), None),
            AppError::InvalidInput(msg) => {
                let field = msg
                    .strip_suffix(" is required")
                    .filter(|f| !f.contains(' '))
                    .map(|f| f.to_string());
                ("INVALID_INPUT", msg.clone(), field)
            }
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone(), None),
            AppError::Unauthorized =>
                (
                    "UNAUTHORIZED",
                    "Missing or invalid bearer token".to_string(),
                    Some("authorization".to_string()),
                ),
            AppError::Auth(msg) => ("AUTH_ERROR", msg.clone(), None),
            AppError::External(msg) => ("EXTERNAL_ERROR", msg.clone(), None),
            AppError::Config(msg) => ("CONFIG_ERROR", msg.clone(), None),
            AppError::Internal(msg) => ("INTERNAL_ERROR", msg.clone(), None),
        };

        ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::NotFound(_) => axum::http::StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) | AppError::Database(_) | AppError::Auth(_) => {
                axum::http::StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized => axum::http::StatusCode::UNAUTHORIZED,
            AppError::External(_) => axum::http::StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Internal(_) => {
                axum::http::StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("request rejected: {}", self);
        }

        let response = self.to_error_response();
        (status, axum::Json(response)).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::External(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

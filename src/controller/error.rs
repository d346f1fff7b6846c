use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};

use serde::Serialize;

use thiserror::Error;

use crate::error::Error;

pub type RestResult<T> = Result<T, RestError>;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal Server Error")]
    InternalError,
}

impl From<Error> for RestError {
    fn from(e: Error) -> Self {
        match e {
            Error::InvalidInput { .. } => {
                tracing::warn!("Rejected request: {}", e);
                Self::BadRequest(e.to_string())
            }
            Error::Conflict => {
                tracing::warn!("Rejected duplicate subscription");
                Self::Conflict(e.to_string())
            }
            Error::NotFound => Self::NotFound(e.to_string()),
            Error::Internal(error) => {
                tracing::error!(error.cause_chain = ?error, "Database error");
                Self::InternalError
            }
        }
    }
}

/// JSON body of every error response
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

/// JSON extractor settings reporting malformed bodies as `RestError`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|e: JsonPayloadError, _req: &HttpRequest| {
        RestError::BadRequest(format!("Invalid request body: {}", e)).into()
    })
}

/// Query extractor settings reporting malformed query strings as `RestError`
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|e: QueryPayloadError, _req: &HttpRequest| {
        RestError::BadRequest(format!("Invalid query parameters: {}", e)).into()
    })
}

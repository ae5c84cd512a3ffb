use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use fxrates_core::errors::Error as CoreError;
use serde::Serialize;
use thiserror::Error;

const BAD_REQUEST_TYPE: &str = "https://tools.ietf.org/html/rfc7231#section-6.5.1";
const NOT_FOUND_TYPE: &str = "https://tools.ietf.org/html/rfc7231#section-6.5.4";
const INTERNAL_ERROR_TYPE: &str = "https://tools.ietf.org/html/rfc7231#section-6.6.1";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("No exchange rate found for {from} to {to} on {date}")]
    RateNotFound {
        from: String,
        to: String,
        date: NaiveDate,
    },
    #[error("{0}")]
    BadRequest(String),
}

/// RFC 7807 problem details body.
#[derive(Serialize, Debug)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub status: u16,
    pub detail: String,
}

impl ApiError {
    fn problem(&self) -> ProblemDetails {
        match self {
            ApiError::Core(CoreError::Validation(e)) => ProblemDetails {
                kind: BAD_REQUEST_TYPE,
                title: "One or more validation errors occurred.",
                status: StatusCode::BAD_REQUEST.as_u16(),
                detail: e.to_string(),
            },
            ApiError::BadRequest(reason) => ProblemDetails {
                kind: BAD_REQUEST_TYPE,
                title: "One or more validation errors occurred.",
                status: StatusCode::BAD_REQUEST.as_u16(),
                detail: reason.clone(),
            },
            ApiError::RateNotFound { .. } => ProblemDetails {
                kind: NOT_FOUND_TYPE,
                title: "Exchange rate not found",
                status: StatusCode::NOT_FOUND.as_u16(),
                detail: self.to_string(),
            },
            ApiError::Core(_) => ProblemDetails {
                kind: INTERNAL_ERROR_TYPE,
                title: "An error occurred while processing your request.",
                status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                detail: "The exchange rate could not be determined.".to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let problem = self.problem();
        let status =
            StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let mut response = (status, Json(problem)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

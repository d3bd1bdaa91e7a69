//! # ApiError
//!
//! Bridges `AppError` into actix responses, rendered through the error page.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use askama::Template;
use cr_core::error::AppError;
use cr_ui::ErrorTemplate;
use std::fmt;

#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            AppError::NotFound(..) | AppError::NoRoute(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Internal details stay in the log
        let message = match &self.0 {
            AppError::Internal(detail) => {
                log::error!("request failed: {detail}");
                "Something went wrong on our side.".to_string()
            }
            other => other.to_string(),
        };

        let page = ErrorTemplate {
            title: status.canonical_reason().unwrap_or("Error"),
            status: status.as_u16(),
            message: &message,
        };
        match page.render() {
            Ok(html) => HttpResponse::build(status)
                .content_type("text/html; charset=utf-8")
                .body(html),
            Err(err) => {
                log::error!("error page failed to render: {err}");
                HttpResponse::build(status).body(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotFound("City".into(), "x".into()), 404),
            (AppError::NoRoute("/nowhere".into()), 404),
            (AppError::ValidationError("bad".into()), 400),
            (AppError::Conflict("dup".into()), 409),
            (AppError::Internal("disk".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status_code().as_u16(), status);
        }
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let response = ApiError(AppError::Internal("secret path /var/db".into())).error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

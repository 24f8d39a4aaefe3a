// Error handling for AskMe HTTP handlers
// Maps domain errors raised through anyhow onto HTTP statuses

use std::fmt::{Display, Formatter};

use actix_web::{HttpRequest, HttpResponse, error::InternalError, http::StatusCode};

pub use askme_common::AskError;
pub use askme_common::error::{
    ACCESS_DENIED, DATA_ACCESS_ERROR, NOT_AUTHENTICATED, PARAMETER_VALIDATE_ERROR,
    RESOURCE_CONFLICT, RESOURCE_NOT_FOUND, SERVER_ERROR,
};

use crate::model::response as common;

// Local wrapper for application errors to implement actix-web error handling
#[derive(Debug)]
pub struct AppError {
    inner: anyhow::Error,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError { inner: value }
    }
}

impl From<AskError> for AppError {
    fn from(value: AskError) -> Self {
        AppError {
            inner: value.into(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(value: validator::ValidationErrors) -> Self {
        AskError::IllegalArgument(value.to_string()).into()
    }
}

impl AppError {
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    pub fn downcast_ref<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    fn status_and_code(&self) -> (StatusCode, i32) {
        match self.downcast_ref::<AskError>() {
            Some(AskError::IllegalArgument(_)) | Some(AskError::ConfigError(_)) => {
                (StatusCode::BAD_REQUEST, PARAMETER_VALIDATE_ERROR.code)
            }
            Some(AskError::NotAuthenticated(_)) => {
                (StatusCode::UNAUTHORIZED, NOT_AUTHENTICATED.code)
            }
            Some(AskError::PermissionDenied(_)) => (StatusCode::FORBIDDEN, ACCESS_DENIED.code),
            Some(AskError::UserNotExist(_))
            | Some(AskError::QuestionNotExist(_))
            | Some(AskError::AnswerNotExist(_))
            | Some(AskError::TagNotExist(_)) => (StatusCode::NOT_FOUND, RESOURCE_NOT_FOUND.code),
            Some(AskError::UserAlreadyExist(_)) | Some(AskError::TagAlreadyExist(_)) => {
                (StatusCode::CONFLICT, RESOURCE_CONFLICT.code)
            }
            Some(AskError::DatabaseError(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, DATA_ACCESS_ERROR.code)
            }
            Some(AskError::InternalError(_)) | None => {
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.code)
            }
        }
    }
}

impl actix_web::error::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status_and_code().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, code) = self.status_and_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self.inner, "request failed");
            SERVER_ERROR.message.to_string()
        } else {
            self.inner.to_string()
        };

        common::Result::<String>::http_response(status.as_u16(), code, message, String::new())
    }
}

/// Turn extractor failures (bad JSON, bad query string) into a 400 envelope
pub fn bad_request_handler<E>(err: E, _req: &HttpRequest) -> actix_web::Error
where
    E: std::error::Error + 'static,
{
    let response = common::Result::<String>::http_response(
        StatusCode::BAD_REQUEST.as_u16(),
        PARAMETER_VALIDATE_ERROR.code,
        err.to_string(),
        String::new(),
    );
    InternalError::from_response(err, response).into()
}

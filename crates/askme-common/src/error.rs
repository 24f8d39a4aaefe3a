//! Error types and error codes for AskMe
//!
//! This module defines:
//! - `AskError`: Application-specific error enum
//! - `ErrorCode`: Structured error codes for API responses

use serde::{Deserialize, Serialize};

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum AskError {
    #[error("caused: {0}")]
    IllegalArgument(String),

    #[error("{0}")]
    NotAuthenticated(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("user '{0}' not exist!")]
    UserNotExist(String),

    #[error("user '{0}' already exist!")]
    UserAlreadyExist(String),

    #[error("question '{0}' not exist")]
    QuestionNotExist(i32),

    #[error("answer '{0}' not exist")]
    AnswerNotExist(i32),

    #[error("tag '{0}' not exist")]
    TagNotExist(String),

    #[error("tag '{0}' already exist")]
    TagAlreadyExist(String),

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl AskError {
    pub fn not_authenticated() -> Self {
        AskError::NotAuthenticated("Authentication credentials were not provided.".to_string())
    }

    pub fn permission_denied() -> Self {
        AskError::PermissionDenied(
            "You do not have permission to perform this action.".to_string(),
        )
    }
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

pub const SUCCESS: ErrorCode<'static> = ErrorCode {
    code: 0,
    message: "success",
};

pub const PARAMETER_MISSING: ErrorCode<'static> = ErrorCode {
    code: 10000,
    message: "parameter missing",
};

pub const ACCESS_DENIED: ErrorCode<'static> = ErrorCode {
    code: 10001,
    message: "access denied",
};

pub const DATA_ACCESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10002,
    message: "data access error",
};

pub const NOT_AUTHENTICATED: ErrorCode<'static> = ErrorCode {
    code: 10003,
    message: "not authenticated",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const MEDIA_TYPE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20003,
    message: "MediaType Error",
};

pub const RESOURCE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20004,
    message: "resource not found",
};

pub const RESOURCE_CONFLICT: ErrorCode<'static> = ErrorCode {
    code: 20005,
    message: "resource conflict",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};

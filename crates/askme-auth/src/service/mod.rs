//! Authentication service implementations

pub mod account;
pub mod auth;
pub mod password;

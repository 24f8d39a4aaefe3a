//! AskMe Auth - Authentication
//!
//! This crate provides:
//! - JWT login tokens backed by revocable token rows
//! - bcrypt password hashing
//! - Account flows: register, login, logout

pub mod model;
pub mod service;

// Re-export commonly used types
pub use model::*;

//! AskMe server library
//!
//! HTTP API, configuration, middleware and startup code for the AskMe
//! question and answer service. The binary in `main.rs` wires these
//! together; integration tests build the same application in-process.

pub mod api;
pub mod auth;
pub mod command;
pub mod error;
pub mod middleware;
pub mod model;
pub mod secured;
pub mod startup;

pub use error::AppError;
pub use secured::{Access, Principal, Secured};

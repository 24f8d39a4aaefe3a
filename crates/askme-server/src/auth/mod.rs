// Account endpoints: register, login, logout
//
// Token handling itself lives in the askme-auth crate.

pub mod model;
pub mod route;

pub use askme_auth::service;

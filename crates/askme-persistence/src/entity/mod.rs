//! SeaORM entity definitions

pub mod prelude;

pub mod answers;
pub mod auth_tokens;
pub mod likes;
pub mod question_tags;
pub mod questions;
pub mod tags;
pub mod users;

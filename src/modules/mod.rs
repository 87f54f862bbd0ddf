pub mod answers;
pub mod auth;
pub mod health;
pub mod questions;

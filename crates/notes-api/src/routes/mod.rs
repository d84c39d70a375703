//! HTTP route handlers.

pub mod login;
pub mod notes;
pub mod signup;

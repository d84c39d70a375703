//! Domain core for the notes service.
//!
//! Everything HTTP-agnostic lives here: the account and note records, input
//! validation, password hashing, and the signed-token service backing the
//! API's auth gate.

pub mod models;
pub mod password;
pub mod token;
pub mod validation;

pub use models::{Account, AccountView, Note};
pub use token::{AuthError, Claims, Identity, TokenService};
pub use validation::{FieldViolation, ValidationError, TEXT_MAX, TITLE_MAX};

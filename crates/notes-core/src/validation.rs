//! Input validation, run before any side effect.
//!
//! Each request shape gets an explicit validate function that reports every
//! violated field constraint, not just the first one hit.

use std::fmt;

use serde::Serialize;

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 50;
/// Maximum text length in characters.
pub const TEXT_MAX: usize = 300;

/// A single violated field constraint.
#[derive(Debug, Clone, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// One or more violated constraints for a request body.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field,
                message: message.into(),
            }],
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.violations.iter().map(|v| v.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Validate a signup/login body: both fields are required.
pub fn validate_credentials(name: &str, password: &str) -> Result<(), ValidationError> {
    let mut violations = Vec::new();
    if name.trim().is_empty() {
        violations.push(FieldViolation {
            field: "name",
            message: "Name is required".to_string(),
        });
    }
    if password.is_empty() {
        violations.push(FieldViolation {
            field: "password",
            message: "Password is required".to_string(),
        });
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

/// Validate a note-creation body: title and text are both required and
/// length-bounded.
pub fn validate_new_note(title: &str, text: &str) -> Result<(), ValidationError> {
    let mut violations = Vec::new();
    check_title(title, &mut violations);
    check_text(text, &mut violations);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

/// Validate a note-update body: only the provided fields are checked.
pub fn validate_note_patch(
    title: Option<&str>,
    text: Option<&str>,
) -> Result<(), ValidationError> {
    let mut violations = Vec::new();
    if let Some(title) = title {
        check_title(title, &mut violations);
    }
    if let Some(text) = text {
        check_text(text, &mut violations);
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

fn check_title(title: &str, violations: &mut Vec<FieldViolation>) {
    if title.is_empty() {
        violations.push(FieldViolation {
            field: "title",
            message: "Title is required".to_string(),
        });
    } else if title.chars().count() > TITLE_MAX {
        violations.push(FieldViolation {
            field: "title",
            message: format!("Title must be at most {TITLE_MAX} characters long"),
        });
    }
}

fn check_text(text: &str, violations: &mut Vec<FieldViolation>) {
    if text.is_empty() {
        violations.push(FieldViolation {
            field: "text",
            message: "Text is required".to_string(),
        });
    } else if text.chars().count() > TEXT_MAX {
        violations.push(FieldViolation {
            field: "text",
            message: format!("Text must be at most {TEXT_MAX} characters long"),
        });
    }
}

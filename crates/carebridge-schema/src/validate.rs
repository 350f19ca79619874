//! Validation primitives shared by the insert and patch payloads

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://\S+$").expect("url regex"));

/// A single violated constraint on a submitted payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Wire-format (camelCase) name of the offending field
    pub field: String,
    /// Human-readable reason the field was rejected
    pub message: String,
}

impl FieldViolation {
    /// Create a new violation
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validation failure carrying every violated field of a payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {} field(s) rejected", .violations.len())]
pub struct ValidationError {
    /// All violations found in the payload, in field order
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Build an error for a single field
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation::new(field, message)],
        }
    }
}

/// Accumulates violations while a payload is checked field by field
#[derive(Debug, Default)]
pub struct Violations {
    list: Vec<FieldViolation>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.list.push(FieldViolation::new(field, message));
    }

    /// Finish the check: `Ok` only if no field was rejected
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.list.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                violations: self.list,
            })
        }
    }

    /// Required non-empty string field
    pub fn required(&mut self, field: &str, value: Option<String>) -> Option<String> {
        match value {
            Some(v) if !v.is_empty() => Some(v),
            Some(_) => {
                self.push(field, "must not be empty");
                None
            }
            None => {
                self.push(field, "is required");
                None
            }
        }
    }

    /// Required email-formatted field
    pub fn email(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let value = self.required(field, value)?;
        if EMAIL_RE.is_match(&value) {
            Some(value)
        } else {
            self.push(field, "must be a valid email address");
            None
        }
    }

    /// Required phone field: digits only, at least ten of them
    pub fn phone(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let value = self.required(field, value)?;
        if !value.chars().all(|c| c.is_ascii_digit()) {
            self.push(field, "must contain only digits");
            None
        } else if value.len() < 10 {
            self.push(field, "must be at least 10 digits");
            None
        } else {
            Some(value)
        }
    }

    /// Optional URL field: format-checked only when present
    pub fn url(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let value = value?;
        if URL_RE.is_match(&value) {
            Some(value)
        } else {
            self.push(field, "must be an http(s) URL");
            None
        }
    }

    /// Optional UUID field: format-checked only when present
    pub fn uuid(&mut self, field: &str, value: Option<String>) -> Option<Uuid> {
        let value = value?;
        match value.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                self.push(field, "must be a valid UUID");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_violation() {
        let mut v = Violations::new();
        v.required("providerName", None);
        v.email("contactEmail", Some("nope".into()));
        let err = v.finish().unwrap_err();
        assert_eq!(err.violations.len(), 2);
        assert_eq!(err.violations[0].field, "providerName");
        assert_eq!(err.violations[1].field, "contactEmail");
    }

    #[test]
    fn empty_check_passes() {
        assert!(Violations::new().finish().is_ok());
    }

    #[test]
    fn uuid_check_rejects_garbage() {
        let mut v = Violations::new();
        assert!(v.uuid("ehrId", Some("not-a-uuid".into())).is_none());
        assert!(v.finish().is_err());
    }
}

//! Authentication identities
//!
//! Users are created by direct insert only; no HTTP route exposes them and
//! there is no update or delete path.

use crate::validate::{ValidationError, Violations};
use serde::{Deserialize, Serialize};

/// An authentication identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Argon2id hash in PHC string format. Hidden from API output.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Raw user submission
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Validated user draft; the password is hashed by the storage layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

impl CreateUser {
    /// All-or-nothing validation
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        let mut v = Violations::new();

        let username = v.required("username", self.username);
        let password = match v.required("password", self.password) {
            Some(p) if p.len() < 8 => {
                v.push("password", "must be at least 8 characters");
                None
            }
            other => other,
        };

        v.finish()?;

        Ok(NewUser {
            username: username.expect("checked"),
            password: password.expect("checked"),
        })
    }
}

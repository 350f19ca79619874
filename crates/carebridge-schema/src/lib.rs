//! Entity types and field validation for the carebridge registry
//!
//! This crate defines the four persisted entities (users, EHR systems,
//! healthcare providers, data-fetch records) together with their wire-format
//! payloads and the validation layer that turns a raw submission into a
//! normalized draft with defaults applied.
//!
//! Validation is all-or-nothing: a payload either validates completely or is
//! rejected with a [`ValidationError`] enumerating every violated field.

mod ehr;
mod provider;
mod record;
mod user;
mod validate;

pub use ehr::*;
pub use provider::*;
pub use record::*;
pub use user::*;
pub use validate::*;

/// Result type for validation operations
pub type Result<T> = std::result::Result<T, ValidationError>;

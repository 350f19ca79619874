//! Data-fetch audit records

use crate::validate::{ValidationError, Violations};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fetch status recorded when no explicit value is submitted
pub const DEFAULT_FETCH_STATUS: &str = "completed";

/// Audit row recording one data-retrieval operation for a provider and
/// where its output was stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFetchRecord {
    pub id: i32,
    pub provider_id: Uuid,
    pub fetch_date: DateTime<Utc>,
    /// Content-addressed external location of the fetched payload;
    /// recorded verbatim, never dereferenced
    pub s3_location: String,
    pub status: String,
}

/// Raw fetch-record submission as received on the wire
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFetchRecord {
    pub provider_id: Option<String>,
    pub s3_location: Option<String>,
    pub status: Option<String>,
}

/// Validated fetch-record draft with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct NewFetchRecord {
    pub provider_id: Uuid,
    pub s3_location: String,
    pub status: String,
}

impl CreateFetchRecord {
    /// All-or-nothing validation; `status` defaults to `"completed"`
    pub fn validate(self) -> Result<NewFetchRecord, ValidationError> {
        let mut v = Violations::new();

        let provider_id = match v.required("providerId", self.provider_id) {
            Some(raw) => match raw.parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    v.push("providerId", "must be a valid UUID");
                    None
                }
            },
            None => None,
        };
        let s3_location = v.required("s3Location", self.s3_location);
        let status = match self.status {
            Some(status) => v.required("status", Some(status)),
            None => Some(DEFAULT_FETCH_STATUS.to_string()),
        };

        v.finish()?;

        Ok(NewFetchRecord {
            provider_id: provider_id.expect("checked"),
            s3_location: s3_location.expect("checked"),
            status: status.expect("checked"),
        })
    }
}

impl NewFetchRecord {
    /// Materialize the stored row once storage has assigned the serial id
    pub fn into_record(self, id: i32, now: DateTime<Utc>) -> DataFetchRecord {
        DataFetchRecord {
            id,
            provider_id: self.provider_id,
            fetch_date: now,
            s3_location: self.s3_location,
            status: self.status,
        }
    }
}

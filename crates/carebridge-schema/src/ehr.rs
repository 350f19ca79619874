//! EHR system records and their insert/patch payloads

use crate::validate::{ValidationError, Violations};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A configured external Electronic Health Record API integration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EhrSystem {
    pub id: Uuid,
    pub system_name: String,
    pub system_version: Option<String>,
    /// Base URL for the EHR API
    pub api_endpoint: Option<String>,
    pub documentation_link: Option<String>,
    /// Authorization URL
    pub auth_url: Option<String>,
    /// Connection URL
    pub con_url: Option<String>,
    /// Bulk FHIR export URL
    pub bulkfhir_url: Option<String>,
    pub additional_notes: Option<String>,
    /// Whether the integration is actively supported
    pub is_supported: bool,
    pub created_at: DateTime<Utc>,
}

/// Raw EHR system submission as received on the wire
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEhrSystem {
    pub id: Option<String>,
    pub system_name: Option<String>,
    pub system_version: Option<String>,
    pub api_endpoint: Option<String>,
    pub documentation_link: Option<String>,
    pub auth_url: Option<String>,
    pub con_url: Option<String>,
    pub bulkfhir_url: Option<String>,
    pub additional_notes: Option<String>,
    pub is_supported: Option<bool>,
}

/// Validated EHR system draft with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct NewEhrSystem {
    /// Client-supplied id; storage generates one when absent
    pub id: Option<Uuid>,
    pub system_name: String,
    pub system_version: Option<String>,
    pub api_endpoint: Option<String>,
    pub documentation_link: Option<String>,
    pub auth_url: Option<String>,
    pub con_url: Option<String>,
    pub bulkfhir_url: Option<String>,
    pub additional_notes: Option<String>,
    pub is_supported: bool,
}

impl CreateEhrSystem {
    /// All-or-nothing validation; `isSupported` defaults to `true`
    pub fn validate(self) -> Result<NewEhrSystem, ValidationError> {
        let mut v = Violations::new();

        let id = v.uuid("id", self.id);
        let system_name = v.required("systemName", self.system_name);
        let api_endpoint = v.url("apiEndpoint", self.api_endpoint);
        let documentation_link = v.url("documentationLink", self.documentation_link);
        let auth_url = v.url("authUrl", self.auth_url);
        let con_url = v.url("conUrl", self.con_url);
        let bulkfhir_url = v.url("bulkfhirUrl", self.bulkfhir_url);

        v.finish()?;

        Ok(NewEhrSystem {
            id,
            system_name: system_name.expect("checked"),
            system_version: self.system_version,
            api_endpoint,
            documentation_link,
            auth_url,
            con_url,
            bulkfhir_url,
            additional_notes: self.additional_notes,
            is_supported: self.is_supported.unwrap_or(true),
        })
    }
}

impl NewEhrSystem {
    /// Materialize the stored row, filling server-generated fields
    pub fn into_record(self, now: DateTime<Utc>) -> EhrSystem {
        EhrSystem {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            system_name: self.system_name,
            system_version: self.system_version,
            api_endpoint: self.api_endpoint,
            documentation_link: self.documentation_link,
            auth_url: self.auth_url,
            con_url: self.con_url,
            bulkfhir_url: self.bulkfhir_url,
            additional_notes: self.additional_notes,
            is_supported: self.is_supported,
            created_at: now,
        }
    }
}

/// Partial EHR system update; only supplied fields are validated and written
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EhrSystemPatch {
    pub system_name: Option<String>,
    pub system_version: Option<String>,
    pub api_endpoint: Option<String>,
    pub documentation_link: Option<String>,
    pub auth_url: Option<String>,
    pub con_url: Option<String>,
    pub bulkfhir_url: Option<String>,
    pub additional_notes: Option<String>,
    pub is_supported: Option<bool>,
}

/// Validated partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EhrSystemUpdate {
    pub system_name: Option<String>,
    pub system_version: Option<String>,
    pub api_endpoint: Option<String>,
    pub documentation_link: Option<String>,
    pub auth_url: Option<String>,
    pub con_url: Option<String>,
    pub bulkfhir_url: Option<String>,
    pub additional_notes: Option<String>,
    pub is_supported: Option<bool>,
}

impl EhrSystemPatch {
    /// Validate only the supplied fields
    pub fn validate(self) -> Result<EhrSystemUpdate, ValidationError> {
        let mut v = Violations::new();

        let system_name = match self.system_name {
            Some(name) => v.required("systemName", Some(name)),
            None => None,
        };
        let api_endpoint = v.url("apiEndpoint", self.api_endpoint);
        let documentation_link = v.url("documentationLink", self.documentation_link);
        let auth_url = v.url("authUrl", self.auth_url);
        let con_url = v.url("conUrl", self.con_url);
        let bulkfhir_url = v.url("bulkfhirUrl", self.bulkfhir_url);

        v.finish()?;

        Ok(EhrSystemUpdate {
            system_name,
            system_version: self.system_version,
            api_endpoint,
            documentation_link,
            auth_url,
            con_url,
            bulkfhir_url,
            additional_notes: self.additional_notes,
            is_supported: self.is_supported,
        })
    }
}

impl EhrSystemUpdate {
    /// Merge the supplied fields into an existing row
    pub fn apply(&self, system: &mut EhrSystem) {
        if let Some(name) = &self.system_name {
            system.system_name = name.clone();
        }
        if let Some(version) = &self.system_version {
            system.system_version = Some(version.clone());
        }
        if let Some(endpoint) = &self.api_endpoint {
            system.api_endpoint = Some(endpoint.clone());
        }
        if let Some(link) = &self.documentation_link {
            system.documentation_link = Some(link.clone());
        }
        if let Some(url) = &self.auth_url {
            system.auth_url = Some(url.clone());
        }
        if let Some(url) = &self.con_url {
            system.con_url = Some(url.clone());
        }
        if let Some(url) = &self.bulkfhir_url {
            system.bulkfhir_url = Some(url.clone());
        }
        if let Some(notes) = &self.additional_notes {
            system.additional_notes = Some(notes.clone());
        }
        if let Some(supported) = self.is_supported {
            system.is_supported = supported;
        }
    }
}

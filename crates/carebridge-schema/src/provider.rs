//! Healthcare provider records and their insert/patch payloads

use crate::validate::{ValidationError, Violations};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of healthcare facility behind a provider record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderType {
    Hospital,
    Clinic,
    #[serde(rename = "Private Practice")]
    PrivatePractice,
    SpecialistCenter,
    Other,
}

impl ProviderType {
    /// Wire-format spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Hospital => "Hospital",
            ProviderType::Clinic => "Clinic",
            ProviderType::PrivatePractice => "Private Practice",
            ProviderType::SpecialistCenter => "SpecialistCenter",
            ProviderType::Other => "Other",
        }
    }

    /// Parse the wire-format spelling
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Hospital" => Some(ProviderType::Hospital),
            "Clinic" => Some(ProviderType::Clinic),
            "Private Practice" => Some(ProviderType::PrivatePractice),
            "SpecialistCenter" => Some(ProviderType::SpecialistCenter),
            "Other" => Some(ProviderType::Other),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of an onboarded provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderStatus {
    Active,
    Inactive,
    #[default]
    Pending,
    Error,
}

impl ProviderStatus {
    /// Wire-format spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderStatus::Active => "Active",
            ProviderStatus::Inactive => "Inactive",
            ProviderStatus::Pending => "Pending",
            ProviderStatus::Error => "Error",
        }
    }

    /// Parse the wire-format spelling
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Active" => Some(ProviderStatus::Active),
            "Inactive" => Some(ProviderStatus::Inactive),
            "Pending" => Some(ProviderStatus::Pending),
            "Error" => Some(ProviderStatus::Error),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A healthcare organization onboarded into the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthcareProvider {
    pub id: Uuid,
    pub provider_name: String,
    pub provider_type: ProviderType,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: Option<String>,
    /// Foreign key to the EHR system this provider integrates with
    pub ehr_id: Option<Uuid>,
    /// Tenant ID used to scope requests within a multi-tenant EHR API
    pub ehr_tenant_id: Option<String>,
    /// Group ID of the data group fetched from the EHR
    pub ehr_group_id: Option<String>,
    pub onboarded_date: DateTime<Utc>,
    pub last_data_fetch: Option<DateTime<Utc>>,
    pub status: ProviderStatus,
    pub notes: Option<String>,
}

/// Raw provider submission; every field optional so validation can report
/// each missing one by name
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProvider {
    pub id: Option<String>,
    pub provider_name: Option<String>,
    pub provider_type: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub ehr_id: Option<String>,
    pub ehr_tenant_id: Option<String>,
    pub ehr_group_id: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Validated provider draft with defaults applied, ready for storage
#[derive(Debug, Clone, PartialEq)]
pub struct NewProvider {
    /// Client-supplied id; storage generates one when absent
    pub id: Option<Uuid>,
    pub provider_name: String,
    pub provider_type: ProviderType,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: Option<String>,
    pub ehr_id: Option<Uuid>,
    pub ehr_tenant_id: Option<String>,
    pub ehr_group_id: Option<String>,
    pub status: ProviderStatus,
    pub notes: Option<String>,
}

impl CreateProvider {
    /// All-or-nothing validation; on success returns the normalized draft
    /// with `status` defaulted to `Pending`
    pub fn validate(self) -> Result<NewProvider, ValidationError> {
        let mut v = Violations::new();

        let id = v.uuid("id", self.id);
        let provider_name = v.required("providerName", self.provider_name);
        let provider_type = match v.required("providerType", self.provider_type) {
            Some(raw) => match ProviderType::parse(&raw) {
                Some(t) => Some(t),
                None => {
                    v.push(
                        "providerType",
                        "must be one of Hospital, Clinic, Private Practice, SpecialistCenter, Other",
                    );
                    None
                }
            },
            None => None,
        };
        let contact_email = v.email("contactEmail", self.contact_email);
        let contact_phone = v.phone("contactPhone", self.contact_phone);
        let ehr_id = v.uuid("ehrId", self.ehr_id);
        let status = match self.status {
            Some(raw) => match ProviderStatus::parse(&raw) {
                Some(s) => Some(s),
                None => {
                    v.push("status", "must be one of Active, Inactive, Pending, Error");
                    None
                }
            },
            None => Some(ProviderStatus::default()),
        };

        v.finish()?;

        Ok(NewProvider {
            id,
            provider_name: provider_name.expect("checked"),
            provider_type: provider_type.expect("checked"),
            contact_email: contact_email.expect("checked"),
            contact_phone: contact_phone.expect("checked"),
            address: self.address,
            ehr_id,
            ehr_tenant_id: self.ehr_tenant_id,
            ehr_group_id: self.ehr_group_id,
            status: status.expect("checked"),
            notes: self.notes,
        })
    }
}

impl NewProvider {
    /// Materialize the stored row, filling server-generated fields
    pub fn into_record(self, now: DateTime<Utc>) -> HealthcareProvider {
        HealthcareProvider {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            provider_name: self.provider_name,
            provider_type: self.provider_type,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            address: self.address,
            ehr_id: self.ehr_id,
            ehr_tenant_id: self.ehr_tenant_id,
            ehr_group_id: self.ehr_group_id,
            onboarded_date: now,
            last_data_fetch: None,
            status: self.status,
            notes: self.notes,
        }
    }
}

/// Partial provider update; only supplied fields are validated and written
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderPatch {
    pub provider_name: Option<String>,
    pub provider_type: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub ehr_id: Option<String>,
    pub ehr_tenant_id: Option<String>,
    pub ehr_group_id: Option<String>,
    pub last_data_fetch: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Validated partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderUpdate {
    pub provider_name: Option<String>,
    pub provider_type: Option<ProviderType>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub ehr_id: Option<Uuid>,
    pub ehr_tenant_id: Option<String>,
    pub ehr_group_id: Option<String>,
    pub last_data_fetch: Option<DateTime<Utc>>,
    pub status: Option<ProviderStatus>,
    pub notes: Option<String>,
}

impl ProviderPatch {
    /// Validate only the supplied fields, with the same rules as creation
    pub fn validate(self) -> Result<ProviderUpdate, ValidationError> {
        let mut v = Violations::new();

        let provider_name = match self.provider_name {
            Some(name) => v.required("providerName", Some(name)),
            None => None,
        };
        let provider_type = match self.provider_type {
            Some(raw) => match ProviderType::parse(&raw) {
                Some(t) => Some(t),
                None => {
                    v.push(
                        "providerType",
                        "must be one of Hospital, Clinic, Private Practice, SpecialistCenter, Other",
                    );
                    None
                }
            },
            None => None,
        };
        let contact_email = match self.contact_email {
            Some(email) => v.email("contactEmail", Some(email)),
            None => None,
        };
        let contact_phone = match self.contact_phone {
            Some(phone) => v.phone("contactPhone", Some(phone)),
            None => None,
        };
        let ehr_id = v.uuid("ehrId", self.ehr_id);
        let status = match self.status {
            Some(raw) => match ProviderStatus::parse(&raw) {
                Some(s) => Some(s),
                None => {
                    v.push("status", "must be one of Active, Inactive, Pending, Error");
                    None
                }
            },
            None => None,
        };

        v.finish()?;

        Ok(ProviderUpdate {
            provider_name,
            provider_type,
            contact_email,
            contact_phone,
            address: self.address,
            ehr_id,
            ehr_tenant_id: self.ehr_tenant_id,
            ehr_group_id: self.ehr_group_id,
            last_data_fetch: self.last_data_fetch,
            status,
            notes: self.notes,
        })
    }
}

impl ProviderUpdate {
    /// Merge the supplied fields into an existing row
    pub fn apply(&self, provider: &mut HealthcareProvider) {
        if let Some(name) = &self.provider_name {
            provider.provider_name = name.clone();
        }
        if let Some(kind) = self.provider_type {
            provider.provider_type = kind;
        }
        if let Some(email) = &self.contact_email {
            provider.contact_email = email.clone();
        }
        if let Some(phone) = &self.contact_phone {
            provider.contact_phone = phone.clone();
        }
        if let Some(address) = &self.address {
            provider.address = Some(address.clone());
        }
        if let Some(ehr_id) = self.ehr_id {
            provider.ehr_id = Some(ehr_id);
        }
        if let Some(tenant) = &self.ehr_tenant_id {
            provider.ehr_tenant_id = Some(tenant.clone());
        }
        if let Some(group) = &self.ehr_group_id {
            provider.ehr_group_id = Some(group.clone());
        }
        if let Some(fetched) = self.last_data_fetch {
            provider.last_data_fetch = Some(fetched);
        }
        if let Some(status) = self.status {
            provider.status = status;
        }
        if let Some(notes) = &self.notes {
            provider.notes = Some(notes.clone());
        }
    }
}

//! Row structs decoded from query results
//!
//! Enum-valued columns are stored as text; converting a row back into a
//! domain type can therefore fail on values written outside this crate.

use crate::error::StorageError;
use carebridge_schema::{
    DataFetchRecord, EhrSystem, HealthcareProvider, ProviderStatus, ProviderType, User,
};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub(super) struct UserRow {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct ProviderRow {
    pub id: Uuid,
    pub provider_name: String,
    pub provider_type: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: Option<String>,
    pub ehr_id: Option<Uuid>,
    pub ehr_tenant_id: Option<String>,
    pub ehr_group_id: Option<String>,
    pub onboarded_date: DateTime<Utc>,
    pub last_data_fetch: Option<DateTime<Utc>>,
    pub status: String,
    pub notes: Option<String>,
}

impl TryFrom<ProviderRow> for HealthcareProvider {
    type Error = StorageError;

    fn try_from(row: ProviderRow) -> Result<Self, StorageError> {
        let provider_type = ProviderType::parse(&row.provider_type).ok_or_else(|| {
            StorageError::Decode(format!("unknown provider type: {}", row.provider_type))
        })?;
        let status = ProviderStatus::parse(&row.status)
            .ok_or_else(|| StorageError::Decode(format!("unknown provider status: {}", row.status)))?;
        Ok(HealthcareProvider {
            id: row.id,
            provider_name: row.provider_name,
            provider_type,
            contact_email: row.contact_email,
            contact_phone: row.contact_phone,
            address: row.address,
            ehr_id: row.ehr_id,
            ehr_tenant_id: row.ehr_tenant_id,
            ehr_group_id: row.ehr_group_id,
            onboarded_date: row.onboarded_date,
            last_data_fetch: row.last_data_fetch,
            status,
            notes: row.notes,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct SystemRow {
    pub id: Uuid,
    pub system_name: String,
    pub system_version: Option<String>,
    pub api_endpoint: Option<String>,
    pub documentation_link: Option<String>,
    pub auth_url: Option<String>,
    pub con_url: Option<String>,
    pub bulkfhir_url: Option<String>,
    pub additional_notes: Option<String>,
    pub is_supported: bool,
    pub created_at: DateTime<Utc>,
}

impl From<SystemRow> for EhrSystem {
    fn from(row: SystemRow) -> Self {
        EhrSystem {
            id: row.id,
            system_name: row.system_name,
            system_version: row.system_version,
            api_endpoint: row.api_endpoint,
            documentation_link: row.documentation_link,
            auth_url: row.auth_url,
            con_url: row.con_url,
            bulkfhir_url: row.bulkfhir_url,
            additional_notes: row.additional_notes,
            is_supported: row.is_supported,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct FetchRecordRow {
    pub id: i32,
    pub provider_id: Uuid,
    pub fetch_date: DateTime<Utc>,
    pub s3_location: String,
    pub status: String,
}

impl From<FetchRecordRow> for DataFetchRecord {
    fn from(row: FetchRecordRow) -> Self {
        DataFetchRecord {
            id: row.id,
            provider_id: row.provider_id,
            fetch_date: row.fetch_date,
            s3_location: row.s3_location,
            status: row.status,
        }
    }
}

//! Table definitions for the PostgreSQL backend
//!
//! Foreign keys are declared without cascades: a provider cannot be deleted
//! while fetch records reference it, and an EHR system is never deleted.

use crate::error::{Result, StorageError};
use sqlx::postgres::PgPool;

const CREATE_USERS: &str = "CREATE TABLE IF NOT EXISTS users (\
     id SERIAL PRIMARY KEY, \
     username TEXT NOT NULL UNIQUE, \
     password_hash TEXT NOT NULL)";

const CREATE_EHR_SYSTEMS: &str = "CREATE TABLE IF NOT EXISTS ehr_systems (\
     id UUID PRIMARY KEY, \
     system_name VARCHAR(255) NOT NULL, \
     system_version VARCHAR(50), \
     api_endpoint VARCHAR(255), \
     documentation_link VARCHAR(255), \
     auth_url VARCHAR(255), \
     con_url VARCHAR(255), \
     bulkfhir_url VARCHAR(255), \
     additional_notes TEXT, \
     is_supported BOOLEAN NOT NULL DEFAULT TRUE, \
     created_at TIMESTAMPTZ NOT NULL DEFAULT now())";

const CREATE_PROVIDERS: &str = "CREATE TABLE IF NOT EXISTS healthcare_providers (\
     provider_id UUID PRIMARY KEY, \
     provider_name VARCHAR(255) NOT NULL, \
     provider_type TEXT NOT NULL, \
     contact_email VARCHAR(255) NOT NULL, \
     contact_phone VARCHAR(20) NOT NULL, \
     address TEXT, \
     ehr_id UUID REFERENCES ehr_systems(id), \
     ehr_tenant_id VARCHAR(255), \
     ehr_group_id VARCHAR(255), \
     onboarded_date TIMESTAMPTZ NOT NULL DEFAULT now(), \
     last_data_fetch TIMESTAMPTZ, \
     status TEXT NOT NULL DEFAULT 'Pending', \
     notes TEXT)";

const CREATE_FETCH_HISTORY: &str = "CREATE TABLE IF NOT EXISTS data_fetch_history (\
     id SERIAL PRIMARY KEY, \
     provider_id UUID NOT NULL REFERENCES healthcare_providers(provider_id), \
     fetch_date TIMESTAMPTZ NOT NULL DEFAULT now(), \
     s3_location TEXT NOT NULL, \
     status TEXT NOT NULL DEFAULT 'completed')";

const CREATE_FETCH_HISTORY_PROVIDER_IDX: &str = "CREATE INDEX IF NOT EXISTS \
     data_fetch_history_provider_idx ON data_fetch_history (provider_id, fetch_date DESC)";

/// Create any missing tables and indexes
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for ddl in [
        CREATE_USERS,
        CREATE_EHR_SYSTEMS,
        CREATE_PROVIDERS,
        CREATE_FETCH_HISTORY,
        CREATE_FETCH_HISTORY_PROVIDER_IDX,
    ] {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_history_restricts_provider_deletes() {
        // no ON DELETE clause means RESTRICT-style behavior
        assert!(CREATE_FETCH_HISTORY.contains("REFERENCES healthcare_providers"));
        assert!(!CREATE_FETCH_HISTORY.contains("ON DELETE"));
    }

    #[test]
    fn usernames_are_unique() {
        assert!(CREATE_USERS.contains("UNIQUE"));
    }
}

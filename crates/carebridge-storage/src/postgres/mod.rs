//! PostgreSQL storage backend
//!
//! Implements [`Storage`] over a sqlx connection pool. Referential integrity
//! is enforced by the table constraints in [`schema`]; Postgres error codes
//! are translated back into [`StorageError`] variants so route handlers never
//! see driver details.

mod config;
mod rows;
mod schema;

pub use config::PostgresConfig;
pub use schema::ensure_schema;

use crate::error::{Result, StorageError};
use crate::password::hash_password;
use crate::store::Storage;
use async_trait::async_trait;
use carebridge_schema::{
    DataFetchRecord, EhrSystem, EhrSystemUpdate, HealthcareProvider, NewEhrSystem, NewFetchRecord,
    NewProvider, NewUser, ProviderUpdate, User,
};
use chrono::Utc;
use rows::{FetchRecordRow, ProviderRow, SystemRow, UserRow};
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

const SELECT_PROVIDER: &str = "SELECT provider_id AS id, provider_name, provider_type, \
     contact_email, contact_phone, address, ehr_id, ehr_tenant_id, ehr_group_id, \
     onboarded_date, last_data_fetch, status, notes FROM healthcare_providers";

const SELECT_SYSTEM: &str = "SELECT id, system_name, system_version, api_endpoint, \
     documentation_link, auth_url, con_url, bulkfhir_url, additional_notes, is_supported, \
     created_at FROM ehr_systems";

const SELECT_RECORD: &str =
    "SELECT id, provider_id, fetch_date, s3_location, status FROM data_fetch_history";

/// Production storage backend over PostgreSQL
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Connect a pool per the configuration, creating the tables when
    /// migrations are enabled.
    pub async fn new(config: PostgresConfig) -> Result<Self> {
        tracing::debug!(pool_size = config.pool_size(), "connecting to postgres");
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size())
            .connect(config.database_url())
            .await
            .map_err(general_err)?;
        if config.run_migrations() {
            schema::ensure_schema(&pool).await?;
            tracing::info!("database schema ready");
        }
        Ok(Self { pool })
    }

    /// The underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map a driver failure with no constraint semantics
fn general_err(e: sqlx::Error) -> StorageError {
    StorageError::Database(e.to_string())
}

/// Map an insert/update failure: foreign-key and unique violations carry
/// meaning for callers, everything else is opaque.
fn write_err(e: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db) = &e {
        match db.code().as_deref() {
            Some("23503") => {
                return StorageError::foreign_key(db.constraint().unwrap_or("foreign key"));
            }
            Some("23505") => return StorageError::conflict(db.message()),
            _ => {}
        }
    }
    general_err(e)
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn user(&self, id: i32) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, username, password_hash FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(general_err)?;
        Ok(row.map(User::from))
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, username, password_hash FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(general_err)?;
        Ok(row.map(User::from))
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let password_hash = hash_password(&user.password)?;
        let row: UserRow = sqlx::query_as(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) \
             RETURNING id, username, password_hash",
        )
        .bind(&user.username)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(write_err)?;
        Ok(row.into())
    }

    async fn provider(&self, id: Uuid) -> Result<Option<HealthcareProvider>> {
        let row: Option<ProviderRow> =
            sqlx::query_as(&format!("{SELECT_PROVIDER} WHERE provider_id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(general_err)?;
        row.map(HealthcareProvider::try_from).transpose()
    }

    async fn providers(&self) -> Result<Vec<HealthcareProvider>> {
        let rows: Vec<ProviderRow> = sqlx::query_as(&format!(
            "{SELECT_PROVIDER} ORDER BY onboarded_date, provider_name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(general_err)?;
        rows.into_iter().map(HealthcareProvider::try_from).collect()
    }

    async fn providers_by_ehr(&self, ehr_id: Uuid) -> Result<Vec<HealthcareProvider>> {
        let rows: Vec<ProviderRow> = sqlx::query_as(&format!(
            "{SELECT_PROVIDER} WHERE ehr_id = $1 ORDER BY onboarded_date"
        ))
        .bind(ehr_id)
        .fetch_all(&self.pool)
        .await
        .map_err(general_err)?;
        rows.into_iter().map(HealthcareProvider::try_from).collect()
    }

    async fn search_providers(&self, term: &str) -> Result<Vec<HealthcareProvider>> {
        let rows: Vec<ProviderRow> = sqlx::query_as(&format!(
            "{SELECT_PROVIDER} WHERE provider_name ILIKE $1 ORDER BY onboarded_date"
        ))
        .bind(format!("%{term}%"))
        .fetch_all(&self.pool)
        .await
        .map_err(general_err)?;
        rows.into_iter().map(HealthcareProvider::try_from).collect()
    }

    async fn create_provider(&self, provider: NewProvider) -> Result<HealthcareProvider> {
        let record = provider.into_record(Utc::now());
        sqlx::query(
            "INSERT INTO healthcare_providers (provider_id, provider_name, provider_type, \
             contact_email, contact_phone, address, ehr_id, ehr_tenant_id, ehr_group_id, \
             onboarded_date, last_data_fetch, status, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(record.id)
        .bind(&record.provider_name)
        .bind(record.provider_type.as_str())
        .bind(&record.contact_email)
        .bind(&record.contact_phone)
        .bind(&record.address)
        .bind(record.ehr_id)
        .bind(&record.ehr_tenant_id)
        .bind(&record.ehr_group_id)
        .bind(record.onboarded_date)
        .bind(record.last_data_fetch)
        .bind(record.status.as_str())
        .bind(&record.notes)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;
        Ok(record)
    }

    async fn update_provider(
        &self,
        id: Uuid,
        update: ProviderUpdate,
    ) -> Result<Option<HealthcareProvider>> {
        let Some(mut provider) = self.provider(id).await? else {
            return Ok(None);
        };
        update.apply(&mut provider);
        sqlx::query(
            "UPDATE healthcare_providers SET provider_name = $2, provider_type = $3, \
             contact_email = $4, contact_phone = $5, address = $6, ehr_id = $7, \
             ehr_tenant_id = $8, ehr_group_id = $9, last_data_fetch = $10, status = $11, \
             notes = $12 WHERE provider_id = $1",
        )
        .bind(provider.id)
        .bind(&provider.provider_name)
        .bind(provider.provider_type.as_str())
        .bind(&provider.contact_email)
        .bind(&provider.contact_phone)
        .bind(&provider.address)
        .bind(provider.ehr_id)
        .bind(&provider.ehr_tenant_id)
        .bind(&provider.ehr_group_id)
        .bind(provider.last_data_fetch)
        .bind(provider.status.as_str())
        .bind(&provider.notes)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;
        Ok(Some(provider))
    }

    async fn delete_provider(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM healthcare_providers WHERE provider_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match write_err(e) {
                // restrict-on-delete: fetch records still reference the row
                StorageError::ForeignKey { .. } => {
                    StorageError::conflict("provider still has data fetch records")
                }
                other => other,
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn ehr_system(&self, id: Uuid) -> Result<Option<EhrSystem>> {
        let row: Option<SystemRow> = sqlx::query_as(&format!("{SELECT_SYSTEM} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(general_err)?;
        Ok(row.map(EhrSystem::from))
    }

    async fn ehr_systems(&self) -> Result<Vec<EhrSystem>> {
        let rows: Vec<SystemRow> = sqlx::query_as(&format!(
            "{SELECT_SYSTEM} ORDER BY created_at, system_name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(general_err)?;
        Ok(rows.into_iter().map(EhrSystem::from).collect())
    }

    async fn create_ehr_system(&self, system: NewEhrSystem) -> Result<EhrSystem> {
        let record = system.into_record(Utc::now());
        sqlx::query(
            "INSERT INTO ehr_systems (id, system_name, system_version, api_endpoint, \
             documentation_link, auth_url, con_url, bulkfhir_url, additional_notes, \
             is_supported, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(record.id)
        .bind(&record.system_name)
        .bind(&record.system_version)
        .bind(&record.api_endpoint)
        .bind(&record.documentation_link)
        .bind(&record.auth_url)
        .bind(&record.con_url)
        .bind(&record.bulkfhir_url)
        .bind(&record.additional_notes)
        .bind(record.is_supported)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;
        Ok(record)
    }

    async fn update_ehr_system(
        &self,
        id: Uuid,
        update: EhrSystemUpdate,
    ) -> Result<Option<EhrSystem>> {
        let Some(mut system) = self.ehr_system(id).await? else {
            return Ok(None);
        };
        update.apply(&mut system);
        sqlx::query(
            "UPDATE ehr_systems SET system_name = $2, system_version = $3, api_endpoint = $4, \
             documentation_link = $5, auth_url = $6, con_url = $7, bulkfhir_url = $8, \
             additional_notes = $9, is_supported = $10 WHERE id = $1",
        )
        .bind(system.id)
        .bind(&system.system_name)
        .bind(&system.system_version)
        .bind(&system.api_endpoint)
        .bind(&system.documentation_link)
        .bind(&system.auth_url)
        .bind(&system.con_url)
        .bind(&system.bulkfhir_url)
        .bind(&system.additional_notes)
        .bind(system.is_supported)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;
        Ok(Some(system))
    }

    async fn fetch_record(&self, id: i32) -> Result<Option<DataFetchRecord>> {
        let row: Option<FetchRecordRow> =
            sqlx::query_as(&format!("{SELECT_RECORD} WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(general_err)?;
        Ok(row.map(DataFetchRecord::from))
    }

    async fn fetch_records(&self) -> Result<Vec<DataFetchRecord>> {
        let rows: Vec<FetchRecordRow> =
            sqlx::query_as(&format!("{SELECT_RECORD} ORDER BY fetch_date DESC, id DESC"))
                .fetch_all(&self.pool)
                .await
                .map_err(general_err)?;
        Ok(rows.into_iter().map(DataFetchRecord::from).collect())
    }

    async fn fetch_records_for_provider(&self, provider_id: Uuid) -> Result<Vec<DataFetchRecord>> {
        let rows: Vec<FetchRecordRow> = sqlx::query_as(&format!(
            "{SELECT_RECORD} WHERE provider_id = $1 ORDER BY fetch_date DESC, id DESC"
        ))
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await
        .map_err(general_err)?;
        Ok(rows.into_iter().map(DataFetchRecord::from).collect())
    }

    async fn search_fetch_records(&self, term: &str) -> Result<Vec<DataFetchRecord>> {
        let rows: Vec<FetchRecordRow> = sqlx::query_as(
            "SELECT h.id, h.provider_id, h.fetch_date, h.s3_location, h.status \
             FROM data_fetch_history h \
             JOIN healthcare_providers p ON p.provider_id = h.provider_id \
             WHERE p.provider_name ILIKE $1 \
             ORDER BY h.fetch_date DESC, h.id DESC",
        )
        .bind(format!("%{term}%"))
        .fetch_all(&self.pool)
        .await
        .map_err(general_err)?;
        Ok(rows.into_iter().map(DataFetchRecord::from).collect())
    }

    async fn create_fetch_record(&self, record: NewFetchRecord) -> Result<DataFetchRecord> {
        let row: FetchRecordRow = sqlx::query_as(
            "INSERT INTO data_fetch_history (provider_id, fetch_date, s3_location, status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, provider_id, fetch_date, s3_location, status",
        )
        .bind(record.provider_id)
        .bind(Utc::now())
        .bind(&record.s3_location)
        .bind(&record.status)
        .fetch_one(&self.pool)
        .await
        .map_err(write_err)?;
        Ok(row.into())
    }
}

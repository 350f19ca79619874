//! The storage contract between route handlers and persistent state

use crate::error::Result;
use async_trait::async_trait;
use carebridge_schema::{
    DataFetchRecord, EhrSystem, EhrSystemUpdate, HealthcareProvider, NewEhrSystem, NewFetchRecord,
    NewProvider, NewUser, ProviderUpdate, User,
};
use uuid::Uuid;

/// Data access for every entity in the registry
///
/// One instance is constructed at process start and injected into route
/// registration, so tests can substitute their own implementation. Backends
/// do not retry; every failure is terminal for the calling request.
#[async_trait]
pub trait Storage: Send + Sync {
    // User methods

    /// Fetch a user by id
    async fn user(&self, id: i32) -> Result<Option<User>>;

    /// Fetch a user by unique username
    async fn user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Insert a user, hashing the submitted password. Duplicate usernames
    /// are a conflict.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    // Healthcare provider methods

    /// Fetch a provider by id
    async fn provider(&self, id: Uuid) -> Result<Option<HealthcareProvider>>;

    /// All providers, ordered by onboarding date then name
    async fn providers(&self) -> Result<Vec<HealthcareProvider>>;

    /// Providers associated with the given EHR system
    async fn providers_by_ehr(&self, ehr_id: Uuid) -> Result<Vec<HealthcareProvider>>;

    /// Case-insensitive substring search on provider name
    async fn search_providers(&self, term: &str) -> Result<Vec<HealthcareProvider>>;

    /// Persist a provider draft, generating the id when the draft carries
    /// none. A present `ehr_id` must reference an existing EHR system.
    async fn create_provider(&self, provider: NewProvider) -> Result<HealthcareProvider>;

    /// Merge the supplied fields into an existing provider. Returns `None`
    /// when the id is unknown.
    async fn update_provider(
        &self,
        id: Uuid,
        update: ProviderUpdate,
    ) -> Result<Option<HealthcareProvider>>;

    /// Delete a provider. Returns `false` when the id is unknown; fails with
    /// a conflict while fetch records still reference the provider.
    async fn delete_provider(&self, id: Uuid) -> Result<bool>;

    // EHR system methods

    /// Fetch an EHR system by id
    async fn ehr_system(&self, id: Uuid) -> Result<Option<EhrSystem>>;

    /// All EHR systems, ordered by creation time
    async fn ehr_systems(&self) -> Result<Vec<EhrSystem>>;

    /// Persist an EHR system draft, generating the id when absent
    async fn create_ehr_system(&self, system: NewEhrSystem) -> Result<EhrSystem>;

    /// Merge the supplied fields into an existing EHR system. Returns `None`
    /// when the id is unknown.
    async fn update_ehr_system(
        &self,
        id: Uuid,
        update: EhrSystemUpdate,
    ) -> Result<Option<EhrSystem>>;

    // Data fetch record methods

    /// Fetch a single audit record by id
    async fn fetch_record(&self, id: i32) -> Result<Option<DataFetchRecord>>;

    /// All audit records, most recent first
    async fn fetch_records(&self) -> Result<Vec<DataFetchRecord>>;

    /// Audit records for one provider, most recent first
    async fn fetch_records_for_provider(&self, provider_id: Uuid) -> Result<Vec<DataFetchRecord>>;

    /// Audit records whose provider name contains the term
    /// (case-insensitive), most recent first
    async fn search_fetch_records(&self, term: &str) -> Result<Vec<DataFetchRecord>>;

    /// Persist an audit record. The provider reference is enforced.
    async fn create_fetch_record(&self, record: NewFetchRecord) -> Result<DataFetchRecord>;
}

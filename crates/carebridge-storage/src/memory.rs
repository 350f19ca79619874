//! In-memory storage backend
//!
//! Keeps every table in a lock-protected map. Used as the test double for
//! the HTTP layer and as the backing store for `carebridge serve --memory`.
//! Referential integrity is checked explicitly so behavior matches the
//! PostgreSQL backend's constraints.

use crate::error::{Result, StorageError};
use crate::password::hash_password;
use crate::store::Storage;
use async_trait::async_trait;
use carebridge_schema::{
    DataFetchRecord, EhrSystem, EhrSystemUpdate, HealthcareProvider, NewEhrSystem, NewFetchRecord,
    NewProvider, NewUser, ProviderUpdate, User,
};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    providers: HashMap<Uuid, HealthcareProvider>,
    ehr_systems: HashMap<Uuid, EhrSystem>,
    fetch_records: BTreeMap<i32, DataFetchRecord>,
    next_user_id: i32,
    next_record_id: i32,
}

/// Lock-protected in-process store
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(records: &mut [DataFetchRecord]) {
    records.sort_by(|a, b| b.fetch_date.cmp(&a.fetch_date).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn user(&self, id: i32) -> Result<Option<User>> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .tables
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let password_hash = hash_password(&user.password)?;
        let mut tables = self.tables.write();
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StorageError::conflict(format!(
                "username {} already exists",
                user.username
            )));
        }
        tables.next_user_id += 1;
        let stored = User {
            id: tables.next_user_id,
            username: user.username,
            password_hash,
        };
        tables.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn provider(&self, id: Uuid) -> Result<Option<HealthcareProvider>> {
        Ok(self.tables.read().providers.get(&id).cloned())
    }

    async fn providers(&self) -> Result<Vec<HealthcareProvider>> {
        let mut providers: Vec<_> = self.tables.read().providers.values().cloned().collect();
        providers.sort_by(|a, b| {
            a.onboarded_date
                .cmp(&b.onboarded_date)
                .then_with(|| a.provider_name.cmp(&b.provider_name))
        });
        Ok(providers)
    }

    async fn providers_by_ehr(&self, ehr_id: Uuid) -> Result<Vec<HealthcareProvider>> {
        let mut providers: Vec<_> = self
            .tables
            .read()
            .providers
            .values()
            .filter(|p| p.ehr_id == Some(ehr_id))
            .cloned()
            .collect();
        providers.sort_by(|a, b| a.onboarded_date.cmp(&b.onboarded_date));
        Ok(providers)
    }

    async fn search_providers(&self, term: &str) -> Result<Vec<HealthcareProvider>> {
        let needle = term.to_lowercase();
        let mut providers: Vec<_> = self
            .tables
            .read()
            .providers
            .values()
            .filter(|p| p.provider_name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        providers.sort_by(|a, b| a.onboarded_date.cmp(&b.onboarded_date));
        Ok(providers)
    }

    async fn create_provider(&self, provider: NewProvider) -> Result<HealthcareProvider> {
        let mut tables = self.tables.write();
        if let Some(ehr_id) = provider.ehr_id {
            if !tables.ehr_systems.contains_key(&ehr_id) {
                return Err(StorageError::foreign_key("healthcare_providers.ehr_id"));
            }
        }
        let record = provider.into_record(Utc::now());
        if tables.providers.contains_key(&record.id) {
            return Err(StorageError::conflict(format!(
                "provider {} already exists",
                record.id
            )));
        }
        tables.providers.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_provider(
        &self,
        id: Uuid,
        update: ProviderUpdate,
    ) -> Result<Option<HealthcareProvider>> {
        let mut tables = self.tables.write();
        if let Some(ehr_id) = update.ehr_id {
            if !tables.ehr_systems.contains_key(&ehr_id) {
                return Err(StorageError::foreign_key("healthcare_providers.ehr_id"));
            }
        }
        let Some(provider) = tables.providers.get_mut(&id) else {
            return Ok(None);
        };
        update.apply(provider);
        Ok(Some(provider.clone()))
    }

    async fn delete_provider(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write();
        if tables
            .fetch_records
            .values()
            .any(|r| r.provider_id == id)
        {
            return Err(StorageError::conflict(
                "provider still has data fetch records",
            ));
        }
        Ok(tables.providers.remove(&id).is_some())
    }

    async fn ehr_system(&self, id: Uuid) -> Result<Option<EhrSystem>> {
        Ok(self.tables.read().ehr_systems.get(&id).cloned())
    }

    async fn ehr_systems(&self) -> Result<Vec<EhrSystem>> {
        let mut systems: Vec<_> = self.tables.read().ehr_systems.values().cloned().collect();
        systems.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.system_name.cmp(&b.system_name))
        });
        Ok(systems)
    }

    async fn create_ehr_system(&self, system: NewEhrSystem) -> Result<EhrSystem> {
        let mut tables = self.tables.write();
        let record = system.into_record(Utc::now());
        if tables.ehr_systems.contains_key(&record.id) {
            return Err(StorageError::conflict(format!(
                "EHR system {} already exists",
                record.id
            )));
        }
        tables.ehr_systems.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_ehr_system(
        &self,
        id: Uuid,
        update: EhrSystemUpdate,
    ) -> Result<Option<EhrSystem>> {
        let mut tables = self.tables.write();
        let Some(system) = tables.ehr_systems.get_mut(&id) else {
            return Ok(None);
        };
        update.apply(system);
        Ok(Some(system.clone()))
    }

    async fn fetch_record(&self, id: i32) -> Result<Option<DataFetchRecord>> {
        Ok(self.tables.read().fetch_records.get(&id).cloned())
    }

    async fn fetch_records(&self) -> Result<Vec<DataFetchRecord>> {
        let mut records: Vec<_> = self.tables.read().fetch_records.values().cloned().collect();
        newest_first(&mut records);
        Ok(records)
    }

    async fn fetch_records_for_provider(&self, provider_id: Uuid) -> Result<Vec<DataFetchRecord>> {
        let mut records: Vec<_> = self
            .tables
            .read()
            .fetch_records
            .values()
            .filter(|r| r.provider_id == provider_id)
            .cloned()
            .collect();
        newest_first(&mut records);
        Ok(records)
    }

    async fn search_fetch_records(&self, term: &str) -> Result<Vec<DataFetchRecord>> {
        let needle = term.to_lowercase();
        let tables = self.tables.read();
        let mut records: Vec<_> = tables
            .fetch_records
            .values()
            .filter(|r| {
                tables
                    .providers
                    .get(&r.provider_id)
                    .is_some_and(|p| p.provider_name.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        newest_first(&mut records);
        Ok(records)
    }

    async fn create_fetch_record(&self, record: NewFetchRecord) -> Result<DataFetchRecord> {
        let mut tables = self.tables.write();
        if !tables.providers.contains_key(&record.provider_id) {
            return Err(StorageError::foreign_key("data_fetch_history.provider_id"));
        }
        tables.next_record_id += 1;
        let stored = record.into_record(tables.next_record_id, Utc::now());
        tables.fetch_records.insert(stored.id, stored.clone());
        Ok(stored)
    }
}

//! Behavioral tests for the in-memory backend
//!
//! The memory store is the reference implementation of the storage contract:
//! creation defaults, referential integrity, restrict-on-delete, search, and
//! result ordering are all exercised here.

use carebridge_schema::{
    CreateEhrSystem, CreateFetchRecord, CreateProvider, EhrSystemUpdate, NewUser, ProviderStatus,
    ProviderUpdate,
};
use carebridge_storage::{MemoryStorage, Storage, StorageError, verify_password};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn provider_payload(name: &str) -> CreateProvider {
    CreateProvider {
        provider_name: Some(name.into()),
        provider_type: Some("Clinic".into()),
        contact_email: Some("desk@clinic.example.org".into()),
        contact_phone: Some("5550001111".into()),
        ..CreateProvider::default()
    }
}

async fn seed_provider(storage: &MemoryStorage, name: &str) -> carebridge_schema::HealthcareProvider {
    storage
        .create_provider(provider_payload(name).validate().unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn create_assigns_uuid_and_defaults() {
    let storage = MemoryStorage::new();
    let provider = seed_provider(&storage, "Cedar Clinic").await;
    assert_eq!(provider.status, ProviderStatus::Pending);
    assert!(provider.last_data_fetch.is_none());
    assert!(!provider.id.is_nil());
}

#[tokio::test]
async fn client_supplied_id_is_preserved() {
    let storage = MemoryStorage::new();
    let id = Uuid::new_v4();
    let draft = CreateProvider {
        id: Some(id.to_string()),
        ..provider_payload("Cedar Clinic")
    }
    .validate()
    .unwrap();
    let provider = storage.create_provider(draft).await.unwrap();
    assert_eq!(provider.id, id);
}

#[tokio::test]
async fn stored_row_round_trips_unchanged() {
    let storage = MemoryStorage::new();
    let created = seed_provider(&storage, "Cedar Clinic").await;
    let fetched = storage.provider(created.id).await.unwrap().unwrap();
    assert_eq!(created, fetched);
}

#[tokio::test]
async fn list_is_empty_before_any_insert() {
    let storage = MemoryStorage::new();
    assert!(storage.providers().await.unwrap().is_empty());
    assert!(storage.ehr_systems().await.unwrap().is_empty());
    assert!(storage.fetch_records().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_removes_the_row() {
    let storage = MemoryStorage::new();
    let provider = seed_provider(&storage, "Cedar Clinic").await;
    assert!(storage.delete_provider(provider.id).await.unwrap());
    assert!(storage.provider(provider.id).await.unwrap().is_none());
    assert!(storage.providers().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_of_unknown_id_reports_false() {
    let storage = MemoryStorage::new();
    assert!(!storage.delete_provider(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn provider_with_unknown_ehr_is_rejected() {
    let storage = MemoryStorage::new();
    let draft = CreateProvider {
        ehr_id: Some(Uuid::new_v4().to_string()),
        ..provider_payload("Cedar Clinic")
    }
    .validate()
    .unwrap();
    let err = storage.create_provider(draft).await.unwrap_err();
    assert!(matches!(err, StorageError::ForeignKey { .. }));
}

#[tokio::test]
async fn provider_accepts_known_ehr() {
    let storage = MemoryStorage::new();
    let system = storage
        .create_ehr_system(
            CreateEhrSystem {
                system_name: Some("Epic".into()),
                ..CreateEhrSystem::default()
            }
            .validate()
            .unwrap(),
        )
        .await
        .unwrap();
    assert!(system.is_supported);

    let draft = CreateProvider {
        ehr_id: Some(system.id.to_string()),
        ..provider_payload("Cedar Clinic")
    }
    .validate()
    .unwrap();
    let provider = storage.create_provider(draft).await.unwrap();
    assert_eq!(provider.ehr_id, Some(system.id));

    let linked = storage.providers_by_ehr(system.id).await.unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].id, provider.id);
}

#[tokio::test]
async fn search_matches_name_case_insensitively() {
    let storage = MemoryStorage::new();
    seed_provider(&storage, "Lakeside General").await;
    seed_provider(&storage, "Cedar Clinic").await;

    let hits = storage.search_providers("lakeside").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].provider_name, "Lakeside General");

    assert!(storage.search_providers("mercy").await.unwrap().is_empty());
}

#[tokio::test]
async fn update_merges_only_supplied_fields() {
    let storage = MemoryStorage::new();
    let provider = seed_provider(&storage, "Cedar Clinic").await;

    let update = ProviderUpdate {
        status: Some(ProviderStatus::Active),
        notes: Some("go-live complete".into()),
        ..ProviderUpdate::default()
    };
    let updated = storage
        .update_provider(provider.id, update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, ProviderStatus::Active);
    assert_eq!(updated.notes.as_deref(), Some("go-live complete"));
    assert_eq!(updated.provider_name, provider.provider_name);
    assert_eq!(updated.contact_email, provider.contact_email);
}

#[tokio::test]
async fn update_of_unknown_id_is_none() {
    let storage = MemoryStorage::new();
    let result = storage
        .update_provider(Uuid::new_v4(), ProviderUpdate::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn update_checks_new_ehr_reference() {
    let storage = MemoryStorage::new();
    let provider = seed_provider(&storage, "Cedar Clinic").await;
    let update = ProviderUpdate {
        ehr_id: Some(Uuid::new_v4()),
        ..ProviderUpdate::default()
    };
    let err = storage.update_provider(provider.id, update).await.unwrap_err();
    assert!(matches!(err, StorageError::ForeignKey { .. }));
}

#[tokio::test]
async fn fetch_record_requires_existing_provider() {
    let storage = MemoryStorage::new();
    let draft = CreateFetchRecord {
        provider_id: Some(Uuid::new_v4().to_string()),
        s3_location: Some("s3://exports/batch-01".into()),
        status: None,
    }
    .validate()
    .unwrap();
    let err = storage.create_fetch_record(draft).await.unwrap_err();
    assert!(matches!(err, StorageError::ForeignKey { .. }));
}

#[tokio::test]
async fn fetch_records_are_serial_and_newest_first() {
    let storage = MemoryStorage::new();
    let provider = seed_provider(&storage, "Cedar Clinic").await;

    for batch in ["batch-01", "batch-02", "batch-03"] {
        let draft = CreateFetchRecord {
            provider_id: Some(provider.id.to_string()),
            s3_location: Some(format!("s3://exports/{batch}")),
            status: None,
        }
        .validate()
        .unwrap();
        let record = storage.create_fetch_record(draft).await.unwrap();
        assert_eq!(record.status, "completed");
    }

    let records = storage.fetch_records().await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].s3_location, "s3://exports/batch-03");
    assert_eq!(records[2].s3_location, "s3://exports/batch-01");
    assert_eq!(records[0].id, 3);

    let by_provider = storage
        .fetch_records_for_provider(provider.id)
        .await
        .unwrap();
    assert_eq!(by_provider, records);

    let first = storage.fetch_record(1).await.unwrap().unwrap();
    assert_eq!(first.s3_location, "s3://exports/batch-01");
    assert!(storage.fetch_record(99).await.unwrap().is_none());
}

#[tokio::test]
async fn fetch_record_search_joins_provider_name() {
    let storage = MemoryStorage::new();
    let lakeside = seed_provider(&storage, "Lakeside General").await;
    let cedar = seed_provider(&storage, "Cedar Clinic").await;

    for provider in [&lakeside, &cedar] {
        let draft = CreateFetchRecord {
            provider_id: Some(provider.id.to_string()),
            s3_location: Some("s3://exports/batch-01".into()),
            status: None,
        }
        .validate()
        .unwrap();
        storage.create_fetch_record(draft).await.unwrap();
    }

    let hits = storage.search_fetch_records("CEDAR").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].provider_id, cedar.id);
}

#[tokio::test]
async fn provider_with_history_cannot_be_deleted() {
    let storage = MemoryStorage::new();
    let provider = seed_provider(&storage, "Cedar Clinic").await;
    let draft = CreateFetchRecord {
        provider_id: Some(provider.id.to_string()),
        s3_location: Some("s3://exports/batch-01".into()),
        status: None,
    }
    .validate()
    .unwrap();
    storage.create_fetch_record(draft).await.unwrap();

    let err = storage.delete_provider(provider.id).await.unwrap_err();
    assert!(matches!(err, StorageError::Conflict(_)));
    assert!(storage.provider(provider.id).await.unwrap().is_some());
}

#[tokio::test]
async fn ehr_update_toggles_support_flag() {
    let storage = MemoryStorage::new();
    let system = storage
        .create_ehr_system(
            CreateEhrSystem {
                system_name: Some("Epic".into()),
                ..CreateEhrSystem::default()
            }
            .validate()
            .unwrap(),
        )
        .await
        .unwrap();

    let update = EhrSystemUpdate {
        is_supported: Some(false),
        ..EhrSystemUpdate::default()
    };
    let updated = storage
        .update_ehr_system(system.id, update)
        .await
        .unwrap()
        .unwrap();
    assert!(!updated.is_supported);
    assert_eq!(updated.system_name, "Epic");
}

#[tokio::test]
async fn users_are_stored_hashed_with_serial_ids() {
    let storage = MemoryStorage::new();
    let user = storage
        .create_user(NewUser {
            username: "clinician".into(),
            password: "correct horse battery staple".into(),
        })
        .await
        .unwrap();
    assert_eq!(user.id, 1);
    assert_ne!(user.password_hash, "correct horse battery staple");
    assert!(verify_password("correct horse battery staple", &user.password_hash).unwrap());

    let found = storage.user_by_username("clinician").await.unwrap().unwrap();
    assert_eq!(found, user);
    assert_eq!(storage.user(1).await.unwrap().unwrap(), user);
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let storage = MemoryStorage::new();
    let new_user = || NewUser {
        username: "clinician".into(),
        password: "correct horse battery staple".into(),
    };
    storage.create_user(new_user()).await.unwrap();
    let err = storage.create_user(new_user()).await.unwrap_err();
    assert!(matches!(err, StorageError::Conflict(_)));
}

//! Validation tests for the insert and patch payloads
//!
//! Covers:
//! - Required-field reporting by wire name
//! - Email, phone, URL, and UUID format rules
//! - Enum membership for provider type and status
//! - Defaults applied during normalization
//! - Partial updates checking only supplied fields

use carebridge_schema::{
    CreateEhrSystem, CreateFetchRecord, CreateProvider, CreateUser, EhrSystemPatch, ProviderPatch,
    ProviderStatus, ProviderType, ValidationError,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn valid_provider() -> CreateProvider {
    CreateProvider {
        provider_name: Some("Lakeside General".into()),
        provider_type: Some("Hospital".into()),
        contact_email: Some("admin@lakeside.org".into()),
        contact_phone: Some("5551234567".into()),
        ..CreateProvider::default()
    }
}

fn violated_fields(err: &ValidationError) -> Vec<&str> {
    err.violations.iter().map(|f| f.field.as_str()).collect()
}

#[test]
fn valid_provider_normalizes_with_pending_status() {
    let draft = valid_provider().validate().unwrap();
    assert_eq!(draft.status, ProviderStatus::Pending);
    assert_eq!(draft.provider_type, ProviderType::Hospital);
    assert!(draft.id.is_none());
}

#[test]
fn explicit_status_is_kept() {
    let payload = CreateProvider {
        status: Some("Active".into()),
        ..valid_provider()
    };
    assert_eq!(payload.validate().unwrap().status, ProviderStatus::Active);
}

#[test]
fn missing_email_is_reported_by_wire_name() {
    let payload = CreateProvider {
        contact_email: None,
        ..valid_provider()
    };
    let err = payload.validate().unwrap_err();
    assert_eq!(violated_fields(&err), vec!["contactEmail"]);
}

#[rstest]
#[case("plainaddress")]
#[case("missing-at.example.org")]
#[case("two@@signs.org")]
#[case("no-domain@")]
fn malformed_email_is_rejected(#[case] email: &str) {
    let payload = CreateProvider {
        contact_email: Some(email.into()),
        ..valid_provider()
    };
    let err = payload.validate().unwrap_err();
    assert!(violated_fields(&err).contains(&"contactEmail"));
}

#[rstest]
#[case("555-123-4567")]
#[case("(555)1234567")]
#[case("555123456a")]
fn phone_with_non_digits_is_rejected(#[case] phone: &str) {
    let payload = CreateProvider {
        contact_phone: Some(phone.into()),
        ..valid_provider()
    };
    let err = payload.validate().unwrap_err();
    assert!(violated_fields(&err).contains(&"contactPhone"));
}

#[test]
fn short_phone_is_rejected() {
    let payload = CreateProvider {
        contact_phone: Some("555123".into()),
        ..valid_provider()
    };
    let err = payload.validate().unwrap_err();
    assert_eq!(err.violations[0].message, "must be at least 10 digits");
}

#[test]
fn unknown_provider_type_is_rejected() {
    let payload = CreateProvider {
        provider_type: Some("Spa".into()),
        ..valid_provider()
    };
    let err = payload.validate().unwrap_err();
    assert!(violated_fields(&err).contains(&"providerType"));
}

#[test]
fn private_practice_uses_spaced_spelling() {
    let payload = CreateProvider {
        provider_type: Some("Private Practice".into()),
        ..valid_provider()
    };
    assert_eq!(
        payload.validate().unwrap().provider_type,
        ProviderType::PrivatePractice
    );
}

#[test]
fn malformed_ehr_reference_is_rejected() {
    let payload = CreateProvider {
        ehr_id: Some("not-a-uuid".into()),
        ..valid_provider()
    };
    let err = payload.validate().unwrap_err();
    assert!(violated_fields(&err).contains(&"ehrId"));
}

#[test]
fn every_violation_is_reported_at_once() {
    let payload = CreateProvider {
        provider_name: Some(String::new()),
        provider_type: Some("Castle".into()),
        contact_email: Some("nope".into()),
        contact_phone: Some("123".into()),
        ..CreateProvider::default()
    };
    let err = payload.validate().unwrap_err();
    assert_eq!(
        violated_fields(&err),
        vec!["providerName", "providerType", "contactEmail", "contactPhone"]
    );
}

#[test]
fn client_supplied_id_round_trips() {
    let id = "fccbcb8a-cfad-4f0c-adc2-1a4e9b875ac0";
    let payload = CreateProvider {
        id: Some(id.into()),
        ..valid_provider()
    };
    let draft = payload.validate().unwrap();
    assert_eq!(draft.id.unwrap().to_string(), id);
}

#[test]
fn ehr_system_defaults_to_supported() {
    let payload = CreateEhrSystem {
        system_name: Some("Epic".into()),
        ..CreateEhrSystem::default()
    };
    assert!(payload.validate().unwrap().is_supported);
}

#[test]
fn ehr_system_keeps_explicit_unsupported_flag() {
    let payload = CreateEhrSystem {
        system_name: Some("Legacy EHR".into()),
        is_supported: Some(false),
        ..CreateEhrSystem::default()
    };
    assert!(!payload.validate().unwrap().is_supported);
}

#[rstest]
#[case("ftp://files.example.org")]
#[case("example.org/api")]
#[case("not a url")]
fn ehr_endpoint_must_be_http(#[case] url: &str) {
    let payload = CreateEhrSystem {
        system_name: Some("Epic".into()),
        api_endpoint: Some(url.into()),
        ..CreateEhrSystem::default()
    };
    let err = payload.validate().unwrap_err();
    assert_eq!(violated_fields(&err), vec!["apiEndpoint"]);
}

#[test]
fn ehr_system_name_is_required() {
    let err = CreateEhrSystem::default().validate().unwrap_err();
    assert_eq!(violated_fields(&err), vec!["systemName"]);
}

#[test]
fn fetch_record_defaults_to_completed() {
    let payload = CreateFetchRecord {
        provider_id: Some("fccbcb8a-cfad-4f0c-adc2-1a4e9b875ac0".into()),
        s3_location: Some("s3://carebridge-exports/2026/08/batch-01".into()),
        status: None,
    };
    assert_eq!(payload.validate().unwrap().status, "completed");
}

#[test]
fn fetch_record_requires_provider_and_location() {
    let err = CreateFetchRecord::default().validate().unwrap_err();
    assert_eq!(violated_fields(&err), vec!["providerId", "s3Location"]);
}

#[test]
fn user_password_must_be_long_enough() {
    let payload = CreateUser {
        username: Some("clinician".into()),
        password: Some("short".into()),
    };
    let err = payload.validate().unwrap_err();
    assert_eq!(violated_fields(&err), vec!["password"]);
}

#[test]
fn empty_patch_validates_to_noop() {
    let update = ProviderPatch::default().validate().unwrap();
    assert_eq!(update, carebridge_schema::ProviderUpdate::default());
}

#[test]
fn patch_checks_only_supplied_fields() {
    let patch = ProviderPatch {
        status: Some("Active".into()),
        ..ProviderPatch::default()
    };
    let update = patch.validate().unwrap();
    assert_eq!(update.status, Some(ProviderStatus::Active));
    assert!(update.contact_email.is_none());
}

#[test]
fn patch_rejects_bad_email() {
    let patch = ProviderPatch {
        contact_email: Some("broken".into()),
        ..ProviderPatch::default()
    };
    let err = patch.validate().unwrap_err();
    assert_eq!(violated_fields(&err), vec!["contactEmail"]);
}

#[test]
fn ehr_patch_rejects_empty_name() {
    let patch = EhrSystemPatch {
        system_name: Some(String::new()),
        ..EhrSystemPatch::default()
    };
    let err = patch.validate().unwrap_err();
    assert_eq!(violated_fields(&err), vec!["systemName"]);
}

#[test]
fn wire_format_is_camel_case() {
    let record = valid_provider()
        .validate()
        .unwrap()
        .into_record(chrono::Utc::now());
    let json = serde_json::to_value(&record).unwrap();
    assert!(json.get("providerName").is_some());
    assert!(json.get("contactEmail").is_some());
    assert!(json.get("onboardedDate").is_some());
    assert!(json.get("provider_name").is_none());
}

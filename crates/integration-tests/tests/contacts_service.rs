//! Contact service against the in-memory record store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use dealflow_core::{ContactId, ContactPatch, NewContact};
use dealflow_crm::services::{ContactsService, OnError, ReadPolicies, ServiceError};
use dealflow_integration_tests::{InMemoryRecordStore, UnreachableRecordStore};
use serde_json::json;

fn ada() -> NewContact {
    NewContact {
        name: "Ada Lovelace".to_string(),
        email: Some("ada@example.com".to_string()),
        phone: Some("555-0100".to_string()),
        company: Some("Analytical Engines".to_string()),
        notes: None,
    }
}

#[tokio::test]
async fn test_create_then_get_returns_input_fields() {
    let store = Arc::new(InMemoryRecordStore::new());
    let contacts = ContactsService::new(Arc::clone(&store));

    let created = contacts.create(ada()).await.unwrap();
    let fetched = contacts.get_by_id(created.id).await.unwrap().unwrap();

    assert_eq!(fetched.name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(fetched.email.as_deref(), Some("ada@example.com"));
    assert_eq!(fetched.phone.as_deref(), Some("555-0100"));
    assert_eq!(fetched.company.as_deref(), Some("Analytical Engines"));
    assert_eq!(fetched.notes, None);
    assert!(fetched.last_contacted_at.is_some());
}

#[tokio::test]
async fn test_update_changes_only_the_patched_field() {
    let store = Arc::new(InMemoryRecordStore::new());
    let contacts = ContactsService::new(Arc::clone(&store));
    let created = contacts.create(ada()).await.unwrap();

    let patch = ContactPatch {
        company: Some(Some(String::new())),
        ..ContactPatch::default()
    };
    contacts.update(created.id, patch).await.unwrap();

    let fetched = contacts.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.company.as_deref(), Some(""));
    assert_eq!(fetched.name, created.name);
    assert_eq!(fetched.email, created.email);
    assert_eq!(fetched.phone, created.phone);
    assert_eq!(fetched.last_contacted_at, created.last_contacted_at);
}

#[tokio::test]
async fn test_explicit_null_clears_a_field() {
    let store = Arc::new(InMemoryRecordStore::new());
    let contacts = ContactsService::new(Arc::clone(&store));
    let created = contacts
        .create(NewContact {
            notes: Some("Prefers email".to_string()),
            ..ada()
        })
        .await
        .unwrap();
    assert_eq!(created.notes.as_deref(), Some("Prefers email"));

    let patch: ContactPatch = serde_json::from_value(json!({"notes_c": null})).unwrap();
    contacts.update(created.id, patch).await.unwrap();

    let row = store.raw_row("contact_c", created.id.as_i32()).unwrap();
    assert!(row.contains_key("notes_c"));
    assert!(row["notes_c"].is_null());

    let fetched = contacts.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.notes, None);
    assert_eq!(fetched.email, created.email);
}

#[tokio::test]
async fn test_delete_then_get_is_absent() {
    let store = Arc::new(InMemoryRecordStore::new());
    let contacts = ContactsService::new(Arc::clone(&store));
    let created = contacts.create(ada()).await.unwrap();

    assert!(contacts.delete(created.id).await.unwrap());
    assert_eq!(contacts.get_by_id(created.id).await.unwrap(), None);
    assert!(!contacts.delete(created.id).await.unwrap());
}

#[tokio::test]
async fn test_update_of_missing_record_is_remote_write_error() {
    let contacts = ContactsService::new(Arc::new(InMemoryRecordStore::new()));

    let err = contacts
        .update(ContactId::new(99), ContactPatch::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::RemoteWrite { .. }));
    assert_eq!(err.message(), "Record not found");
}

#[tokio::test]
async fn test_get_all_propagates_envelope_failure() {
    let store = Arc::new(InMemoryRecordStore::new());
    store.fail_queries("Table unavailable");
    let contacts = ContactsService::new(Arc::clone(&store));

    let err = contacts.get_all().await.unwrap_err();
    assert!(matches!(err, ServiceError::RemoteQuery { .. }));
    assert_eq!(err.message(), "Table unavailable");
}

#[tokio::test]
async fn test_default_policies_on_unreachable_store() {
    let contacts = ContactsService::new(Arc::new(UnreachableRecordStore));

    assert!(matches!(
        contacts.get_all().await,
        Err(ServiceError::Transport { .. })
    ));
    assert_eq!(contacts.get_by_id(ContactId::new(1)).await.unwrap(), None);
    assert!(matches!(
        contacts.create(ada()).await,
        Err(ServiceError::Transport { .. })
    ));
    assert!(contacts.delete(ContactId::new(1)).await.is_err());
}

#[tokio::test]
async fn test_get_all_policy_is_configurable() {
    let contacts = ContactsService::new(Arc::new(UnreachableRecordStore)).with_policies(
        ReadPolicies {
            get_all: OnError::Empty,
            ..ReadPolicies::default()
        },
    );

    assert!(contacts.get_all().await.unwrap().is_empty());
}

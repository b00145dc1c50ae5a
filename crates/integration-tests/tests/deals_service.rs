//! Deal service against the in-memory record store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use dealflow_core::{ContactId, DealPatch, DealStage, NewDeal};
use dealflow_crm::services::DealsService;
use dealflow_integration_tests::{InMemoryRecordStore, UnreachableRecordStore};
use rust_decimal::Decimal;

fn renewal(contact: i32) -> NewDeal {
    NewDeal {
        contact_id: ContactId::new(contact),
        title: "Acme Renewal".to_string(),
        value: Decimal::new(500_050, 2),
        stage: DealStage::Lead,
        expected_close_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    }
}

#[tokio::test]
async fn test_create_then_get_returns_coerced_fields() {
    let store = Arc::new(InMemoryRecordStore::new());
    let deals = DealsService::new(Arc::clone(&store));

    let created = deals.create(renewal(42)).await.unwrap();
    let fetched = deals.get_by_id(created.id).await.unwrap().unwrap();

    assert_eq!(fetched.contact_id, Some(ContactId::new(42)));
    assert_eq!(fetched.title.as_deref(), Some("Acme Renewal"));
    assert_eq!(fetched.value, Some(Decimal::new(500_050, 2)));
    assert_eq!(fetched.stage, Some(DealStage::Lead));
    assert_eq!(
        fetched.expected_close_date,
        NaiveDate::from_ymd_opt(2025, 1, 1)
    );
    assert!(fetched.created_at.is_some());
    assert_eq!(fetched.created_at, fetched.moved_to_stage_at);

    let raw = store.raw_row("deal_c", created.id.as_i32()).unwrap();
    assert!(raw["contact_id_c"].is_i64());
    assert!(raw["value_c"].is_f64());
}

#[tokio::test]
async fn test_stage_update_restamps_moved_to_stage_at_only() {
    let store = Arc::new(InMemoryRecordStore::new());
    let deals = DealsService::new(Arc::clone(&store));
    let created = deals.create(renewal(42)).await.unwrap();

    // Backdate so the re-stamp is observable.
    let earlier = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    deals
        .update(
            created.id,
            DealPatch {
                moved_to_stage_at: Some(Some(earlier)),
                ..DealPatch::default()
            },
        )
        .await
        .unwrap();

    let updated = deals
        .update(
            created.id,
            DealPatch {
                stage: Some(Some(DealStage::Qualified)),
                ..DealPatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.stage, Some(DealStage::Qualified));
    assert!(updated.moved_to_stage_at.unwrap() > earlier);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.value, created.value);
    assert_eq!(updated.contact_id, created.contact_id);
    assert_eq!(updated.expected_close_date, created.expected_close_date);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn test_non_stage_update_keeps_moved_to_stage_at() {
    let store = Arc::new(InMemoryRecordStore::new());
    let deals = DealsService::new(Arc::clone(&store));
    let created = deals.create(renewal(42)).await.unwrap();

    let updated = deals
        .update(
            created.id,
            DealPatch {
                value: Some(Some(Decimal::new(7500, 0))),
                ..DealPatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.value, Some(Decimal::new(7500, 0)));
    assert_eq!(updated.moved_to_stage_at, created.moved_to_stage_at);
    assert_eq!(updated.stage, created.stage);
}

#[tokio::test]
async fn test_get_by_contact_id_never_leaks_other_contacts() {
    let store = Arc::new(InMemoryRecordStore::new());
    let deals = DealsService::new(Arc::clone(&store));
    deals.create(renewal(1)).await.unwrap();
    deals.create(renewal(2)).await.unwrap();
    deals.create(renewal(1)).await.unwrap();

    let for_one = deals.get_by_contact_id(ContactId::new(1)).await.unwrap();
    assert_eq!(for_one.len(), 2);
    assert!(
        for_one
            .iter()
            .all(|deal| deal.contact_id == Some(ContactId::new(1)))
    );
    assert!(
        deals
            .get_by_contact_id(ContactId::new(3))
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_relation_lookup_degrades_to_empty() {
    let deals = DealsService::new(Arc::new(UnreachableRecordStore));
    assert!(
        deals
            .get_by_contact_id(ContactId::new(1))
            .await
            .unwrap()
            .is_empty()
    );
}

//! `deal_c` table.
//!
//! A deal records when it entered its current stage. Creation stamps both
//! `created_at_c` and `moved_to_stage_at_c`; an update that carries a stage
//! re-stamps `moved_to_stage_at_c` in the same request.

use chrono::{DateTime, Utc};
use dealflow_core::{Deal, DealId, DealPatch, NewDeal};
use serde::Serialize;

use super::resource::{ContactScoped, Resource};

/// Marker type describing the `deal_c` table.
#[derive(Debug, Clone, Copy)]
pub struct DealResource;

/// Record written on deal creation.
#[derive(Debug, Clone, Serialize)]
pub struct DealCreateRecord {
    #[serde(flatten)]
    pub input: NewDeal,
    #[serde(rename = "created_at_c")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "moved_to_stage_at_c")]
    pub moved_to_stage_at: DateTime<Utc>,
}

impl Resource for DealResource {
    const TABLE: &'static str = "deal_c";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "contact_id_c",
        "title_c",
        "value_c",
        "stage_c",
        "expected_close_date_c",
        "created_at_c",
        "moved_to_stage_at_c",
    ];
    const LABEL: &'static str = "Deal";

    type Id = DealId;
    type Record = Deal;
    type New = NewDeal;
    type Patch = DealPatch;
    type CreateRecord = DealCreateRecord;

    fn create_record(input: NewDeal, now: DateTime<Utc>) -> DealCreateRecord {
        DealCreateRecord {
            input,
            created_at: now,
            moved_to_stage_at: now,
        }
    }

    /// An explicit `moved_to_stage_at` in the patch wins over the stamp.
    fn prepare_patch(mut patch: DealPatch, now: DateTime<Utc>) -> DealPatch {
        if patch.stage.is_some() && patch.moved_to_stage_at.is_none() {
            patch.moved_to_stage_at = Some(Some(now));
        }
        patch
    }
}

impl ContactScoped for DealResource {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use dealflow_core::{ContactId, DealStage};
    use rust_decimal::Decimal;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_create_record_coerces_and_stamps() {
        let record = DealResource::create_record(
            NewDeal {
                contact_id: ContactId::new(42),
                title: "Acme Renewal".to_string(),
                value: Decimal::new(5000, 0),
                stage: DealStage::Lead,
                expected_close_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            },
            now(),
        );

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "contact_id_c": 42,
                "title_c": "Acme Renewal",
                "value_c": 5000.0,
                "stage_c": "lead",
                "expected_close_date_c": "2025-01-01",
                "created_at_c": "2025-03-01T12:00:00Z",
                "moved_to_stage_at_c": "2025-03-01T12:00:00Z"
            })
        );
    }

    #[test]
    fn test_stage_change_restamps_moved_to_stage_at() {
        let patch = DealResource::prepare_patch(
            DealPatch {
                stage: Some(Some(DealStage::Proposal)),
                ..DealPatch::default()
            },
            now(),
        );
        assert_eq!(patch.moved_to_stage_at, Some(Some(now())));
    }

    #[test]
    fn test_patch_without_stage_leaves_moved_to_stage_at_alone() {
        let patch = DealResource::prepare_patch(
            DealPatch {
                title: Some(Some("Renamed".to_string())),
                ..DealPatch::default()
            },
            now(),
        );
        assert_eq!(patch.moved_to_stage_at, None);
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"title_c": "Renamed"})
        );
    }

    #[test]
    fn test_explicit_moved_to_stage_at_wins() {
        let earlier = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
        let patch = DealResource::prepare_patch(
            DealPatch {
                stage: Some(Some(DealStage::ClosedWon)),
                moved_to_stage_at: Some(Some(earlier)),
                ..DealPatch::default()
            },
            now(),
        );
        assert_eq!(patch.moved_to_stage_at, Some(Some(earlier)));
    }
}

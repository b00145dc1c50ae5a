//! Deal records.
//!
//! Monetary values are [`Decimal`]. They are read from either numbers or
//! numeric strings and written as JSON numbers, which is what the `value_c`
//! column stores.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::coerce;
use super::id::{ContactId, DealId};
use super::patch::{self, PatchField};
use super::stage::DealStage;

/// A deal as stored in the `deal_c` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    #[serde(rename = "Id")]
    pub id: DealId,
    #[serde(rename = "Name", default)]
    pub record_name: Option<String>,
    #[serde(
        rename = "contact_id_c",
        default,
        deserialize_with = "coerce::lookup_id_opt"
    )]
    pub contact_id: Option<ContactId>,
    #[serde(rename = "title_c", default)]
    pub title: Option<String>,
    #[serde(
        rename = "value_c",
        default,
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub value: Option<Decimal>,
    #[serde(rename = "stage_c", default)]
    pub stage: Option<DealStage>,
    #[serde(rename = "expected_close_date_c", default)]
    pub expected_close_date: Option<NaiveDate>,
    #[serde(rename = "created_at_c", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "moved_to_stage_at_c", default)]
    pub moved_to_stage_at: Option<DateTime<Utc>>,
}

/// Input for creating a deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDeal {
    #[serde(rename = "contact_id_c", deserialize_with = "coerce::lookup_id")]
    pub contact_id: ContactId,
    #[serde(rename = "title_c")]
    pub title: String,
    #[serde(
        rename = "value_c",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub value: Decimal,
    #[serde(rename = "stage_c", default)]
    pub stage: DealStage,
    #[serde(rename = "expected_close_date_c")]
    pub expected_close_date: NaiveDate,
}

/// Sparse update for a deal.
///
/// Setting `stage` makes the deals service re-stamp `moved_to_stage_at`
/// unless the patch carries `moved_to_stage_at` itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealPatch {
    #[serde(
        rename = "contact_id_c",
        default,
        deserialize_with = "patch::present_lookup_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_id: PatchField<ContactId>,
    #[serde(
        rename = "title_c",
        default,
        deserialize_with = "patch::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: PatchField<String>,
    #[serde(
        rename = "value_c",
        default,
        deserialize_with = "patch::present",
        serialize_with = "patch::amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: PatchField<Decimal>,
    #[serde(
        rename = "stage_c",
        default,
        deserialize_with = "patch::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub stage: PatchField<DealStage>,
    #[serde(
        rename = "expected_close_date_c",
        default,
        deserialize_with = "patch::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_close_date: PatchField<NaiveDate>,
    #[serde(
        rename = "created_at_c",
        default,
        deserialize_with = "patch::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: PatchField<DateTime<Utc>>,
    #[serde(
        rename = "moved_to_stage_at_c",
        default,
        deserialize_with = "patch::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub moved_to_stage_at: PatchField<DateTime<Utc>>,
}

impl DealPatch {
    /// Omit `stage` when it equals `current`, so an unchanged stage does not
    /// re-stamp `moved_to_stage_at`.
    #[must_use]
    pub fn without_unchanged_stage(mut self, current: Option<DealStage>) -> Self {
        if self.stage == Some(current) {
            self.stage = None;
        }
        self
    }
}

impl From<NewDeal> for DealPatch {
    /// Full replacement of every editable field, as submitted by the edit form.
    fn from(deal: NewDeal) -> Self {
        Self {
            contact_id: Some(Some(deal.contact_id)),
            title: Some(Some(deal.title)),
            value: Some(Some(deal.value)),
            stage: Some(Some(deal.stage)),
            expected_close_date: Some(Some(deal.expected_close_date)),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deal_from_record_store_row() {
        let deal: Deal = serde_json::from_value(json!({
            "Id": 11,
            "Name": "Acme Renewal",
            "contact_id_c": {"Id": 42, "Name": "Ada"},
            "title_c": "Acme Renewal",
            "value_c": 5000.5,
            "stage_c": "proposal",
            "expected_close_date_c": "2025-01-01",
            "created_at_c": null
        }))
        .unwrap();

        assert_eq!(deal.contact_id, Some(ContactId::new(42)));
        assert_eq!(deal.value, Some(Decimal::new(50005, 1)));
        assert_eq!(deal.stage, Some(DealStage::Proposal));
        assert_eq!(deal.created_at, None);
        assert_eq!(deal.moved_to_stage_at, None);
    }

    #[test]
    fn test_new_deal_accepts_string_inputs() {
        let deal: NewDeal = serde_json::from_value(json!({
            "contact_id_c": "42",
            "title_c": "Acme Renewal",
            "value_c": "5000",
            "expected_close_date_c": "2025-01-01"
        }))
        .unwrap();

        assert_eq!(deal.contact_id, ContactId::new(42));
        assert_eq!(deal.value, Decimal::new(5000, 0));
        assert_eq!(deal.stage, DealStage::Lead);
    }

    #[test]
    fn test_value_is_written_as_number() {
        let patch = DealPatch {
            value: Some(Some(Decimal::new(1, 2))),
            ..DealPatch::default()
        };
        let wire = serde_json::to_value(&patch).unwrap();
        assert_eq!(wire, json!({"value_c": 0.01}));

        let patch: DealPatch = serde_json::from_value(json!({"value_c": "12.5"})).unwrap();
        assert_eq!(patch.value, Some(Some(Decimal::new(125, 1))));
    }

    #[test]
    fn test_patch_from_new_deal_sets_every_editable_field() {
        let patch = DealPatch::from(NewDeal {
            contact_id: ContactId::new(1),
            title: "Renewal".to_string(),
            value: Decimal::new(10, 0),
            stage: DealStage::Qualified,
            expected_close_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        });
        assert_eq!(patch.stage, Some(Some(DealStage::Qualified)));
        assert_eq!(patch.created_at, None);
        assert_eq!(patch.moved_to_stage_at, None);
    }

    #[test]
    fn test_patch_keeps_explicit_null_close_date() {
        let patch: DealPatch =
            serde_json::from_value(json!({"expected_close_date_c": null})).unwrap();
        assert_eq!(patch.expected_close_date, Some(None));
        assert_eq!(patch.stage, None);

        let wire = serde_json::to_value(&patch).unwrap();
        assert_eq!(wire, json!({"expected_close_date_c": null}));
    }

    #[test]
    fn test_unchanged_stage_is_dropped() {
        let submitted = || DealPatch {
            title: Some(Some("Renewal".to_string())),
            stage: Some(Some(DealStage::Proposal)),
            ..DealPatch::default()
        };

        let same = submitted().without_unchanged_stage(Some(DealStage::Proposal));
        assert_eq!(same.stage, None);
        assert_eq!(same.title, Some(Some("Renewal".to_string())));

        let moved = submitted().without_unchanged_stage(Some(DealStage::Lead));
        assert_eq!(moved.stage, Some(Some(DealStage::Proposal)));

        let unknown = submitted().without_unchanged_stage(None);
        assert_eq!(unknown.stage, Some(Some(DealStage::Proposal)));
    }
}

//! Activity records (calls, emails, meetings logged against a contact).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::coerce;
use super::id::{ActivityId, ContactId};
use super::patch::{self, PatchField};

/// An activity as stored in the `activity_c` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "Id")]
    pub id: ActivityId,
    #[serde(rename = "Name", default)]
    pub record_name: Option<String>,
    #[serde(
        rename = "contact_id_c",
        default,
        deserialize_with = "coerce::lookup_id_opt"
    )]
    pub contact_id: Option<ContactId>,
    #[serde(rename = "description_c", default)]
    pub description: Option<String>,
    /// Free-form activity type ("call", "email", ...).
    #[serde(rename = "type_c", default)]
    pub kind: Option<String>,
    #[serde(rename = "timestamp_c", default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Input for logging an activity. The timestamp is stamped on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewActivity {
    #[serde(rename = "contact_id_c", deserialize_with = "coerce::lookup_id")]
    pub contact_id: ContactId,
    #[serde(
        rename = "description_c",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(rename = "type_c", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Sparse update for an activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPatch {
    #[serde(
        rename = "contact_id_c",
        default,
        deserialize_with = "patch::present_lookup_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_id: PatchField<ContactId>,
    #[serde(
        rename = "description_c",
        default,
        deserialize_with = "patch::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: PatchField<String>,
    #[serde(
        rename = "type_c",
        default,
        deserialize_with = "patch::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: PatchField<String>,
    #[serde(
        rename = "timestamp_c",
        default,
        deserialize_with = "patch::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: PatchField<DateTime<Utc>>,
}

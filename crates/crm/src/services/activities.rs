//! `activity_c` table.

use chrono::{DateTime, Utc};
use dealflow_core::{Activity, ActivityId, ActivityPatch, NewActivity};
use serde::Serialize;

use super::resource::{ContactScoped, Resource};
use crate::records::SortType;

/// Marker type describing the `activity_c` table.
#[derive(Debug, Clone, Copy)]
pub struct ActivityResource;

/// Record written when an activity is logged.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityCreateRecord {
    #[serde(flatten)]
    pub input: NewActivity,
    #[serde(rename = "timestamp_c")]
    pub timestamp: DateTime<Utc>,
}

impl Resource for ActivityResource {
    const TABLE: &'static str = "activity_c";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "contact_id_c",
        "description_c",
        "timestamp_c",
        "type_c",
    ];
    const LABEL: &'static str = "Activity";

    type Id = ActivityId;
    type Record = Activity;
    type New = NewActivity;
    type Patch = ActivityPatch;
    type CreateRecord = ActivityCreateRecord;

    fn create_record(input: NewActivity, now: DateTime<Utc>) -> ActivityCreateRecord {
        ActivityCreateRecord {
            input,
            timestamp: now,
        }
    }
}

impl ContactScoped for ActivityResource {
    const CONTACT_ORDER: Option<(&'static str, SortType)> = Some(("timestamp_c", SortType::Desc));
}

//! `contact_c` table.

use chrono::{DateTime, Utc};
use dealflow_core::{Contact, ContactId, ContactPatch, NewContact};
use serde::Serialize;

use super::resource::Resource;

/// Marker type describing the `contact_c` table.
#[derive(Debug, Clone, Copy)]
pub struct ContactResource;

/// Record written on contact creation.
#[derive(Debug, Clone, Serialize)]
pub struct ContactCreateRecord {
    #[serde(flatten)]
    pub input: NewContact,
    #[serde(rename = "last_contacted_at_c")]
    pub last_contacted_at: DateTime<Utc>,
}

impl Resource for ContactResource {
    const TABLE: &'static str = "contact_c";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "name_c",
        "email_c",
        "phone_c",
        "company_c",
        "notes_c",
        "last_contacted_at_c",
        "CreatedOn",
    ];
    const LABEL: &'static str = "Contact";

    type Id = ContactId;
    type Record = Contact;
    type New = NewContact;
    type Patch = ContactPatch;
    type CreateRecord = ContactCreateRecord;

    fn create_record(input: NewContact, now: DateTime<Utc>) -> ContactCreateRecord {
        ContactCreateRecord {
            input,
            last_contacted_at: now,
        }
    }
}

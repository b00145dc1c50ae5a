//! Contact records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ContactId;
use super::patch::{self, PatchField};

/// A contact as stored in the `contact_c` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "Id")]
    pub id: ContactId,
    /// System display name of the record.
    #[serde(rename = "Name", default)]
    pub record_name: Option<String>,
    #[serde(rename = "name_c", default)]
    pub name: Option<String>,
    #[serde(rename = "email_c", default)]
    pub email: Option<String>,
    #[serde(rename = "phone_c", default)]
    pub phone: Option<String>,
    #[serde(rename = "company_c", default)]
    pub company: Option<String>,
    #[serde(rename = "notes_c", default)]
    pub notes: Option<String>,
    #[serde(rename = "last_contacted_at_c", default)]
    pub last_contacted_at: Option<DateTime<Utc>>,
    #[serde(rename = "CreatedOn", default)]
    pub created_on: Option<DateTime<Utc>>,
}

impl Contact {
    /// Label used in contact selectors: `"name - company"`.
    #[must_use]
    pub fn option_label(&self) -> String {
        let name = self
            .name
            .as_deref()
            .or(self.record_name.as_deref())
            .unwrap_or_default();
        let company = self.company.as_deref().unwrap_or_default();
        format!("{name} - {company}")
    }
}

/// Input for creating a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    #[serde(rename = "name_c")]
    pub name: String,
    #[serde(rename = "email_c", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "phone_c", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "company_c", default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(rename = "notes_c", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Sparse update for a contact.
///
/// Absent fields are never sent; `Some(None)` sends `null` and
/// `Some(Some(String::new()))` sends an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPatch {
    #[serde(
        rename = "name_c",
        default,
        deserialize_with = "patch::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: PatchField<String>,
    #[serde(
        rename = "email_c",
        default,
        deserialize_with = "patch::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: PatchField<String>,
    #[serde(
        rename = "phone_c",
        default,
        deserialize_with = "patch::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: PatchField<String>,
    #[serde(
        rename = "company_c",
        default,
        deserialize_with = "patch::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub company: PatchField<String>,
    #[serde(
        rename = "notes_c",
        default,
        deserialize_with = "patch::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: PatchField<String>,
    #[serde(
        rename = "last_contacted_at_c",
        default,
        deserialize_with = "patch::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_contacted_at: PatchField<DateTime<Utc>>,
}

impl ContactPatch {
    /// Returns true if no field is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.company.is_none()
            && self.notes.is_none()
            && self.last_contacted_at.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contact_from_record_store_row() {
        let contact: Contact = serde_json::from_value(json!({
            "Id": 3,
            "Name": "Ada Lovelace",
            "name_c": "Ada Lovelace",
            "email_c": "ada@example.com",
            "company_c": "Analytical Engines",
            "last_contacted_at_c": "2025-03-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(contact.id, ContactId::new(3));
        assert_eq!(contact.phone, None);
        assert!(contact.last_contacted_at.is_some());
        assert_eq!(contact.option_label(), "Ada Lovelace - Analytical Engines");
    }

    #[test]
    fn test_patch_keeps_explicit_empty_values() {
        let patch: ContactPatch = serde_json::from_value(json!({"notes_c": ""})).unwrap();
        assert_eq!(patch.notes, Some(Some(String::new())));
        assert_eq!(patch.name, None);

        let wire = serde_json::to_value(&patch).unwrap();
        assert_eq!(wire, json!({"notes_c": ""}));
    }

    #[test]
    fn test_patch_sends_explicit_null() {
        let patch: ContactPatch =
            serde_json::from_value(json!({"notes_c": null, "email_c": "ada@example.com"}))
                .unwrap();
        assert_eq!(patch.notes, Some(None));
        assert!(!patch.is_empty());

        let wire = serde_json::to_value(&patch).unwrap();
        assert_eq!(wire, json!({"notes_c": null, "email_c": "ada@example.com"}));
    }

    #[test]
    fn test_empty_patch() {
        let patch: ContactPatch = serde_json::from_value(json!({})).unwrap();
        assert!(patch.is_empty());
    }
}

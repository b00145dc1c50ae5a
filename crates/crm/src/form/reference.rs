//! Reference lists feeding form selectors.

use dealflow_core::{Contact, ContactId};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument};

use crate::records::RecordClient;
use crate::services::ContactsService;

/// A secondary list loaded asynchronously for a selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "items", rename_all = "camelCase")]
pub enum ReferenceList<T> {
    /// Load not finished; the selector is disabled.
    Loading,
    /// Load finished. Empty if it failed.
    Loaded(Vec<T>),
}

impl<T> ReferenceList<T> {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Loaded items, empty while loading.
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Loading => &[],
            Self::Loaded(items) => items,
        }
    }
}

impl<T> Default for ReferenceList<T> {
    fn default() -> Self {
        Self::Loading
    }
}

/// One entry of the contact selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactOption {
    pub id: ContactId,
    pub label: String,
}

impl From<&Contact> for ContactOption {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id,
            label: contact.option_label(),
        }
    }
}

/// Load the contact selector options.
///
/// Races the fetch against `token`: returns `None` when cancelled, in which
/// case the result must not be committed. A failed fetch is logged and
/// yields an empty list so the form stays usable.
#[instrument(skip_all)]
pub async fn load_reference_list<C: RecordClient>(
    contacts: &ContactsService<C>,
    token: &CancellationToken,
) -> Option<Vec<ContactOption>> {
    tokio::select! {
        biased;
        () = token.cancelled() => {
            debug!("Contact load cancelled");
            None
        }
        result = contacts.get_all() => match result {
            Ok(contacts) => Some(contacts.iter().map(ContactOption::from).collect()),
            Err(e) => {
                error!(error = %e, "Failed to load contacts");
                Some(Vec::new())
            }
        },
    }
}

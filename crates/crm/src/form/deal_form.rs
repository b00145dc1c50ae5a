//! Deal create/edit form.
//!
//! Validation runs on submit and collects every violated rule. Editing a
//! field clears that field's message only. While a submit is in flight
//! both submit and cancel are refused.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use dealflow_core::types::coerce::{parse_amount, parse_date};
use dealflow_core::{ContactId, Deal, DealId, DealStage, NewDeal};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::reference::{ContactOption, ReferenceList};

const TITLE_REQUIRED: &str = "Deal title is required";
const CONTACT_REQUIRED: &str = "Please select a contact";
const VALUE_INVALID: &str = "Please enter a valid deal value";
const CLOSE_DATE_REQUIRED: &str = "Expected close date is required";

const CONTACTS_LOADING_LABEL: &str = "Loading contacts...";
const CONTACTS_PLACEHOLDER: &str = "Select a contact";

/// Normalized payload handed to the submit handler.
///
/// Serialises with record store field names: integer contact id, numeric
/// value.
pub type DealSubmission = NewDeal;

/// Editable fields of the deal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DealField {
    Title,
    ContactId,
    Value,
    Stage,
    ExpectedCloseDate,
}

/// Field → validation message.
pub type FieldErrors = BTreeMap<DealField, String>;

/// Values as entered, before coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DealDraft {
    pub title: String,
    pub contact_id: String,
    pub value: String,
    pub stage: DealStage,
    pub expected_close_date: String,
}

impl DealDraft {
    /// Seed a draft from an existing deal, or blank defaults.
    #[must_use]
    pub fn from_deal(deal: Option<&Deal>) -> Self {
        let Some(deal) = deal else {
            return Self::default();
        };

        Self {
            title: deal.title.clone().unwrap_or_default(),
            contact_id: deal.contact_id.map(|id| id.to_string()).unwrap_or_default(),
            value: deal
                .value
                .map(|value| value.normalize().to_string())
                .unwrap_or_default(),
            stage: deal.stage.unwrap_or_default(),
            expected_close_date: deal
                .expected_close_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Check every rule and build the normalized submission.
///
/// # Errors
///
/// Returns all violated rules at once.
pub fn validate_draft(draft: &DealDraft) -> Result<DealSubmission, FieldErrors> {
    let mut errors = FieldErrors::new();

    if draft.title.trim().is_empty() {
        errors.insert(DealField::Title, TITLE_REQUIRED.to_string());
    }

    let contact_id = draft.contact_id.parse::<ContactId>().ok();
    if contact_id.is_none() {
        errors.insert(DealField::ContactId, CONTACT_REQUIRED.to_string());
    }

    let value = parse_amount(&draft.value)
        .ok()
        .filter(|value| *value > Decimal::ZERO);
    if value.is_none() {
        errors.insert(DealField::Value, VALUE_INVALID.to_string());
    }

    let expected_close_date: Option<NaiveDate> = parse_date(&draft.expected_close_date).ok();
    if expected_close_date.is_none() {
        errors.insert(DealField::ExpectedCloseDate, CLOSE_DATE_REQUIRED.to_string());
    }

    match (contact_id, value, expected_close_date) {
        (Some(contact_id), Some(value), Some(expected_close_date)) if errors.is_empty() => {
            Ok(NewDeal {
                contact_id,
                title: draft.title.clone(),
                value,
                stage: draft.stage,
                expected_close_date,
            })
        }
        _ => Err(errors),
    }
}

/// Receives validated submissions. The form itself never persists.
pub trait SubmitHandler: Send + Sync {
    type Output: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    fn submit(
        &self,
        submission: DealSubmission,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

/// Why a submit did not reach the handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitBlocked {
    #[error("deal form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),
    #[error("a submit is already in flight")]
    InFlight,
}

/// Failure of [`DealForm::submit_with`].
#[derive(Debug, Error)]
pub enum SubmitError<E> {
    #[error(transparent)]
    Blocked(#[from] SubmitBlocked),
    #[error("{0}")]
    Handler(E),
}

/// Option of the stage selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageOption {
    pub value: DealStage,
    pub label: &'static str,
}

/// Contact selector state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSelector<'a> {
    pub placeholder: &'static str,
    pub disabled: bool,
    pub options: &'a [ContactOption],
}

/// Serializable snapshot of the form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealFormView<'a> {
    pub deal_id: Option<DealId>,
    pub draft: &'a DealDraft,
    pub errors: &'a FieldErrors,
    pub stages: Vec<StageOption>,
    pub contacts: ContactSelector<'a>,
    pub submitting: bool,
    pub submit_label: &'static str,
}

/// State of one deal form instance.
#[derive(Debug)]
pub struct DealForm {
    deal_id: Option<DealId>,
    draft: DealDraft,
    errors: FieldErrors,
    contacts: ReferenceList<ContactOption>,
    submitting: bool,
    teardown: CancellationToken,
}

impl Default for DealForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the submitting flag of a form when dropped.
struct SubmittingGuard<'a>(&'a mut DealForm);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.finish_submit();
    }
}

impl DealForm {
    /// Blank form in create mode.
    #[must_use]
    pub fn new() -> Self {
        Self::with_draft(None, DealDraft::default())
    }

    /// Form seeded from an existing deal (edit mode), or blank.
    #[must_use]
    pub fn from_deal(deal: Option<&Deal>) -> Self {
        Self::with_draft(deal.map(|d| d.id), DealDraft::from_deal(deal))
    }

    /// Form holding an already-entered draft.
    #[must_use]
    pub fn with_draft(deal_id: Option<DealId>, draft: DealDraft) -> Self {
        Self {
            deal_id,
            draft,
            errors: FieldErrors::new(),
            contacts: ReferenceList::Loading,
            submitting: false,
            teardown: CancellationToken::new(),
        }
    }

    /// Tie the form's lifetime to `parent`: cancelling `parent` tears the
    /// form down too.
    #[must_use]
    pub fn scoped_to(mut self, parent: &CancellationToken) -> Self {
        self.teardown = parent.child_token();
        self
    }

    #[must_use]
    pub const fn deal_id(&self) -> Option<DealId> {
        self.deal_id
    }

    #[must_use]
    pub const fn draft(&self) -> &DealDraft {
        &self.draft
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub const fn contacts(&self) -> &ReferenceList<ContactOption> {
        &self.contacts
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Update one field and clear its message.
    ///
    /// An unrecognised stage value leaves the stage unchanged.
    pub fn set_field(&mut self, field: DealField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DealField::Title => self.draft.title = value,
            DealField::ContactId => self.draft.contact_id = value,
            DealField::Value => self.draft.value = value,
            DealField::ExpectedCloseDate => self.draft.expected_close_date = value,
            DealField::Stage => match value.parse::<DealStage>() {
                Ok(stage) => self.draft.stage = stage,
                Err(e) => debug!(error = %e, "Ignoring unknown stage"),
            },
        }
        self.errors.remove(&field);
    }

    pub fn set_stage(&mut self, stage: DealStage) {
        self.draft.stage = stage;
        self.errors.remove(&DealField::Stage);
    }

    /// Run every rule, replacing the message map. Returns whether the draft
    /// is valid.
    pub fn validate(&mut self) -> bool {
        match validate_draft(&self.draft) {
            Ok(_) => {
                self.errors.clear();
                true
            }
            Err(errors) => {
                self.errors = errors;
                false
            }
        }
    }

    /// Validate and mark the form as submitting.
    ///
    /// # Errors
    ///
    /// [`SubmitBlocked::InFlight`] if a submit is pending,
    /// [`SubmitBlocked::Invalid`] with the messages if validation fails.
    pub fn begin_submit(&mut self) -> Result<DealSubmission, SubmitBlocked> {
        if self.submitting {
            return Err(SubmitBlocked::InFlight);
        }

        match validate_draft(&self.draft) {
            Ok(submission) => {
                self.errors.clear();
                self.submitting = true;
                Ok(submission)
            }
            Err(errors) => {
                self.errors.clone_from(&errors);
                Err(SubmitBlocked::Invalid(errors))
            }
        }
    }

    /// Clear the submitting flag once the handler has settled.
    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    /// Validate, hand the submission to `handler`, then clear the
    /// submitting flag whatever the outcome.
    ///
    /// The flag is also cleared if the returned future is dropped before
    /// the handler settles.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Blocked`] if the handler was not invoked,
    /// [`SubmitError::Handler`] if it failed.
    pub async fn submit_with<H: SubmitHandler>(
        &mut self,
        handler: &H,
    ) -> Result<H::Output, SubmitError<H::Error>> {
        let submission = self.begin_submit()?;
        let _submitting = SubmittingGuard(self);
        handler
            .submit(submission)
            .await
            .map_err(SubmitError::Handler)
    }

    /// Tear the form down. Refused (returns `false`) while submitting.
    ///
    /// Cancels any reference-list load started with
    /// [`Self::cancellation_token`].
    pub fn cancel(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.teardown.cancel();
        true
    }

    /// Token to pass to the reference-list load.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.teardown.clone()
    }

    /// Commit a loaded contact list.
    ///
    /// Applied at most once, and never after the form was cancelled.
    /// Returns whether the list was committed.
    pub fn apply_reference_list(&mut self, loaded: Option<Vec<ContactOption>>) -> bool {
        if self.teardown.is_cancelled() || !self.contacts.is_loading() {
            return false;
        }
        let Some(options) = loaded else {
            return false;
        };
        self.contacts = ReferenceList::Loaded(options);
        true
    }

    #[must_use]
    pub fn contact_selector(&self) -> ContactSelector<'_> {
        let loading = self.contacts.is_loading();
        ContactSelector {
            placeholder: if loading {
                CONTACTS_LOADING_LABEL
            } else {
                CONTACTS_PLACEHOLDER
            },
            disabled: loading,
            options: self.contacts.items(),
        }
    }

    #[must_use]
    pub const fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Saving..."
        } else if self.deal_id.is_some() {
            "Update Deal"
        } else {
            "Create Deal"
        }
    }

    #[must_use]
    pub fn view(&self) -> DealFormView<'_> {
        DealFormView {
            deal_id: self.deal_id,
            draft: &self.draft,
            errors: &self.errors,
            stages: DealStage::ALL
                .iter()
                .map(|&stage| StageOption {
                    value: stage,
                    label: stage.label(),
                })
                .collect(),
            contacts: self.contact_selector(),
            submitting: self.submitting,
            submit_label: self.submit_label(),
        }
    }
}

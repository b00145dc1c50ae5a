//! Entity forms.
//!
//! A form owns a draft, a field → message map and the reference lists its
//! selectors need. It never talks to a service directly: a validated
//! submission is handed to a caller-supplied [`SubmitHandler`].

mod deal_form;
mod reference;

pub use deal_form::{
    ContactSelector, DealDraft, DealField, DealForm, DealFormView, DealSubmission, FieldErrors,
    StageOption, SubmitBlocked, SubmitError, SubmitHandler, validate_draft,
};
pub use reference::{ContactOption, ReferenceList, load_reference_list};

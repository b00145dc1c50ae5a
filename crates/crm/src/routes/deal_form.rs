//! Deal form route handlers.
//!
//! `GET` returns the form state (draft, stage options, contact selector).
//! `POST` validates a draft: 422 with field messages, otherwise the deal is
//! created or updated through the deal service.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dealflow_core::{Deal, DealId, DealPatch};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::form::{DealDraft, DealForm, DealSubmission, SubmitHandler, load_reference_list};
use crate::records::HttpRecordClient;
use crate::services::{DealsService, ServiceError};
use crate::state::AppState;

/// Submits a new deal.
struct CreateDeal<'a> {
    deals: &'a DealsService<HttpRecordClient>,
}

impl SubmitHandler for CreateDeal<'_> {
    type Output = Deal;
    type Error = ServiceError;

    async fn submit(&self, submission: DealSubmission) -> std::result::Result<Deal, ServiceError> {
        self.deals.create(submission).await
    }
}

/// Submits the form fields as a patch on an existing deal.
///
/// The stage is left out when it matches the stored deal, so only a real
/// stage change re-stamps `moved_to_stage_at`.
struct UpdateDeal<'a> {
    deals: &'a DealsService<HttpRecordClient>,
    id: DealId,
}

impl SubmitHandler for UpdateDeal<'_> {
    type Output = Deal;
    type Error = ServiceError;

    async fn submit(&self, submission: DealSubmission) -> std::result::Result<Deal, ServiceError> {
        let current = self.deals.get_by_id(self.id).await?;
        let patch = match current {
            Some(deal) => DealPatch::from(submission).without_unchanged_stage(deal.stage),
            None => DealPatch::from(submission),
        };
        self.deals.update(self.id, patch).await
    }
}

/// Load the contact selector into `form` unless the server is shutting down.
async fn with_contacts(state: &AppState, form: DealForm) -> DealForm {
    let mut form = form.scoped_to(state.shutdown_token());
    let loaded = load_reference_list(state.contacts(), &form.cancellation_token()).await;
    form.apply_reference_list(loaded);
    form
}

/// Blank deal form.
#[instrument(skip(state))]
pub async fn new_form(State(state): State<AppState>) -> Response {
    let form = with_contacts(&state, DealForm::new()).await;
    Json(form.view()).into_response()
}

/// Deal form seeded from an existing deal.
#[instrument(skip(state))]
pub async fn edit_form(State(state): State<AppState>, Path(id): Path<DealId>) -> Result<Response> {
    let deal = state
        .deals()
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("deal {id}")))?;

    let form = with_contacts(&state, DealForm::from_deal(Some(&deal))).await;
    Ok(Json(form.view()).into_response())
}

/// Validate a draft and create the deal.
#[instrument(skip(state))]
pub async fn submit_new(
    State(state): State<AppState>,
    Json(draft): Json<DealDraft>,
) -> Result<(StatusCode, Json<Deal>)> {
    let mut form = DealForm::with_draft(None, draft);
    let handler = CreateDeal {
        deals: state.deals(),
    };
    let deal = form.submit_with(&handler).await?;
    Ok((StatusCode::CREATED, Json(deal)))
}

/// Validate a draft and update the deal.
#[instrument(skip(state))]
pub async fn submit_edit(
    State(state): State<AppState>,
    Path(id): Path<DealId>,
    Json(draft): Json<DealDraft>,
) -> Result<Json<Deal>> {
    let mut form = DealForm::with_draft(Some(id), draft);
    let handler = UpdateDeal {
        deals: state.deals(),
        id,
    };
    Ok(Json(form.submit_with(&handler).await?))
}

//! Contact route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use dealflow_core::{Activity, Contact, ContactId, ContactPatch, Deal, NewContact};
use tracing::instrument;

use super::{DeleteResponse, found};
use crate::error::Result;
use crate::state::AppState;

/// List all contacts.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Contact>>> {
    Ok(Json(state.contacts().get_all().await?))
}

/// Create a contact.
#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewContact>,
) -> Result<(StatusCode, Json<Contact>)> {
    let contact = state.contacts().create(input).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// Contact detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ContactId>,
) -> Result<Json<Contact>> {
    found(state.contacts().get_by_id(id).await?, "contact", id)
}

/// Apply a sparse patch to a contact.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ContactId>,
    Json(patch): Json<ContactPatch>,
) -> Result<Json<Contact>> {
    Ok(Json(state.contacts().update(id, patch).await?))
}

/// Delete a contact.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ContactId>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.contacts().delete(id).await?;
    Ok(Json(DeleteResponse { deleted }))
}

/// Deals belonging to a contact.
#[instrument(skip(state))]
pub async fn deals(
    State(state): State<AppState>,
    Path(id): Path<ContactId>,
) -> Result<Json<Vec<Deal>>> {
    Ok(Json(state.deals().get_by_contact_id(id).await?))
}

/// Activities of a contact, most recent first.
#[instrument(skip(state))]
pub async fn activities(
    State(state): State<AppState>,
    Path(id): Path<ContactId>,
) -> Result<Json<Vec<Activity>>> {
    Ok(Json(state.activities().get_by_contact_id(id).await?))
}

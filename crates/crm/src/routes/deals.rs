//! Deal route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use dealflow_core::{Deal, DealId, DealPatch, NewDeal};
use tracing::instrument;

use super::{DeleteResponse, found};
use crate::error::Result;
use crate::state::AppState;

/// List all deals.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Deal>>> {
    Ok(Json(state.deals().get_all().await?))
}

/// Create a deal from an already-normalized payload.
#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewDeal>,
) -> Result<(StatusCode, Json<Deal>)> {
    let deal = state.deals().create(input).await?;
    Ok((StatusCode::CREATED, Json(deal)))
}

/// Deal detail.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<DealId>) -> Result<Json<Deal>> {
    found(state.deals().get_by_id(id).await?, "deal", id)
}

/// Apply a sparse patch to a deal. A stage change re-stamps
/// `moved_to_stage_at_c`.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DealId>,
    Json(patch): Json<DealPatch>,
) -> Result<Json<Deal>> {
    Ok(Json(state.deals().update(id, patch).await?))
}

/// Delete a deal.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DealId>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.deals().delete(id).await?;
    Ok(Json(DeleteResponse { deleted }))
}

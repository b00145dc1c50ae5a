//! HTTP route handlers for the CRM JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Health check
//!
//! # Contacts
//! GET    /contacts                 - List contacts
//! POST   /contacts                 - Create contact
//! GET    /contacts/{id}            - Contact detail
//! PATCH  /contacts/{id}            - Sparse update
//! DELETE /contacts/{id}            - Delete contact
//! GET    /contacts/{id}/deals      - Deals of a contact
//! GET    /contacts/{id}/activities - Activities of a contact, newest first
//!
//! # Deals
//! GET|POST /deals, GET|PATCH|DELETE /deals/{id}
//! GET    /deals/form               - Blank deal form
//! POST   /deals/form               - Validate and create (422 with field errors)
//! GET    /deals/{id}/form          - Deal form seeded from a deal
//! POST   /deals/{id}/form          - Validate and update (422 with field errors)
//!
//! # Activities
//! GET|POST /activities, GET|PATCH|DELETE /activities/{id}
//! ```
//!
//! Anything else answers 404 `{"error": "Page not found"}`.

pub mod activities;
pub mod contacts;
pub mod deal_form;
pub mod deals;

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Body of a delete response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Turn an absent lookup into a 404.
fn found<T>(record: Option<T>, label: &str, id: impl std::fmt::Display) -> Result<Json<T>> {
    record
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("{label} {id}")))
}

/// Create the contact routes router.
pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(contacts::index).post(contacts::create))
        .route(
            "/{id}",
            get(contacts::show)
                .patch(contacts::update)
                .delete(contacts::delete),
        )
        .route("/{id}/deals", get(contacts::deals))
        .route("/{id}/activities", get(contacts::activities))
}

/// Create the deal routes router.
pub fn deal_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(deals::index).post(deals::create))
        .route(
            "/form",
            get(deal_form::new_form).post(deal_form::submit_new),
        )
        .route(
            "/{id}",
            get(deals::show).patch(deals::update).delete(deals::delete),
        )
        .route(
            "/{id}/form",
            get(deal_form::edit_form).post(deal_form::submit_edit),
        )
}

/// Create the activity routes router.
pub fn activity_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(activities::index).post(activities::create))
        .route(
            "/{id}",
            get(activities::show)
                .patch(activities::update)
                .delete(activities::delete),
        )
}

/// Create all routes for the CRM.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/contacts", contact_routes())
        .nest("/deals", deal_routes())
        .nest("/activities", activity_routes())
        .fallback(not_found)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not call the record store.
async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Page not found"})),
    )
}

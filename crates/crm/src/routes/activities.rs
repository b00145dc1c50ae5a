//! Activity route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use dealflow_core::{Activity, ActivityId, ActivityPatch, NewActivity};
use tracing::instrument;

use super::{DeleteResponse, found};
use crate::error::Result;
use crate::state::AppState;

/// List all activities.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Activity>>> {
    Ok(Json(state.activities().get_all().await?))
}

/// Log an activity. The timestamp is stamped at call time.
#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewActivity>,
) -> Result<(StatusCode, Json<Activity>)> {
    let activity = state.activities().create(input).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ActivityId>,
) -> Result<Json<Activity>> {
    found(state.activities().get_by_id(id).await?, "activity", id)
}

#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ActivityId>,
    Json(patch): Json<ActivityPatch>,
) -> Result<Json<Activity>> {
    Ok(Json(state.activities().update(id, patch).await?))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ActivityId>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.activities().delete(id).await?;
    Ok(Json(DeleteResponse { deleted }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support::{app_for, get, json_request, send};
    use axum::http::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_coerces_contact_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tables/activity_c/records"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "results": [{"success": true, "data": {"Id": 11, "contact_id_c": 42}}]
            })))
            .mount(&server)
            .await;

        let response = send(
            app_for(&server),
            json_request(
                "POST",
                "/activities",
                &json!({"contact_id_c": "42", "description_c": "Intro call", "type_c": "call"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let requests = server.received_requests().await.unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(sent["records"][0]["contact_id_c"], 42);
        assert!(sent["records"][0]["timestamp_c"].is_string());
    }

    #[tokio::test]
    async fn test_invalid_id_is_rejected() {
        let server = MockServer::start().await;
        let response = send(app_for(&server), get("/activities/abc")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

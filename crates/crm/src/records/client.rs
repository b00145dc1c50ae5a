//! HTTP implementation of [`RecordClient`].

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::{
    DeleteEnvelope, DeletePayload, FetchParams, QueryEnvelope, RecordClient, RecordClientError,
    RecordsPayload, UpdateRecord, WriteEnvelope,
};
use crate::config::RecordsConfig;

/// Header carrying the project identifier.
const PROJECT_HEADER: &str = "X-Project-Id";

/// Record store client over HTTPS.
///
/// Built once at startup and shared (cheaply cloneable via `Arc`).
#[derive(Clone)]
pub struct HttpRecordClient {
    inner: Arc<HttpRecordClientInner>,
}

struct HttpRecordClientInner {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
}

impl HttpRecordClient {
    /// Create a new record store client.
    ///
    /// # Errors
    ///
    /// Returns error if the credentials are not valid header values or the
    /// HTTP client fails to build.
    pub fn new(config: &RecordsConfig) -> Result<Self, RecordClientError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            PROJECT_HEADER,
            HeaderValue::from_str(&config.project_id)
                .map_err(|e| RecordClientError::Config(format!("Invalid project id: {e}")))?,
        );

        let mut auth_value =
            HeaderValue::from_str(&format!("Bearer {}", config.public_key.expose_secret()))
                .map_err(|e| RecordClientError::Config(format!("Invalid public key: {e}")))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpRecordClientInner {
                client,
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
                project_id: config.project_id.clone(),
            }),
        })
    }

    /// Get the configured project identifier.
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.inner.project_id
    }

    /// Send a JSON request and parse the JSON response.
    async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, RecordClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self
            .inner
            .client
            .request(method, &url)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RecordClientError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| RecordClientError::Parse(format!("Failed to parse response: {e}")));
        }

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(RecordClientError::Unauthorized);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(RecordClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl RecordClient for HttpRecordClient {
    #[instrument(skip_all, fields(table = %table))]
    async fn fetch_records<T>(
        &self,
        table: &str,
        params: &FetchParams,
    ) -> Result<QueryEnvelope<Vec<T>>, RecordClientError>
    where
        T: DeserializeOwned + Send,
    {
        let envelope: QueryEnvelope<Vec<T>> = self
            .send(
                Method::POST,
                &format!("/tables/{table}/records/query"),
                params,
            )
            .await?;
        debug!(
            success = envelope.success,
            count = envelope.data.as_ref().map_or(0, Vec::len),
            "Fetched records"
        );
        Ok(envelope)
    }

    #[instrument(skip_all, fields(table = %table, id = id))]
    async fn get_record_by_id<T>(
        &self,
        table: &str,
        id: i32,
        params: &FetchParams,
    ) -> Result<QueryEnvelope<T>, RecordClientError>
    where
        T: DeserializeOwned + Send,
    {
        self.send(
            Method::POST,
            &format!("/tables/{table}/records/{id}/query"),
            params,
        )
        .await
    }

    #[instrument(skip_all, fields(table = %table))]
    async fn create_record<R, T>(
        &self,
        table: &str,
        payload: &RecordsPayload<R>,
    ) -> Result<WriteEnvelope<T>, RecordClientError>
    where
        R: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        self.send(Method::POST, &format!("/tables/{table}/records"), payload)
            .await
    }

    #[instrument(skip_all, fields(table = %table))]
    async fn update_record<F, T>(
        &self,
        table: &str,
        payload: &RecordsPayload<UpdateRecord<F>>,
    ) -> Result<WriteEnvelope<T>, RecordClientError>
    where
        F: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        self.send(Method::PUT, &format!("/tables/{table}/records"), payload)
            .await
    }

    #[instrument(skip_all, fields(table = %table))]
    async fn delete_record(
        &self,
        table: &str,
        payload: &DeletePayload,
    ) -> Result<DeleteEnvelope, RecordClientError> {
        self.send(Method::DELETE, &format!("/tables/{table}/records"), payload)
            .await
    }
}

impl std::fmt::Debug for HttpRecordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRecordClient")
            .field("base_url", &self.inner.base_url)
            .field("project_id", &self.inner.project_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpRecordClient {
        let config = RecordsConfig {
            api_url: url::Url::parse(&server.uri()).unwrap(),
            project_id: "proj_8f2k".to_string(),
            public_key: SecretString::from("pk_live_Q7x2Lm9Rt4"),
        };
        HttpRecordClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_records_posts_params_with_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tables/contact_c/records/query"))
            .and(header("X-Project-Id", "proj_8f2k"))
            .and(header("Authorization", "Bearer pk_live_Q7x2Lm9Rt4"))
            .and(body_json(json!({"fields": [{"field": {"Name": "name_c"}}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [{"Id": 1, "name_c": "Ada"}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let envelope: QueryEnvelope<Vec<Value>> = client
            .fetch_records("contact_c", &FetchParams::select(&["name_c"]))
            .await
            .unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.data.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_envelope_failure_is_not_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tables/deal_c/records/9/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "Record not found"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let envelope: QueryEnvelope<Value> = client
            .get_record_by_id("deal_c", 9, &FetchParams::select(&["title_c"]))
            .await
            .unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("Record not found"));
    }

    #[tokio::test]
    async fn test_delete_sends_record_ids_in_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/tables/activity_c/records"))
            .and(body_json(json!({"RecordIds": [4]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "results": [{"success": true}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let envelope = client
            .delete_record(
                "activity_c",
                &DeletePayload {
                    record_ids: vec![4],
                },
            )
            .await
            .unwrap();

        assert!(envelope.into_first_result().unwrap().success);
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/tables/deal_c/records"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/tables/deal_c/records"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let update: Result<WriteEnvelope<Value>, _> = client
            .update_record(
                "deal_c",
                &RecordsPayload::single(UpdateRecord {
                    id: 1,
                    fields: json!({"title_c": "x"}),
                }),
            )
            .await;
        assert!(matches!(update, Err(RecordClientError::Unauthorized)));

        let create: Result<WriteEnvelope<Value>, _> = client
            .create_record("deal_c", &RecordsPayload::single(json!({"title_c": "x"})))
            .await;
        match create {
            Err(RecordClientError::Api { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn test_debug_redacts_public_key() {
        let config = RecordsConfig {
            api_url: url::Url::parse("https://records.test").unwrap(),
            project_id: "proj_8f2k".to_string(),
            public_key: SecretString::from("pk_live_Q7x2Lm9Rt4"),
        };
        let client = HttpRecordClient::new(&config).unwrap();
        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("proj_8f2k"));
        assert!(!debug_output.contains("pk_live_Q7x2Lm9Rt4"));
    }
}

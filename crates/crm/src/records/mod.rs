//! Client for the hosted record store.
//!
//! The record store exposes named tables (`contact_c`, `deal_c`,
//! `activity_c`) through five calls:
//!
//! - `fetchRecords(table, {fields, where?, orderBy?})`
//! - `getRecordById(table, id, {fields})`
//! - `createRecord(table, {records: [record]})`
//! - `updateRecord(table, {records: [{Id, ..fields}]})`
//! - `deleteRecord(table, {RecordIds: [id]})`
//!
//! [`RecordClient`] is the seam the resource services depend on.
//! [`HttpRecordClient`] is the production implementation; tests inject an
//! in-memory one.

mod client;
mod error;
mod types;

pub use client::HttpRecordClient;
pub use error::RecordClientError;
pub use types::*;

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Operations offered by the record store.
///
/// Envelope-level failures (`success: false`) are returned as `Ok` so the
/// caller decides how to translate them; `Err` means the call itself failed.
pub trait RecordClient: Send + Sync {
    /// Query a table.
    fn fetch_records<T>(
        &self,
        table: &str,
        params: &FetchParams,
    ) -> impl Future<Output = Result<QueryEnvelope<Vec<T>>, RecordClientError>> + Send
    where
        T: DeserializeOwned + Send;

    /// Fetch one record by primary key.
    fn get_record_by_id<T>(
        &self,
        table: &str,
        id: i32,
        params: &FetchParams,
    ) -> impl Future<Output = Result<QueryEnvelope<T>, RecordClientError>> + Send
    where
        T: DeserializeOwned + Send;

    /// Create records.
    fn create_record<R, T>(
        &self,
        table: &str,
        payload: &RecordsPayload<R>,
    ) -> impl Future<Output = Result<WriteEnvelope<T>, RecordClientError>> + Send
    where
        R: Serialize + Sync,
        T: DeserializeOwned + Send;

    /// Update records addressed by `Id`.
    fn update_record<F, T>(
        &self,
        table: &str,
        payload: &RecordsPayload<UpdateRecord<F>>,
    ) -> impl Future<Output = Result<WriteEnvelope<T>, RecordClientError>> + Send
    where
        F: Serialize + Sync,
        T: DeserializeOwned + Send;

    /// Delete records by primary key.
    fn delete_record(
        &self,
        table: &str,
        payload: &DeletePayload,
    ) -> impl Future<Output = Result<DeleteEnvelope, RecordClientError>> + Send;
}

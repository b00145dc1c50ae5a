//! Integration test support for Dealflow.
//!
//! [`InMemoryRecordStore`] implements [`RecordClient`] over plain JSON maps
//! so the resource services and the deal form can be exercised end to end
//! without a network. [`UnreachableRecordStore`] fails every call.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dealflow-integration-tests
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use dealflow_crm::records::{
    DeleteEnvelope, DeletePayload, FetchParams, QueryEnvelope, RecordClient, RecordClientError,
    RecordResult, RecordsPayload, SortType, UpdateRecord, WriteEnvelope,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

type Row = Map<String, Value>;

#[derive(Debug, Default)]
struct Tables {
    rows: HashMap<String, BTreeMap<i32, Row>>,
    next_id: i32,
    failing_queries: Option<String>,
}

/// Record store kept in memory.
///
/// Honors field selection, `EqualTo` filters and `orderBy`, assigns `Id`s on
/// create and merges updates into the stored row.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    tables: Mutex<Tables>,
}

impl InMemoryRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent query answer `success: false` with `message`.
    pub fn fail_queries(&self, message: &str) {
        self.lock().failing_queries = Some(message.to_string());
    }

    /// Raw stored row, bypassing field selection.
    #[must_use]
    pub fn raw_row(&self, table: &str, id: i32) -> Option<Row> {
        self.lock()
            .rows
            .get(table)
            .and_then(|rows| rows.get(&id))
            .cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn query(&self, table: &str, params: &FetchParams) -> Result<Vec<Row>, String> {
        let tables = self.lock();
        if let Some(message) = &tables.failing_queries {
            return Err(message.clone());
        }

        let mut rows: Vec<Row> = tables
            .rows
            .get(table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default();
        drop(tables);

        for clause in &params.filters {
            rows.retain(|row| {
                clause
                    .values
                    .iter()
                    .any(|value| same_value(row.get(&clause.field_name), value))
            });
        }

        for order in params.order_by.iter().rev() {
            rows.sort_by(|a, b| {
                let ordering = compare(a.get(&order.field_name), b.get(&order.field_name));
                match order.sort_type {
                    SortType::Asc => ordering,
                    SortType::Desc => ordering.reverse(),
                }
            });
        }

        Ok(rows.iter().map(|row| project(row, params)).collect())
    }
}

/// Keep `Id` plus the requested columns.
fn project(row: &Row, params: &FetchParams) -> Row {
    let mut projected = Row::new();
    if let Some(id) = row.get("Id") {
        projected.insert("Id".to_string(), id.clone());
    }
    for field in &params.fields {
        if let Some(value) = row.get(field.name()) {
            projected.insert(field.name().to_string(), value.clone());
        }
    }
    projected
}

fn same_value(stored: Option<&Value>, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Some(Value::Number(a)), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Some(a), b) => a == b,
        (None, _) => false,
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => {
            match (a.parse::<DateTime<Utc>>(), b.parse::<DateTime<Utc>>()) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn decode<T: DeserializeOwned>(row: Row) -> Result<T, RecordClientError> {
    serde_json::from_value(Value::Object(row))
        .map_err(|e| RecordClientError::Parse(format!("Failed to parse record: {e}")))
}

/// Serialize a payload and pull out its `records` array.
fn records_of<P: Serialize>(payload: &P) -> Result<Vec<Row>, RecordClientError> {
    let value = serde_json::to_value(payload)
        .map_err(|e| RecordClientError::Parse(format!("Failed to encode payload: {e}")))?;
    let records = value
        .get("records")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    Ok(records
        .into_iter()
        .filter_map(|record| match record {
            Value::Object(row) => Some(row),
            _ => None,
        })
        .collect())
}

fn failed<T>(message: &str) -> RecordResult<T> {
    RecordResult {
        success: false,
        data: None,
        message: Some(message.to_string()),
    }
}

impl RecordClient for InMemoryRecordStore {
    async fn fetch_records<T>(
        &self,
        table: &str,
        params: &FetchParams,
    ) -> Result<QueryEnvelope<Vec<T>>, RecordClientError>
    where
        T: DeserializeOwned + Send,
    {
        match self.query(table, params) {
            Ok(rows) => Ok(QueryEnvelope {
                success: true,
                data: Some(rows.into_iter().map(decode).collect::<Result<_, _>>()?),
                message: None,
            }),
            Err(message) => Ok(QueryEnvelope {
                success: false,
                data: None,
                message: Some(message),
            }),
        }
    }

    async fn get_record_by_id<T>(
        &self,
        table: &str,
        id: i32,
        params: &FetchParams,
    ) -> Result<QueryEnvelope<T>, RecordClientError>
    where
        T: DeserializeOwned + Send,
    {
        let row = {
            let tables = self.lock();
            if let Some(message) = &tables.failing_queries {
                return Ok(QueryEnvelope {
                    success: false,
                    data: None,
                    message: Some(message.clone()),
                });
            }
            tables
                .rows
                .get(table)
                .and_then(|rows| rows.get(&id))
                .map(|row| project(row, params))
        };

        match row {
            Some(row) => Ok(QueryEnvelope {
                success: true,
                data: Some(decode(row)?),
                message: None,
            }),
            None => Ok(QueryEnvelope {
                success: false,
                data: None,
                message: Some("Record not found".to_string()),
            }),
        }
    }

    async fn create_record<R, T>(
        &self,
        table: &str,
        payload: &RecordsPayload<R>,
    ) -> Result<WriteEnvelope<T>, RecordClientError>
    where
        R: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let created: Vec<Row> = {
            let mut tables = self.lock();
            records_of(payload)?
                .into_iter()
                .map(|mut row| {
                    tables.next_id += 1;
                    let id = tables.next_id;
                    row.insert("Id".to_string(), Value::from(id));
                    row.insert("CreatedOn".to_string(), Value::from(Utc::now().to_rfc3339()));
                    tables
                        .rows
                        .entry(table.to_string())
                        .or_default()
                        .insert(id, row.clone());
                    row
                })
                .collect()
        };

        let results = created
            .into_iter()
            .map(|row| {
                Ok(RecordResult {
                    success: true,
                    data: Some(decode(row)?),
                    message: None,
                })
            })
            .collect::<Result<_, RecordClientError>>()?;

        Ok(WriteEnvelope {
            success: true,
            results: Some(results),
            message: None,
        })
    }

    async fn update_record<F, T>(
        &self,
        table: &str,
        payload: &RecordsPayload<UpdateRecord<F>>,
    ) -> Result<WriteEnvelope<T>, RecordClientError>
    where
        F: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let updated: Vec<Option<Row>> = {
            let mut tables = self.lock();
            records_of(payload)?
                .into_iter()
                .map(|fields| {
                    let id = fields
                        .get("Id")
                        .and_then(Value::as_i64)
                        .and_then(|id| i32::try_from(id).ok())?;
                    let row = tables.rows.get_mut(table)?.get_mut(&id)?;
                    for (key, value) in fields {
                        row.insert(key, value);
                    }
                    Some(row.clone())
                })
                .collect()
        };

        let results = updated
            .into_iter()
            .map(|row| match row {
                Some(row) => Ok(RecordResult {
                    success: true,
                    data: Some(decode(row)?),
                    message: None,
                }),
                None => Ok(failed("Record not found")),
            })
            .collect::<Result<_, RecordClientError>>()?;

        Ok(WriteEnvelope {
            success: true,
            results: Some(results),
            message: None,
        })
    }

    async fn delete_record(
        &self,
        table: &str,
        payload: &DeletePayload,
    ) -> Result<DeleteEnvelope, RecordClientError> {
        let mut tables = self.lock();
        let results = payload
            .record_ids
            .iter()
            .map(|id| {
                let removed = tables
                    .rows
                    .get_mut(table)
                    .and_then(|rows| rows.remove(id))
                    .is_some();
                if removed {
                    RecordResult {
                        success: true,
                        data: None,
                        message: None,
                    }
                } else {
                    failed("Record not found")
                }
            })
            .collect();

        Ok(WriteEnvelope {
            success: true,
            results: Some(results),
            message: None,
        })
    }
}

/// Record store that cannot be reached.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnreachableRecordStore;

impl UnreachableRecordStore {
    fn error() -> RecordClientError {
        RecordClientError::Api {
            status: 503,
            message: "record store unavailable".to_string(),
        }
    }
}

impl RecordClient for UnreachableRecordStore {
    async fn fetch_records<T>(
        &self,
        _table: &str,
        _params: &FetchParams,
    ) -> Result<QueryEnvelope<Vec<T>>, RecordClientError>
    where
        T: DeserializeOwned + Send,
    {
        Err(Self::error())
    }

    async fn get_record_by_id<T>(
        &self,
        _table: &str,
        _id: i32,
        _params: &FetchParams,
    ) -> Result<QueryEnvelope<T>, RecordClientError>
    where
        T: DeserializeOwned + Send,
    {
        Err(Self::error())
    }

    async fn create_record<R, T>(
        &self,
        _table: &str,
        _payload: &RecordsPayload<R>,
    ) -> Result<WriteEnvelope<T>, RecordClientError>
    where
        R: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        Err(Self::error())
    }

    async fn update_record<F, T>(
        &self,
        _table: &str,
        _payload: &RecordsPayload<UpdateRecord<F>>,
    ) -> Result<WriteEnvelope<T>, RecordClientError>
    where
        F: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        Err(Self::error())
    }

    async fn delete_record(
        &self,
        _table: &str,
        _payload: &DeletePayload,
    ) -> Result<DeleteEnvelope, RecordClientError> {
        Err(Self::error())
    }
}

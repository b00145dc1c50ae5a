//! Record store wire types.
//!
//! Every call returns an envelope: `{success, data, message}` for reads and
//! `{success, results: [{success, data, message}], message}` for writes.
//! Request parameters mirror the record store's JSON exactly, including its
//! mixed casing (`FieldName`, `fieldName`, `RecordIds`).

use serde::{Deserialize, Serialize};

/// A column to return, serialized as `{"field": {"Name": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRef {
    pub field: FieldName,
}

/// Inner part of a [`FieldRef`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldName {
    #[serde(rename = "Name")]
    pub name: String,
}

impl FieldRef {
    /// Reference a column by name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            field: FieldName {
                name: name.to_string(),
            },
        }
    }

    /// The referenced column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.field.name
    }
}

/// Filter operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    EqualTo,
}

/// A server-side filter on one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    #[serde(rename = "FieldName")]
    pub field_name: String,
    #[serde(rename = "Operator")]
    pub operator: Operator,
    #[serde(rename = "Values")]
    pub values: Vec<serde_json::Value>,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortType {
    Asc,
    Desc,
}

/// Sort specification for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    #[serde(rename = "sorttype")]
    pub sort_type: SortType,
}

/// Parameters for `fetchRecords` and `getRecordById`.
///
/// The record store has no implicit "select all": every column to return
/// must be listed in `fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchParams {
    pub fields: Vec<FieldRef>,
    #[serde(rename = "where", default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<WhereClause>,
    #[serde(rename = "orderBy", default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
}

impl FetchParams {
    /// Select the given columns with no filter.
    #[must_use]
    pub fn select(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|name| FieldRef::new(name)).collect(),
            ..Self::default()
        }
    }

    /// Add an equality filter on an integer column.
    #[must_use]
    pub fn where_eq(mut self, field: &str, value: i32) -> Self {
        self.filters.push(WhereClause {
            field_name: field.to_string(),
            operator: Operator::EqualTo,
            values: vec![serde_json::Value::from(value)],
        });
        self
    }

    /// Add a sort column.
    #[must_use]
    pub fn order_by(mut self, field: &str, sort_type: SortType) -> Self {
        self.order_by.push(OrderBy {
            field_name: field.to_string(),
            sort_type,
        });
        self
    }
}

/// Envelope returned by `fetchRecords` and `getRecordById`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Per-record outcome inside a [`WriteEnvelope`].
#[derive(Debug, Clone, Deserialize)]
pub struct RecordResult<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Envelope returned by `createRecord`, `updateRecord` and `deleteRecord`.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteEnvelope<T> {
    pub success: bool,
    pub results: Option<Vec<RecordResult<T>>>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> WriteEnvelope<T> {
    /// The first per-record result, if the envelope carries any.
    #[must_use]
    pub fn into_first_result(self) -> Option<RecordResult<T>> {
        self.results.and_then(|results| results.into_iter().next())
    }
}

/// Envelope returned by `deleteRecord`; per-record data is ignored.
pub type DeleteEnvelope = WriteEnvelope<serde::de::IgnoredAny>;

/// Body for `createRecord` and `updateRecord`.
#[derive(Debug, Clone, Serialize)]
pub struct RecordsPayload<R> {
    pub records: Vec<R>,
}

impl<R> RecordsPayload<R> {
    /// A payload carrying exactly one record.
    #[must_use]
    pub fn single(record: R) -> Self {
        Self {
            records: vec![record],
        }
    }
}

/// A record addressed by primary key for `updateRecord`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRecord<F> {
    #[serde(rename = "Id")]
    pub id: i32,
    #[serde(flatten)]
    pub fields: F,
}

/// Body for `deleteRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePayload {
    #[serde(rename = "RecordIds")]
    pub record_ids: Vec<i32>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fetch_params_wire_format() {
        let params = FetchParams::select(&["Name", "contact_id_c"])
            .where_eq("contact_id_c", 42)
            .order_by("timestamp_c", SortType::Desc);

        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "fields": [
                    {"field": {"Name": "Name"}},
                    {"field": {"Name": "contact_id_c"}}
                ],
                "where": [
                    {"FieldName": "contact_id_c", "Operator": "EqualTo", "Values": [42]}
                ],
                "orderBy": [{"fieldName": "timestamp_c", "sorttype": "DESC"}]
            })
        );
    }

    #[test]
    fn test_unfiltered_params_omit_where_and_order() {
        let params = FetchParams::select(&["Name"]);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"fields": [{"field": {"Name": "Name"}}]})
        );
    }

    #[test]
    fn test_update_record_flattens_fields() {
        let payload = RecordsPayload::single(UpdateRecord {
            id: 7,
            fields: json!({"title_c": "Renewal"}),
        });
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"records": [{"Id": 7, "title_c": "Renewal"}]})
        );
    }

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(rename = "Id")]
        id: i32,
    }

    fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_envelopes_decode_records_without_default() {
        let query: QueryEnvelope<Vec<Row>> = decode(json!({"success": true, "data": [{"Id": 4}]}));
        assert_eq!(query.data.unwrap()[0].id, 4);

        let missing: QueryEnvelope<Row> = decode(json!({"success": false, "message": "gone"}));
        assert!(missing.data.is_none());
        assert_eq!(missing.message.as_deref(), Some("gone"));

        let write: WriteEnvelope<Row> = decode(json!({
            "success": true,
            "results": [{"success": true, "data": {"Id": 9}}]
        }));
        assert_eq!(write.into_first_result().unwrap().data.unwrap().id, 9);
    }

    #[test]
    fn test_write_envelope_without_results() {
        let envelope: DeleteEnvelope = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(envelope.success);
        assert!(envelope.into_first_result().is_none());
    }

    #[test]
    fn test_delete_payload_wire_format() {
        let payload = DeletePayload {
            record_ids: vec![3],
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"RecordIds": [3]})
        );
    }
}

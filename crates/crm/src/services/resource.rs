//! Generic CRUD façade over one record store table.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dealflow_core::ContactId;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use super::error::{Operation, ServiceError};
use super::policy::ReadPolicies;
use crate::records::{
    DeletePayload, FetchParams, RecordClient, RecordsPayload, SortType, UpdateRecord,
    WriteEnvelope,
};

/// Column holding the contact foreign key on relation-scoped tables.
pub const CONTACT_FIELD: &str = "contact_id_c";

/// Describes one record store table and how to write to it.
pub trait Resource: Send + Sync + 'static {
    /// Table name.
    const TABLE: &'static str;
    /// Columns requested on every read.
    const FIELDS: &'static [&'static str];
    /// Capitalised singular noun used in messages ("Deal").
    const LABEL: &'static str;

    /// Primary key type.
    type Id: Copy + Into<i32> + fmt::Display + fmt::Debug + Send + Sync;
    /// Record as read back from the store.
    type Record: DeserializeOwned + Send;
    /// Caller input for `create`.
    type New: Send;
    /// Sparse update for `update`.
    type Patch: Serialize + Send + Sync;
    /// Record written by `create`: updateable fields plus stamped defaults.
    type CreateRecord: Serialize + Send + Sync;

    /// Build the create record, stamping timestamps with `now`.
    fn create_record(input: Self::New, now: DateTime<Utc>) -> Self::CreateRecord;

    /// Adjust a patch before it is sent. Identity unless a table derives
    /// fields from others.
    fn prepare_patch(patch: Self::Patch, _now: DateTime<Utc>) -> Self::Patch {
        patch
    }
}

/// A table whose records reference a contact through `contact_id_c`.
pub trait ContactScoped: Resource {
    /// Server-side ordering applied to relation lookups.
    const CONTACT_ORDER: Option<(&'static str, SortType)> = None;
}

/// Typed CRUD operations over the table described by `R`.
///
/// Cheap to clone; the record client is shared.
pub struct ResourceService<C, R> {
    client: Arc<C>,
    policies: ReadPolicies,
    _resource: PhantomData<fn() -> R>,
}

impl<C, R> Clone for ResourceService<C, R> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            policies: self.policies,
            _resource: PhantomData,
        }
    }
}

impl<C, R: Resource> fmt::Debug for ResourceService<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceService")
            .field("table", &R::TABLE)
            .field("policies", &self.policies)
            .finish_non_exhaustive()
    }
}

impl<C: RecordClient, R: Resource> ResourceService<C, R> {
    /// Create a service over an injected client with the default policies.
    #[must_use]
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            policies: ReadPolicies::default(),
            _resource: PhantomData,
        }
    }

    /// Replace the read policies.
    #[must_use]
    pub const fn with_policies(mut self, policies: ReadPolicies) -> Self {
        self.policies = policies;
        self
    }

    /// Current read policies.
    #[must_use]
    pub const fn policies(&self) -> ReadPolicies {
        self.policies
    }

    /// The shared record client.
    #[must_use]
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Fetch every record with the full field list and no filter.
    ///
    /// # Errors
    ///
    /// Fails with [`ServiceError::RemoteQuery`] or [`ServiceError::Transport`]
    /// unless the `get_all` policy degrades to an empty list.
    #[instrument(skip_all, fields(table = R::TABLE))]
    pub async fn get_all(&self) -> Result<Vec<R::Record>, ServiceError> {
        let params = FetchParams::select(R::FIELDS);
        match self.fetch(&params, Operation::GetAll, None).await {
            Ok(records) => Ok(records),
            Err(e) => self.policies.get_all.recover(e),
        }
    }

    /// Fetch one record by primary key.
    ///
    /// # Errors
    ///
    /// Never fails under the default policy; a failed lookup is `Ok(None)`.
    #[instrument(skip_all, fields(table = R::TABLE, id = %id))]
    pub async fn get_by_id(&self, id: R::Id) -> Result<Option<R::Record>, ServiceError> {
        let raw_id: i32 = id.into();
        let params = FetchParams::select(R::FIELDS);

        let result = match self
            .client
            .get_record_by_id::<R::Record>(R::TABLE, raw_id, &params)
            .await
        {
            Ok(envelope) if envelope.success => Ok(envelope.data),
            Ok(envelope) => {
                let message = envelope
                    .message
                    .unwrap_or_else(|| format!("{} not found", R::LABEL));
                Err(self.query_failure(Operation::GetById, Some(raw_id), message))
            }
            Err(source) => Err(self.transport_failure(Operation::GetById, Some(raw_id), source)),
        };

        match result {
            Ok(record) => Ok(record),
            Err(e) => self.policies.get_by_id.recover(e),
        }
    }

    /// Create one record from the updateable fields in `input`.
    ///
    /// # Errors
    ///
    /// Fails with [`ServiceError::RemoteWrite`] if the envelope or the single
    /// per-record result reports failure, [`ServiceError::Transport`] if the
    /// call fails.
    #[instrument(skip_all, fields(table = R::TABLE))]
    pub async fn create(&self, input: R::New) -> Result<R::Record, ServiceError> {
        let payload = RecordsPayload::single(R::create_record(input, Utc::now()));

        let envelope = self
            .client
            .create_record::<R::CreateRecord, R::Record>(R::TABLE, &payload)
            .await
            .map_err(|source| self.transport_failure(Operation::Create, None, source))?;

        self.unwrap_write(envelope, Operation::Create, None)
    }

    /// Apply a sparse patch: only present fields are sent.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::create`].
    #[instrument(skip_all, fields(table = R::TABLE, id = %id))]
    pub async fn update(&self, id: R::Id, patch: R::Patch) -> Result<R::Record, ServiceError> {
        let raw_id: i32 = id.into();
        let payload = RecordsPayload::single(UpdateRecord {
            id: raw_id,
            fields: R::prepare_patch(patch, Utc::now()),
        });

        let envelope = self
            .client
            .update_record::<R::Patch, R::Record>(R::TABLE, &payload)
            .await
            .map_err(|source| self.transport_failure(Operation::Update, Some(raw_id), source))?;

        self.unwrap_write(envelope, Operation::Update, Some(raw_id))
    }

    /// Hard-delete one record. Returns whether the deletion succeeded.
    ///
    /// # Errors
    ///
    /// Fails with [`ServiceError::RemoteWrite`] only if the envelope itself
    /// reports failure, [`ServiceError::Transport`] if the call fails.
    #[instrument(skip_all, fields(table = R::TABLE, id = %id))]
    pub async fn delete(&self, id: R::Id) -> Result<bool, ServiceError> {
        let raw_id: i32 = id.into();
        let payload = DeletePayload {
            record_ids: vec![raw_id],
        };

        let envelope = self
            .client
            .delete_record(R::TABLE, &payload)
            .await
            .map_err(|source| self.transport_failure(Operation::Delete, Some(raw_id), source))?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| format!("{} deletion failed", R::LABEL));
            return Err(self.write_failure(Operation::Delete, Some(raw_id), message));
        }

        let deleted = envelope.into_first_result().is_none_or(|result| {
            if !result.success {
                error!(
                    table = R::TABLE,
                    id = raw_id,
                    error = ?result.message,
                    "Record store refused deletion"
                );
            }
            result.success
        });

        debug!(deleted, "Delete finished");
        Ok(deleted)
    }

    async fn fetch(
        &self,
        params: &FetchParams,
        operation: Operation,
        contact_id: Option<i32>,
    ) -> Result<Vec<R::Record>, ServiceError> {
        let envelope = self
            .client
            .fetch_records::<R::Record>(R::TABLE, params)
            .await
            .map_err(|source| self.transport_failure(operation, contact_id, source))?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(self.query_failure(operation, contact_id, message));
        }

        Ok(envelope.data.unwrap_or_default())
    }

    fn unwrap_write(
        &self,
        envelope: WriteEnvelope<R::Record>,
        operation: Operation,
        id: Option<i32>,
    ) -> Result<R::Record, ServiceError> {
        let fallback = || format!("{} {} failed", R::LABEL, operation.action_noun());
        let WriteEnvelope {
            success,
            results,
            message: envelope_message,
        } = envelope;

        if !success {
            let message = envelope_message.unwrap_or_else(fallback);
            return Err(self.write_failure(operation, id, message));
        }

        let Some(result) = results.and_then(|results| results.into_iter().next()) else {
            return Err(self.write_failure(
                operation,
                id,
                "Unexpected response format".to_string(),
            ));
        };

        if !result.success {
            let message = result
                .message
                .or(envelope_message)
                .unwrap_or_else(fallback);
            return Err(self.write_failure(operation, id, message));
        }

        result.data.ok_or_else(|| {
            self.write_failure(operation, id, "Unexpected response format".to_string())
        })
    }

    fn query_failure(&self, operation: Operation, id: Option<i32>, message: String) -> ServiceError {
        error!(
            table = R::TABLE,
            operation = %operation,
            id = ?id,
            policy = ?self.policies,
            error = %message,
            "Record store query failed"
        );
        ServiceError::RemoteQuery {
            operation,
            table: R::TABLE,
            message,
        }
    }

    fn write_failure(&self, operation: Operation, id: Option<i32>, message: String) -> ServiceError {
        error!(
            table = R::TABLE,
            operation = %operation,
            id = ?id,
            error = %message,
            "Record store write failed"
        );
        ServiceError::RemoteWrite {
            operation,
            table: R::TABLE,
            message,
        }
    }

    fn transport_failure(
        &self,
        operation: Operation,
        id: Option<i32>,
        source: crate::records::RecordClientError,
    ) -> ServiceError {
        error!(
            table = R::TABLE,
            operation = %operation,
            id = ?id,
            error = %source,
            "Record store call failed"
        );
        ServiceError::Transport {
            operation,
            table: R::TABLE,
            source,
        }
    }
}

impl<C: RecordClient, R: ContactScoped> ResourceService<C, R> {
    /// Fetch the records referencing `contact_id` (server-side equality filter).
    ///
    /// # Errors
    ///
    /// Never fails under the default policy; a failed lookup is an empty list.
    #[instrument(skip_all, fields(table = R::TABLE, contact_id = %contact_id))]
    pub async fn get_by_contact_id(
        &self,
        contact_id: ContactId,
    ) -> Result<Vec<R::Record>, ServiceError> {
        let raw_id = contact_id.as_i32();
        let mut params = FetchParams::select(R::FIELDS).where_eq(CONTACT_FIELD, raw_id);
        if let Some((field, sort_type)) = R::CONTACT_ORDER {
            params = params.order_by(field, sort_type);
        }

        match self
            .fetch(&params, Operation::GetByContactId, Some(raw_id))
            .await
        {
            Ok(records) => Ok(records),
            Err(e) => self.policies.by_contact.recover(e),
        }
    }
}

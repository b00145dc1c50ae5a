//! Resource service errors.

use thiserror::Error;

use crate::records::RecordClientError;

/// Which service operation failed. Carried in errors and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetAll,
    GetById,
    GetByContactId,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Stable name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetAll => "get_all",
            Self::GetById => "get_by_id",
            Self::GetByContactId => "get_by_contact_id",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Noun used in fallback write messages ("Deal creation failed").
    #[must_use]
    pub const fn action_noun(self) -> &'static str {
        match self {
            Self::Create => "creation",
            Self::Update => "update",
            Self::Delete => "deletion",
            Self::GetAll | Self::GetById | Self::GetByContactId => "lookup",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by the resource services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A read reported `success: false` at the envelope level.
    #[error("{table} {operation} failed: {message}")]
    RemoteQuery {
        operation: Operation,
        table: &'static str,
        message: String,
    },

    /// A write failed at the envelope or per-record level.
    ///
    /// `message` is the most specific one available: per-record first,
    /// then envelope, then a fixed fallback.
    #[error("{table} {operation} failed: {message}")]
    RemoteWrite {
        operation: Operation,
        table: &'static str,
        message: String,
    },

    /// The record store could not be reached or answered garbage.
    #[error("{table} {operation} failed: {source}")]
    Transport {
        operation: Operation,
        table: &'static str,
        #[source]
        source: RecordClientError,
    },
}

impl ServiceError {
    /// Human-readable message without the table/operation prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::RemoteQuery { message, .. } | Self::RemoteWrite { message, .. } => {
                message.clone()
            }
            Self::Transport { source, .. } => source.to_string(),
        }
    }

    /// The operation that failed.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::RemoteQuery { operation, .. }
            | Self::RemoteWrite { operation, .. }
            | Self::Transport { operation, .. } => *operation,
        }
    }
}

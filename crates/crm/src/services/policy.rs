//! Error-degrade policy for read operations.
//!
//! Each read operation either propagates a failure or degrades to an empty
//! or absent result. The behaviour is configuration on the service rather
//! than something each method decides on its own.

use super::error::ServiceError;

/// What a read operation does when the record store fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnError {
    /// Propagate the error to the caller.
    Throw,
    /// Log and return an empty list.
    Empty,
    /// Log and return `None`.
    Absent,
}

impl OnError {
    /// Apply the policy to an already-logged failure.
    ///
    /// `Empty` and `Absent` both yield `T::default()`: an empty `Vec` or
    /// `None` depending on the operation's return type.
    ///
    /// # Errors
    ///
    /// Returns the original error under [`OnError::Throw`].
    pub fn recover<T: Default>(self, error: ServiceError) -> Result<T, ServiceError> {
        match self {
            Self::Throw => Err(error),
            Self::Empty | Self::Absent => Ok(T::default()),
        }
    }
}

/// Per-operation read policies of one resource service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadPolicies {
    /// `get_all`: bulk list.
    pub get_all: OnError,
    /// `get_by_id`: optional single lookup.
    pub get_by_id: OnError,
    /// `get_by_contact_id`: relation-scoped list.
    pub by_contact: OnError,
}

impl Default for ReadPolicies {
    fn default() -> Self {
        Self {
            get_all: OnError::Throw,
            get_by_id: OnError::Absent,
            by_contact: OnError::Empty,
        }
    }
}

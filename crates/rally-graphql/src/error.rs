//! Typed errors surfaced to GraphQL callers.
//!
//! [`ApiError`] unifies the failure modes that reach a caller as structured
//! GraphQL errors with a machine-readable `code` extension. Notification
//! publish failures never appear here: they are contained inside the bus.

use async_graphql::{Error, ErrorExtensions, ID};
use rally_store::StoreError;

/// Errors surfaced to GraphQL callers as structured failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The requested id is absent from the target collection.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// The entity kind, e.g. `user`.
        kind: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// The supplied id is not a valid identifier string.
    #[error("invalid id: {0}")]
    InvalidId(String),
}

impl ApiError {
    /// The machine-readable code carried in the error extensions.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidId(_) => "INVALID_ID",
        }
    }

    /// Shorthand for a `NotFound` error on a given kind and id.
    pub fn not_found(kind: &'static str, id: &ID) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } => Self::NotFound { kind, id },
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> Error {
        Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}

/// Parse a GraphQL `ID` argument into a typed identifier.
///
/// # Errors
///
/// Returns an [`ApiError::InvalidId`] GraphQL error when the string is not
/// a valid identifier. Ids are matched exactly; there is no partial or
/// case-insensitive matching.
pub(crate) fn parse_id<I>(id: &ID, parser: fn(&str) -> Result<I, uuid::Error>) -> Result<I, Error> {
    parser(id.as_str()).map_err(|_| ApiError::InvalidId(id.to_string()).extend())
}

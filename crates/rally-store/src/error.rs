//! Error types for the entity store.

/// Errors that can occur during store operations.
///
/// Store operations are synchronous once the collection lock is held and
/// cannot partially fail, so the only failure mode is an absent id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No record with the requested id exists in the target collection.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// The entity kind, e.g. `user`.
        kind: &'static str,
        /// The id that was looked up, in canonical string form.
        id: String,
    },
}

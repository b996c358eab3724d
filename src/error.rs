//! Typed failures of the decode and reconcile passes.

/// The raw snapshot does not have the shape the upstream service promises.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed snapshot: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("{category} deploy has an empty environment name")]
    EmptyEnvironment { category: &'static str },
    #[error("{category} deploy for {environment:?} has an invalid {field} {value:?}: {source}")]
    Timestamp {
        category: &'static str,
        environment: String,
        field: &'static str,
        value: String,
        #[source]
        source: time::error::Parse,
    },
}

/// A reconcile invariant was broken.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("deploy for {environment:?} has neither a queued nor a finished time and cannot be matched")]
    MissingAnchor { environment: String },
}

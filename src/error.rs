use thiserror::Error;

/// Failures from repository, generator, and session operations. Each one is
/// recoverable: the operation is rejected and the rest of the app keeps going.
#[derive(Debug, Error)]
pub enum VocabError {
    /// A required field was blank on add/update/import.
    #[error("{0} is required")]
    Validation(&'static str),

    /// The referenced term id no longer exists.
    #[error("term {0} no longer exists")]
    NotFound(u64),

    /// Quiz generation could not produce a single question.
    #[error("no terms match the selected mode and scope")]
    GenerationFailed,
}

/// Failures talking to the external vocabulary store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store answered but reported an error of its own.
    #[error("store reported: {0}")]
    Backend(String),

    /// The store answered with something we could not make sense of.
    #[error("unexpected store response: {0}")]
    Decode(String),
}

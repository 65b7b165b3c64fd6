use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::QuestionSlug;

/// Error type for configuration, sampling, harvest, and persistence failures.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(
        "dissimilar pool for '{slug}' holds {available} candidates but {requested} are required"
    )]
    UndersizedNegativePool {
        slug: QuestionSlug,
        available: usize,
        requested: usize,
    },
    #[error("question listing fetch failed: {0}")]
    Listing(String),
    #[error("fetching question '{slug}' failed: {reason}")]
    Fetch { slug: QuestionSlug, reason: String },
    #[error("stored payload '{}' is not usable: {reason}", path.display())]
    Payload { path: PathBuf, reason: String },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("serialization failure: {0}")]
    Serialize(#[from] serde_json::Error),
}

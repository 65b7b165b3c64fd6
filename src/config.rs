use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{convert, harvest};

/// Output mode selector for a conversion run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConvertMode {
    /// One record per question: text, tokens, tags, similar-question ids.
    Normal,
    /// One record per sampled (similar, dissimilar) pair.
    Pairwise,
    /// Pairwise records whose similar side is the pivot question itself.
    PairwiseSelfSim,
    /// Plain-text corpus plus id-triple relation lines; no token or tag
    /// encoding.
    PairwiseText,
}

/// Top-level conversion configuration.
#[derive(Clone, Debug)]
pub struct ConvertConfig {
    /// Destination directory for every output file.
    pub dest: PathBuf,
    /// Output mode.
    pub mode: ConvertMode,
    /// Max token ids kept per encoded text; `None` keeps everything.
    pub limit_length: Option<usize>,
    /// Max questions processed from the head of the corpus; `None` keeps
    /// everything. Must not exceed the corpus size.
    pub limit_question: Option<usize>,
    /// Dissimilar questions drawn per similar question.
    pub num_negative_sample: usize,
    /// RNG seed for reproducible sampling; `None` draws a fresh seed.
    pub seed: Option<u64>,
    /// File name for the question vocabulary listing.
    pub question_list_filename: String,
    /// File name for the tag vocabulary listing.
    pub tag_list_filename: String,
    /// File name for the word vocabulary listing.
    pub word_list_filename: String,
    /// File name for the structured dataset.
    pub dataset_filename: String,
    /// File name for the pairwise-text corpus file.
    pub question_text_filename: String,
    /// File name for the pairwise-text relation file.
    pub relations_filename: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            dest: PathBuf::from(convert::DEFAULT_DEST_DIR),
            mode: ConvertMode::Normal,
            limit_length: None,
            limit_question: None,
            num_negative_sample: convert::DEFAULT_NUM_NEGATIVE_SAMPLE,
            seed: None,
            question_list_filename: convert::QUESTION_LIST_FILENAME.to_string(),
            tag_list_filename: convert::TAG_LIST_FILENAME.to_string(),
            word_list_filename: convert::WORD_LIST_FILENAME.to_string(),
            dataset_filename: convert::DATASET_FILENAME.to_string(),
            question_text_filename: convert::QUESTION_TEXT_FILENAME.to_string(),
            relations_filename: convert::RELATIONS_FILENAME.to_string(),
        }
    }
}

/// Harvest (fetch and store) configuration.
#[derive(Clone, Debug)]
pub struct HarvestConfig {
    /// Base URL of the question service.
    pub base_url: String,
    /// Directory receiving the raw listing and per-question payload files.
    pub dest: PathBuf,
    /// File name for the stored raw listing payload.
    pub listing_filename: String,
    /// Fixed delay between consecutive requests.
    pub request_delay: Duration,
    /// Optional cap on fetched questions for smoke runs; `None` fetches
    /// everything the listing names.
    pub limit: Option<usize>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: harvest::BASE_URL.to_string(),
            dest: PathBuf::from(harvest::DEFAULT_STORE_DIR),
            listing_filename: harvest::LISTING_FILENAME.to_string(),
            request_delay: harvest::REQUEST_DELAY,
            limit: None,
        }
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{QuestionId, QuestionSlug, TagId, TagSlug, WordId};

/// One harvested problem, immutable once loaded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Unique slug identifying the question within the corpus.
    pub slug: QuestionSlug,
    /// Raw HTML body as delivered by the question service.
    pub content: String,
    /// Topic tag slugs attached to the question.
    pub topic_tags: Vec<TagSlug>,
    /// Referenced similar questions, in annotation order. May name slugs
    /// outside the corpus; those references are dropped at encoding time.
    pub similar_questions: Vec<QuestionSlug>,
    /// Paid-only flag; such records are filtered out when the corpus loads.
    pub is_paid_only: bool,
}

/// Feature group shared by the pivot, similar, and dissimilar sides of a pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionFeatures {
    /// Cleaned question body.
    pub text: String,
    /// Encoded token ids, length-limited when the run asks for it.
    pub tokens: Vec<WordId>,
    /// Tag ids for the question's topic tags.
    pub tags: Vec<TagId>,
}

/// Record emitted in normal mode: one per question.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SingleExample {
    pub text: String,
    pub tokens: Vec<WordId>,
    pub tags: Vec<TagId>,
    /// Ids of corpus-resident similar questions.
    pub similar: Vec<QuestionId>,
}

/// Record emitted in the pairwise modes: one per sampled
/// (similar, dissimilar) pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PairExample {
    pub pivot: QuestionFeatures,
    pub similar: QuestionFeatures,
    pub dissimilar: QuestionFeatures,
}

/// Accepted id triple written by pairwise-text mode, one per line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdTriple {
    pub pivot: QuestionId,
    pub similar: QuestionId,
    pub dissimilar: QuestionId,
}

impl fmt::Display for IdTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.pivot, self.similar, self.dissimilar)
    }
}

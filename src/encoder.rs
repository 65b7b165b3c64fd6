//! Token-id encoding through a built word vocabulary.

use crate::clean::clean_text;
use crate::constants::vocab::UNK_ID;
use crate::tokenize::Tokenize;
use crate::types::WordId;
use crate::vocab::Vocabularies;

/// Maps raw question content to word-id sequences.
///
/// An encoder borrows a built [`Vocabularies`] value, so encoding can never
/// run ahead of vocabulary construction. Tokens outside the vocabulary map
/// to the unknown-token id; this only happens for text the vocabulary was
/// not built from.
pub struct TokenEncoder<'a> {
    vocab: &'a Vocabularies,
    tokenizer: &'a dyn Tokenize,
}

impl<'a> TokenEncoder<'a> {
    /// Create an encoder over `vocab` using `tokenizer`.
    ///
    /// Pass the same tokenizer implementation the vocabulary was built with,
    /// otherwise in-vocabulary text can still produce unknown ids.
    pub fn new(vocab: &'a Vocabularies, tokenizer: &'a dyn Tokenize) -> Self {
        Self { vocab, tokenizer }
    }

    /// Clean, tokenize, lowercase, and map `raw_html` to word ids.
    ///
    /// With `limit` set, at most that many leading ids are returned. The
    /// result is never padded.
    pub fn encode(&self, raw_html: &str, limit: Option<usize>) -> Vec<WordId> {
        let cleaned = clean_text(raw_html);
        let mut ids: Vec<WordId> = self
            .tokenizer
            .tokenize(&cleaned)
            .into_iter()
            .map(|token| {
                self.vocab
                    .words
                    .id_of(&token.to_lowercase())
                    .unwrap_or(UNK_ID)
            })
            .collect();
        if let Some(limit) = limit {
            ids.truncate(limit);
        }
        ids
    }
}

//! Deterministic string-to-id vocabularies built once per conversion run.
//!
//! Ownership model:
//! - `Vocabulary` is a dense id mapping with ids fixed by insertion order.
//! - `Vocabularies::build` derives all three mappings from one corpus scan;
//!   a rebuild produces a fresh value, it never partially updates an old one.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;

use crate::clean::clean_text;
use crate::constants::vocab::{PAD_TOKEN, UNK_TOKEN};
use crate::data::QuestionRecord;
use crate::errors::ConvertError;
use crate::tokenize::Tokenize;

/// Dense string-to-id mapping with ids assigned in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vocabulary {
    index: IndexMap<String, usize>,
}

impl Vocabulary {
    /// Id for `key`, if present.
    pub fn id_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// True if `key` has an assigned id.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of entries, sentinels included.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if no entries have been assigned.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Keys in id order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Write one key per line in id order, so line number reconstructs id.
    pub fn write_list(&self, path: &Path) -> Result<(), ConvertError> {
        let mut out = BufWriter::new(File::create(path)?);
        for key in self.keys() {
            out.write_all(key.as_bytes())?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Rebuild a vocabulary from a listing written by [`Vocabulary::write_list`].
    pub fn read_list(path: &Path) -> Result<Self, ConvertError> {
        let reader = BufReader::new(File::open(path)?);
        let mut index = IndexMap::new();
        for line in reader.lines() {
            let key = line?;
            let next = index.len();
            index.insert(key, next);
        }
        Ok(Self { index })
    }

    fn insert_unique(&mut self, key: String) -> Result<(), ConvertError> {
        let next = self.index.len();
        if self.index.insert(key.clone(), next).is_some() {
            return Err(ConvertError::Configuration(format!(
                "duplicate vocabulary key '{key}'"
            )));
        }
        Ok(())
    }
}

/// The three id mappings built once per conversion run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vocabularies {
    /// Question slug to id, assigned in corpus order starting at 0.
    pub questions: Vocabulary,
    /// Tag slug to id: `<PAD>` at 0, sorted distinct tags from 1.
    pub tags: Vocabulary,
    /// Lowercased token to id: `<PAD>` at 0, `<UNK>` at 1, sorted distinct
    /// tokens from 2.
    pub words: Vocabulary,
}

impl Vocabularies {
    /// Scan the ordered corpus once and build all three mappings.
    ///
    /// Deterministic for a fixed corpus: question ids equal corpus positions,
    /// tag and word ids follow lexicographic order after the sentinel block.
    /// Duplicate question slugs are rejected.
    pub fn build(
        corpus: &[QuestionRecord],
        tokenizer: &dyn Tokenize,
    ) -> Result<Self, ConvertError> {
        let mut questions = Vocabulary::default();
        for question in corpus {
            questions.insert_unique(question.slug.clone()).map_err(|_| {
                ConvertError::Configuration(format!(
                    "duplicate question slug '{}' in corpus",
                    question.slug
                ))
            })?;
        }

        let mut tag_set = BTreeSet::new();
        let mut word_set = BTreeSet::new();
        for question in corpus {
            for tag in &question.topic_tags {
                tag_set.insert(tag.clone());
            }
            for token in tokenizer.tokenize(&clean_text(&question.content)) {
                word_set.insert(token.to_lowercase());
            }
        }

        let mut tags = Vocabulary::default();
        tags.insert_unique(PAD_TOKEN.to_string())?;
        for tag in tag_set {
            tags.insert_unique(tag)?;
        }

        let mut words = Vocabulary::default();
        words.insert_unique(PAD_TOKEN.to_string())?;
        words.insert_unique(UNK_TOKEN.to_string())?;
        for word in word_set {
            words.insert_unique(word)?;
        }

        Ok(Self {
            questions,
            tags,
            words,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::vocab::{PAD_ID, UNK_ID};
    use crate::tokenize::WordTokenizer;
    use tempfile::tempdir;

    fn build_question(slug: &str, content: &str, tags: &[&str]) -> QuestionRecord {
        QuestionRecord {
            slug: slug.to_string(),
            content: content.to_string(),
            topic_tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
            similar_questions: Vec::new(),
            is_paid_only: false,
        }
    }

    fn sample_corpus() -> Vec<QuestionRecord> {
        vec![
            build_question("two-sum", "<p>Given Nums array</p>", &["array", "hash-table"]),
            build_question("three-sum", "<p>given sorted Array</p>", &["array"]),
        ]
    }

    #[test]
    fn question_ids_follow_corpus_order() {
        let vocab = Vocabularies::build(&sample_corpus(), &WordTokenizer).unwrap();
        assert_eq!(vocab.questions.id_of("two-sum"), Some(0));
        assert_eq!(vocab.questions.id_of("three-sum"), Some(1));
        assert_eq!(vocab.questions.len(), 2);
    }

    #[test]
    fn tag_ids_are_sorted_behind_the_padding_sentinel() {
        let vocab = Vocabularies::build(&sample_corpus(), &WordTokenizer).unwrap();
        assert_eq!(vocab.tags.id_of(PAD_TOKEN), Some(PAD_ID));
        assert_eq!(vocab.tags.id_of("array"), Some(1));
        assert_eq!(vocab.tags.id_of("hash-table"), Some(2));
    }

    #[test]
    fn word_ids_are_lowercased_sorted_and_deduplicated() {
        let vocab = Vocabularies::build(&sample_corpus(), &WordTokenizer).unwrap();
        assert_eq!(vocab.words.id_of(PAD_TOKEN), Some(PAD_ID));
        assert_eq!(vocab.words.id_of(UNK_TOKEN), Some(UNK_ID));
        // Distinct lowercased tokens: array, given, nums, sorted.
        let keys: Vec<&str> = vocab.words.keys().collect();
        assert_eq!(
            keys,
            vec![PAD_TOKEN, UNK_TOKEN, "array", "given", "nums", "sorted"]
        );
        assert!(vocab.words.id_of("Given").is_none());
    }

    #[test]
    fn sentinel_ids_are_unique() {
        let vocab = Vocabularies::build(&sample_corpus(), &WordTokenizer).unwrap();
        let pad_holders = vocab
            .words
            .keys()
            .filter(|key| vocab.words.id_of(key) == Some(PAD_ID))
            .count();
        let unk_holders = vocab
            .words
            .keys()
            .filter(|key| vocab.words.id_of(key) == Some(UNK_ID))
            .count();
        assert_eq!(pad_holders, 1);
        assert_eq!(unk_holders, 1);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let corpus = sample_corpus();
        let first = Vocabularies::build(&corpus, &WordTokenizer).unwrap();
        let second = Vocabularies::build(&corpus, &WordTokenizer).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_slugs_are_rejected() {
        let corpus = vec![
            build_question("two-sum", "<p>a</p>", &[]),
            build_question("two-sum", "<p>b</p>", &[]),
        ];
        let err = Vocabularies::build(&corpus, &WordTokenizer).unwrap_err();
        assert!(matches!(err, ConvertError::Configuration(_)));
    }

    #[test]
    fn listing_round_trips_through_write_and_read() {
        let vocab = Vocabularies::build(&sample_corpus(), &WordTokenizer).unwrap();
        let temp = tempdir().unwrap();
        let path = temp.path().join("word_list.txt");
        vocab.words.write_list(&path).unwrap();
        let reloaded = Vocabulary::read_list(&path).unwrap();
        assert_eq!(reloaded, vocab.words);
    }
}

//! Conversion runs: vocabulary construction, example assembly, output writing.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};

use rand::Rng;
use tracing::{debug, info};

use crate::clean::clean_text;
use crate::config::{ConvertConfig, ConvertMode};
use crate::data::{IdTriple, PairExample, QuestionFeatures, QuestionRecord, SingleExample};
use crate::encoder::TokenEncoder;
use crate::errors::ConvertError;
use crate::sampler::{DeterministicRng, NegativePool};
use crate::sink::{ExampleSink, JsonLinesSink};
use crate::tokenize::{Tokenize, WordTokenizer};
use crate::types::{QuestionId, TagId};
use crate::vocab::Vocabularies;

/// Drives one conversion run over an ordered question corpus.
///
/// The corpus is owned for the duration of the run and never mutated by it.
/// Vocabularies are built per run and passed explicitly into the encoding
/// and assembly steps.
pub struct Converter {
    questions: Vec<QuestionRecord>,
    tokenizer: Box<dyn Tokenize>,
}

/// Per-pivot sampling plan, validated before any record is emitted.
struct PivotPlan {
    pivot: QuestionId,
    similar: Vec<QuestionId>,
    excluded: HashSet<QuestionId>,
}

impl Converter {
    /// Create a converter with the default word tokenizer.
    pub fn new(questions: Vec<QuestionRecord>) -> Self {
        Self::with_tokenizer(questions, Box::new(WordTokenizer))
    }

    /// Create a converter with a caller-supplied tokenizer.
    pub fn with_tokenizer(questions: Vec<QuestionRecord>, tokenizer: Box<dyn Tokenize>) -> Self {
        Self {
            questions,
            tokenizer,
        }
    }

    /// Append a question to the corpus tail before a run.
    pub fn push_question(&mut self, question: QuestionRecord) {
        self.questions.push(question);
    }

    /// Number of questions currently loaded.
    pub fn corpus_len(&self) -> usize {
        self.questions.len()
    }

    /// Questions a run processes under `limit`, validated against the corpus
    /// size. A limit of `Some(0)` is a valid empty run.
    fn working_set(&self, limit: Option<usize>) -> Result<&[QuestionRecord], ConvertError> {
        match limit {
            None => Ok(&self.questions),
            Some(n) if n <= self.questions.len() => Ok(&self.questions[..n]),
            Some(n) => Err(ConvertError::Configuration(format!(
                "limit_question {n} exceeds corpus size {}",
                self.questions.len()
            ))),
        }
    }

    /// Build the three vocabularies for the questions a run will process.
    pub fn build_vocabularies(
        &self,
        limit_question: Option<usize>,
    ) -> Result<Vocabularies, ConvertError> {
        let corpus = self.working_set(limit_question)?;
        Vocabularies::build(corpus, self.tokenizer.as_ref())
    }

    /// Run a full conversion according to `config`, writing every output file
    /// into `config.dest`. Vocabulary listings are written before any record.
    pub fn run(&self, config: &ConvertConfig) -> Result<(), ConvertError> {
        let vocab = self.build_vocabularies(config.limit_question)?;
        fs::create_dir_all(&config.dest)?;
        vocab
            .questions
            .write_list(&config.dest.join(&config.question_list_filename))?;
        vocab
            .tags
            .write_list(&config.dest.join(&config.tag_list_filename))?;
        vocab
            .words
            .write_list(&config.dest.join(&config.word_list_filename))?;
        info!(
            questions = vocab.questions.len(),
            tags = vocab.tags.len(),
            words = vocab.words.len(),
            "vocabulary listings written"
        );

        let mut rng = match config.seed {
            Some(seed) => DeterministicRng::new(seed),
            None => DeterministicRng::from_entropy(),
        };
        let records = match config.mode {
            ConvertMode::Normal => {
                let mut sink =
                    JsonLinesSink::create(&config.dest.join(&config.dataset_filename))?;
                let records = self.emit_single(config, &vocab, &mut sink)?;
                sink.flush()?;
                records
            }
            ConvertMode::Pairwise | ConvertMode::PairwiseSelfSim => {
                let self_similar = config.mode == ConvertMode::PairwiseSelfSim;
                let mut sink =
                    JsonLinesSink::create(&config.dest.join(&config.dataset_filename))?;
                let records = self.emit_pairwise(config, &vocab, self_similar, &mut rng, &mut sink)?;
                sink.flush()?;
                records
            }
            ConvertMode::PairwiseText => {
                let mut text_out = BufWriter::new(File::create(
                    config.dest.join(&config.question_text_filename),
                )?);
                let mut relations_out =
                    BufWriter::new(File::create(config.dest.join(&config.relations_filename))?);
                let records = self.emit_pairwise_text(
                    config,
                    &vocab,
                    &mut rng,
                    &mut text_out,
                    &mut relations_out,
                )?;
                text_out.flush()?;
                relations_out.flush()?;
                records
            }
        };
        info!(mode = ?config.mode, records, "conversion finished");
        Ok(())
    }

    /// Emit one normal-mode record per question. Returns the record count.
    pub fn emit_single(
        &self,
        config: &ConvertConfig,
        vocab: &Vocabularies,
        sink: &mut dyn ExampleSink,
    ) -> Result<usize, ConvertError> {
        let corpus = self.working_set(config.limit_question)?;
        let encoder = TokenEncoder::new(vocab, self.tokenizer.as_ref());
        let mut records = 0;
        for question in corpus {
            let example = SingleExample {
                text: clean_text(&question.content),
                tokens: encoder.encode(&question.content, config.limit_length),
                tags: tag_ids(vocab, question),
                similar: similar_ids(vocab, question),
            };
            sink.accept_single(&example)?;
            records += 1;
        }
        Ok(records)
    }

    /// Emit pairwise records: one per sampled (similar, dissimilar) pair.
    ///
    /// With `self_similar` set, the similar side of every pair is the pivot
    /// itself while the negative pool still excludes the pivot's real
    /// similar set. Every pivot's pool is validated before the first record
    /// goes to the sink. Returns the record count.
    pub fn emit_pairwise<R: Rng + ?Sized>(
        &self,
        config: &ConvertConfig,
        vocab: &Vocabularies,
        self_similar: bool,
        rng: &mut R,
        sink: &mut dyn ExampleSink,
    ) -> Result<usize, ConvertError> {
        let corpus = self.working_set(config.limit_question)?;
        let plans = pivot_plans(corpus, vocab, config.num_negative_sample)?;
        let features = self.assemble_features(corpus, vocab, config.limit_length);
        let mut records = 0;
        for plan in &plans {
            let slug = &corpus[plan.pivot].slug;
            let mut pool = NegativePool::new(corpus.len(), &plan.excluded);
            for &similar_id in &plan.similar {
                let positive = if self_similar { plan.pivot } else { similar_id };
                for negative in pool.draw(config.num_negative_sample, rng, slug)? {
                    sink.accept_pair(&PairExample {
                        pivot: features[plan.pivot].clone(),
                        similar: features[positive].clone(),
                        dissimilar: features[negative].clone(),
                    })?;
                    records += 1;
                }
            }
            debug!(
                slug = %slug,
                pairs = plan.similar.len() * config.num_negative_sample,
                "pivot processed"
            );
        }
        Ok(records)
    }

    /// Emit the pairwise-text outputs: one cleaned body per line to
    /// `text_out` (line number equals question id), accepted id triples one
    /// per line to `relations_out`. Returns the triple count.
    pub fn emit_pairwise_text<R: Rng + ?Sized>(
        &self,
        config: &ConvertConfig,
        vocab: &Vocabularies,
        rng: &mut R,
        text_out: &mut dyn Write,
        relations_out: &mut dyn Write,
    ) -> Result<usize, ConvertError> {
        let corpus = self.working_set(config.limit_question)?;
        let plans = pivot_plans(corpus, vocab, config.num_negative_sample)?;
        for question in corpus {
            let mut text = clean_text(&question.content);
            if let Some(limit) = config.limit_length {
                text = text.chars().take(limit).collect();
            }
            writeln!(text_out, "{text}")?;
        }
        let mut records = 0;
        for plan in &plans {
            let slug = &corpus[plan.pivot].slug;
            let mut pool = NegativePool::new(corpus.len(), &plan.excluded);
            for &similar_id in &plan.similar {
                for negative in pool.draw(config.num_negative_sample, rng, slug)? {
                    let triple = IdTriple {
                        pivot: plan.pivot,
                        similar: similar_id,
                        dissimilar: negative,
                    };
                    writeln!(relations_out, "{triple}")?;
                    records += 1;
                }
            }
        }
        Ok(records)
    }

    fn assemble_features(
        &self,
        corpus: &[QuestionRecord],
        vocab: &Vocabularies,
        limit_length: Option<usize>,
    ) -> Vec<QuestionFeatures> {
        let encoder = TokenEncoder::new(vocab, self.tokenizer.as_ref());
        corpus
            .iter()
            .map(|question| QuestionFeatures {
                text: clean_text(&question.content),
                tokens: encoder.encode(&question.content, limit_length),
                tags: tag_ids(vocab, question),
            })
            .collect()
    }
}

/// Tag ids for a question's topic tags, in tag-list order.
fn tag_ids(vocab: &Vocabularies, question: &QuestionRecord) -> Vec<TagId> {
    question
        .topic_tags
        .iter()
        .filter_map(|tag| vocab.tags.id_of(tag))
        .collect()
}

/// Ids of corpus-resident similar questions, in annotation order.
/// References outside the corpus are dropped.
fn similar_ids(vocab: &Vocabularies, question: &QuestionRecord) -> Vec<QuestionId> {
    question
        .similar_questions
        .iter()
        .filter_map(|slug| vocab.questions.id_of(slug))
        .collect()
}

/// Distinct corpus-resident similar ids, first occurrence order.
fn distinct_similar_ids(vocab: &Vocabularies, question: &QuestionRecord) -> Vec<QuestionId> {
    let mut seen = HashSet::new();
    similar_ids(vocab, question)
        .into_iter()
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Build and validate sampling plans for every pivot with at least one
/// corpus-resident similar question.
///
/// The exclusion set is the pivot's similar set plus the pivot itself, so a
/// question is never drawn as its own negative. Each pivot's pool must cover
/// `num_negative_sample` draws per similar question; otherwise the whole run
/// is rejected here, before any record is emitted.
fn pivot_plans(
    corpus: &[QuestionRecord],
    vocab: &Vocabularies,
    num_negative_sample: usize,
) -> Result<Vec<PivotPlan>, ConvertError> {
    let total = corpus.len();
    let mut plans = Vec::new();
    for (pivot, question) in corpus.iter().enumerate() {
        let similar = distinct_similar_ids(vocab, question);
        if similar.is_empty() {
            continue;
        }
        let mut excluded: HashSet<QuestionId> = similar.iter().copied().collect();
        excluded.insert(pivot);
        let available = total - excluded.len();
        let requested = num_negative_sample * similar.len();
        if available < requested {
            return Err(ConvertError::UndersizedNegativePool {
                slug: question.slug.clone(),
                available,
                requested,
            });
        }
        plans.push(PivotPlan {
            pivot,
            similar,
            excluded,
        });
    }
    Ok(plans)
}

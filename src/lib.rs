#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Cleanup applied to raw question bodies.
pub mod clean;
/// Conversion and harvest configuration types.
pub mod config;
/// Centralized constants used across vocabularies, conversion, and harvest.
pub mod constants;
/// Conversion runs and example assembly.
pub mod convert;
/// Question records and training-example shapes.
pub mod data;
/// Token-id encoding through a built vocabulary.
pub mod encoder;
/// Reusable demo runners shared by the `demos/` binaries.
pub mod example_apps;
/// Question harvesting and stored-corpus loading.
pub mod harvest;
/// Randomized negative sampling over the known-question id space.
pub mod sampler;
/// Output sinks receiving assembled records.
pub mod sink;
/// Tokenizer seam and default word tokenizer.
pub mod tokenize;
/// Shared type aliases.
pub mod types;
/// Vocabulary construction and listing persistence.
pub mod vocab;

mod errors;

pub use config::{ConvertConfig, ConvertMode, HarvestConfig};
pub use convert::Converter;
pub use data::{IdTriple, PairExample, QuestionFeatures, QuestionRecord, SingleExample};
pub use encoder::TokenEncoder;
pub use errors::ConvertError;
pub use harvest::{ListingEntry, Spider, harvest as run_harvest, load_corpus};
pub use sampler::{DeterministicRng, NegativePool};
pub use sink::{ExampleSink, JsonLinesSink};
pub use tokenize::{Tokenize, WordTokenizer};
pub use types::{QuestionId, QuestionSlug, TagId, TagSlug, Token, WordId};
pub use vocab::{Vocabularies, Vocabulary};

//! Reusable demo runners shared by the `demos/` binaries.

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::{ConvertConfig, ConvertMode, HarvestConfig};
use crate::constants::convert::{DEFAULT_DEST_DIR, DEFAULT_NUM_NEGATIVE_SAMPLE};
use crate::constants::harvest::{BASE_URL, DEFAULT_STORE_DIR};
use crate::convert::Converter;
use crate::harvest::{Spider, harvest, load_corpus};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Normal,
    Pairwise,
    PairwiseSelfSim,
    PairwiseText,
}

impl From<ModeArg> for ConvertMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Normal => ConvertMode::Normal,
            ModeArg::Pairwise => ConvertMode::Pairwise,
            ModeArg::PairwiseSelfSim => ConvertMode::PairwiseSelfSim,
            ModeArg::PairwiseText => ConvertMode::PairwiseText,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "harvest_demo",
    disable_help_subcommand = true,
    about = "Fetch and store raw question payloads",
    long_about = "Fetch the question listing, then every question's payload via the \
                  GraphQL endpoint, storing one raw JSON file per question id."
)]
struct HarvestCli {
    #[arg(long, default_value = BASE_URL, help = "Base URL of the question service")]
    base_url: String,
    #[arg(
        long,
        value_name = "DIR",
        default_value = DEFAULT_STORE_DIR,
        help = "Directory receiving the raw payload files"
    )]
    dest: PathBuf,
    #[arg(long, help = "Fetch only the first N listed questions")]
    limit: Option<usize>,
    #[arg(
        long,
        value_name = "MILLIS",
        help = "Override the delay between requests"
    )]
    delay_ms: Option<u64>,
}

/// Run the harvest demo with CLI-style arguments (program name excluded).
pub fn run_harvest_demo(args: impl Iterator<Item = String>) -> Result<(), Box<dyn Error>> {
    let cli = HarvestCli::parse_from(std::iter::once("harvest_demo".to_string()).chain(args));
    let mut config = HarvestConfig {
        base_url: cli.base_url,
        dest: cli.dest,
        limit: cli.limit,
        ..HarvestConfig::default()
    };
    if let Some(delay_ms) = cli.delay_ms {
        config.request_delay = Duration::from_millis(delay_ms);
    }
    let spider = Spider::new(config.base_url.clone());
    let stored = harvest(&spider, &config)?;
    println!("stored {stored} question payloads under {}", config.dest.display());
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "convert_demo",
    disable_help_subcommand = true,
    about = "Convert stored question payloads into training data",
    long_about = "Load a stored payload directory, build the question/tag/word \
                  vocabularies, and write the selected mode's dataset files."
)]
struct ConvertCli {
    #[arg(
        long,
        value_name = "DIR",
        default_value = DEFAULT_STORE_DIR,
        help = "Directory holding stored question payloads"
    )]
    source: PathBuf,
    #[arg(
        long,
        value_name = "DIR",
        default_value = DEFAULT_DEST_DIR,
        help = "Destination directory for output files"
    )]
    dest: PathBuf,
    #[arg(long, value_enum, default_value_t = ModeArg::Normal, help = "Conversion mode")]
    mode: ModeArg,
    #[arg(long, help = "Max token ids kept per encoded text")]
    limit_length: Option<usize>,
    #[arg(long, help = "Process only the first N questions")]
    limit_question: Option<usize>,
    #[arg(
        long,
        default_value_t = DEFAULT_NUM_NEGATIVE_SAMPLE,
        help = "Dissimilar questions drawn per similar question"
    )]
    num_negative_sample: usize,
    #[arg(long, help = "RNG seed for reproducible sampling")]
    seed: Option<u64>,
}

/// Run the convert demo with CLI-style arguments (program name excluded).
pub fn run_convert_demo(args: impl Iterator<Item = String>) -> Result<(), Box<dyn Error>> {
    let cli = ConvertCli::parse_from(std::iter::once("convert_demo".to_string()).chain(args));
    let config = ConvertConfig {
        dest: cli.dest,
        mode: cli.mode.into(),
        limit_length: cli.limit_length,
        limit_question: cli.limit_question,
        num_negative_sample: cli.num_negative_sample,
        seed: cli.seed,
        ..ConvertConfig::default()
    };
    let corpus = load_corpus(&cli.source)?;
    let converter = Converter::new(corpus);
    converter.run(&config)?;
    println!(
        "converted {} questions into {}",
        converter.corpus_len(),
        config.dest.display()
    );
    Ok(())
}

//! Question harvesting: listing and payload fetch, storage, corpus loading.
//!
//! Ownership model:
//! - `Spider` owns the HTTP access: one listing GET plus one GraphQL POST
//!   per question slug, paced by a fixed delay.
//! - `harvest` drives a full fetch-and-store pass, writing one raw JSON file
//!   per question id.
//! - `load_corpus` turns a stored directory back into an ordered corpus.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::HarvestConfig;
use crate::constants::harvest::{
    GRAPHQL_ENDPOINT, LISTING_ENDPOINT, QUESTION_OPERATION, QUESTION_QUERY, USER_AGENT,
};
use crate::data::QuestionRecord;
use crate::errors::ConvertError;
use crate::types::QuestionSlug;

/// Summary row parsed from the question listing payload.
#[derive(Clone, Debug)]
pub struct ListingEntry {
    /// Numeric question id used to name the stored payload file.
    pub question_id: u64,
    /// Slug passed to the per-question payload query.
    pub slug: QuestionSlug,
    /// Paid-only flag from the listing row.
    pub paid_only: bool,
}

#[derive(Debug, Deserialize)]
struct RawListing {
    stat_status_pairs: Vec<RawStatPair>,
}

#[derive(Debug, Deserialize)]
struct RawStatPair {
    stat: RawStat,
    #[serde(default)]
    paid_only: bool,
}

#[derive(Debug, Deserialize)]
struct RawStat {
    question_id: u64,
    #[serde(rename = "question__title_slug")]
    title_slug: String,
}

/// Parse the raw listing payload into entries, in listing order.
pub fn parse_listing(raw: &str) -> Result<Vec<ListingEntry>, ConvertError> {
    let listing: RawListing = serde_json::from_str(raw)
        .map_err(|err| ConvertError::Listing(format!("unparseable listing payload: {err}")))?;
    Ok(listing
        .stat_status_pairs
        .into_iter()
        .map(|pair| ListingEntry {
            question_id: pair.stat.question_id,
            slug: pair.stat.title_slug,
            paid_only: pair.paid_only,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct PayloadEnvelope {
    data: PayloadData,
}

#[derive(Debug, Deserialize)]
struct PayloadData {
    question: RawQuestion,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    title_slug: String,
    /// Absent for records the service withholds (paid content).
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    topic_tags: Vec<RawTag>,
    /// JSON-encoded list of referenced questions; absent or null for
    /// records the service withholds.
    #[serde(default)]
    similar_questions: Option<String>,
    #[serde(default)]
    is_paid_only: bool,
}

#[derive(Debug, Deserialize)]
struct RawTag {
    slug: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimilarRef {
    title_slug: String,
}

/// Parse one stored per-question payload into a record.
///
/// The `similarQuestions` field arrives as a JSON string inside the payload
/// and is decoded here; an empty string means no references.
pub fn parse_question_payload(raw: &str) -> Result<QuestionRecord, ConvertError> {
    let envelope: PayloadEnvelope = serde_json::from_str(raw)?;
    let question = envelope.data.question;
    let raw_similar = question.similar_questions.unwrap_or_default();
    let similar_questions = if raw_similar.trim().is_empty() {
        Vec::new()
    } else {
        let refs: Vec<SimilarRef> = serde_json::from_str(&raw_similar)?;
        refs.into_iter().map(|sim| sim.title_slug).collect()
    };
    Ok(QuestionRecord {
        slug: question.title_slug,
        content: question.content.unwrap_or_default(),
        topic_tags: question.topic_tags.into_iter().map(|tag| tag.slug).collect(),
        similar_questions,
        is_paid_only: question.is_paid_only,
    })
}

/// Fetches raw payloads from the question service.
pub struct Spider {
    base_url: String,
}

impl Spider {
    /// Create a spider against `base_url` (trailing slash expected).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Fetch the raw question listing.
    pub fn fetch_question_list(&self) -> Result<String, ConvertError> {
        let endpoint = format!("{}{}", self.base_url, LISTING_ENDPOINT);
        let response = ureq::get(&endpoint)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|err| ConvertError::Listing(format!("GET {endpoint} failed: {err}")))?;
        read_body(response).map_err(|err| ConvertError::Listing(err.to_string()))
    }

    /// Fetch one question's raw payload via the templated GraphQL query.
    pub fn fetch_question_detail(&self, slug: &str) -> Result<String, ConvertError> {
        let endpoint = format!("{}{}", self.base_url, GRAPHQL_ENDPOINT);
        let body = json!({
            "operationName": QUESTION_OPERATION,
            "variables": { "titleSlug": slug },
            "query": QUESTION_QUERY,
        })
        .to_string();
        let response = ureq::post(&endpoint)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .send(body.as_bytes())
            .map_err(|err| ConvertError::Fetch {
                slug: slug.to_string(),
                reason: format!("POST {endpoint} failed: {err}"),
            })?;
        read_body(response).map_err(|err| ConvertError::Fetch {
            slug: slug.to_string(),
            reason: err.to_string(),
        })
    }
}

fn read_body(response: ureq::http::Response<ureq::Body>) -> Result<String, ConvertError> {
    use std::io::Read;

    let mut body = String::new();
    response
        .into_body()
        .into_reader()
        .read_to_string(&mut body)?;
    Ok(body)
}

/// Fetch the listing and every question payload into `config.dest`.
///
/// The raw listing is stored first, then one file per question named
/// `<question_id>.json`, with `config.request_delay` between requests.
/// Returns the number of stored question payloads.
pub fn harvest(spider: &Spider, config: &HarvestConfig) -> Result<usize, ConvertError> {
    fs::create_dir_all(&config.dest)?;
    let raw_listing = spider.fetch_question_list()?;
    fs::write(config.dest.join(&config.listing_filename), &raw_listing)?;
    let entries = parse_listing(&raw_listing)?;
    let total = config
        .limit
        .map_or(entries.len(), |limit| limit.min(entries.len()));
    for (idx, entry) in entries.iter().take(total).enumerate() {
        info!(current = idx + 1, total, slug = %entry.slug, "fetching question");
        let payload = spider.fetch_question_detail(&entry.slug)?;
        fs::write(
            config.dest.join(format!("{}.json", entry.question_id)),
            &payload,
        )?;
        thread::sleep(config.request_delay);
    }
    Ok(total)
}

/// Load stored payloads into an ordered corpus.
///
/// Files are read in ascending numeric file-name order (the stored question
/// id), which fixes the corpus processing order across runs. Paid-only
/// records are dropped, unparseable payloads are skipped with a warning, and
/// non-payload files (the stored listing among them) are ignored.
pub fn load_corpus(dir: &Path) -> Result<Vec<QuestionRecord>, ConvertError> {
    let mut stored: Vec<(u64, PathBuf)> = Vec::new();
    for entry in WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
    {
        let path = entry.path();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if !is_json {
            continue;
        }
        let Some(question_id) = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.parse::<u64>().ok())
        else {
            continue;
        };
        stored.push((question_id, path.to_path_buf()));
    }
    stored.sort_by_key(|(question_id, _)| *question_id);

    let mut corpus = Vec::with_capacity(stored.len());
    for (_, path) in stored {
        let raw = fs::read_to_string(&path).map_err(|err| ConvertError::Payload {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        match parse_question_payload(&raw) {
            Ok(record) if record.is_paid_only => {
                debug!(slug = %record.slug, "dropping paid-only question");
            }
            Ok(record) => corpus.push(record),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable question payload");
            }
        }
    }
    info!(questions = corpus.len(), "corpus loaded");
    Ok(corpus)
}

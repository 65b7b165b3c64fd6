/// Constants used by vocabulary construction and sentinel ids.
pub mod vocab {
    /// Padding sentinel key shared by the tag and word vocabularies.
    pub const PAD_TOKEN: &str = "<PAD>";
    /// Unknown-token sentinel key used by the word vocabulary.
    pub const UNK_TOKEN: &str = "<UNK>";
    /// Id reserved for the padding sentinel.
    pub const PAD_ID: usize = 0;
    /// Id reserved for the unknown-token sentinel.
    pub const UNK_ID: usize = 1;
}

/// Constants used by conversion runs and output file naming.
pub mod convert {
    /// Default number of dissimilar questions drawn per similar question.
    pub const DEFAULT_NUM_NEGATIVE_SAMPLE: usize = 5;
    /// Default file name for the question vocabulary listing.
    pub const QUESTION_LIST_FILENAME: &str = "question_list.txt";
    /// Default file name for the tag vocabulary listing.
    pub const TAG_LIST_FILENAME: &str = "tag_list.txt";
    /// Default file name for the word vocabulary listing.
    pub const WORD_LIST_FILENAME: &str = "word_list.txt";
    /// Default file name for the structured dataset.
    pub const DATASET_FILENAME: &str = "dataset.jsonl";
    /// Default file name for the pairwise-text corpus file.
    pub const QUESTION_TEXT_FILENAME: &str = "question_text.txt";
    /// Default file name for the pairwise-text relation file.
    pub const RELATIONS_FILENAME: &str = "relations.txt";
    /// Default destination directory for conversion output.
    pub const DEFAULT_DEST_DIR: &str = "result";
}

/// Constants used by the harvest layer: endpoints, pacing, stored-file naming.
pub mod harvest {
    use std::time::Duration;

    /// Base URL of the question service.
    pub const BASE_URL: &str = "https://leetcode.com/";
    /// Listing endpoint path returning one summary row per question.
    pub const LISTING_ENDPOINT: &str = "api/problems/all/";
    /// GraphQL endpoint path serving per-question payloads.
    pub const GRAPHQL_ENDPOINT: &str = "graphql/";
    /// Fixed delay between consecutive requests.
    pub const REQUEST_DELAY: Duration = Duration::from_millis(500);
    /// User agent presented to the question service.
    pub const USER_AGENT: &str =
        "Mozilla/5.0 (X11; Linux x86_64) Chrome/73.0.3683.75 Safari/537.36";
    /// Default file name for the stored raw listing payload.
    pub const LISTING_FILENAME: &str = "question_list.json";
    /// Default directory for stored per-question payloads.
    pub const DEFAULT_STORE_DIR: &str = "stored";
    /// GraphQL operation name for per-question payload requests.
    pub const QUESTION_OPERATION: &str = "questionData";
    /// GraphQL query document requesting the fields the converter consumes.
    pub const QUESTION_QUERY: &str = "\
query questionData($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    titleSlug
    content
    isPaidOnly
    similarQuestions
    topicTags {
      slug
    }
  }
}";
}

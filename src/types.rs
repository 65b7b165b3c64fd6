/// URL-safe unique identifier for a question.
/// Example: `two-sum`
pub type QuestionSlug = String;
/// Slug for a topic tag attached to questions.
/// Examples: `array`, `dynamic-programming`
pub type TagSlug = String;
/// Lowercased text token produced by the tokenizer.
/// Examples: `given`, `array`, `integers`
pub type Token = String;
/// Dense id assigned to a question by corpus order (starts at 0).
pub type QuestionId = usize;
/// Dense id assigned to a tag after the padding sentinel (real tags start at 1).
pub type TagId = usize;
/// Dense id assigned to a word after the sentinel block (real words start at 2).
pub type WordId = usize;

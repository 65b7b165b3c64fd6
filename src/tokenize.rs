//! Tokenizer seam used by vocabulary construction and encoding.

use crate::types::Token;

/// Splits cleaned text into an ordered token sequence.
///
/// The tokenization algorithm is a replaceable dependency; the vocabulary
/// builder and encoder only require that the same implementation is used for
/// both so every token seen at build time maps at encode time.
pub trait Tokenize {
    /// Tokenize `text`, preserving order of appearance.
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// Default tokenizer emitting maximal alphanumeric runs.
///
/// Punctuation and whitespace act as separators and are not emitted. Case is
/// preserved; callers lowercase where their id space requires it.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordTokenizer;

impl Tokenize for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        for ch in text.chars() {
            if ch.is_alphanumeric() {
                current.push(ch);
            } else if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            tokens.push(current);
        }
        tokens
    }
}

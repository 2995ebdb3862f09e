//! Measure text length in model tokens.

/// Count the tokens a model would see for a piece of text.
///
/// The exact tokenizer is a deployment choice; the chunker only needs a
/// consistent count.
pub trait TokenCounter: Send + Sync {
    /// Return the number of tokens in `text`.
    fn count_tokens(&self, text: &str) -> usize;
}

/// Approximate tokenizer that counts whitespace-separated words.
///
/// Subword tokenizers report at least as many tokens as there are words for
/// ordinary prose, so budgets computed with this counter should leave some
/// headroom.
///
/// # Examples
///
/// ```
/// use review_core::{TokenCounter, WhitespaceTokenCounter};
///
/// assert_eq!(WhitespaceTokenCounter.count_tokens("great  food here"), 3);
/// assert_eq!(WhitespaceTokenCounter.count_tokens("   "), 0);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceTokenCounter;

impl TokenCounter for WhitespaceTokenCounter {
    fn count_tokens(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

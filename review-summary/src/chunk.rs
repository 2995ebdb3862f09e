//! Greedy token-bounded chunking of review texts.

use log::debug;
use review_core::TokenCounter;

use crate::ChunkError;

/// Separator placed between member texts in [`Chunk::text`].
pub const MEMBER_SEPARATOR: &str = " ";

/// An ordered group of review texts that fits one model request.
///
/// The token count is the sum of the members' individual counts. It stays
/// within the chunking budget unless the chunk holds a single text that is
/// larger than the budget on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    members: Vec<String>,
    text: String,
    token_count: usize,
}

impl Chunk {
    fn from_members(members: Vec<String>, token_count: usize) -> Self {
        let text = members.join(MEMBER_SEPARATOR);
        Self {
            members,
            text,
            token_count,
        }
    }

    /// Member texts in input order.
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Members joined by single spaces, as sent to the summariser.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Total tokens of the members.
    #[must_use]
    pub const fn token_count(&self) -> usize {
        self.token_count
    }

    /// Consume the chunk and return its members.
    #[must_use]
    pub fn into_members(self) -> Vec<String> {
        self.members
    }
}

/// Partition `texts` into consecutive chunks of at most `max_tokens` tokens.
///
/// The running chunk is closed whenever adding the next text would exceed
/// the budget. A text larger than the budget on its own becomes a
/// single-member chunk instead of being split or dropped. Concatenating the
/// members of all chunks reproduces the input order exactly.
///
/// # Errors
/// Returns [`ChunkError::InvalidConfiguration`] when `max_tokens` is zero.
///
/// # Examples
///
/// ```
/// use review_core::WhitespaceTokenCounter;
/// use review_summary::chunk;
///
/// let texts = ["good food", "slow service", "lovely"];
/// let chunks = chunk(texts, 4, &WhitespaceTokenCounter).expect("valid budget");
/// let joined: Vec<&str> = chunks.iter().map(|chunk| chunk.text()).collect();
/// assert_eq!(joined, ["good food slow service", "lovely"]);
/// ```
pub fn chunk<I, C>(texts: I, max_tokens: usize, counter: &C) -> Result<Vec<Chunk>, ChunkError>
where
    I: IntoIterator,
    I::Item: Into<String>,
    C: TokenCounter + ?Sized,
{
    if max_tokens == 0 {
        return Err(ChunkError::InvalidConfiguration {
            reason: "max_tokens must be greater than zero",
        });
    }

    let mut chunks = Vec::new();
    let mut members: Vec<String> = Vec::new();
    let mut running = 0_usize;
    for item in texts {
        let text: String = item.into();
        let tokens = counter.count_tokens(&text);
        if !members.is_empty() && running.saturating_add(tokens) > max_tokens {
            debug!(
                "closing chunk {} with {} texts and {running} tokens",
                chunks.len(),
                members.len()
            );
            chunks.push(Chunk::from_members(std::mem::take(&mut members), running));
            running = 0;
        }
        running = running.saturating_add(tokens);
        members.push(text);
    }
    if !members.is_empty() {
        debug!(
            "closing chunk {} with {} texts and {running} tokens",
            chunks.len(),
            members.len()
        );
        chunks.push(Chunk::from_members(members, running));
    }
    Ok(chunks)
}

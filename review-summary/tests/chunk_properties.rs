//! Property-based tests for the token-bounded chunker.
//!
//! # Invariants tested
//!
//! - **Round trip:** concatenating chunk members reproduces the input.
//! - **Budget:** multi-member chunks never exceed the token budget.
//! - **Greediness:** no chunk could absorb the first member of its successor.

use proptest::prelude::*;
use review_core::{TokenCounter, WhitespaceTokenCounter};
use review_summary::{Chunk, chunk};

fn texts_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::collection::vec("[a-z]{1,6}", 0..8).prop_map(|words| words.join(" ")),
        0..40,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: members of all chunks, in order, equal the input texts.
    #[test]
    fn members_round_trip(texts in texts_strategy(), budget in 1_usize..20) {
        let chunks = chunk(texts.iter(), budget, &WhitespaceTokenCounter)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let members: Vec<String> = chunks.into_iter().flat_map(Chunk::into_members).collect();
        prop_assert_eq!(members, texts);
    }

    /// Property: only single-member chunks may exceed the budget, and counts add up.
    #[test]
    fn chunks_respect_budget(texts in texts_strategy(), budget in 1_usize..20) {
        let chunks = chunk(texts.iter(), budget, &WhitespaceTokenCounter)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        for piece in &chunks {
            prop_assert!(!piece.members().is_empty());
            let sum: usize = piece
                .members()
                .iter()
                .map(|text| WhitespaceTokenCounter.count_tokens(text))
                .sum();
            prop_assert_eq!(sum, piece.token_count());
            if piece.members().len() > 1 {
                prop_assert!(piece.token_count() <= budget);
            }
        }
    }

    /// Property: a chunk is only closed when the next text would not fit.
    #[test]
    fn chunks_are_greedy(texts in texts_strategy(), budget in 1_usize..20) {
        let chunks = chunk(texts.iter(), budget, &WhitespaceTokenCounter)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        for pair in chunks.windows(2) {
            let [current, next] = pair else { continue };
            let head = next
                .members()
                .first()
                .map_or(0, |text| WhitespaceTokenCounter.count_tokens(text));
            prop_assert!(current.token_count() + head > budget);
        }
    }
}

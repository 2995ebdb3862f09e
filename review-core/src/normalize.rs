//! Clean review text before scoring or summarisation.
//!
//! Cleaning strips every character that is not an ASCII letter, ASCII digit
//! or whitespace. Reviews left without a single ASCII letter carry nothing a
//! scorer or summariser can use and are dropped whole; a review is never kept
//! half-cleaned.

use crate::Review;

/// Clean a single review body.
///
/// Returns `None` when the cleaned text has no ASCII letters.
///
/// # Examples
///
/// ```
/// use review_core::normalize_text;
///
/// assert_eq!(normalize_text("Great food!").as_deref(), Some("Great food"));
/// assert_eq!(normalize_text("1234 :)"), None);
/// ```
#[must_use]
pub fn normalize_text(text: &str) -> Option<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    cleaned
        .chars()
        .any(|c| c.is_ascii_alphabetic())
        .then_some(cleaned)
}

/// Clean every review and drop those without alphabetic content.
///
/// The input is left untouched; callers receive fresh reviews in the original
/// order.
///
/// # Examples
///
/// ```
/// use review_core::{Review, normalize};
///
/// let reviews = vec![Review::new("Great food!"), Review::new("1234")];
/// let kept = normalize(&reviews);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].text, "Great food");
/// assert_eq!(reviews[0].text, "Great food!");
/// ```
#[must_use]
pub fn normalize(reviews: &[Review]) -> Vec<Review> {
    reviews
        .iter()
        .filter_map(|review| {
            normalize_text(&review.text).map(|text| Review {
                text,
                ..review.clone()
            })
        })
        .collect()
}

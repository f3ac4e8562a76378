//! HTML entity decoding for question text.
//!
//! The question API escapes quotes, ampersands and accented letters as HTML
//! entities. Answers are compared after decoding, so both the correct answer
//! and the player's choice go through [`decode_html_entities`].

/// Decode named and numeric HTML entities.
///
/// Unknown or malformed entities are left as-is.
pub fn decode_html_entities(input: &str) -> String {
    html_escape::decode_html_entities(input).into_owned()
}

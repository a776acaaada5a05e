//! Character-based text helpers shared by the stages.
//!
//! All limits in the pipeline contracts are character counts, not byte
//! counts, so slicing must never land inside a multi-byte sequence.

/// Truncates to at most `max` characters.
pub(crate) fn clamp_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}

/// Splits into fixed-width character chunks, keeping at most `max_chunks`.
pub(crate) fn chunk_chars(text: &str, width: usize, max_chunks: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width)
        .take(max_chunks)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

//! Splitting long text into thread-sized chunks
//!
//! Turns an arbitrary input string into an ordered sequence of
//! bounded-length [`Chunk`]s, each carrying its position in the sequence.
//! The output is a pure function of `(text, limit)`: words are split on
//! whitespace, accumulated greedily, and numbered with a `(i/n)` label
//! when the text needs more than one chunk.

use tracing::warn;

use crate::types::Chunk;

/// Characters reserved for the `"... "` marker inserted before a numbering
/// label when the label would not fit on the chunk.
const ELLIPSIS_RESERVE: usize = 4;

/// Split `text` into chunks of at most `limit` characters.
///
/// Words are accumulated greedily: a word joins the current chunk when the
/// chunk, a separating space, and the word still fit within `limit`;
/// otherwise the chunk is closed and the word starts the next one. When
/// the result has more than one chunk, each chunk gets a trailing
/// `(i/n)` label (1-indexed); a chunk whose label would push it past the
/// limit is truncated so that `"... (i/n)"` ends exactly at the limit.
///
/// Lengths are counted in Unicode scalar values, the same way platform
/// character limits are enforced elsewhere in this crate.
///
/// Known limitation: a single word longer than `limit` is not split
/// mid-word. An unnumbered chunk containing such a word exceeds the limit
/// and is logged as a warning; callers that must stay under the limit see
/// the overflow rejected later by platform validation.
pub fn split(text: &str, limit: usize) -> Vec<Chunk> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let mut bodies: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in words {
        let word_len = word.chars().count();

        if word_len > limit {
            warn!(
                word_chars = word_len,
                limit, "word exceeds chunk limit and will not be split mid-word"
            );
        }

        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len > limit {
            bodies.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        } else {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        }
    }
    bodies.push(current);

    let total = bodies.len();
    if total == 1 {
        let text = bodies.into_iter().next().unwrap_or_default();
        return vec![Chunk {
            index: 0,
            total: 1,
            text,
        }];
    }

    bodies
        .into_iter()
        .enumerate()
        .map(|(index, body)| Chunk {
            index,
            total,
            text: number_chunk(body, index, total, limit),
        })
        .collect()
}

/// Append the `(i/n)` label to a chunk body, truncating the body when the
/// label would not fit within `limit`.
fn number_chunk(body: String, index: usize, total: usize, limit: usize) -> String {
    let label = format!("({}/{})", index + 1, total);
    let label_len = label.chars().count();
    let body_len = body.chars().count();

    if body_len + 1 + label_len <= limit {
        return format!("{} {}", body, label);
    }

    // Keep enough of the body that "... " plus the label ends at the limit.
    // Saturates to an empty body at degenerate limits where the label alone
    // cannot fit.
    let keep = limit.saturating_sub(label_len + ELLIPSIS_RESERVE);
    let truncated: String = body.chars().take(keep).collect();
    format!("{}... {}", truncated, label)
}

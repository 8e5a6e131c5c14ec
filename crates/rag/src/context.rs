//! Bounded context assembly.
//!
//! Converts ranked search hits into a single prompt-ready text block. The
//! output is deterministic given identical, identically-ordered inputs.

use crate::types::SearchHit;

/// Separator placed between context blocks.
const BLOCK_SEPARATOR: &str = "\n---\n";

/// Assemble the first `max_chunks` hits into a context block.
///
/// Each hit contributes one block tagged with its document id and score at
/// three decimal places; text beyond `char_cap` characters is dropped.
pub fn assemble(hits: &[SearchHit], max_chunks: usize, char_cap: usize) -> String {
    hits.iter()
        .take(max_chunks)
        .map(|hit| {
            format!(
                "[Doc {}](score={:.3})\n{}\n",
                hit.document.doc_id,
                hit.score,
                truncate_chars(&hit.document.text, char_cap)
            )
        })
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Truncate to at most `cap` characters, respecting char boundaries.
fn truncate_chars(text: &str, cap: usize) -> &str {
    match text.char_indices().nth(cap) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

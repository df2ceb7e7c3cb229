//! Test utilities associated with chunks.

use bzz_api::Chunk;

use crate::id::digest_key;

/// A chunk holding `text` behind a size prefix, keyed by the digest
/// of the text.
pub fn chunk_from_text(text: &str) -> Chunk {
    Chunk::from_body(digest_key(text.as_bytes()), text.as_bytes())
}

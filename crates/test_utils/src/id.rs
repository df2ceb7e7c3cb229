//! Test utilities associated with chunk keys.

use bytes::Bytes;
use bzz_api::{id::Id, id::KEY_LEN, ChunkKey};

use crate::random_bytes;

/// Create a random id.
pub fn random_id() -> Id {
    Id(Bytes::from(random_bytes(KEY_LEN as u16)))
}

/// Create a random chunk key.
pub fn random_chunk_key() -> ChunkKey {
    ChunkKey(random_id())
}

/// The sha256 digest of `data` as a chunk key.
pub fn digest_key(data: &[u8]) -> ChunkKey {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(data);
    ChunkKey::from(Bytes::from(hasher.finalize().to_vec()))
}

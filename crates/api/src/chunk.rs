//! Chunk types.

use crate::*;
use bytes::{BufMut, Bytes, BytesMut};

/// Number of leading payload bytes holding the little-endian encoded
/// logical size of a chunk.
pub const SIZE_PREFIX_LEN: usize = 8;

/// A fulfilled unit of content-addressed data.
///
/// A chunk only exists once its data is known. Requests that are still
/// waiting for data are represented by a pending
/// [ChunkHandle](crate::registry::ChunkHandle) instead, so the size of a
/// chunk can never be read before it has been fulfilled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    key: ChunkKey,
    payload: Bytes,
}

impl Chunk {
    /// Construct a chunk from a key and a raw payload.
    ///
    /// The payload must start with the [SIZE_PREFIX_LEN] byte size prefix.
    /// It may be longer than the size it declares.
    pub fn new(key: ChunkKey, payload: Bytes) -> BzzResult<Self> {
        if payload.len() < SIZE_PREFIX_LEN {
            return Err(BzzError::Malformed {
                key,
                len: payload.len(),
            });
        }
        Ok(Self { key, payload })
    }

    /// Construct a chunk whose payload is the size prefix for `body`
    /// followed by `body` itself.
    pub fn from_body(key: ChunkKey, body: &[u8]) -> Self {
        let mut payload = BytesMut::with_capacity(SIZE_PREFIX_LEN + body.len());
        payload.put_u64_le(body.len() as u64);
        payload.put_slice(body);
        Self {
            key,
            payload: payload.freeze(),
        }
    }

    /// The key this chunk was stored under.
    pub fn key(&self) -> &ChunkKey {
        &self.key
    }

    /// The full payload, including the size prefix.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// The payload following the size prefix.
    pub fn body(&self) -> Bytes {
        self.payload.slice(SIZE_PREFIX_LEN..)
    }

    /// The logical size of the chunk, decoded from the size prefix.
    pub fn size(&self) -> u64 {
        let mut prefix = [0_u8; SIZE_PREFIX_LEN];
        prefix.copy_from_slice(&self.payload[..SIZE_PREFIX_LEN]);
        u64::from_le_bytes(prefix)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn key() -> ChunkKey {
        ChunkKey::from(Bytes::from_static(b"hello-world"))
    }

    #[test]
    fn size_is_decoded_little_endian() {
        let mut payload = 11_u64.to_le_bytes().to_vec();
        payload.extend_from_slice(b"hello world");
        let chunk = Chunk::new(key(), payload.into()).unwrap();

        assert_eq!(11, chunk.size());
        assert_eq!(&b"hello world"[..], &chunk.body()[..]);
    }

    #[test]
    fn size_may_differ_from_body_length() {
        let mut payload = 4096_u64.to_le_bytes().to_vec();
        payload.extend_from_slice(&[7; 64]);
        let chunk = Chunk::new(key(), payload.into()).unwrap();

        assert_eq!(4096, chunk.size());
        assert_eq!(64, chunk.body().len());
    }

    #[test]
    fn from_body_writes_prefix() {
        let chunk = Chunk::from_body(key(), b"hello world");

        assert_eq!(11, chunk.size());
        assert_eq!(19, chunk.payload().len());
        assert_eq!(&11_u64.to_le_bytes()[..], &chunk.payload()[..8]);
    }

    #[test]
    fn prefix_only_payload_is_empty_chunk() {
        let chunk = Chunk::new(key(), Bytes::from(vec![0; 8])).unwrap();

        assert_eq!(0, chunk.size());
        assert!(chunk.body().is_empty());
    }

    #[test]
    fn short_payload_is_rejected() {
        match Chunk::new(key(), Bytes::from_static(b"short")) {
            Err(BzzError::Malformed { len, .. }) => assert_eq!(5, len),
            oth => panic!("unexpected {oth:?}"),
        }
    }
}

#![deny(missing_docs)]
//! Bzz API contains the chunk store module traits and the basic types
//! required to define the api of those traits.
//!
//! The central capability is [ChunkStore]: get a chunk by key, put a chunk,
//! close the store. A network-backed chunk store is composed of two
//! collaborators:
//!
//! - A [Registry] tracking whether each key is pending or fulfilled, with an
//!   atomic get-or-create primitive.
//! - A [Retriever] that starts an out-of-band fetch for a pending chunk.
//!
//! If you want the implementations, please see the bzz_core crate.

/// Boxed future type.
pub type BoxFut<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

pub(crate) mod serde_bytes_base64 {
    pub fn serialize<S>(
        b: &bytes::Bytes,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use base64::prelude::*;
        serializer.serialize_str(&BASE64_URL_SAFE_NO_PAD.encode(b))
    }

    pub fn deserialize<'de, D, T: From<bytes::Bytes>>(
        deserializer: D,
    ) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use base64::prelude::*;
        let s: &'de str = serde::Deserialize::deserialize(deserializer)?;
        BASE64_URL_SAFE_NO_PAD
            .decode(s)
            .map(|v| bytes::Bytes::copy_from_slice(&v).into())
            .map_err(serde::de::Error::custom)
    }
}

pub mod builder;
pub mod config;

mod error;
pub use error::*;

pub mod id;
pub use id::ChunkKey;

pub mod chunk;
pub use chunk::Chunk;

pub mod completion;

pub mod chunk_store;
pub use chunk_store::*;

pub mod registry;
pub use registry::*;

pub mod retriever;
pub use retriever::*;

#![deny(missing_docs)]
//! Bzz core modules: the network-backed chunk store coordinator and the
//! in-memory collaborators it is tested with.
//!
//! - [factories::NetStore] resolves chunks from a registry first and
//!   triggers a single network retrieval per missing key, bounded by a
//!   search timeout.
//! - [factories::MemRegistry] is a memory-based registry that is also
//!   usable as a local-only chunk store.
//! - [factories::MemRetriever] simulates the network inside the process.

use bzz_api::{builder::Builder, config::Config};

/// Construct a default test builder.
///
/// - `registry` - The default registry is [factories::MemRegistryFactory].
/// - `retriever` - The default retriever is [factories::MemRetrieverFactory]
///                 over a fresh, empty [factories::MemNetwork].
///                 Note: you will want to provide your own retriever to
///                 reach a real network.
/// - `chunk_store` - The default chunk store is
///                   [factories::CoreNetStoreFactory].
pub fn default_test_builder() -> Builder {
    Builder {
        config: Config::default(),
        registry: factories::MemRegistryFactory::create(),
        retriever: factories::MemRetrieverFactory::create(),
        chunk_store: factories::CoreNetStoreFactory::create(),
    }
}

pub mod factories;

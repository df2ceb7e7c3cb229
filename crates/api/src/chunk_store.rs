//! Chunk store related types.

use crate::builder::Builder;
use crate::config::Config;
use crate::*;
use std::sync::Arc;

/// The capability shared by every chunk store backend.
///
/// Backends are interchangeable: a purely local store and a
/// network-backed coordinator both implement this trait.
pub trait ChunkStore: 'static + Send + Sync + std::fmt::Debug {
    /// Get a chunk by key.
    fn get(&self, key: ChunkKey) -> BoxFut<'_, BzzResult<Chunk>>;

    /// Store a chunk, fulfilling any pending request for its key.
    fn put(&self, chunk: Chunk) -> BoxFut<'_, ()>;

    /// Release any resources held by the store.
    fn close(&self) -> BoxFut<'_, ()>;
}

/// Trait-object [ChunkStore].
pub type DynChunkStore = Arc<dyn ChunkStore>;

/// A factory for constructing [ChunkStore] instances.
pub trait ChunkStoreFactory: 'static + Send + Sync + std::fmt::Debug {
    /// Help the builder construct a default config from the chosen
    /// module factories.
    fn default_config(&self, config: &Config) -> BzzResult<()>;

    /// Construct a chunk store on top of a registry and a retriever.
    fn create(
        &self,
        builder: Arc<Builder>,
        registry: DynRegistry,
        retriever: DynRetriever,
    ) -> BoxFut<'static, BzzResult<DynChunkStore>>;
}

/// Trait-object [ChunkStoreFactory].
pub type DynChunkStoreFactory = Arc<dyn ChunkStoreFactory>;

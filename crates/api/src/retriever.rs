//! Retriever related types.

use crate::builder::Builder;
use crate::config::Config;
use crate::*;
use std::sync::Arc;

/// Represents the ability to fetch chunks from the network.
pub trait Retriever: 'static + Send + Sync + std::fmt::Debug {
    /// Start fetching the chunk behind a pending handle.
    ///
    /// A successful return only means the request is underway. The data
    /// arrives later by way of [Registry::put] (directly, or through a
    /// chunk store's put), which resolves the handle's completion signal.
    ///
    /// Return an error if the fetch could not be initiated or failed
    /// outright. Implementations should use [BzzError::retrieval] so
    /// callers can tell failed fetches apart from timeouts.
    fn retrieve(&self, handle: ChunkHandle) -> BoxFut<'_, BzzResult<()>>;
}

/// Trait-object [Retriever].
pub type DynRetriever = Arc<dyn Retriever>;

/// A factory for constructing [Retriever] instances.
pub trait RetrieverFactory: 'static + Send + Sync + std::fmt::Debug {
    /// Help the builder construct a default config from the chosen
    /// module factories.
    fn default_config(&self, config: &Config) -> BzzResult<()>;

    /// Construct a retriever instance delivering into `registry`.
    fn create(
        &self,
        builder: Arc<Builder>,
        registry: DynRegistry,
    ) -> BoxFut<'static, BzzResult<DynRetriever>>;
}

/// Trait-object [RetrieverFactory].
pub type DynRetrieverFactory = Arc<dyn RetrieverFactory>;

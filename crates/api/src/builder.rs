//! Builder-related types.

use crate::*;
use std::sync::Arc;

/// The general bzz builder.
/// This contains both configuration and factory instances,
/// allowing construction of runtime module instances.
#[derive(Debug)]
pub struct Builder {
    /// The module configuration to be used when building modules.
    /// This can be loaded from disk or modified before freezing the builder.
    pub config: crate::config::Config,

    /// The [registry::RegistryFactory] to be used for creating
    /// [registry::Registry] instances.
    pub registry: registry::DynRegistryFactory,

    /// The [retriever::RetrieverFactory] to be used for creating
    /// [retriever::Retriever] instances.
    pub retriever: retriever::DynRetrieverFactory,

    /// The [chunk_store::ChunkStoreFactory] to be used for creating
    /// [chunk_store::ChunkStore] instances.
    pub chunk_store: chunk_store::DynChunkStoreFactory,
}

/// The modules produced by [Builder::create_chunk_store].
#[derive(Debug, Clone)]
pub struct BuiltStore {
    /// The registry backing the chunk store.
    pub registry: DynRegistry,

    /// The retriever the chunk store triggers for missing chunks.
    pub retriever: DynRetriever,

    /// The chunk store itself.
    pub chunk_store: DynChunkStore,
}

impl Builder {
    /// Construct a default config given the configured module factories.
    /// Note, this should be called before freezing the Builder instance
    /// in an Arc<>.
    pub fn with_default_config(self) -> BzzResult<Self> {
        {
            let Self {
                config,
                registry,
                retriever,
                chunk_store,
            } = &self;

            registry.default_config(config)?;
            retriever.default_config(config)?;
            chunk_store.default_config(config)?;
        }

        Ok(self)
    }

    /// Freeze the builder so modules can be created from it.
    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Create a registry, a retriever delivering into that registry and
    /// a chunk store composing the two.
    pub async fn create_chunk_store(self: Arc<Self>) -> BzzResult<BuiltStore> {
        let registry = self.registry.create(self.clone()).await?;
        let retriever = self
            .retriever
            .create(self.clone(), registry.clone())
            .await?;
        let chunk_store = self
            .chunk_store
            .create(self.clone(), registry.clone(), retriever.clone())
            .await?;

        Ok(BuiltStore {
            registry,
            retriever,
            chunk_store,
        })
    }
}

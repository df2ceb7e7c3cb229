//! NetStore is the bzz chunk store module that fronts a registry with
//! network retrieval.
//!
//! It assumes two chunk sources: the local [Registry] and the network,
//! reached through a [Retriever]. Access through the network blocks, but
//! only up to a fixed search timeout.
//!
//! ### Get
//!
//! - Atomically get or create the registry entry for the key.
//! - If the entry is fulfilled, return the chunk. No timeout applies and
//!   no retrieval is started.
//! - If this call created the entry, it alone invokes the retriever.
//!   The retrieval runs in a spawned task, so it finishes even if that
//!   caller stops waiting. If the retriever fails, the entry is abandoned:
//!   it is removed from the registry and everybody waiting on it gets the
//!   retriever's error.
//! - Wait for the entry's completion signal, up to the search timeout.
//!   On timeout the entry stays pending, so a late delivery still lands.
//!
//! ### Put
//!
//! - Forward to the registry, which fulfills the entry and releases
//!   all waiters.
//!
//! NetStore itself holds no mutable state. It can be shared between any
//! number of tasks.

use bzz_api::builder::Builder;
use bzz_api::config::Config;
use bzz_api::*;
use std::sync::Arc;


/// NetStore configuration types.
pub mod config {
    /// Configuration parameters for [CoreNetStoreFactory](super::CoreNetStoreFactory).
    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct NetStoreConfig {
        /// How long a get waits for a pending chunk, in milliseconds.
        ///
        /// Default: 3000.
        pub search_timeout_ms: u32,
    }

    impl Default for NetStoreConfig {
        fn default() -> Self {
            Self {
                search_timeout_ms: 3000,
            }
        }
    }

    impl NetStoreConfig {
        /// Get the search timeout as a [std::time::Duration].
        pub fn search_timeout(&self) -> std::time::Duration {
            std::time::Duration::from_millis(self.search_timeout_ms as u64)
        }
    }

    /// Module-level configuration for NetStore.
    #[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct NetStoreModConfig {
        /// NetStore configuration.
        pub net_store: NetStoreConfig,
    }

    impl bzz_api::config::ModConfig for NetStoreModConfig {}
}

pub use config::*;

/// A production-ready network-backed chunk store factory.
#[derive(Debug)]
pub struct CoreNetStoreFactory {}

impl CoreNetStoreFactory {
    /// Construct a new CoreNetStoreFactory.
    pub fn create() -> DynChunkStoreFactory {
        Arc::new(Self {})
    }
}

impl ChunkStoreFactory for CoreNetStoreFactory {
    fn default_config(&self, config: &Config) -> BzzResult<()> {
        config.set_module_config(&NetStoreModConfig::default())
    }

    fn create(
        &self,
        builder: Arc<Builder>,
        registry: DynRegistry,
        retriever: DynRetriever,
    ) -> BoxFut<'static, BzzResult<DynChunkStore>> {
        Box::pin(async move {
            let config: NetStoreModConfig =
                builder.config.get_module_config()?;
            let out: DynChunkStore =
                Arc::new(NetStore::new(config.net_store, registry, retriever));
            Ok(out)
        })
    }
}

/// The chunk access coordinator.
#[derive(Debug)]
pub struct NetStore {
    config: NetStoreConfig,
    registry: DynRegistry,
    retriever: DynRetriever,
}

impl NetStore {
    /// Construct a NetStore over a registry and a retriever.
    pub fn new(
        config: NetStoreConfig,
        registry: DynRegistry,
        retriever: DynRetriever,
    ) -> Self {
        Self {
            config,
            registry,
            retriever,
        }
    }

    /// How long a get waits for a pending chunk.
    pub fn search_timeout(&self) -> std::time::Duration {
        self.config.search_timeout()
    }

    /// Run the retriever for a freshly created entry.
    ///
    /// The retrieval runs in its own task. If the caller stops waiting,
    /// the request still either completes or is abandoned, so the entry
    /// never stays pending without a fetch behind it.
    async fn start_retrieval(
        &self,
        handle: ChunkHandle,
        epoch: Epoch,
    ) -> BzzResult<()> {
        let key = handle.key().clone();
        let registry = self.registry.clone();
        let retriever = self.retriever.clone();

        let task = tokio::task::spawn(async move {
            let key = handle.key().clone();
            let res = retriever.retrieve(handle).await;
            if let Err(err) = &res {
                tracing::warn!("could not retrieve {}: {err}", key.log());
                registry.abandon(key, epoch, err.clone()).await;
            }
            res
        });

        match task.await {
            Ok(res) => res,
            Err(err) => {
                let err = BzzError::retrieval(key.clone(), err);
                tracing::warn!("retrieval task for {} failed: {err}", key.log());
                self.registry.abandon(key, epoch, err.clone()).await;
                Err(err)
            }
        }
    }

    async fn get_chunk(&self, key: ChunkKey) -> BzzResult<Chunk> {
        let (handle, created) = self.registry.get_or_create(key.clone()).await;

        let (epoch, signal) = match handle.state() {
            HandleState::Fulfilled(chunk) => {
                tracing::trace!(
                    "{} found locally, {} bytes",
                    key.log(),
                    chunk.payload().len()
                );
                return Ok(chunk.clone());
            }
            HandleState::Pending { epoch, signal } => (*epoch, signal.clone()),
        };

        if created {
            tracing::debug!("{} not found locally, retrieving", key.log());
            self.start_retrieval(handle, epoch).await?;
        }

        let timeout = self.search_timeout();
        match tokio::time::timeout(timeout, signal.wait()).await {
            Ok(Ok(chunk)) => {
                tracing::trace!(
                    "{} retrieved, size {}",
                    key.log(),
                    chunk.size()
                );
                Ok(chunk)
            }
            Ok(Err(err)) => Err(err),
            Err(_) => {
                tracing::trace!("{} request timed out", key.log());
                Err(BzzError::not_found(key, timeout))
            }
        }
    }
}

impl ChunkStore for NetStore {
    fn get(&self, key: ChunkKey) -> BoxFut<'_, BzzResult<Chunk>> {
        Box::pin(self.get_chunk(key))
    }

    fn put(&self, chunk: Chunk) -> BoxFut<'_, ()> {
        self.registry.put(chunk)
    }

    fn close(&self) -> BoxFut<'_, ()> {
        Box::pin(async {})
    }
}

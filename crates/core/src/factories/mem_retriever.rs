//! The in-process retriever implementation provided by bzz.
//!
//! This is NOT a production module. It is for testing only.
//! The "network" is a [MemNetwork] shared between retrievers in the same
//! process. Chunks published to it are delivered to whichever registry
//! requests them.

use bzz_api::builder::Builder;
use bzz_api::config::Config;
use bzz_api::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};


/// MemRetriever configuration types.
pub mod config {
    /// Configuration parameters for [MemRetrieverFactory](super::MemRetrieverFactory).
    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct MemRetrieverConfig {
        /// How long a request takes to be answered, in milliseconds.
        ///
        /// Default: 0.
        pub delivery_delay_ms: u32,
    }

    impl Default for MemRetrieverConfig {
        fn default() -> Self {
            Self {
                delivery_delay_ms: 0,
            }
        }
    }

    impl MemRetrieverConfig {
        /// Get the delivery delay as a [std::time::Duration].
        pub fn delivery_delay(&self) -> std::time::Duration {
            std::time::Duration::from_millis(self.delivery_delay_ms as u64)
        }
    }

    /// Module-level configuration for MemRetriever.
    #[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct MemRetrieverModConfig {
        /// MemRetriever configuration.
        pub mem_retriever: MemRetrieverConfig,
    }

    impl bzz_api::config::ModConfig for MemRetrieverModConfig {}
}

pub use config::*;

#[derive(Debug, Default)]
struct NetworkInner {
    chunks: HashMap<ChunkKey, Chunk>,
    offline: bool,
}

/// The simulated network that [MemRetriever]s fetch from.
///
/// Cloning the handle shares the network.
#[derive(Debug, Clone, Default)]
pub struct MemNetwork(Arc<Mutex<NetworkInner>>);

impl MemNetwork {
    /// Construct a new, empty, online network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a chunk available for retrieval.
    pub fn publish(&self, chunk: Chunk) {
        self.0
            .lock()
            .unwrap()
            .chunks
            .insert(chunk.key().clone(), chunk);
    }

    /// Take the network offline (or back online). Retrievals fail
    /// while it is offline.
    pub fn set_offline(&self, offline: bool) {
        self.0.lock().unwrap().offline = offline;
    }

    fn lookup(&self, key: &ChunkKey) -> BzzResult<Option<Chunk>> {
        let lock = self.0.lock().unwrap();
        if lock.offline {
            return Err(BzzError::retrieval(
                key.clone(),
                std::io::Error::other("network is offline"),
            ));
        }
        Ok(lock.chunks.get(key).cloned())
    }
}

/// The in-process retriever factory.
#[derive(Debug)]
pub struct MemRetrieverFactory {
    network: MemNetwork,
}

impl MemRetrieverFactory {
    /// Construct a new MemRetrieverFactory over its own empty network.
    pub fn create() -> DynRetrieverFactory {
        Self::with_network(MemNetwork::new())
    }

    /// Construct a new MemRetrieverFactory over a shared network.
    pub fn with_network(network: MemNetwork) -> DynRetrieverFactory {
        let out: DynRetrieverFactory = Arc::new(Self { network });
        out
    }
}

impl RetrieverFactory for MemRetrieverFactory {
    fn default_config(&self, config: &Config) -> BzzResult<()> {
        config.set_module_config(&MemRetrieverModConfig::default())
    }

    fn create(
        &self,
        builder: Arc<Builder>,
        registry: DynRegistry,
    ) -> BoxFut<'static, BzzResult<DynRetriever>> {
        let network = self.network.clone();
        Box::pin(async move {
            let config: MemRetrieverModConfig =
                builder.config.get_module_config()?;
            let out: DynRetriever = Arc::new(MemRetriever::new(
                config.mem_retriever,
                network,
                registry,
            ));
            Ok(out)
        })
    }
}

/// Retrieves chunks from a [MemNetwork], delivering them into a registry.
///
/// Requests for chunks nobody published are accepted but never answered,
/// the way an unanswered network request would behave.
#[derive(Debug)]
pub struct MemRetriever {
    config: MemRetrieverConfig,
    network: MemNetwork,
    registry: DynRegistry,
    request_count: AtomicUsize,
    tasks: Mutex<tokio::task::JoinSet<()>>,
}

impl Drop for MemRetriever {
    fn drop(&mut self) {
        self.tasks.lock().unwrap().abort_all();
    }
}

impl MemRetriever {
    /// Construct a retriever delivering into `registry`.
    pub fn new(
        config: MemRetrieverConfig,
        network: MemNetwork,
        registry: DynRegistry,
    ) -> Self {
        Self {
            config,
            network,
            registry,
            request_count: AtomicUsize::new(0),
            tasks: Mutex::new(tokio::task::JoinSet::new()),
        }
    }

    /// How many retrievals have been attempted so far.
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl Retriever for MemRetriever {
    fn retrieve(&self, handle: ChunkHandle) -> BoxFut<'_, BzzResult<()>> {
        Box::pin(async move {
            let key = handle.key().clone();
            self.request_count.fetch_add(1, Ordering::SeqCst);
            let found = self.network.lookup(&key)?;

            let Some(chunk) = found else {
                tracing::debug!("{} requested, no peer holds it", key.log());
                return Ok(());
            };

            tracing::debug!("{} requested", key.log());
            let delay = self.config.delivery_delay();
            let registry = self.registry.clone();
            {
                let mut tasks = self.tasks.lock().unwrap();
                while tasks.try_join_next().is_some() {}
                tasks.spawn(async move {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    tracing::debug!("{} delivered", key.log());
                    registry.put(chunk).await;
                });
            }

            Ok(())
        })
    }
}

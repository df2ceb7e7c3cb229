//! Registry related types.
//!
//! The registry is the local store that owns per-key chunk state. A key is
//! either absent, pending (a request is outstanding, waiters hold a
//! [CompletionSignal]) or fulfilled (the chunk data is known and immutable).

use crate::builder::Builder;
use crate::completion::CompletionSignal;
use crate::config::Config;
use crate::*;
use std::sync::Arc;

/// Identifies one pending-to-fulfilled cycle of a registry entry.
///
/// Every pending entry a registry creates gets an epoch that is never
/// reused by that registry.
pub type Epoch = u64;

/// The state of a registry entry as observed through a [ChunkHandle].
#[derive(Debug, Clone)]
pub enum HandleState {
    /// The chunk data is known.
    Fulfilled(Chunk),

    /// The chunk is still being waited for.
    Pending {
        /// The creation epoch of the pending entry.
        epoch: Epoch,

        /// Resolves when the entry is fulfilled or abandoned.
        signal: CompletionSignal,
    },
}

/// A handle to a registry entry, as returned by [Registry::get_or_create].
#[derive(Debug, Clone)]
pub struct ChunkHandle {
    key: ChunkKey,
    state: HandleState,
}

impl ChunkHandle {
    /// A handle for a fulfilled entry.
    pub fn fulfilled(chunk: Chunk) -> Self {
        Self {
            key: chunk.key().clone(),
            state: HandleState::Fulfilled(chunk),
        }
    }

    /// A handle for a pending entry.
    pub fn pending(
        key: ChunkKey,
        epoch: Epoch,
        signal: CompletionSignal,
    ) -> Self {
        Self {
            key,
            state: HandleState::Pending { epoch, signal },
        }
    }

    /// The key of the entry.
    pub fn key(&self) -> &ChunkKey {
        &self.key
    }

    /// The entry state at the time the handle was produced.
    pub fn state(&self) -> &HandleState {
        &self.state
    }

    /// Consume the handle, returning the entry state.
    pub fn into_state(self) -> HandleState {
        self.state
    }

    /// True if the entry was pending when the handle was produced.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, HandleState::Pending { .. })
    }

    /// The creation epoch, if the entry is pending.
    pub fn epoch(&self) -> Option<Epoch> {
        match &self.state {
            HandleState::Pending { epoch, .. } => Some(*epoch),
            HandleState::Fulfilled(_) => None,
        }
    }
}

/// Represents the ability to track pending and fulfilled chunks.
pub trait Registry: 'static + Send + Sync + std::fmt::Debug {
    /// Look up the entry for a key, creating a pending entry if there
    /// is none.
    ///
    /// This must be a single atomic operation. The returned flag is true
    /// only for the one call that inserted the pending entry, which makes
    /// that caller responsible for starting a retrieval.
    fn get_or_create(&self, key: ChunkKey) -> BoxFut<'_, (ChunkHandle, bool)>;

    /// Fulfill the entry for `chunk.key()`.
    ///
    /// A pending entry becomes fulfilled and its completion signal resolves
    /// with the chunk for every current and future waiter. An absent entry
    /// is created fulfilled. A fulfilled entry is left untouched.
    fn put(&self, chunk: Chunk) -> BoxFut<'_, ()>;

    /// Give up on a pending entry.
    ///
    /// If the entry for `key` is still pending with the given `epoch`, it
    /// is removed and its completion signal resolves with `err`. In every
    /// other case this does nothing.
    fn abandon(
        &self,
        key: ChunkKey,
        epoch: Epoch,
        err: BzzError,
    ) -> BoxFut<'_, ()>;
}

/// Trait-object [Registry].
pub type DynRegistry = Arc<dyn Registry>;

/// A factory for constructing [Registry] instances.
pub trait RegistryFactory: 'static + Send + Sync + std::fmt::Debug {
    /// Help the builder construct a default config from the chosen
    /// module factories.
    fn default_config(&self, config: &Config) -> BzzResult<()>;

    /// Construct a registry instance.
    fn create(
        &self,
        builder: Arc<Builder>,
    ) -> BoxFut<'static, BzzResult<DynRegistry>>;
}

/// Trait-object [RegistryFactory].
pub type DynRegistryFactory = Arc<dyn RegistryFactory>;

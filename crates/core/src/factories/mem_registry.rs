//! The mem registry implementation provided by bzz.

use bzz_api::builder::Builder;
use bzz_api::completion::{completion_pair, CompletionResolver, CompletionSignal};
use bzz_api::config::Config;
use bzz_api::*;
use std::collections::{hash_map::Entry as MapEntry, HashMap};
use std::sync::{Arc, Mutex};


/// The mem registry implementation provided by bzz.
///
/// This keeps every chunk it has seen in an in-memory hash map by
/// [ChunkKey]. Nothing is ever evicted.
#[derive(Debug)]
pub struct MemRegistryFactory {}

impl MemRegistryFactory {
    /// Construct a new MemRegistryFactory.
    pub fn create() -> DynRegistryFactory {
        let out: DynRegistryFactory = Arc::new(MemRegistryFactory {});
        out
    }
}

impl RegistryFactory for MemRegistryFactory {
    fn default_config(&self, _config: &Config) -> BzzResult<()> {
        Ok(())
    }

    fn create(
        &self,
        _builder: Arc<Builder>,
    ) -> BoxFut<'static, BzzResult<DynRegistry>> {
        Box::pin(async move {
            let out: DynRegistry = Arc::new(MemRegistry::new());
            Ok(out)
        })
    }
}

/// The state of an entry, as reported by [MemRegistry::state].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// A request for the chunk is outstanding.
    Pending(Epoch),

    /// The chunk data is stored.
    Fulfilled,
}

#[derive(Debug)]
enum Entry {
    Pending {
        epoch: Epoch,
        resolver: CompletionResolver,
        signal: CompletionSignal,
    },
    Fulfilled(Chunk),
}

impl Entry {
    fn handle(&self, key: &ChunkKey) -> ChunkHandle {
        match self {
            Entry::Pending { epoch, signal, .. } => {
                ChunkHandle::pending(key.clone(), *epoch, signal.clone())
            }
            Entry::Fulfilled(chunk) => ChunkHandle::fulfilled(chunk.clone()),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<ChunkKey, Entry>,
    next_epoch: Epoch,
}

impl Inner {
    fn get_or_create(&mut self, key: ChunkKey) -> (ChunkHandle, bool) {
        match self.entries.entry(key) {
            MapEntry::Occupied(o) => (o.get().handle(o.key()), false),
            MapEntry::Vacant(v) => {
                let epoch = self.next_epoch;
                self.next_epoch += 1;
                let (resolver, signal) = completion_pair();
                let handle =
                    ChunkHandle::pending(v.key().clone(), epoch, signal.clone());
                v.insert(Entry::Pending {
                    epoch,
                    resolver,
                    signal,
                });
                (handle, true)
            }
        }
    }

    /// Returns the resolver to fire if a pending entry was fulfilled.
    fn put(&mut self, chunk: Chunk) -> Option<CompletionResolver> {
        match self.entries.entry(chunk.key().clone()) {
            MapEntry::Vacant(v) => {
                v.insert(Entry::Fulfilled(chunk));
                None
            }
            MapEntry::Occupied(mut o) => {
                if let Entry::Fulfilled(_) = o.get() {
                    tracing::trace!(
                        "{} already stored, ignoring put",
                        chunk.key().log()
                    );
                    return None;
                }
                match std::mem::replace(o.get_mut(), Entry::Fulfilled(chunk)) {
                    Entry::Pending { resolver, .. } => Some(resolver),
                    Entry::Fulfilled(_) => None,
                }
            }
        }
    }

    /// Returns the resolver to fire if the pending entry was removed.
    fn abandon(
        &mut self,
        key: &ChunkKey,
        epoch: Epoch,
    ) -> Option<CompletionResolver> {
        match self.entries.get(key) {
            Some(Entry::Pending { epoch: e, .. }) if *e == epoch => {}
            _ => return None,
        }
        match self.entries.remove(key) {
            Some(Entry::Pending { resolver, .. }) => Some(resolver),
            _ => None,
        }
    }
}

/// A memory-based registry, the local store of a node.
///
/// All state lives behind a single mutex, so [Registry::get_or_create]
/// is one critical section and therefore atomic.
///
/// The registry is also a [ChunkStore] in its own right: a local-only
/// backend that never waits and never fetches.
pub struct MemRegistry(Mutex<Inner>);

impl std::fmt::Debug for MemRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemRegistry").finish()
    }
}

impl Default for MemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MemRegistry {
    /// Construct a new, empty registry.
    pub fn new() -> Self {
        Self(Mutex::new(Inner::default()))
    }

    /// Number of entries, pending and fulfilled.
    pub fn len(&self) -> usize {
        self.0.lock().unwrap().entries.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The state of the entry for `key`, if there is one.
    pub fn state(&self, key: &ChunkKey) -> Option<EntryState> {
        self.0.lock().unwrap().entries.get(key).map(|e| match e {
            Entry::Pending { epoch, .. } => EntryState::Pending(*epoch),
            Entry::Fulfilled(_) => EntryState::Fulfilled,
        })
    }

    fn fulfill(&self, chunk: Chunk) {
        let key = chunk.key().clone();
        let resolver = self.0.lock().unwrap().put(chunk.clone());
        if let Some(resolver) = resolver {
            tracing::debug!("{} fulfilled, releasing waiters", key.log());
            resolver.resolve(Ok(chunk));
        }
    }
}

impl Registry for MemRegistry {
    fn get_or_create(&self, key: ChunkKey) -> BoxFut<'_, (ChunkHandle, bool)> {
        let r = self.0.lock().unwrap().get_or_create(key);
        Box::pin(async move { r })
    }

    fn put(&self, chunk: Chunk) -> BoxFut<'_, ()> {
        self.fulfill(chunk);
        Box::pin(async {})
    }

    fn abandon(
        &self,
        key: ChunkKey,
        epoch: Epoch,
        err: BzzError,
    ) -> BoxFut<'_, ()> {
        let resolver = self.0.lock().unwrap().abandon(&key, epoch);
        if let Some(resolver) = resolver {
            tracing::debug!(
                "{} abandoned at epoch {epoch}: {err}",
                key.log()
            );
            resolver.resolve(Err(err));
        }
        Box::pin(async {})
    }
}

impl ChunkStore for MemRegistry {
    fn get(&self, key: ChunkKey) -> BoxFut<'_, BzzResult<Chunk>> {
        let found = match self.0.lock().unwrap().entries.get(&key) {
            Some(Entry::Fulfilled(chunk)) => Some(chunk.clone()),
            _ => None,
        };
        let r = found.ok_or_else(|| BzzError::not_found_locally(key));
        Box::pin(async move { r })
    }

    fn put(&self, chunk: Chunk) -> BoxFut<'_, ()> {
        self.fulfill(chunk);
        Box::pin(async {})
    }

    fn close(&self) -> BoxFut<'_, ()> {
        Box::pin(async {})
    }
}

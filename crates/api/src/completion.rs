//! The completion signal for pending chunks.
//!
//! A registry creates one [CompletionResolver] / [CompletionSignal] pair for
//! every pending entry. The resolver stays with the registry and is consumed
//! exactly once, either with the chunk data or with the error that ended the
//! pending state. The signal is cloned to every waiter, and all of them are
//! released together when the resolver fires.

use crate::*;
use futures::future::{FutureExt, Shared};
use tokio::sync::oneshot;

/// What a pending entry eventually resolves to.
pub type Completion = BzzResult<Chunk>;

/// Create a linked resolver / signal pair.
pub fn completion_pair() -> (CompletionResolver, CompletionSignal) {
    let (tx, rx) = oneshot::channel();
    (CompletionResolver(tx), CompletionSignal(rx.shared()))
}

/// The resolving half, owned by the registry entry.
#[derive(Debug)]
pub struct CompletionResolver(oneshot::Sender<Completion>);

impl CompletionResolver {
    /// Resolve the signal, waking all current and future waiters.
    pub fn resolve(self, completion: Completion) {
        // No receivers left just means nobody is waiting any more.
        let _ = self.0.send(completion);
    }
}

/// The observing half. Clone it once per waiter.
#[derive(Clone)]
pub struct CompletionSignal(Shared<oneshot::Receiver<Completion>>);

impl std::fmt::Debug for CompletionSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionSignal").finish()
    }
}

impl CompletionSignal {
    /// Wait for the pending entry to resolve.
    ///
    /// If the resolver was dropped without resolving, an "other" error is
    /// returned.
    pub async fn wait(self) -> Completion {
        match self.0.await {
            Ok(completion) => completion,
            Err(err) => Err(BzzError::other_src(
                "completion resolver dropped before resolving",
                err,
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn chunk() -> Chunk {
        Chunk::from_body(
            ChunkKey::from(bytes::Bytes::from_static(b"key")),
            b"data",
        )
    }

    #[tokio::test]
    async fn all_waiters_are_released() {
        let (resolver, signal) = completion_pair();

        let waiters = (0..4)
            .map(|_| tokio::task::spawn(signal.clone().wait()))
            .collect::<Vec<_>>();

        resolver.resolve(Ok(chunk()));

        for w in waiters {
            assert_eq!(chunk(), w.await.unwrap().unwrap());
        }
    }

    #[tokio::test]
    async fn late_waiter_sees_resolution() {
        let (resolver, signal) = completion_pair();
        resolver.resolve(Ok(chunk()));

        assert_eq!(chunk(), signal.clone().wait().await.unwrap());
        assert_eq!(chunk(), signal.wait().await.unwrap());
    }

    #[tokio::test]
    async fn errors_reach_every_waiter() {
        let (resolver, signal) = completion_pair();
        let a = signal.clone();

        resolver.resolve(Err(BzzError::other("gone")));

        assert_eq!(
            "gone (src: None)",
            a.wait().await.unwrap_err().to_string()
        );
        assert_eq!(
            "gone (src: None)",
            signal.wait().await.unwrap_err().to_string()
        );
    }

    #[tokio::test]
    async fn dropped_resolver_is_an_error() {
        let (resolver, signal) = completion_pair();
        drop(resolver);

        assert!(matches!(
            signal.wait().await,
            Err(BzzError::Other { .. })
        ));
    }
}

//! Bzz error types.

use crate::ChunkKey;
use std::sync::Arc;
use std::time::Duration;

/// A clonable trait-object inner error.
#[derive(Clone, Default)]
pub struct DynInnerError(
    pub Option<Arc<dyn std::error::Error + 'static + Send + Sync>>,
);

impl std::fmt::Debug for DynInnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for DynInnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.as_ref() {
            None => f.write_str("None"),
            Some(s) => s.fmt(f),
        }
    }
}

impl std::error::Error for DynInnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.as_ref().map(|s| {
            let out: &(dyn std::error::Error + 'static) = &**s;
            out
        })
    }
}

impl DynInnerError {
    /// Construct a new DynInnerError from a source error.
    pub fn new<E: std::error::Error + 'static + Send + Sync>(e: E) -> Self {
        Self(Some(Arc::new(e)))
    }
}

/// The core bzz error type.
///
/// This type is required to implement `Clone` because a single failure
/// may be delivered to every task waiting on the same pending chunk
/// through a shared completion signal.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BzzError {
    /// The chunk is not available: either it did not arrive before the
    /// search timeout, or a local-only lookup missed.
    #[error("chunk {key} not found{}", timeout_note(.timeout))]
    NotFound {
        /// The requested key.
        key: ChunkKey,

        /// How long the request waited. `None` for local-only lookups,
        /// which never wait.
        timeout: Option<Duration>,
    },

    /// A network retrieval attempt for the chunk failed.
    #[error("retrieval of chunk {key} failed (src: {src})")]
    Retrieval {
        /// The requested key.
        key: ChunkKey,

        /// The reason the retrieval failed.
        #[source]
        src: DynInnerError,
    },

    /// The chunk payload is too short to carry its size prefix.
    #[error("malformed chunk {key}: payload is {len} bytes, need at least {}", crate::chunk::SIZE_PREFIX_LEN)]
    Malformed {
        /// The chunk key.
        key: ChunkKey,

        /// The length of the offending payload.
        len: usize,
    },

    /// Generic bzz internal error.
    #[error("{ctx} (src: {src})")]
    Other {
        /// Any context associated with this error.
        ctx: Arc<str>,

        /// The inner error (if any).
        #[source]
        src: DynInnerError,
    },
}

fn timeout_note(timeout: &Option<Duration>) -> String {
    match timeout {
        Some(t) => format!(" (timeout: {t:?})"),
        None => String::new(),
    }
}

impl BzzError {
    /// Construct an "other" error with an inner source error.
    pub fn other_src<
        C: std::fmt::Display,
        S: std::error::Error + 'static + Send + Sync,
    >(
        ctx: C,
        src: S,
    ) -> Self {
        Self::Other {
            ctx: ctx.to_string().into_boxed_str().into(),
            src: DynInnerError::new(src),
        }
    }

    /// Construct an "other" error.
    pub fn other<C: std::fmt::Display>(ctx: C) -> Self {
        Self::Other {
            ctx: ctx.to_string().into_boxed_str().into(),
            src: DynInnerError::default(),
        }
    }

    /// Construct a "retrieval" error for a chunk.
    pub fn retrieval<S: std::error::Error + 'static + Send + Sync>(
        key: ChunkKey,
        src: S,
    ) -> Self {
        Self::Retrieval {
            key,
            src: DynInnerError::new(src),
        }
    }

    /// Construct a "not found" error for a chunk that did not arrive
    /// within `timeout`.
    pub fn not_found(key: ChunkKey, timeout: Duration) -> Self {
        Self::NotFound {
            key,
            timeout: Some(timeout),
        }
    }

    /// Construct a "not found" error for a local-only lookup miss.
    pub fn not_found_locally(key: ChunkKey) -> Self {
        Self::NotFound { key, timeout: None }
    }

    /// True if this error means the chunk was not available in time,
    /// as opposed to a failed fetch attempt.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// The core bzz result type.
pub type BzzResult<T> = Result<T, BzzError>;

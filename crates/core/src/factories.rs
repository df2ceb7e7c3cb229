//! Factories for generating instances of bzz modules.

pub mod core_net_store;
pub use core_net_store::{CoreNetStoreFactory, NetStore};

mod mem_registry;
pub use mem_registry::*;

pub mod mem_retriever;
pub use mem_retriever::{MemNetwork, MemRetriever, MemRetrieverFactory};

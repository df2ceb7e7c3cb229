use bzz_api::{builder::BuiltStore, BzzError, Chunk, ChunkStore};
use bzz_core::{
    default_test_builder,
    factories::{
        core_net_store::config::{NetStoreConfig, NetStoreModConfig},
        mem_retriever::config::{MemRetrieverConfig, MemRetrieverModConfig},
        MemNetwork, MemRetrieverFactory,
    },
};
use bzz_test_utils::{
    chunk::chunk_from_text, enable_tracing, id::digest_key,
    id::random_chunk_key,
};
use std::time::{Duration, Instant};

async fn make_node(
    network: MemNetwork,
    search_timeout_ms: u32,
    delivery_delay_ms: u32,
) -> BuiltStore {
    let mut builder = default_test_builder();
    builder.retriever = MemRetrieverFactory::with_network(network);
    let builder = builder.with_default_config().unwrap();
    builder
        .config
        .set_module_config(&NetStoreModConfig {
            net_store: NetStoreConfig { search_timeout_ms },
        })
        .unwrap();
    builder
        .config
        .set_module_config(&MemRetrieverModConfig {
            mem_retriever: MemRetrieverConfig { delivery_delay_ms },
        })
        .unwrap();
    builder.build().create_chunk_store().await.unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn chunk_published_on_network_is_fetched() {
    enable_tracing();
    let network = MemNetwork::new();
    let node = make_node(network.clone(), 5000, 50).await;

    let key = digest_key(b"hello-world");
    let mut payload = 11_u64.to_le_bytes().to_vec();
    payload.extend_from_slice(b"hello world");
    network.publish(Chunk::new(key.clone(), payload.into()).unwrap());

    let got = node.chunk_store.get(key.clone()).await.unwrap();
    assert_eq!(11, got.size());
    assert_eq!(&b"hello world"[..], &got.payload()[8..]);

    // now served from the local registry
    let start = Instant::now();
    let again = node.chunk_store.get(key).await.unwrap();
    assert!(start.elapsed() < Duration::from_millis(50));
    assert_eq!(got, again);
}

#[tokio::test(flavor = "multi_thread")]
async fn many_nodes_share_one_network() {
    enable_tracing();
    let network = MemNetwork::new();
    let chunk = chunk_from_text("shared content");
    network.publish(chunk.clone());

    let mut nodes = Vec::new();
    for _ in 0..3 {
        nodes.push(make_node(network.clone(), 5000, 10).await);
    }

    let results = futures::future::join_all(
        nodes
            .iter()
            .map(|n| n.chunk_store.get(chunk.key().clone())),
    )
    .await;

    for r in results {
        assert_eq!(chunk, r.unwrap());
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_gets_on_one_node_all_resolve() {
    enable_tracing();
    let network = MemNetwork::new();
    let chunk = chunk_from_text("popular");
    network.publish(chunk.clone());
    let node = make_node(network, 5000, 100).await;

    let results = futures::future::join_all(
        (0..32).map(|_| node.chunk_store.get(chunk.key().clone())),
    )
    .await;

    for r in results {
        assert_eq!(chunk, r.unwrap());
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_chunk_is_not_found_after_timeout() {
    enable_tracing();
    let node = make_node(MemNetwork::new(), 100, 0).await;

    let start = Instant::now();
    let err = node.chunk_store.get(random_chunk_key()).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[tokio::test(flavor = "multi_thread")]
async fn offline_network_is_a_retrieval_error() {
    enable_tracing();
    let network = MemNetwork::new();
    let chunk = chunk_from_text("unreachable");
    network.publish(chunk.clone());
    network.set_offline(true);
    let node = make_node(network.clone(), 10_000, 0).await;

    let start = Instant::now();
    let err = node.chunk_store.get(chunk.key().clone()).await.unwrap_err();
    assert!(matches!(err, BzzError::Retrieval { .. }));
    assert!(start.elapsed() < Duration::from_secs(2));

    // once back online, the next get starts a fresh retrieval
    network.set_offline(false);
    assert_eq!(chunk, node.chunk_store.get(chunk.key().clone()).await.unwrap());
}

#[tokio::test(flavor = "multi_thread")]
async fn local_put_fulfills_pending_get() {
    enable_tracing();
    let node = make_node(MemNetwork::new(), 5000, 0).await;
    let chunk = chunk_from_text("put by a peer");

    let store = node.chunk_store.clone();
    let key = chunk.key().clone();
    let waiter = tokio::task::spawn(async move { store.get(key).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    node.chunk_store.put(chunk.clone()).await;

    assert_eq!(chunk, waiter.await.unwrap().unwrap());
}

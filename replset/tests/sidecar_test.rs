mod common;

use common::builders::{create_sidecar, running_pod};
use common::wait::wait_for_initiation;
use replset::cluster::memory::MemoryCluster;
use replset::replica::memory::MemoryReplicaSet;
use replset_telemetry::init_test_tracing;

#[tokio::test(flavor = "multi_thread")]
async fn sidecar_shuts_down_gracefully_after_reconciling() {
    init_test_tracing();

    let cluster = MemoryCluster::new();
    cluster.add_pod(running_pod("mongo-0", "10.0.0.1", 0)).await;
    let replica_set = MemoryReplicaSet::new("rs0", false);

    let mut sidecar = create_sidecar(cluster.clone(), replica_set.clone());
    sidecar.start().await.unwrap();
    wait_for_initiation(&replica_set).await;

    sidecar.shutdown_and_wait().await.unwrap();

    // Shutdown leaves the admin connection closed behind it.
    assert!(!replica_set.is_connected().await);
}

#[tokio::test(flavor = "multi_thread")]
async fn wait_without_start_returns_immediately() {
    init_test_tracing();

    let cluster = MemoryCluster::new();
    let replica_set = MemoryReplicaSet::new("rs0", false);

    let sidecar = create_sidecar(cluster, replica_set.clone());
    sidecar.wait().await.unwrap();

    assert!(!replica_set.is_connected().await);
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_handle_stops_a_running_sidecar() {
    init_test_tracing();

    let cluster = MemoryCluster::new();
    cluster.add_pod(running_pod("mongo-0", "10.0.0.1", 0)).await;
    let replica_set = MemoryReplicaSet::new("rs0", false);

    let mut sidecar = create_sidecar(cluster.clone(), replica_set.clone());
    let shutdown_tx = sidecar.shutdown_tx();

    sidecar.start().await.unwrap();
    wait_for_initiation(&replica_set).await;

    // An externally held handle can stop the sidecar, e.g. from a signal
    // handler task.
    shutdown_tx.shutdown().unwrap();
    sidecar.wait().await.unwrap();

    assert!(!replica_set.is_connected().await);
}

//! Integration tests for the simulation service.
//!
//! These tests run the full system - client, daemon, and observation layer -
//! against short intervals and verify that external drivers and background
//! ticks compose without breaking the metric invariants.

use cdnsim::clock::FixedClock;
use cdnsim::service::{SimulationConfig, SimulationSystem};
use cdnsim::sim::{CdnEngine, EngineConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

fn quiet_config() -> SimulationConfig {
    // Intervals long enough that only explicit commands mutate state.
    SimulationConfig::default()
        .with_traffic_interval(Duration::from_secs(3600))
        .with_maintenance_interval(Duration::from_secs(3600))
        .with_ingest_interval(Duration::from_secs(3600))
}

fn seeded_system(config: SimulationConfig, seed: u64) -> SimulationSystem {
    let engine = CdnEngine::with_rng_and_clock(
        config.engine.clone(),
        ChaCha8Rng::seed_from_u64(seed),
        FixedClock::at_hour(14),
    );
    SimulationSystem::with_engine(&tokio::runtime::Handle::current(), config, engine).unwrap()
}

async fn wait_for<F>(system: &SimulationSystem, mut predicate: F)
where
    F: FnMut(&cdnsim::service::SimSnapshot) -> bool,
{
    let mut changes = system.subscribe();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if predicate(&system.snapshot()) {
                return;
            }
            changes.changed().await.expect("daemon alive");
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn scheduler_commands_are_applied_in_order() {
    let system = seeded_system(quiet_config(), 1);
    let client = system.client();

    client.request_content(4, "us-east"); // miss
    client.request_content(1, "us-east"); // hit
    client.cache_content(4, "eu-west");
    client.request_content(4, "eu-west"); // now a hit

    wait_for(&system, |snap| snap.metrics.total_requests == 3).await;

    let snapshot = system.snapshot();
    assert_eq!(snapshot.metrics.cache_hits, 2);
    assert_eq!(snapshot.metrics.cache_misses, 1);

    let item = snapshot.catalog.iter().find(|i| i.id == 4).unwrap();
    assert_eq!(item.locations, vec!["eu-west"]);
    assert_eq!(item.access_count, 2);

    system.shutdown().await;
}

#[tokio::test]
async fn background_ticks_drive_the_simulation() {
    let config = SimulationConfig::default()
        .with_traffic_interval(Duration::from_millis(5))
        .with_maintenance_interval(Duration::from_millis(15))
        .with_ingest_interval(Duration::from_millis(20));
    let system = seeded_system(config, 2);

    wait_for(&system, |snap| {
        snap.metrics.total_requests >= 20 && snap.catalog.len() > 4
    })
    .await;

    let snapshot = system.snapshot();
    assert_eq!(
        snapshot.metrics.cache_hits + snapshot.metrics.cache_misses,
        snapshot.metrics.total_requests
    );
    for item in &snapshot.catalog {
        assert!((1..=100).contains(&item.popularity));
        assert_eq!(item.cached, !item.locations.is_empty());
    }

    system.shutdown().await;
}

#[tokio::test]
async fn reset_command_restores_seed_snapshot() {
    let system = seeded_system(quiet_config(), 3);
    let client = system.client();

    client.request_content(1, "us-east");
    client.add_content();
    wait_for(&system, |snap| snap.catalog.len() == 5).await;

    client.reset();
    wait_for(&system, |snap| {
        snap.catalog.len() == 4 && snap.metrics.total_requests == 0
    })
    .await;

    let snapshot = system.snapshot();
    assert_eq!(snapshot.metrics.avg_latency_ms, 0.0);
    assert_eq!(snapshot.metrics.bandwidth_saved_mb, 0.0);

    system.shutdown().await;
}

#[tokio::test]
async fn unknown_ids_leave_no_trace() {
    let system = seeded_system(quiet_config(), 4);
    let client = system.client();

    client.request_content(999, "us-east");
    client.request_content(1, "nowhere");
    // A real request afterwards proves the bogus ones were processed.
    client.request_content(1, "us-east");

    wait_for(&system, |snap| snap.metrics.total_requests > 0).await;

    let snapshot = system.snapshot();
    assert_eq!(snapshot.metrics.total_requests, 1);
    assert_eq!(snapshot.metrics.cache_hits, 1);

    system.shutdown().await;
}

#[tokio::test]
async fn observers_see_monotonic_revisions() {
    let config = SimulationConfig::default()
        .with_traffic_interval(Duration::from_millis(5))
        .with_maintenance_interval(Duration::from_secs(3600))
        .with_ingest_interval(Duration::from_secs(3600));
    let system = seeded_system(config, 5);

    let mut changes = system.subscribe();
    let mut last = *changes.borrow_and_update();
    for _ in 0..10 {
        tokio::time::timeout(Duration::from_secs(2), changes.changed())
            .await
            .expect("change within deadline")
            .unwrap();
        let revision = *changes.borrow_and_update();
        assert!(revision > last, "revision went backwards");
        last = revision;
    }

    system.shutdown().await;
}

#[tokio::test]
async fn maintenance_command_passes_run_on_demand() {
    let system = seeded_system(quiet_config(), 6);
    let client = system.client();

    // Build up access counts, then force a popularity pass.
    for _ in 0..12 {
        client.request_content(3, "us-east");
    }
    wait_for(&system, |snap| snap.metrics.total_requests == 12).await;

    client.update_popularity();
    wait_for(&system, |snap| {
        snap.catalog.iter().all(|item| item.access_count == 0)
    })
    .await;

    client.auto_cache_popular();
    client.version_update();
    wait_for(&system, |snap| {
        // Exactly one item carries the bumped version.
        snap.catalog.iter().filter(|i| i.version == "1.1").count() == 1
    })
    .await;

    system.shutdown().await;
}

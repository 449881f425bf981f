mod common;

use common::Harness;
use payments_intake_gateway::domain::payment::Processor;
use payments_intake_gateway::health::HealthStateStore;
use payments_intake_gateway::processors::mock::{MockBehavior, MockForward, MockHealth};
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn concurrent_callers_issue_a_single_probe_per_interval() {
    let h = Harness::new();
    h.client
        .set_behavior(
            Processor::Fallback,
            MockBehavior {
                forward: MockForward::Accept,
                health: MockHealth::Healthy,
                forward_delay: Duration::ZERO,
                health_delay: Duration::from_millis(200),
            },
        )
        .await;
    let prober = h.prober();

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let prober = prober.clone();
            tokio::spawn(async move { prober.probe_if_due(Processor::Fallback).await })
        })
        .collect();

    let mut probed = 0;
    for handle in handles {
        if handle.await.unwrap().is_some() {
            probed += 1;
        }
    }
    assert_eq!(probed, 1);
    assert_eq!(h.client.health_calls(Processor::Fallback).await, 1);

    tokio::time::advance(common::INTERVAL).await;
    assert_eq!(prober.probe_if_due(Processor::Fallback).await, Some(false));
    assert_eq!(h.client.health_calls(Processor::Fallback).await, 2);
}

#[tokio::test(start_paused = true)]
async fn probe_locks_are_per_processor() {
    let h = Harness::new();
    let prober = h.prober();

    assert!(prober.probe_if_due(Processor::Default).await.is_some());
    assert!(prober.probe_if_due(Processor::Fallback).await.is_some());
    assert!(prober.probe_if_due(Processor::Default).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn healthy_report_clears_failing_flag() {
    let h = Harness::new();
    h.health.mark_failing(Processor::Fallback).await.unwrap();

    assert!(!h.prober().probe(Processor::Fallback).await);
    assert!(!h.health.is_failing(Processor::Fallback).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn failing_report_marks_processor() {
    let h = Harness::new();
    h.client.set_health(Processor::Default, MockHealth::Failing).await;

    assert!(h.prober().probe(Processor::Default).await);
    assert!(h.health.is_failing(Processor::Default).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn probe_errors_count_as_failing() {
    let h = Harness::new();
    h.client.set_health(Processor::Fallback, MockHealth::Error).await;

    assert!(h.prober().probe(Processor::Fallback).await);
    assert!(h.health.is_failing(Processor::Fallback).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn probe_timeout_counts_as_failing() {
    let h = Harness::new();
    h.client.set_health(Processor::Fallback, MockHealth::Hang).await;

    let started = tokio::time::Instant::now();
    assert!(h.prober().probe(Processor::Fallback).await);
    assert!(started.elapsed() >= common::PROBE_TIMEOUT);
    assert!(h.health.is_failing(Processor::Fallback).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn known_failing_processor_is_reprobed_after_lock_expires() {
    let h = Harness::new();
    h.client.set_health(Processor::Fallback, MockHealth::Failing).await;
    let prober = h.prober();

    assert_eq!(prober.probe_if_due(Processor::Fallback).await, Some(true));
    assert!(h.health.is_failing(Processor::Fallback).await.unwrap());

    tokio::time::advance(common::INTERVAL).await;
    h.client.set_health(Processor::Fallback, MockHealth::Healthy).await;
    assert_eq!(prober.probe_if_due(Processor::Fallback).await, Some(false));
    assert!(!h.health.is_failing(Processor::Fallback).await.unwrap());
}

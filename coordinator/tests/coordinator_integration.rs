
use std::sync::Arc;
use std::time::Duration;

use coordinator::{
    config::CoordinatorConfig,
    coordinator::{Coordinator, SYSTEM_SOURCE},
    metrics::counters::Counters,
    notification::Priority,
    time::TokioClock,
};
use recording_sink::RecordingSink;

const EPOCH_MS: u64 = 1_700_000_000_000;

fn setup(cfg: CoordinatorConfig) -> (Coordinator, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let c = Coordinator::new(cfg, Arc::new(TokioClock::new(EPOCH_MS)), sink.clone());
    (c, sink)
}

// -----------------------
// INTEGRATION TESTS
// -----------------------

#[tokio::test(start_paused = true)]
async fn burst_of_ten_delivers_eight_spaced() {
    let (c, sink) = setup(CoordinatorConfig::default());

    for i in 0..10 {
        c.enqueue("Mood Tips", &format!("tip {i}"), Priority::Low);
    }

    let handle = c.start();
    tokio::time::sleep(Duration::from_secs(90)).await;

    let shown = sink.shown();
    assert_eq!(shown.len(), 8);
    for w in shown.windows(2) {
        assert!(w[1].at - w[0].at >= Duration::from_secs(3));
    }
    assert_eq!(sink.messages()[0], "tip 0");

    let summary = c.get_summary();
    assert_eq!(summary.total_delivered_last_hour, 8);
    assert_eq!(summary.pending, 0);
    assert_eq!(summary.source_activity.get("Mood Tips"), Some(&8));
    assert_eq!(Counters::get(&c.counters().dropped_at_delivery), 2);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn critical_is_delivered_before_low() {
    let (c, sink) = setup(CoordinatorConfig::default());

    c.enqueue("Air Quality", "fair air", Priority::Low);
    c.enqueue("Weather Alerts", "storm incoming", Priority::Critical);

    let handle = c.start();
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(sink.messages(), vec!["storm incoming", "fair air"]);
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn pause_defers_delivery_until_it_expires() {
    let (c, sink) = setup(CoordinatorConfig::default());

    c.pause_delivery(5);
    c.enqueue("UV Health", "wear sunscreen", Priority::Medium);
    let handle = c.start();

    tokio::time::sleep(Duration::from_secs(299)).await;
    let shown = sink.shown();
    assert_eq!(shown.len(), 1, "only the pause notice is visible");
    assert_eq!(shown[0].presentation.request.source, SYSTEM_SOURCE);
    assert!(c.is_paused());
    assert_eq!(c.get_summary().pending, 1);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(sink.messages().last().map(String::as_str), Some("wear sunscreen"));
    assert!(!c.is_paused());
    assert_eq!(c.get_summary().total_delivered_last_hour, 1);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn default_pause_lasts_configured_minutes() {
    let (c, sink) = setup(CoordinatorConfig::default());
    assert_eq!(c.config().default_pause_minutes, 30);

    c.pause_delivery_default();
    c.enqueue("Mood Tips", "take a break", Priority::Medium);
    let handle = c.start();

    let shown = sink.shown();
    let notice = &shown[0].presentation.request;
    assert_eq!(notice.source, SYSTEM_SOURCE);
    assert!(notice.message.contains("paused for 30 minutes"));

    tokio::time::sleep(Duration::from_secs(30 * 60 - 1)).await;
    assert!(c.is_paused());
    assert_eq!(sink.shown().len(), 1);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(!c.is_paused());
    assert_eq!(sink.messages().last().map(String::as_str), Some("take a break"));

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn summary_is_idempotent() {
    let (c, _sink) = setup(CoordinatorConfig::default());
    c.enqueue("UV Health", "hat", Priority::High);
    c.tick();

    let a = c.get_summary();
    let b = c.get_summary();
    assert_eq!(a, b);
    assert_eq!(a.total_delivered_last_hour, 1);
    assert_ne!(a.last_activity_timestamp, "never");
}

#[tokio::test(start_paused = true)]
async fn window_frees_up_after_an_hour() {
    let cfg = CoordinatorConfig {
        max_per_hour: 2,
        ..CoordinatorConfig::default()
    };
    let (c, sink) = setup(cfg);
    let handle = c.start();

    c.enqueue("a", "1", Priority::Low);
    c.enqueue("a", "2", Priority::Low);
    tokio::time::sleep(Duration::from_secs(10)).await;

    // window is full: dropped at enqueue
    c.enqueue("a", "3", Priority::Low);
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(sink.shown().len(), 2);

    tokio::time::sleep(Duration::from_secs(3_600)).await;
    c.enqueue("a", "4", Priority::Low);
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(sink.messages(), vec!["1", "2", "4"]);
    assert_eq!(Counters::get(&c.counters().rejected_at_enqueue), 1);
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn presentation_failure_does_not_stop_the_loop() {
    let sink = Arc::new(RecordingSink::failing_first(1));
    let c = Coordinator::new(
        CoordinatorConfig::default(),
        Arc::new(TokioClock::new(EPOCH_MS)),
        sink.clone(),
    );

    c.enqueue("Travel", "first", Priority::High);
    c.enqueue("Travel", "second", Priority::High);
    let handle = c.start();
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(sink.messages(), vec!["second"]);
    assert_eq!(Counters::get(&c.counters().presentation_failures), 1);
    // a failed presentation still consumed its delivery slot
    assert_eq!(c.get_summary().total_delivered_last_hour, 2);
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_loop_and_clears_queue() {
    let (c, sink) = setup(CoordinatorConfig::default());

    c.pause_delivery(60);
    c.enqueue("UV Health", "queued", Priority::Low);
    c.enqueue("UV Health", "queued too", Priority::Low);
    let handle = c.start();
    tokio::time::sleep(Duration::from_secs(2)).await;

    handle.shutdown().await;
    assert_eq!(c.get_summary().pending, 0);
    assert_eq!(c.visible_count(), 0);
    assert_eq!(Counters::get(&c.counters().dropped_on_shutdown), 2);

    c.resume_delivery();
    c.enqueue("UV Health", "after shutdown", Priority::Low);
    tokio::time::sleep(Duration::from_secs(10)).await;

    // no loop is running any more
    assert_eq!(sink.shown().len(), 1);
    assert_eq!(c.get_summary().pending, 1);
}


use std::sync::Arc;
use std::time::Duration;

use coordinator::{
    config::CoordinatorConfig,
    error::CoordinatorError,
    metrics::counters::Counters,
    notification::{NotificationRequest, Priority},
    presenter::{Presenter, SinkHandle},
};
use recording_sink::{PanickingSink, RecordingSink};

fn req(msg: &str, priority: Priority) -> NotificationRequest {
    NotificationRequest::new("UV Health", msg, priority, 0, 0)
}

#[tokio::test(start_paused = true)]
async fn visible_notifications_are_stacked() {
    let sink = Arc::new(RecordingSink::new());
    let p = Presenter::new(sink.clone(), &CoordinatorConfig::default(), Counters::default());

    p.present(req("a", Priority::Low)).unwrap();
    p.present(req("b", Priority::Low)).unwrap();
    p.present(req("c", Priority::Critical)).unwrap();

    let offsets: Vec<u32> = sink.shown().iter().map(|s| s.presentation.offset_px).collect();
    assert_eq!(offsets, vec![20, 100, 180]);
    assert_eq!(p.visible_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn dismissal_follows_priority_duration() {
    let sink = Arc::new(RecordingSink::new());
    let p = Presenter::new(sink.clone(), &CoordinatorConfig::default(), Counters::default());

    let low = p.present(req("low", Priority::Low)).unwrap();
    let crit = p.present(req("crit", Priority::Critical)).unwrap();

    tokio::time::sleep(Duration::from_millis(8_100)).await;
    assert_eq!(*sink.dismissed.lock(), vec![low]);
    assert_eq!(p.visible_count(), 1);

    // freed slot is reused
    p.present(req("next", Priority::Medium)).unwrap();
    assert_eq!(sink.shown().last().unwrap().presentation.offset_px, 100);

    tokio::time::sleep(Duration::from_secs(12)).await;
    assert!(sink.dismissed.lock().contains(&crit));
}

#[tokio::test(start_paused = true)]
async fn sink_error_becomes_presentation_failure() {
    let sink = Arc::new(RecordingSink::failing_first(1));
    let counters = Counters::default();
    let p = Presenter::new(sink.clone(), &CoordinatorConfig::default(), counters.clone());

    let err = p.present(req("x", Priority::High)).unwrap_err();
    assert!(matches!(err, CoordinatorError::PresentationFailure(_)));
    assert_eq!(p.visible_count(), 0);
    assert_eq!(Counters::get(&counters.presentation_failures), 1);

    assert_eq!(p.present(req("y", Priority::High)).unwrap(), SinkHandle(0));
}

#[tokio::test(start_paused = true)]
async fn sink_panic_is_contained() {
    let p = Presenter::new(
        Arc::new(PanickingSink),
        &CoordinatorConfig::default(),
        Counters::default(),
    );

    let err = p.present(req("boom", Priority::Low)).unwrap_err();
    assert_eq!(err, CoordinatorError::PresentationFailure("sink panicked".into()));
}

#[tokio::test(start_paused = true)]
async fn dismiss_all_clears_screen_once() {
    let sink = Arc::new(RecordingSink::new());
    let p = Presenter::new(sink.clone(), &CoordinatorConfig::default(), Counters::default());

    p.present(req("a", Priority::Low)).unwrap();
    p.present(req("b", Priority::Low)).unwrap();
    p.dismiss_all();
    assert_eq!(p.visible_count(), 0);

    // the timers fire later but must not dismiss twice
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(sink.dismissed.lock().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_presents_get_distinct_offsets() {
    let sink = Arc::new(RecordingSink::slow(Duration::from_millis(50)));
    let p = Presenter::new(sink.clone(), &CoordinatorConfig::default(), Counters::default());

    std::thread::scope(|scope| {
        for i in 0..2 {
            let p = p.clone();
            scope.spawn(move || {
                p.present(req(&format!("n{i}"), Priority::Low)).unwrap();
            });
        }
    });

    let mut offsets: Vec<u32> = sink.shown().iter().map(|s| s.presentation.offset_px).collect();
    offsets.sort();
    assert_eq!(offsets, vec![20, 100]);
    assert_eq!(p.visible_count(), 2);
}

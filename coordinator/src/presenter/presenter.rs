use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::config::CoordinatorConfig;
use crate::error::CoordinatorError;
use crate::logger::warn_if_slow;
use crate::metrics::counters::Counters;
use crate::notification::NotificationRequest;
use crate::presenter::sink::{NotificationSink, Presentation, SinkHandle};

/// Turns released requests into visible, self-dismissing notifications.
///
/// Fire-and-forget: callers never wait on rendering or dismissal. Dismissal
/// timers run on the runtime captured at construction, or on the caller's
/// runtime; without either, nothing is shown.
#[derive(Clone)]
pub struct Presenter {
    sink: Arc<dyn NotificationSink>,
    /// Handles currently on screen, in stacking order.
    visible: Arc<Mutex<Vec<SinkHandle>>>,
    runtime: Option<Handle>,
    stack_base_px: u32,
    stack_step_px: u32,
    counters: Counters,
}

impl Presenter {
    pub fn new(sink: Arc<dyn NotificationSink>, cfg: &CoordinatorConfig, counters: Counters) -> Self {
        Self {
            sink,
            visible: Arc::new(Mutex::new(Vec::new())),
            runtime: Handle::try_current().ok(),
            stack_base_px: cfg.stack_base_px,
            stack_step_px: cfg.stack_step_px,
            counters,
        }
    }

    pub fn visible_count(&self) -> usize {
        self.visible.lock().len()
    }

    /// Shows `request` and schedules its dismissal.
    ///
    /// Sink errors and panics surface as `PresentationFailure`; nothing is
    /// left on the visible stack in that case.
    pub fn present(&self, request: NotificationRequest) -> Result<SinkHandle, CoordinatorError> {
        let Some(runtime) = self.runtime() else {
            let p = Presentation::new(request, self.stack_base_px);
            return Err(self.failed(&p, "no tokio runtime for dismissal timer".to_string()));
        };

        // Held across `show` so concurrent presents get distinct offsets.
        let mut visible = self.visible.lock();
        let offset_px = self.stack_base_px + visible.len() as u32 * self.stack_step_px;

        let presentation = Presentation::new(request, offset_px);
        let display_for = presentation.display_for;

        let shown = warn_if_slow("sink_show", Duration::from_millis(50), || {
            catch_unwind(AssertUnwindSafe(|| self.sink.show(&presentation)))
        });

        let handle = match shown {
            Ok(Ok(h)) => h,
            Ok(Err(e)) => return Err(self.failed(&presentation, e.to_string())),
            Err(_) => return Err(self.failed(&presentation, "sink panicked".to_string())),
        };

        visible.push(handle);
        drop(visible);

        debug!(
            id = %presentation.request.id,
            handle = handle.0,
            offset_px,
            "notification presented"
        );

        self.schedule_dismiss(&runtime, handle, display_for);
        Ok(handle)
    }

    /// Removes every visible notification immediately.
    pub fn dismiss_all(&self) {
        let handles: Vec<SinkHandle> = std::mem::take(&mut *self.visible.lock());
        for h in handles {
            if let Err(e) = self.sink.dismiss(h) {
                warn!(handle = h.0, error = %e, "dismiss failed");
            }
        }
    }

    fn runtime(&self) -> Option<Handle> {
        self.runtime.clone().or_else(|| Handle::try_current().ok())
    }

    fn schedule_dismiss(&self, runtime: &Handle, handle: SinkHandle, after: Duration) {
        let sink = Arc::clone(&self.sink);
        let visible = Arc::clone(&self.visible);

        runtime.spawn(async move {
            tokio::time::sleep(after).await;

            let was_visible = {
                let mut v = visible.lock();
                let before = v.len();
                v.retain(|h| *h != handle);
                v.len() != before
            };

            // already removed by dismiss_all
            if !was_visible {
                return;
            }

            if let Err(e) = sink.dismiss(handle) {
                warn!(handle = handle.0, error = %e, "dismiss failed");
            }
        });
    }

    fn failed(&self, p: &Presentation, reason: String) -> CoordinatorError {
        Counters::bump(&self.counters.presentation_failures);
        warn!(id = %p.request.id, reason = %reason, "presentation failed");
        CoordinatorError::PresentationFailure(reason)
    }
}

//! Delay collaborator with cancellable one-shot timers.
//!
//! Timers never call back into the flow directly. A fired [`Timer`] is handed
//! back to the owner of the flow, which feeds it to
//! `OnboardingFlow::handle_timer` on the same event loop as user input.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::debug;
use uuid::Uuid;

/// What a timer was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Navigate home after a successful login.
    LoginRedirect,
    /// Deliver the generated bio suggestion.
    Suggestion,
    /// Leave the bio form for login.
    BioFinish,
}

/// A scheduled callback, identified by its own id and the session that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub id: Uuid,
    pub session: Uuid,
    pub kind: TimerKind,
}

/// Handle used to cancel a scheduled timer.
#[derive(Debug, Clone, Default)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
    abort: Option<AbortHandle>,
}

impl TimerHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also abort the task backing this timer on cancel.
    pub fn with_abort(mut self, abort: AbortHandle) -> Self {
        self.abort = Some(abort);
        self
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        if let Some(ref abort) = self.abort {
            abort.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Schedules a timer to fire once after `duration`.
pub trait Delay: Send + Sync {
    fn after(&self, duration: Duration, timer: Timer) -> TimerHandle;
}

/// Tokio-backed delay. Fired timers arrive on the receiver returned by [`TokioDelay::new`].
pub struct TokioDelay {
    tx: mpsc::UnboundedSender<Timer>,
}

impl TokioDelay {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Timer>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Delay for TokioDelay {
    fn after(&self, duration: Duration, timer: Timer) -> TimerHandle {
        let handle = TimerHandle::new();
        let cancelled = Arc::clone(&handle.cancelled);
        let tx = self.tx.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if cancelled.load(Ordering::Acquire) {
                return;
            }
            if tx.send(timer).is_err() {
                debug!(timer_id = %timer.id, kind = ?timer.kind, "Timer fired after receiver closed");
            }
        });

        handle.with_abort(task.abort_handle())
    }
}

/// Manually advanced clock for deterministic tests and replays.
pub struct ManualDelay {
    clock: Mutex<ManualClock>,
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    seq: u64,
    scheduled: Vec<ScheduledTimer>,
}

struct ScheduledTimer {
    due: Duration,
    seq: u64,
    timer: Timer,
    handle: TimerHandle,
}

impl ManualDelay {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            clock: Mutex::new(ManualClock::default()),
        })
    }

    /// Move the clock forward and return every live timer that came due,
    /// earliest first.
    pub fn advance(&self, by: Duration) -> Vec<Timer> {
        let mut clock = self.lock();
        clock.now += by;
        let now = clock.now;

        let mut due: Vec<ScheduledTimer> = Vec::new();
        let mut remaining = Vec::with_capacity(clock.scheduled.len());
        for entry in clock.scheduled.drain(..) {
            if entry.handle.is_cancelled() {
                continue;
            }
            if entry.due <= now {
                due.push(entry);
            } else {
                remaining.push(entry);
            }
        }
        clock.scheduled = remaining;

        due.sort_by_key(|e| (e.due, e.seq));
        due.into_iter().map(|e| e.timer).collect()
    }

    /// Number of timers still waiting to fire.
    pub fn pending(&self) -> usize {
        self.lock()
            .scheduled
            .iter()
            .filter(|e| !e.handle.is_cancelled())
            .count()
    }

    /// Time elapsed on the manual clock.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualClock> {
        self.clock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Delay for ManualDelay {
    fn after(&self, duration: Duration, timer: Timer) -> TimerHandle {
        let handle = TimerHandle::new();
        let mut clock = self.lock();
        clock.seq += 1;
        let entry = ScheduledTimer {
            due: clock.now + duration,
            seq: clock.seq,
            timer,
            handle: handle.clone(),
        };
        clock.scheduled.push(entry);
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer(kind: TimerKind) -> Timer {
        Timer {
            id: Uuid::new_v4(),
            session: Uuid::nil(),
            kind,
        }
    }

    #[test]
    fn manual_fires_in_due_order() {
        let delay = ManualDelay::new();
        let late = timer(TimerKind::BioFinish);
        let early = timer(TimerKind::LoginRedirect);
        delay.after(Duration::from_millis(1200), late);
        delay.after(Duration::from_millis(500), early);
        assert_eq!(delay.pending(), 2);

        assert!(delay.advance(Duration::from_millis(499)).is_empty());
        assert_eq!(delay.advance(Duration::from_millis(1)), vec![early]);
        assert_eq!(delay.advance(Duration::from_secs(5)), vec![late]);
        assert_eq!(delay.pending(), 0);
        assert_eq!(delay.now(), Duration::from_millis(5500));
    }

    #[test]
    fn manual_skips_cancelled() {
        let delay = ManualDelay::new();
        let handle = delay.after(Duration::from_millis(10), timer(TimerKind::Suggestion));
        handle.cancel();
        assert!(handle.is_cancelled());
        assert_eq!(delay.pending(), 0);
        assert!(delay.advance(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn manual_zero_delay_needs_an_advance() {
        let delay = ManualDelay::new();
        let t = timer(TimerKind::Suggestion);
        delay.after(Duration::ZERO, t);
        assert_eq!(delay.advance(Duration::ZERO), vec![t]);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_delay_delivers_after_sleep() {
        let (delay, mut rx) = TokioDelay::new();
        let t = timer(TimerKind::LoginRedirect);
        delay.after(Duration::from_millis(500), t);

        let fired = rx.recv().await.unwrap();
        assert_eq!(fired, t);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_delay_cancel_suppresses_delivery() {
        let (delay, mut rx) = TokioDelay::new();
        let cancelled = delay.after(Duration::from_millis(100), timer(TimerKind::Suggestion));
        let kept = timer(TimerKind::BioFinish);
        delay.after(Duration::from_millis(200), kept);
        cancelled.cancel();

        assert_eq!(rx.recv().await.unwrap(), kept);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }
}

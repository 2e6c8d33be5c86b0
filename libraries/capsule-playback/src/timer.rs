//! Cancellable repeating tick timer
//!
//! The controller owns at most one [`TimerHandle`]. Every schedule gets a
//! fresh [`TimerId`]; ticks arrive back at the session loop tagged with it,
//! so ticks queued by a replaced timer can be told apart and dropped.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identity of one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

impl TimerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }

    /// The id after this one
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Starts repeating timers
pub trait TickScheduler: Send {
    /// Fire `id` every `period`, first fire one period from now
    fn schedule(&mut self, id: TimerId, period: Duration) -> Box<dyn TimerHandle>;
}

/// Owned handle to a running timer
///
/// Dropping the handle must stop the timer as well.
pub trait TimerHandle: Send {
    fn id(&self) -> TimerId;

    /// Stop firing. Idempotent.
    fn cancel(&mut self);

    fn is_cancelled(&self) -> bool;
}

/// Scheduler that never fires on its own
///
/// Ticks are driven by calling the controller directly. Used when the
/// caller runs its own clock (tests, embedding in another event loop).
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualScheduler;

impl TickScheduler for ManualScheduler {
    fn schedule(&mut self, id: TimerId, _period: Duration) -> Box<dyn TimerHandle> {
        Box::new(ManualTimer {
            id,
            cancelled: false,
        })
    }
}

#[derive(Debug)]
struct ManualTimer {
    id: TimerId,
    cancelled: bool,
}

impl TimerHandle for ManualTimer {
    fn id(&self) -> TimerId {
        self.id
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[cfg(feature = "tokio-timer")]
pub use self::tokio_timer::{TokioTickScheduler, TokioTimer};

#[cfg(feature = "tokio-timer")]
mod tokio_timer {
    use super::{TickScheduler, TimerHandle, TimerId};
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedSender;
    use tokio::task::JoinHandle;
    use tokio::time::{self, Instant, MissedTickBehavior};

    /// Scheduler backed by tokio intervals
    ///
    /// Each timer is a spawned task that sends its id into `tx` once per
    /// period. Must be used from within a tokio runtime.
    #[derive(Debug, Clone)]
    pub struct TokioTickScheduler {
        tx: UnboundedSender<TimerId>,
    }

    impl TokioTickScheduler {
        pub fn new(tx: UnboundedSender<TimerId>) -> Self {
            Self { tx }
        }
    }

    impl TickScheduler for TokioTickScheduler {
        fn schedule(&mut self, id: TimerId, period: Duration) -> Box<dyn TimerHandle> {
            let tx = self.tx.clone();
            let task = tokio::spawn(async move {
                let mut interval = time::interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    interval.tick().await;
                    if tx.send(id).is_err() {
                        // Session loop is gone
                        break;
                    }
                }
            });

            tracing::debug!("Scheduled timer {} every {:?}", id.raw(), period);
            Box::new(TokioTimer {
                id,
                task: Some(task),
            })
        }
    }

    /// Handle to a tokio interval task; aborts the task on cancel and drop
    #[derive(Debug)]
    pub struct TokioTimer {
        id: TimerId,
        task: Option<JoinHandle<()>>,
    }

    impl TimerHandle for TokioTimer {
        fn id(&self) -> TimerId {
            self.id
        }

        fn cancel(&mut self) {
            if let Some(task) = self.task.take() {
                task.abort();
                tracing::debug!("Cancelled timer {}", self.id.raw());
            }
        }

        fn is_cancelled(&self) -> bool {
            self.task.is_none()
        }
    }

    impl Drop for TokioTimer {
        fn drop(&mut self) {
            self.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_ids_advance() {
        let id = TimerId::new(7);
        assert_eq!(id.next().raw(), 8);
        assert_eq!(TimerId::new(u64::MAX).next().raw(), 0);
    }

    #[test]
    fn manual_timer_cancel_is_idempotent() {
        let mut scheduler = ManualScheduler;
        let mut handle = scheduler.schedule(TimerId::new(1), Duration::from_secs(1));
        assert!(!handle.is_cancelled());

        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
        assert_eq!(handle.id(), TimerId::new(1));
    }

    #[cfg(feature = "tokio-timer")]
    mod tokio_scheduler {
        use super::super::*;
        use tokio::sync::mpsc;

        #[tokio::test(start_paused = true)]
        async fn fires_once_per_period() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut scheduler = TokioTickScheduler::new(tx);
            let start = tokio::time::Instant::now();

            let _handle = scheduler.schedule(TimerId::new(3), Duration::from_secs(1));

            for n in 1..=3u64 {
                let id = rx.recv().await.unwrap();
                assert_eq!(id, TimerId::new(3));
                assert_eq!(start.elapsed(), Duration::from_secs(n));
            }
        }

        #[tokio::test(start_paused = true)]
        async fn cancel_stops_ticks() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut scheduler = TokioTickScheduler::new(tx);

            let mut handle = scheduler.schedule(TimerId::new(1), Duration::from_secs(1));
            assert_eq!(rx.recv().await, Some(TimerId::new(1)));

            handle.cancel();
            assert!(handle.is_cancelled());

            let next = tokio::time::timeout(Duration::from_secs(10), rx.recv()).await;
            assert!(next.is_err(), "cancelled timer kept firing");
        }

        #[tokio::test(start_paused = true)]
        async fn drop_stops_ticks() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut scheduler = TokioTickScheduler::new(tx);

            let handle = scheduler.schedule(TimerId::new(9), Duration::from_secs(1));
            drop(handle);

            let next = tokio::time::timeout(Duration::from_secs(10), rx.recv()).await;
            assert!(next.is_err(), "dropped timer kept firing");
        }
    }
}

//! Fixed-period task runner.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// A unit of recurring work.
#[async_trait]
pub trait PeriodicTask: Send + Sync {
    fn name(&self) -> &str;

    /// Do the work once. Failures are the task's own business.
    async fn run(&self);
}

/// Fires one task on a fixed period.
///
/// The first firing happens one full period after [`Scheduler::run`] starts.
/// Ticks missed while a run was in progress (or the machine slept) are
/// dropped, not replayed. Runs never overlap.
#[derive(Debug, Clone)]
pub struct Scheduler {
    period: Duration,
}

impl Scheduler {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run until `shutdown` flips to `true` or its sender goes away.
    ///
    /// Returns how many times the task fired.
    pub async fn run(&self, task: Arc<dyn PeriodicTask>, mut shutdown: watch::Receiver<bool>) -> u64 {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let name = task.name().to_string();
        tracing::info!(task = %name, period_secs = self.period.as_secs(), "Task scheduled");

        let mut fired = 0u64;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    tracing::debug!(task = %name, "Executing task");
                    task.run().await;
                    fired += 1;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!(task = %name, "Task received shutdown signal");
                        break;
                    }
                }
            }
        }

        tracing::info!(task = %name, fired, "Task stopped");
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct Counting {
        runs: AtomicU32,
    }

    #[async_trait]
    impl PeriodicTask for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        async fn run(&self) {
            self.runs.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_fire_after_one_period() {
        let task = Arc::new(Counting::default());
        let (tx, rx) = watch::channel(false);
        let scheduler = Scheduler::new(Duration::from_secs(300));
        let handle = tokio::spawn({
            let task = task.clone();
            async move { scheduler.run(task, rx).await }
        });

        settle().await;
        tokio::time::advance(Duration::from_secs(299)).await;
        settle().await;
        assert_eq!(task.runs.load(Ordering::SeqCst), 0);

        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(task.runs.load(Ordering::SeqCst), 1);

        tx.send(true).unwrap();
        assert_eq!(handle.await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missed_ticks_are_skipped() {
        let task = Arc::new(Counting::default());
        let (tx, rx) = watch::channel(false);
        let scheduler = Scheduler::new(Duration::from_secs(300));
        let handle = tokio::spawn({
            let task = task.clone();
            async move { scheduler.run(task, rx).await }
        });

        settle().await;
        tokio::time::advance(Duration::from_secs(1000)).await;
        settle().await;
        assert_eq!(task.runs.load(Ordering::SeqCst), 1);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_dropped_sender_stops_scheduler() {
        let task = Arc::new(Counting::default());
        let (tx, rx) = watch::channel(false);
        drop(tx);

        let fired = Scheduler::new(Duration::from_secs(3600)).run(task, rx).await;
        assert_eq!(fired, 0);
    }
}

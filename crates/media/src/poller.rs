//! Repeating position poll.

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a running poll task. Dropping it stops the task.
#[derive(Debug)]
pub struct PollTimer {
    task: JoinHandle<()>,
    period: Duration,
}

impl PollTimer {
    /// Spawn a task on `runtime` that calls `tick` every `period`.
    ///
    /// The first call happens one full period after spawning. The task ends
    /// on its own once `tick` returns `false`. Periods under a millisecond
    /// are raised to one.
    pub fn spawn<F>(runtime: &Handle, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let start = tokio::time::Instant::now() + period;
        let task = runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !tick() {
                    break;
                }
            }
        });

        Self { task, period }
    }

    /// Poll period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the task has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the task.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_at_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let timer = PollTimer::spawn(&Handle::current(), Duration::from_secs(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2600)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(timer.period(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let timer = PollTimer::spawn(&Handle::current(), Duration::from_secs(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        timer.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_tick_declines() {
        let timer = PollTimer::spawn(&Handle::current(), Duration::from_secs(1), || false);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(timer.is_finished());
    }
}

//! Per-question countdown timer.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

/// One tick of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Question the countdown was started for.
    pub question: usize,
    /// Seconds left after this tick.
    pub remaining: u32,
}

/// A cancellable once-per-second countdown running on its own task.
///
/// Ticks are delivered through [`Countdown::next_tick`]. The task is aborted
/// on [`cancel`](Countdown::cancel) and when the countdown is dropped, so a
/// countdown can never outlive the question it belongs to.
pub struct Countdown {
    handle: JoinHandle<()>,
    ticks: mpsc::Receiver<Tick>,
}

impl Countdown {
    /// Start counting down `seconds` for `question`. The first tick arrives
    /// one second from now; the last one carries `remaining == 0`.
    pub fn start(question: usize, seconds: u32) -> Self {
        Self::with_period(question, seconds, Duration::from_secs(1))
    }

    pub fn with_period(question: usize, seconds: u32, period: Duration) -> Self {
        let (tx, ticks) = mpsc::channel(4);
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            for remaining in (0..seconds).rev() {
                interval.tick().await;
                if tx.send(Tick { question, remaining }).await.is_err() {
                    break;
                }
            }
        });

        Self {
            handle,
            ticks,
        }
    }

    /// Wait for the next tick. Returns `None` once the countdown has run out
    /// or been cancelled.
    pub async fn next_tick(&mut self) -> Option<Tick> {
        self.ticks.recv().await
    }

    pub fn cancel(&mut self) {
        self.handle.abort();
        self.ticks.close();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

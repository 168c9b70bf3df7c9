// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-interval poll loops.
//!
//! A loop runs its task once per tick and awaits the cycle before waiting for
//! the next tick, so a task never overlaps itself. Late ticks are delayed, not
//! bursted. A failed cycle is logged and the next tick retries; only the
//! cancellation token ends the loop.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shopfloor_core::ShopfloorError;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One unit of periodic work.
#[async_trait]
pub trait PollTask: Send + Sync {
    /// Loop name used in logs.
    fn name(&self) -> &str;

    /// Run one cycle.
    async fn run_cycle(&self) -> Result<(), ShopfloorError>;
}

/// Drive `task` every `period` until `cancel` fires.
///
/// The first cycle runs immediately. Returns the number of cycles started.
pub async fn run_poll_loop(
    task: Arc<dyn PollTask>,
    period: Duration,
    cancel: CancellationToken,
) -> u64 {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut cycles = 0u64;

    info!(task = task.name(), period_ms = period.as_millis() as u64, "poll loop started");
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(task = task.name(), cycles, "poll loop shutting down");
                break;
            }
            _ = interval.tick() => {
                cycles += 1;
                match task.run_cycle().await {
                    Ok(()) => debug!(task = task.name(), cycle = cycles, "poll cycle completed"),
                    Err(e) => warn!(
                        task = task.name(),
                        cycle = cycles,
                        transient = e.is_transient(),
                        error = %e,
                        "poll cycle failed (non-fatal)"
                    ),
                }
            }
        }
    }
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct Flaky {
        calls: AtomicU64,
    }

    #[async_trait]
    impl PollTask for Flaky {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn run_cycle(&self) -> Result<(), ShopfloorError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n % 2 == 0 {
                Err(ShopfloorError::storage("gateway unreachable"))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test(start_paused = true)]
    #[tracing_test::traced_test]
    async fn failures_do_not_stop_the_loop() {
        let task = Arc::new(Flaky {
            calls: AtomicU64::new(0),
        });
        let cancel = CancellationToken::new();
        let stop = async {
            tokio::time::sleep(Duration::from_millis(6_500)).await;
            cancel.cancel();
        };
        let (cycles, ()) = tokio::join!(
            run_poll_loop(task.clone(), Duration::from_secs(2), cancel.clone()),
            stop
        );

        assert_eq!(cycles, 4);
        assert_eq!(task.calls.load(Ordering::SeqCst), 4);
        assert!(logs_contain("poll cycle failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_before_start_runs_nothing() {
        let task = Arc::new(Flaky {
            calls: AtomicU64::new(0),
        });
        let cancel = CancellationToken::new();
        cancel.cancel();
        let cycles = run_poll_loop(task.clone(), Duration::from_secs(1), cancel).await;
        assert_eq!(cycles, 0);
    }

    struct Slow {
        running: AtomicU64,
        max_running: AtomicU64,
    }

    #[async_trait]
    impl PollTask for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        async fn run_cycle(&self) -> Result<(), ShopfloorError> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_running.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(5)).await;
            self.running.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_cycles_never_overlap() {
        let task = Arc::new(Slow {
            running: AtomicU64::new(0),
            max_running: AtomicU64::new(0),
        });
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_poll_loop(
            task.clone(),
            Duration::from_secs(1),
            cancel.clone(),
        ));
        tokio::time::sleep(Duration::from_secs(30)).await;
        cancel.cancel();
        handle.await.unwrap();
        assert_eq!(task.max_running.load(Ordering::SeqCst), 1);
    }
}

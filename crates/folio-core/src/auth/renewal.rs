use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Recurring background task that fires once per period until disarmed.
///
/// Arming replaces any running task, so the first tick always comes one
/// full period after the most recent `arm`. Dropping the timer aborts it.
#[derive(Debug, Default)]
pub struct RenewalTimer {
    handle: Option<JoinHandle<()>>,
}

impl RenewalTimer {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Start (or restart) the timer. `on_tick` returning `None` ends the task.
    pub fn arm<F, Fut>(&mut self, period: Duration, on_tick: F)
    where
        F: Fn() -> Option<Fut> + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.disarm();
        debug!(period_secs = period.as_secs(), "Arming renewal timer");

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match on_tick() {
                    Some(tick) => tick.await,
                    None => break,
                }
            }
        });
        self.handle = Some(handle);
    }

    /// Stop the timer if it is running
    pub fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("Disarming renewal timer");
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for RenewalTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

//! Defines the tokio-backed tick host and task helpers.

use std::time::Duration;

use log::error;
use tokio::runtime::Handle;

use crate::animations::{Scheduler, TickCallback, TickHost};
use crate::errors::{Error, RuntimeError};

/// A [`TickHost`] for environments without a native frame primitive: each requested frame is a
/// tokio task sleeping `interval` before running the tick.
///
/// The default interval is zero: frames are delivered as soon as the runtime gets to them.
/// Errors returned by a tick are logged (the tick host has no caller to report them to).
#[derive(Clone, Debug)]
pub struct TimerHost {
    runtime: Handle,
    interval: Duration,
}

impl TimerHost {
    /// Creates a timer host on the current tokio runtime.
    ///
    /// # Errors
    /// * `RuntimeError`: called outside a tokio runtime.
    pub fn try_current() -> Result<Self, Error> {
        let runtime = Handle::try_current().map_err(|_| RuntimeError)?;
        Ok(Self {
            runtime,
            interval: Duration::ZERO,
        })
    }

    /// Sets the delay between two frames (in ms).
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = Duration::from_millis(interval);
        self
    }

    pub fn get_interval(&self) -> Duration {
        self.interval
    }
}

impl TickHost for TimerHost {
    fn request_next_tick(&self, callback: TickCallback) {
        let interval = self.interval;
        self.runtime.spawn(async move {
            match interval.is_zero() {
                true => tokio::task::yield_now().await,
                false => tokio::time::sleep(interval).await,
            }
            if let Err(err) = callback() {
                error!("Animation tick failed: {}", err);
            }
        });
    }
}

/// Waits (asynchronously) until the scheduler has no animation left in flight.
///
/// The scheduler is polled every `poll` ms.
pub async fn until_idle(scheduler: &Scheduler, poll: u64) {
    while !scheduler.is_idle() {
        tokio::time::sleep(Duration::from_millis(poll)).await;
    }
}

/// Sleeps (asynchronously) for the given number of ms.
#[macro_export]
macro_rules! pause {
    ($ms:expr) => {
        $crate::utils::sleep(std::time::Duration::from_millis($ms as u64)).await
    };
}

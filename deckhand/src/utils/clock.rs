//! Defines the time source used by the scheduler and the card interactions.

use std::fmt::Debug;
use std::time::Instant;

/// A monotonic time source, in milliseconds.
///
/// The origin is arbitrary: only differences between two readings are meaningful.
pub trait Clock: Debug + Send + Sync {
    /// Returns the current time in milliseconds.
    fn now(&self) -> u64;
}

/// The default [`Clock`]: milliseconds elapsed since the clock creation.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::default();
        let first = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = clock.now();
        assert!(second >= first + 5, "{} should be after {}", second, first);
    }
}

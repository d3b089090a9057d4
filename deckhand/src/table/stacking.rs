use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Shared, monotonically growing z-order counter.
///
/// Every card lifted "to the top" takes the current value and increments it, so the most recently
/// moved card is drawn above all others. Clones share the same counter.
#[derive(Clone, Debug)]
pub struct Stacking {
    counter: Arc<AtomicI64>,
}

impl Stacking {
    pub fn new(base: i64) -> Self {
        Self {
            counter: Arc::new(AtomicI64::new(base)),
        }
    }

    /// Returns the current top value and increments the counter.
    pub fn next(&self) -> i64 {
        self.counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Decrements the counter and returns the new value (just below the last handed out).
    pub fn previous(&self) -> i64 {
        self.counter.fetch_sub(1, Ordering::SeqCst) - 1
    }

    /// Returns the value the next call to [`Self::next`] would hand out.
    pub fn peek(&self) -> i64 {
        self.counter.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stacking_counter() {
        let stacking = Stacking::new(52);
        assert_eq!(stacking.next(), 52);
        assert_eq!(stacking.next(), 53);
        assert_eq!(stacking.peek(), 54);
        assert_eq!(stacking.previous(), 53);
        assert_eq!(stacking.peek(), 53);

        // Clones share the counter.
        let clone = stacking.clone();
        assert_eq!(clone.next(), 53);
        assert_eq!(stacking.peek(), 54);
    }
}

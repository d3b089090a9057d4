use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::animations::{TickCallback, TickHost};
use crate::errors::{Error, Unknown};
use crate::mocks::ManualClock;

/// Upper bound of frames run by [`ManualHost::run_until_idle`].
const MAX_FRAMES: usize = 100_000;

/// A [`TickHost`] delivering frames on demand. Clones share the same pending frames.
#[derive(Clone, Default)]
pub struct ManualHost {
    pending: Arc<Mutex<Vec<TickCallback>>>,
    requests: Arc<AtomicUsize>,
}

impl ManualHost {
    /// Runs every frame callback requested so far.
    /// Frames requested by those callbacks are kept for the next call.
    ///
    /// Returns the number of callbacks run, or the first error one of them returned.
    pub fn run_frame(&self) -> Result<usize, Error> {
        let callbacks = std::mem::take(&mut *self.pending.lock());
        let count = callbacks.len();
        let mut outcome = Ok(count);
        for callback in callbacks {
            if let Err(err) = callback() {
                if outcome.is_ok() {
                    outcome = Err(err);
                }
            }
        }
        outcome
    }

    /// Runs frames, advancing `clock` by `step` ms before each, until no frame is requested.
    ///
    /// Returns the number of frames run.
    pub fn run_until_idle(&self, clock: &ManualClock, step: u64) -> Result<usize, Error> {
        let mut frames = 0;
        while self.pending() > 0 {
            if frames >= MAX_FRAMES {
                return Err(Unknown {
                    info: format!("still animating after {} frames", MAX_FRAMES),
                });
            }
            clock.advance(step);
            self.run_frame()?;
            frames += 1;
        }
        Ok(frames)
    }

    /// Returns the number of frames requested and not yet run.
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Returns the total number of frames ever requested.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl TickHost for ManualHost {
    fn request_next_tick(&self, callback: TickCallback) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.pending.lock().push(callback);
    }
}

impl Debug for ManualHost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualHost")
            .field("pending", &self.pending())
            .field("requests", &self.requests())
            .finish()
    }
}

use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Weak};

use log::trace;
use parking_lot::Mutex;

use crate::errors::Error;
use crate::utils::Clock;

/// Callback given to a [`TickHost`]: runs one scheduler tick.
pub type TickCallback = Box<dyn FnOnce() -> Result<(), Error> + Send>;

type Hook = Box<dyn FnMut() -> Result<(), Error> + Send>;
type ProgressHook = Box<dyn FnMut(f32) -> Result<(), Error> + Send>;

/// The host environment "next frame" primitive.
///
/// The scheduler calls [`TickHost::request_next_tick`] once per frame it wants while animations
/// are in flight, and stops calling it when none are left.
pub trait TickHost: Debug + Send + Sync {
    /// Asks the host to invoke `callback` on its next frame.
    fn request_next_tick(&self, callback: TickCallback);
}

/// Lifecycle slots of an animation: shared between the scheduler record and its handle(s).
#[derive(Default)]
struct Slots {
    on_start: Option<Hook>,
    on_progress: Option<ProgressHook>,
    on_end: Option<Hook>,
    cancelled: bool,
}

/// Describes an animation before it is submitted to a [`Scheduler`]: a time window relative to
/// the submission time, and its (optional) lifecycle callbacks.
///
/// Unlike [`Scheduler::schedule`] followed by callback registration on the handle, a request
/// carries its callbacks into the scheduler atomically.
///
/// # Example
/// ```
/// use deckhand::animations::AnimationRequest;
///
/// let request = AnimationRequest::new(250, 0)
///     .on_start(|| {
///         println!("250ms elapsed");
///         Ok(())
///     });
/// assert_eq!(request.get_delay(), 250);
/// ```
pub struct AnimationRequest {
    delay: u64,
    duration: u64,
    slots: Slots,
}

impl AnimationRequest {
    /// Creates an animation request starting after `delay` ms and lasting `duration` ms.
    pub fn new(delay: u64, duration: u64) -> Self {
        Self {
            delay,
            duration,
            slots: Slots::default(),
        }
    }

    /// Registers the callback fired once, when the animation window opens.
    pub fn on_start<F>(mut self, callback: F) -> Self
    where
        F: FnMut() -> Result<(), Error> + Send + 'static,
    {
        self.slots.on_start = Some(Box::new(callback));
        self
    }

    /// Registers the callback fired on every tick with the clamped progress (0 to 1).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: FnMut(f32) -> Result<(), Error> + Send + 'static,
    {
        self.slots.on_progress = Some(Box::new(callback));
        self
    }

    /// Registers the callback fired once, after the last progress.
    pub fn on_end<F>(mut self, callback: F) -> Self
    where
        F: FnMut() -> Result<(), Error> + Send + 'static,
    {
        self.slots.on_end = Some(Box::new(callback));
        self
    }

    pub fn get_delay(&self) -> u64 {
        self.delay
    }

    pub fn get_duration(&self) -> u64 {
        self.duration
    }
}

impl Debug for AnimationRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationRequest")
            .field("delay", &self.delay)
            .field("duration", &self.duration)
            .finish()
    }
}

/// Handle on a scheduled animation.
///
/// Each lifecycle slot holds a single callback: registering again replaces the previous one.
/// Registering a callback after the corresponding lifecycle step already happened has no effect.
#[derive(Clone)]
pub struct AnimationHandle {
    id: u64,
    start: u64,
    end: u64,
    slots: Arc<Mutex<Slots>>,
}

impl AnimationHandle {
    /// Registers the callback fired once, when the animation window opens.
    pub fn on_start<F>(self, callback: F) -> Self
    where
        F: FnMut() -> Result<(), Error> + Send + 'static,
    {
        self.slots.lock().on_start = Some(Box::new(callback));
        self
    }

    /// Registers the callback fired on every tick with the clamped progress (0 to 1).
    pub fn on_progress<F>(self, callback: F) -> Self
    where
        F: FnMut(f32) -> Result<(), Error> + Send + 'static,
    {
        self.slots.lock().on_progress = Some(Box::new(callback));
        self
    }

    /// Registers the callback fired once, after the last progress.
    pub fn on_end<F>(self, callback: F) -> Self
    where
        F: FnMut() -> Result<(), Error> + Send + 'static,
    {
        self.slots.lock().on_end = Some(Box::new(callback));
        self
    }

    /// Cancels the animation: it is dropped on the next tick without firing any further callback.
    pub fn cancel(&self) {
        self.slots.lock().cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.slots.lock().cancelled
    }

    pub fn get_id(&self) -> u64 {
        self.id
    }

    /// Returns the (scheduler clock) time at which the animation starts.
    pub fn get_start(&self) -> u64 {
        self.start
    }

    /// Returns the (scheduler clock) time at which the animation ends.
    pub fn get_end(&self) -> u64 {
        self.end
    }

    pub fn get_duration(&self) -> u64 {
        self.end - self.start
    }
}

impl Debug for AnimationHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationHandle")
            .field("id", &self.id)
            .field("start", &self.start)
            .field("end", &self.end)
            .finish()
    }
}

/// An in-flight animation, owned by the scheduler.
struct AnimationRecord {
    id: u64,
    start: u64,
    end: u64,
    started: bool,
    slots: Arc<Mutex<Slots>>,
}

impl AnimationRecord {
    fn is_cancelled(&self) -> bool {
        self.slots.lock().cancelled
    }

    /// Clamped progress at the given time. A zero-length window is always complete.
    fn progress(&self, now: u64) -> f32 {
        match self.end > self.start {
            false => 1.0,
            true => {
                let elapsed = now.saturating_sub(self.start) as f32;
                (elapsed / (self.end - self.start) as f32).clamp(0.0, 1.0)
            }
        }
    }

    /// Runs the lifecycle step for `now` (the caller checked `now >= start`).
    fn advance(&mut self, now: u64) -> Result<(), Error> {
        if !self.started {
            self.started = true;
            self.fire(|slots| &mut slots.on_start)?;
        }
        self.fire_progress(self.progress(now))?;
        if now > self.end {
            self.fire(|slots| &mut slots.on_end)?;
        }
        Ok(())
    }

    /// Calls a hook without holding the slots lock: the hook may re-register itself.
    fn fire(&self, slot: fn(&mut Slots) -> &mut Option<Hook>) -> Result<(), Error> {
        let hook = slot(&mut self.slots.lock()).take();
        match hook {
            None => Ok(()),
            Some(mut hook) => {
                let result = hook();
                let mut slots = self.slots.lock();
                let slot = slot(&mut slots);
                if slot.is_none() {
                    *slot = Some(hook);
                }
                result
            }
        }
    }

    fn fire_progress(&self, progress: f32) -> Result<(), Error> {
        let hook = self.slots.lock().on_progress.take();
        match hook {
            None => Ok(()),
            Some(mut hook) => {
                let result = hook(progress);
                let mut slots = self.slots.lock();
                if slots.on_progress.is_none() {
                    slots.on_progress = Some(hook);
                }
                result
            }
        }
    }
}

#[derive(Default)]
struct SchedulerState {
    /// In-flight animations, in registration order.
    active: Vec<AnimationRecord>,
    /// The outstanding frame request, if any.
    frame: Option<u64>,
    /// A tick holds the active set.
    in_tick: bool,
    next_frame: u64,
    next_id: u64,
}

struct Shared {
    state: Mutex<SchedulerState>,
    clock: Arc<dyn Clock>,
    host: Arc<dyn TickHost>,
}

/// Advances every in-flight animation once per host frame.
///
/// The scheduler is a cheap clone-handle: all clones share the same active set. It is created
/// once per [`Table`](crate::table::Table) and shared by every deck and card created on it.
///
/// - While at least one animation is in flight, the scheduler requests consecutive frames from
///   its [`TickHost`]. Once the active set is empty it stops; the next [`Self::schedule`] call
///   starts it again.
/// - Progress is computed from the [`Clock`], not from the frame count: a long pause between two
///   frames skips intermediate values.
/// - Callbacks are never invoked while the scheduler is locked: they may schedule new
///   animations, which join the active set after the current tick.
#[derive(Clone)]
pub struct Scheduler {
    shared: Arc<Shared>,
}

impl Scheduler {
    /// Creates a scheduler reading time from `clock` and requesting frames from `host`.
    pub fn new<C, H>(clock: C, host: H) -> Self
    where
        C: Clock + 'static,
        H: TickHost + 'static,
    {
        Self::from_parts(Arc::new(clock), Arc::new(host))
    }

    pub(crate) fn from_parts(clock: Arc<dyn Clock>, host: Arc<dyn TickHost>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SchedulerState::default()),
                clock,
                host,
            }),
        }
    }

    /// Schedules an animation starting `delay` ms from now, lasting `duration` ms.
    ///
    /// Callbacks are registered on the returned handle.
    ///
    /// # Example
    /// ```ignore
    /// use deckhand::animations::Scheduler;
    /// use deckhand::mocks::{ManualClock, ManualHost};
    ///
    /// let clock = ManualClock::default();
    /// let host = ManualHost::default();
    /// let scheduler = Scheduler::new(clock.clone(), host.clone());
    ///
    /// scheduler.schedule(0, 100).on_progress(|t| {
    ///     println!("progress {}", t);
    ///     Ok(())
    /// });
    ///
    /// clock.advance(50);
    /// host.run_frame().unwrap();
    /// ```
    pub fn schedule(&self, delay: u64, duration: u64) -> AnimationHandle {
        self.submit(AnimationRequest::new(delay, duration))
    }

    /// Schedules an animation described by an [`AnimationRequest`].
    pub fn submit(&self, request: AnimationRequest) -> AnimationHandle {
        let start = self.now().saturating_add(request.delay);
        let end = start.saturating_add(request.duration);
        let slots = Arc::new(Mutex::new(request.slots));

        let id = {
            let mut state = self.shared.state.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.active.push(AnimationRecord {
                id,
                start,
                end,
                started: false,
                slots: slots.clone(),
            });
            id
        };
        trace!("Animation #{} scheduled [{}ms - {}ms]", id, start, end);
        self.request_frame();

        AnimationHandle {
            id,
            start,
            end,
            slots,
        }
    }

    /// Advances every in-flight animation to the current clock time.
    ///
    /// Hosts call this through the callback given to [`TickHost::request_next_tick`]; it can also
    /// be called directly.
    ///
    /// # Errors
    /// The first error returned by a callback aborts the tick: animations not yet advanced keep
    /// their state, frame requests stop, and the error is returned. The next call to
    /// [`Self::schedule`] starts ticking again.
    pub fn tick(&self) -> Result<(), Error> {
        let now = self.now();
        let mut records = {
            let mut state = self.shared.state.lock();
            if state.active.is_empty() {
                return Ok(());
            }
            state.in_tick = true;
            std::mem::take(&mut state.active)
        };
        trace!("Tick at {}ms: {} animation(s)", now, records.len());

        let mut outcome = Ok(());
        let mut index = 0;
        while index < records.len() {
            let record = &mut records[index];
            if record.is_cancelled() {
                trace!("Animation #{} cancelled", record.id);
                records.remove(index);
                continue;
            }
            if now < record.start {
                index += 1;
                continue;
            }

            let finished = now > record.end;
            let result = record.advance(now);
            if finished {
                records.remove(index);
            } else {
                index += 1;
            }
            if let Err(error) = result {
                outcome = Err(error);
                break;
            }
        }

        let keep_ticking = {
            let mut state = self.shared.state.lock();
            let scheduled_meanwhile = std::mem::take(&mut state.active);
            records.extend(scheduled_meanwhile);
            state.active = records;
            state.in_tick = false;
            outcome.is_ok() && !state.active.is_empty()
        };
        if keep_ticking {
            self.request_frame();
        }
        outcome
    }

    /// Returns the current scheduler clock time.
    pub fn now(&self) -> u64 {
        self.shared.clock.now()
    }

    /// Returns the number of animations in flight (including not yet started ones).
    ///
    /// Called from within a tick, only counts the animations scheduled during that tick.
    pub fn len(&self) -> usize {
        self.shared.state.lock().active.len()
    }

    /// Indicates whether no animation is in flight (nor a tick running).
    pub fn is_idle(&self) -> bool {
        let state = self.shared.state.lock();
        state.active.is_empty() && !state.in_tick
    }

    /// Indicates whether a frame has been requested from the host and not yet delivered.
    pub fn is_ticking(&self) -> bool {
        self.shared.state.lock().frame.is_some()
    }

    /// Requests a frame from the host, unless one is already outstanding.
    fn request_frame(&self) {
        let frame = {
            let mut state = self.shared.state.lock();
            if state.frame.is_some() {
                return;
            }
            let frame = state.next_frame;
            state.next_frame += 1;
            state.frame = Some(frame);
            frame
        };

        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        self.shared.host.request_next_tick(Box::new(move || {
            match weak.upgrade() {
                // The scheduler is gone: nothing left to animate.
                None => Ok(()),
                Some(shared) => Scheduler { shared }.on_frame(frame),
            }
        }));
    }

    /// Frame delivered by the host.
    fn on_frame(&self, frame: u64) -> Result<(), Error> {
        {
            let mut state = self.shared.state.lock();
            if state.frame != Some(frame) {
                return Ok(());
            }
            state.frame = None;
        }
        self.tick()
    }
}

impl Debug for Scheduler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("Scheduler")
            .field("active", &state.active.len())
            .field("ticking", &state.frame.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::errors::Unknown;
    use crate::mocks::{ManualClock, ManualHost};

    use super::*;

    fn create_scheduler() -> (Scheduler, ManualClock, ManualHost) {
        let clock = ManualClock::default();
        let host = ManualHost::default();
        let scheduler = Scheduler::new(clock.clone(), host.clone());
        (scheduler, clock, host)
    }

    /// Records every lifecycle step as a string.
    fn journal_animation(handle: AnimationHandle) -> Arc<Mutex<Vec<String>>> {
        let journal = Arc::new(Mutex::new(vec![]));
        let (start, progress, end) = (journal.clone(), journal.clone(), journal.clone());
        handle
            .on_start(move || {
                start.lock().push(String::from("start"));
                Ok(())
            })
            .on_progress(move |t| {
                progress.lock().push(format!("{:.2}", t));
                Ok(())
            })
            .on_end(move || {
                end.lock().push(String::from("end"));
                Ok(())
            });
        journal
    }

    #[test]
    fn test_progress_is_monotonic_and_ends_at_one() {
        let (scheduler, clock, host) = create_scheduler();
        let journal = journal_animation(scheduler.schedule(100, 200));

        for _ in 0..20 {
            clock.advance(20);
            host.run_frame().unwrap();
        }

        let journal = journal.lock().clone();
        assert_eq!(journal.first().unwrap(), "start");
        assert_eq!(journal[1], "0.00");
        assert_eq!(journal.last().unwrap(), "end");
        assert_eq!(journal[journal.len() - 2], "1.00");

        let values: Vec<f32> = journal[1..journal.len() - 1]
            .iter()
            .map(|value| value.parse().unwrap())
            .collect();
        assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(values.iter().all(|value| (0.0..=1.0).contains(value)));
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_zero_duration_lifecycle() {
        let (scheduler, clock, host) = create_scheduler();
        let journal = journal_animation(scheduler.schedule(0, 0));

        host.run_frame().unwrap();
        assert_eq!(*journal.lock(), vec!["start", "1.00"]);

        clock.advance(1);
        host.run_frame().unwrap();
        assert_eq!(*journal.lock(), vec!["start", "1.00", "1.00", "end"]);
        assert!(scheduler.is_idle());
        assert!(!scheduler.is_ticking());
    }

    #[test]
    fn test_animation_waits_for_its_delay() {
        let (scheduler, clock, host) = create_scheduler();
        let journal = journal_animation(scheduler.schedule(50, 10));

        clock.advance(49);
        host.run_frame().unwrap();
        assert!(journal.lock().is_empty());
        assert!(scheduler.is_ticking());

        clock.advance(1);
        host.run_frame().unwrap();
        assert_eq!(*journal.lock(), vec!["start", "0.00"]);
    }

    #[test]
    fn test_frames_stop_when_idle_and_resume_lazily() {
        let (scheduler, clock, host) = create_scheduler();
        assert!(!scheduler.is_ticking());
        assert_eq!(host.pending(), 0);

        scheduler.schedule(0, 10);
        scheduler.schedule(0, 10);
        assert_eq!(host.pending(), 1, "A single frame is requested.");

        clock.advance(11);
        host.run_frame().unwrap();
        assert!(scheduler.is_idle());
        assert_eq!(host.pending(), 0, "No frame requested once idle.");

        scheduler.schedule(5, 5);
        assert_eq!(host.pending(), 1, "Ticking resumes on schedule.");
        assert_eq!(host.requests(), 2);
    }

    #[test]
    fn test_removal_during_iteration() {
        let (scheduler, clock, host) = create_scheduler();
        let ended = Arc::new(AtomicUsize::new(0));

        for duration in [10, 10, 50, 10] {
            let ended = ended.clone();
            let inner = scheduler.clone();
            scheduler.schedule(0, duration).on_end(move || {
                ended.fetch_add(1, Ordering::SeqCst);
                // Scheduling from a callback is allowed.
                inner.schedule(0, 100);
                Ok(())
            });
        }
        assert_eq!(scheduler.len(), 4);

        clock.advance(11);
        host.run_frame().unwrap();
        assert_eq!(ended.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.len(), 1 + 3);
    }

    #[test]
    fn test_cancelled_animation_never_fires() {
        let (scheduler, clock, host) = create_scheduler();
        let handle = scheduler.schedule(0, 100);
        let journal = journal_animation(handle.clone());

        clock.advance(10);
        host.run_frame().unwrap();
        handle.cancel();
        clock.advance(200);
        host.run_frame().unwrap();

        assert_eq!(*journal.lock(), vec!["start", "0.10"]);
        assert!(handle.is_cancelled());
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_registration_replaces_callback() {
        let (scheduler, clock, host) = create_scheduler();
        let counter = Arc::new(AtomicUsize::new(0));
        let (first, second) = (counter.clone(), counter.clone());

        scheduler
            .schedule(0, 0)
            .on_start(move || {
                first.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .on_start(move || {
                second.fetch_add(10, Ordering::SeqCst);
                Ok(())
            });

        clock.advance(1);
        host.run_frame().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_callback_error_stops_ticking() {
        let (scheduler, clock, host) = create_scheduler();
        scheduler.schedule(0, 10).on_end(|| {
            Err(Unknown {
                info: String::from("broken"),
            })
        });
        let survivor = journal_animation(scheduler.schedule(0, 100));

        clock.advance(20);
        let result = host.run_frame();
        assert!(result.is_err());
        assert!(!scheduler.is_ticking());
        assert!(survivor.lock().is_empty(), "The tick was aborted.");
        assert_eq!(scheduler.len(), 1);

        // Scheduling again resumes ticking.
        scheduler.schedule(0, 0);
        host.run_frame().unwrap();
        assert_eq!(*survivor.lock(), vec!["start", "0.20"]);
    }

    #[test]
    fn test_submit_request() {
        let (scheduler, clock, host) = create_scheduler();
        let counter = Arc::new(AtomicUsize::new(0));
        let moved_counter = counter.clone();

        let handle = scheduler.submit(AnimationRequest::new(10, 30).on_end(move || {
            moved_counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));
        assert_eq!(handle.get_start(), 10);
        assert_eq!(handle.get_end(), 40);
        assert_eq!(handle.get_duration(), 30);

        clock.advance(41);
        host.run_frame().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_far_future_animation_saturates() {
        let (scheduler, clock, host) = create_scheduler();
        clock.advance(5);
        let handle = scheduler.schedule(u64::MAX, 10);
        let journal = journal_animation(handle.clone());
        assert_eq!(handle.get_start(), u64::MAX);
        assert_eq!(handle.get_end(), u64::MAX);

        clock.advance(1000);
        host.run_frame().unwrap();
        assert!(journal.lock().is_empty());
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_stale_frames_are_ignored() {
        let (scheduler, clock, host) = create_scheduler();
        let journal = journal_animation(scheduler.schedule(0, 100));

        // A direct tick does not duplicate the outstanding frame request.
        clock.advance(10);
        scheduler.tick().unwrap();
        assert_eq!(host.pending(), 1);

        clock.advance(10);
        host.run_frame().unwrap();
        assert_eq!(*journal.lock(), vec!["start", "0.10", "0.20"]);
        assert_eq!(host.pending(), 1);
    }
}

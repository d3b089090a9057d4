use std::collections::VecDeque;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use log::{debug, warn};
use parking_lot::Mutex;

use crate::errors::{Error, QueueError};

type Action = Box<dyn FnOnce(Resume) -> Result<(), Error> + Send>;
type Hook = Box<dyn FnOnce() -> Result<(), Error> + Send>;

#[derive(Default)]
struct QueueState {
    /// Actions waiting for the active one to resume.
    pending: VecDeque<Action>,
    /// An action is running (or waiting for its asynchronous completion).
    active: bool,
    /// The drive loop is on the stack: resumes only flag the queue as available.
    driving: bool,
}

/// A FIFO of actions where only one action is active at a time.
///
/// Each action receives a [`Resume`] continuation: the next action starts once the active one
/// resumed. An action resuming synchronously (from within itself) does not grow the stack: the
/// queue loops over the next actions instead of recursing.
///
/// The queue is a cheap clone-handle.
///
/// # Example
/// ```
/// use deckhand::deck::ActionQueue;
///
/// let queue = ActionQueue::default();
/// queue.enqueue(|resume| {
///     println!("Runs right away: the queue was idle.");
///     resume.done()
/// }).unwrap();
/// assert!(queue.is_idle());
/// ```
#[derive(Clone, Default)]
pub struct ActionQueue {
    state: Arc<Mutex<QueueState>>,
}

impl ActionQueue {
    /// Enqueues an action. If the queue is idle, the action runs right away (inside this call).
    ///
    /// # Errors
    /// Errors returned by the actions run within this call, or by their synchronous resume.
    pub fn enqueue<F>(&self, action: F) -> Result<(), Error>
    where
        F: FnOnce(Resume) -> Result<(), Error> + Send + 'static,
    {
        self.state.lock().pending.push_back(Box::new(action));
        self.drive()
    }

    /// Packages an action function into a queueing function: each call enqueues the action with
    /// the given argument.
    ///
    /// # Example
    /// ```
    /// use deckhand::deck::ActionQueue;
    ///
    /// let queue = ActionQueue::default();
    /// let greet = queue.queued(|name: String, resume| {
    ///     println!("Hello {}", name);
    ///     resume.done()
    /// });
    /// greet(String::from("Alice")).unwrap();
    /// greet(String::from("Bob")).unwrap();
    /// ```
    pub fn queued<A, F>(&self, action: F) -> impl Fn(A) -> Result<(), Error>
    where
        A: Send + 'static,
        F: Fn(A, Resume) -> Result<(), Error> + Send + Sync + 'static,
    {
        let queue = self.clone();
        let action = Arc::new(action);
        move |argument: A| {
            let action = action.clone();
            queue.enqueue(move |resume| action(argument, resume))
        }
    }

    /// Returns the number of actions waiting (the active one excluded).
    pub fn len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Indicates whether an action is running or waiting for its resume.
    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }

    /// Indicates whether no action is active nor waiting.
    pub fn is_idle(&self) -> bool {
        let state = self.state.lock();
        !state.active && state.pending.is_empty()
    }

    /// Runs actions until one is left pending on an asynchronous resume, or none is left.
    fn drive(&self) -> Result<(), Error> {
        {
            let mut state = self.state.lock();
            if state.driving {
                return Ok(());
            }
            state.driving = true;
        }

        loop {
            let action = {
                let mut state = self.state.lock();
                if state.active {
                    state.driving = false;
                    return Ok(());
                }
                match state.pending.pop_front() {
                    None => {
                        state.driving = false;
                        return Ok(());
                    }
                    Some(action) => {
                        state.active = true;
                        action
                    }
                }
            };
            if let Err(err) = action(Resume::new(self.clone())) {
                self.state.lock().driving = false;
                return Err(err);
            }
        }
    }

    /// The active action resumed: run the next ones.
    fn advance(&self) -> Result<(), Error> {
        let driving = {
            let mut state = self.state.lock();
            state.active = false;
            state.driving
        };
        match driving {
            true => Ok(()),
            false => self.drive(),
        }
    }
}

impl Debug for ActionQueue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ActionQueue")
            .field("pending", &state.pending.len())
            .field("active", &state.active)
            .finish()
    }
}

/// The continuation handed to a queued action: resuming it lets the queue run its next action.
///
/// A resume is consumed by [`Resume::resume`], so it cannot be resumed twice. Dropping it without
/// resuming leaves the queue blocked (and logs a warning).
pub struct Resume {
    queue: ActionQueue,
    hooks: Vec<Hook>,
    consumed: bool,
}

impl Resume {
    fn new(queue: ActionQueue) -> Self {
        Self {
            queue,
            hooks: vec![],
            consumed: false,
        }
    }

    /// Attaches a hook run when the action resumes, before the queue runs its next action.
    /// Hooks run in attachment order.
    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() -> Result<(), Error> + Send + 'static,
    {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Signals the action is over.
    ///
    /// # Errors
    /// * `ActionFailed`: an error was given. The queue stays blocked: no further action runs.
    /// * Errors returned by the `before` hooks (the queue stays blocked too), or by the next
    ///   actions when this resume runs them.
    pub fn resume(mut self, error: Option<Error>) -> Result<(), Error> {
        self.consumed = true;
        if let Some(error) = error {
            warn!("Queued action failed: {}", error);
            return Err(QueueError::ActionFailed {
                source: Box::new(error),
            }
            .into());
        }

        for hook in std::mem::take(&mut self.hooks) {
            hook()?;
        }
        debug!("Queued action done");
        self.queue.advance()
    }

    /// Shorthand for `resume(None)`.
    pub fn done(self) -> Result<(), Error> {
        self.resume(None)
    }
}

impl Drop for Resume {
    fn drop(&mut self) {
        if !self.consumed {
            warn!("Queued action dropped without resuming: the queue is blocked");
        }
    }
}

impl Debug for Resume {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resume")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::errors::Unknown;

    use super::*;

    /// Enqueues an action logging its start and keeping its resume for later.
    fn enqueue_deferred(
        queue: &ActionQueue,
        journal: &Arc<Mutex<Vec<String>>>,
        name: &'static str,
    ) -> Arc<Mutex<Option<Resume>>> {
        let slot = Arc::new(Mutex::new(None));
        let (moved_slot, moved_journal) = (slot.clone(), journal.clone());
        queue
            .enqueue(move |resume| {
                moved_journal.lock().push(format!("{} start", name));
                *moved_slot.lock() = Some(resume);
                Ok(())
            })
            .unwrap();
        slot
    }

    fn resume_slot(slot: &Arc<Mutex<Option<Resume>>>) -> Result<(), Error> {
        let resume = slot.lock().take().unwrap();
        resume.done()
    }

    #[test]
    fn test_idle_queue_runs_synchronously() {
        let queue = ActionQueue::default();
        let counter = Arc::new(AtomicUsize::new(0));

        let moved_counter = counter.clone();
        queue
            .enqueue(move |resume| {
                moved_counter.fetch_add(1, Ordering::SeqCst);
                resume.done()
            })
            .unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(queue.is_idle());
        assert!(!queue.is_active());
    }

    #[test]
    fn test_actions_are_serialized() {
        let queue = ActionQueue::default();
        let journal = Arc::new(Mutex::new(vec![]));

        let a = enqueue_deferred(&queue, &journal, "A");
        let b = enqueue_deferred(&queue, &journal, "B");
        let c = enqueue_deferred(&queue, &journal, "C");
        assert_eq!(*journal.lock(), vec!["A start"]);
        assert_eq!(queue.len(), 2);
        assert!(queue.is_active());

        resume_slot(&a).unwrap();
        assert_eq!(*journal.lock(), vec!["A start", "B start"]);
        resume_slot(&b).unwrap();
        resume_slot(&c).unwrap();
        assert_eq!(*journal.lock(), vec!["A start", "B start", "C start"]);
        assert!(queue.is_idle());
    }

    #[test]
    fn test_synchronous_resumes_do_not_recurse() {
        let queue = ActionQueue::default();
        let journal = Arc::new(Mutex::new(vec![]));
        let first = enqueue_deferred(&queue, &journal, "first");

        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..100_000 {
            let moved_counter = counter.clone();
            queue
                .enqueue(move |resume| {
                    moved_counter.fetch_add(1, Ordering::SeqCst);
                    resume.done()
                })
                .unwrap();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        resume_slot(&first).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 100_000);
        assert!(queue.is_idle());
    }

    #[test]
    fn test_resume_from_another_thread_runs_next_action() {
        let queue = ActionQueue::default();
        let journal = Arc::new(Mutex::new(vec![]));
        let counter = Arc::new(AtomicUsize::new(0));

        for round in 0..200 {
            let first = enqueue_deferred(&queue, &journal, "first");
            let resumer = std::thread::spawn(move || {
                std::thread::sleep(std::time::Duration::from_micros(round % 7 * 50));
                resume_slot(&first).unwrap();
            });

            let moved_counter = counter.clone();
            queue
                .enqueue(move |resume| {
                    moved_counter.fetch_add(1, Ordering::SeqCst);
                    resume.done()
                })
                .unwrap();
            resumer.join().unwrap();

            assert!(queue.is_idle(), "round {}: {:?}", round, queue);
            assert_eq!(counter.load(Ordering::SeqCst), round as usize + 1);
        }
    }

    #[test]
    fn test_resume_with_error_blocks_queue() {
        let queue = ActionQueue::default();
        let journal = Arc::new(Mutex::new(vec![]));
        let a = enqueue_deferred(&queue, &journal, "A");
        enqueue_deferred(&queue, &journal, "B");

        let resume = a.lock().take().unwrap();
        let result = resume.resume(Some(Unknown {
            info: String::from("card missing"),
        }));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Queue error: Queued action failed - Unknown error: card missing.."
        );
        assert_eq!(*journal.lock(), vec!["A start"]);
        assert!(queue.is_active());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_dropped_resume_blocks_queue() {
        let queue = ActionQueue::default();
        queue.enqueue(|_resume| Ok(())).unwrap();
        queue.enqueue(|resume| resume.done()).unwrap();
        assert!(queue.is_active());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_failing_action_propagates() {
        let queue = ActionQueue::default();
        let result = queue.enqueue(|_resume| {
            Err(Unknown {
                info: String::from("broken"),
            })
        });
        assert!(result.is_err());
        assert!(queue.is_active());
    }

    #[test]
    fn test_before_hooks() {
        let queue = ActionQueue::default();
        let journal = Arc::new(Mutex::new(vec![]));

        let moved_journal = journal.clone();
        let slot = Arc::new(Mutex::new(None));
        let moved_slot = slot.clone();
        queue
            .enqueue(move |resume| {
                let (first, second) = (moved_journal.clone(), moved_journal.clone());
                let resume = resume
                    .before(move || {
                        first.lock().push(String::from("hook 1"));
                        Ok(())
                    })
                    .before(move || {
                        second.lock().push(String::from("hook 2"));
                        Ok(())
                    });
                *moved_slot.lock() = Some(resume);
                Ok(())
            })
            .unwrap();
        let next = enqueue_deferred(&queue, &journal, "next");
        assert!(journal.lock().is_empty());

        resume_slot(&slot).unwrap();
        assert_eq!(*journal.lock(), vec!["hook 1", "hook 2", "next start"]);
        assert!(next.lock().is_some());
    }

    #[test]
    fn test_queued_decorator() {
        let queue = ActionQueue::default();
        let journal = Arc::new(Mutex::new(vec![]));
        let slots = Arc::new(Mutex::new(VecDeque::new()));

        let (moved_journal, moved_slots) = (journal.clone(), slots.clone());
        let deal = queue.queued(move |count: usize, resume| {
            moved_journal.lock().push(count);
            moved_slots.lock().push_back(resume);
            Ok(())
        });

        deal(5).unwrap();
        deal(7).unwrap();
        assert_eq!(*journal.lock(), vec![5]);

        let resume = slots.lock().pop_front().unwrap();
        resume.done().unwrap();
        assert_eq!(*journal.lock(), vec![5, 7]);
    }
}

//! Defines the gestures a deck can play: composite animations of all (or some of) its cards.
//!
//! Every deck-level gesture is queued on the deck [`ActionQueue`](crate::deck::ActionQueue): a
//! gesture starts once the previous one completed, and completes when the last card in the
//! gesture iteration order invoked its completion callback.
//!
//! Each gesture comes as a deck-level trait (the entry point, implemented by
//! [`Deck`](crate::deck::Deck)) and, when it moves cards, a card-level trait (the per-card motion,
//! implemented by [`Card`](crate::cards::Card)).

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;

pub use crate::gestures::bysuit::{GroupMotion, Groupable};
pub use crate::gestures::fan::{FanMotion, Fannable};
pub use crate::gestures::flip::Flippable;
pub use crate::gestures::intro::{RevealMotion, Revealable};
pub use crate::gestures::poker::{DealMotion, Dealable};
pub use crate::gestures::shuffle::{ShuffleMotion, Shufflable};
pub use crate::gestures::sort::{SortMotion, Sortable};

use crate::deck::Resume;
use crate::errors::{Error, UnknownGesture};

mod bysuit;
mod fan;
mod flip;
mod intro;
mod poker;
mod shuffle;
mod sort;

/// Lists all gestures a deck can play.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    Shuffle,
    Sort,
    Fan,
    BySuit,
    Intro,
    Poker,
    Flip,
}

impl Gesture {
    pub const ALL: [Gesture; 7] = [
        Gesture::Shuffle,
        Gesture::Sort,
        Gesture::Fan,
        Gesture::BySuit,
        Gesture::Intro,
        Gesture::Poker,
        Gesture::Flip,
    ];
}

impl Display for Gesture {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Gesture::Shuffle => "shuffle",
            Gesture::Sort => "sort",
            Gesture::Fan => "fan",
            Gesture::BySuit => "bysuit",
            Gesture::Intro => "intro",
            Gesture::Poker => "poker",
            Gesture::Flip => "flip",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Gesture {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Gesture::ALL
            .into_iter()
            .find(|gesture| gesture.to_string() == name)
            .ok_or_else(|| UnknownGesture {
                name: name.to_string(),
            })
    }
}

/// Every gesture of the closed gesture set.
pub trait Gestures:
    Shufflable + Sortable + Fannable + Groupable + Revealable + Dealable + Flippable
{
}

impl<T> Gestures for T where
    T: Shufflable + Sortable + Fannable + Groupable + Revealable + Dealable + Flippable
{
}

/// Rounds to the nearest integer, halves towards positive infinity (`-2.5` gives `-2`).
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Resumes a gesture once the card at the last iteration index reports completion.
#[derive(Clone)]
pub(crate) struct Completion {
    resume: Arc<Mutex<Option<Resume>>>,
    last: usize,
}

impl Completion {
    /// Waits for the card at iteration index `last`.
    pub(crate) fn new(resume: Resume, last: usize) -> Self {
        Self {
            resume: Arc::new(Mutex::new(Some(resume))),
            last,
        }
    }

    /// Reports the card at iteration index `index` as complete.
    pub(crate) fn done(&self, index: usize) -> Result<(), Error> {
        if index != self.last {
            return Ok(());
        }
        let resume = self.resume.lock().take();
        match resume {
            None => Ok(()),
            Some(resume) => resume.done(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::deck::{ActionQueue, Deck};
    use crate::mocks::{ManualClock, ManualHost, MockRenderer};
    use crate::table::Table;

    use super::*;

    pub(crate) struct Fixture {
        pub table: Table,
        pub clock: ManualClock,
        pub host: ManualHost,
        pub renderer: MockRenderer,
    }

    impl Fixture {
        /// Runs frames every 16ms until the table is idle.
        pub fn settle(&self) {
            self.host.run_until_idle(&self.clock, 16).unwrap();
        }
    }

    pub(crate) fn create_fixture() -> Fixture {
        let clock = ManualClock::default();
        let host = ManualHost::default();
        let renderer = MockRenderer::default();
        let table = Table::new(renderer.clone(), host.clone()).with_clock(clock.clone());
        Fixture {
            table,
            clock,
            host,
            renderer,
        }
    }

    pub(crate) fn create_deck(fixture: &Fixture) -> Deck {
        Deck::new(&fixture.table, false).unwrap().with_seed(42)
    }

    #[test]
    fn test_gesture_names() {
        let names: Vec<String> = Gesture::ALL.iter().map(|g| g.to_string()).collect();
        assert_eq!(
            names,
            vec!["shuffle", "sort", "fan", "bysuit", "intro", "poker", "flip"]
        );
    }

    #[test]
    fn test_gesture_from_str() {
        assert_eq!("bysuit".parse::<Gesture>().unwrap(), Gesture::BySuit);
        assert_eq!(Gesture::from_str("poker").unwrap(), Gesture::Poker);
        assert!(Gesture::from_str("juggle").is_err());
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(-143.5), -143.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(46.0), 46.0);
    }

    #[test]
    fn test_completion_waits_for_last_index() {
        let queue = ActionQueue::default();
        let slot = Arc::new(Mutex::new(None));
        let moved_slot = slot.clone();
        queue
            .enqueue(move |resume| {
                *moved_slot.lock() = Some(Completion::new(resume, 2));
                Ok(())
            })
            .unwrap();

        let counter = Arc::new(AtomicUsize::new(0));
        let moved_counter = counter.clone();
        queue
            .enqueue(move |resume| {
                moved_counter.fetch_add(1, Ordering::SeqCst);
                resume.done()
            })
            .unwrap();

        let completion = slot.lock().take().unwrap();
        completion.done(0).unwrap();
        completion.done(1).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        completion.done(2).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        // Already resumed.
        completion.done(2).unwrap();
        assert!(queue.is_idle());
    }
}

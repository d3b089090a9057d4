use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use log::debug;
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cards::Card;
use crate::deck::{ActionQueue, Resume};
use crate::errors::Error;
use crate::gestures::Gesture;
use crate::render::{ElementId, Renderer};
use crate::table::Table;
use crate::utils::events::{EventHandler, EventManager};

/// Lists all events a Deck can emit/listen.
pub enum DeckEvent {
    /// Triggered when a gesture starts (payload: the [`Gesture`]).
    OnGestureStart,
    /// Triggered when a gesture completes, before the next queued action starts (payload: the
    /// [`Gesture`]).
    OnGestureComplete,
}

/// Convert events to string to facilitate usage with [`EventManager`].
impl From<DeckEvent> for String {
    fn from(value: DeckEvent) -> Self {
        let event = match value {
            DeckEvent::OnGestureStart => "gesture_start",
            DeckEvent::OnGestureComplete => "gesture_complete",
        };
        event.into()
    }
}

/// Represents a deck of 52 cards (54 with jokers).
///
/// The deck owns its cards in gesture order (gestures like shuffle or sort reorder them) and an
/// [`ActionQueue`] serializing its gestures. Gestures are brought by the traits of the
/// [`gestures`](crate::gestures) module.
///
/// The deck is a cheap clone-handle.
///
/// # Example
/// ```ignore
/// use deckhand::deck::{Deck, DeckEvent};
/// use deckhand::gestures::{Gesture, Shufflable, Sortable};
/// use deckhand::mocks::{ManualHost, MockRenderer};
/// use deckhand::table::Table;
///
/// let table = Table::new(MockRenderer::default(), ManualHost::default());
/// let mut deck = Deck::new(&table, false).unwrap();
/// deck.mount("table").unwrap();
///
/// deck.on(DeckEvent::OnGestureComplete, |gesture: Gesture| {
///     println!("{} done", gesture);
///     Ok(())
/// });
///
/// // Gestures are queued: the sort starts once the shuffle completed.
/// deck.shuffle().unwrap();
/// deck.sort(false).unwrap();
/// ```
#[derive(Clone)]
pub struct Deck {
    element: ElementId,
    cards: Arc<RwLock<Vec<Card>>>,
    queue: ActionQueue,
    events: EventManager,
    rng: Arc<Mutex<StdRng>>,
    root: Arc<RwLock<Option<String>>>,
    renderer: Box<dyn Renderer>,
    table: Table,
}

impl Deck {
    /// Creates a deck on the table: every card back side up, stacked, and mounted on the deck.
    pub fn new(table: &Table, jokers: bool) -> Result<Self, Error> {
        let element = table.create_element();
        let mount_point = Self::mount_point_of(element);
        let count: u8 = match jokers {
            true => 54,
            false => 52,
        };

        // Cards are mounted from the last to the first: the first card ends on top of the pile.
        let mut cards = Vec::with_capacity(count as usize);
        for identity in (0..count).rev() {
            let mut card = Card::new(table, identity)?;
            card.mount(&mount_point)?;
            cards.push(card);
        }
        cards.reverse();
        debug!("Deck #{} created with {} cards", element, cards.len());

        Ok(Self {
            element,
            cards: Arc::new(RwLock::new(cards)),
            queue: ActionQueue::default(),
            events: EventManager::default(),
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
            root: Arc::new(RwLock::new(None)),
            renderer: table.get_renderer(),
            table: table.clone(),
        })
    }

    /// Seeds the deck random source (used by shuffles).
    pub fn with_seed(self, seed: u64) -> Self {
        *self.rng.lock() = StdRng::seed_from_u64(seed);
        self
    }

    fn mount_point_of(element: ElementId) -> String {
        format!("deck-{}", element)
    }

    pub fn get_element(&self) -> ElementId {
        self.element
    }

    /// Returns the name of the mount point the cards are mounted on.
    pub fn get_mount_point(&self) -> String {
        Self::mount_point_of(self.element)
    }

    pub fn get_root(&self) -> Option<String> {
        self.root.read().clone()
    }

    pub fn get_table(&self) -> &Table {
        &self.table
    }

    pub fn get_queue(&self) -> &ActionQueue {
        &self.queue
    }

    /// Mounts the deck element under the given mount point.
    pub fn mount(&mut self, root: &str) -> Result<&Self, Error> {
        self.renderer.mount(self.element, root)?;
        *self.root.write() = Some(root.to_string());
        Ok(self)
    }

    /// Unmounts the deck element (if mounted).
    pub fn unmount(&mut self) -> Result<&Self, Error> {
        let root = self.root.write().take();
        if root.is_some() {
            self.renderer.unmount(self.element)?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.cards.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.read().is_empty()
    }

    /// Returns (handles on) the cards, in the deck current order.
    pub fn get_cards(&self) -> Vec<Card> {
        self.cards.read().clone()
    }

    /// Returns the card with the given identity.
    pub fn find_one(&self, identity: u8) -> Option<Card> {
        self.cards
            .read()
            .iter()
            .find(|card| card.get_identity() == identity)
            .cloned()
    }

    /// Returns the cards with the given identities, in the deck current order.
    pub fn filter(&self, identities: &[u8]) -> Vec<Card> {
        self.cards
            .read()
            .iter()
            .filter(|card| identities.contains(&card.get_identity()))
            .cloned()
            .collect()
    }

    /// Queues a custom action: it runs once every previously queued action (gestures included)
    /// completed, and must resume its [`Resume`] for the next ones to run.
    ///
    /// # Example
    /// ```ignore
    /// use deckhand::deck::Deck;
    /// use deckhand::mocks::{ManualHost, MockRenderer};
    /// use deckhand::table::Table;
    ///
    /// let table = Table::new(MockRenderer::default(), ManualHost::default());
    /// let deck = Deck::new(&table, false).unwrap();
    /// deck.queue(|resume| {
    ///     println!("All previous gestures are over.");
    ///     resume.done()
    /// }).unwrap();
    /// ```
    pub fn queue<F>(&self, action: F) -> Result<(), Error>
    where
        F: FnOnce(Resume) -> Result<(), Error> + Send + 'static,
    {
        self.queue.enqueue(action)
    }

    // ########################################
    // Event related functions

    /// Registers a handler for a deck event: see [`EventManager::on`].
    pub fn on<S, F, T>(&self, event: S, callback: F) -> EventHandler
    where
        S: Into<String>,
        T: 'static + Send + Sync + Clone,
        F: FnMut(T) -> Result<(), Error> + Send + 'static,
    {
        self.events.on(event, callback)
    }

    /// Registers a handler called once for a deck event: see [`EventManager::one`].
    pub fn one<S, F, T>(&self, event: S, callback: F) -> EventHandler
    where
        S: Into<String>,
        T: 'static + Send + Sync + Clone,
        F: FnMut(T) -> Result<(), Error> + Send + 'static,
    {
        self.events.one(event, callback)
    }

    pub fn unregister(&self, handler: EventHandler) {
        self.events.unregister(handler)
    }

    /// Emits a deck event with the given payload.
    pub fn emit<S, T>(&self, event: S, payload: T)
    where
        S: Into<String>,
        T: 'static + Send + Sync,
    {
        self.events.emit(event, payload)
    }

    // ########################################
    // Gesture plumbing

    /// Queues a gesture: lifecycle events are emitted around it.
    pub(crate) fn run_gesture<F>(&self, gesture: Gesture, action: F) -> Result<(), Error>
    where
        F: FnOnce(Deck, Resume) -> Result<(), Error> + Send + 'static,
    {
        let deck = self.clone();
        self.queue.enqueue(move |resume| {
            debug!("Deck #{} gesture {} started", deck.element, gesture);
            deck.events.emit(DeckEvent::OnGestureStart, gesture);

            let (events, element) = (deck.events.clone(), deck.element);
            let resume = resume.before(move || {
                debug!("Deck #{} gesture {} complete", element, gesture);
                events.emit(DeckEvent::OnGestureComplete, gesture);
                Ok(())
            });
            action(deck, resume)
        })
    }

    /// Gives mutable access to the cards order.
    pub(crate) fn with_cards<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut Vec<Card>) -> R,
    {
        f(&mut self.cards.write())
    }

    /// Gives access to the deck random source.
    pub(crate) fn with_rng<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut StdRng) -> R,
    {
        f(&mut self.rng.lock())
    }
}

impl Debug for Deck {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deck")
            .field("element", &self.element)
            .field("cards", &self.len())
            .field("queue", &self.queue)
            .field("root", &self.get_root())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::cards::{Pose, Side};
    use crate::gestures::tests::create_fixture;
    use crate::mocks::RenderCall;

    use super::*;

    #[test]
    fn test_deck_creation() {
        let fixture = create_fixture();
        let deck = Deck::new(&fixture.table, false).unwrap();
        assert_eq!(deck.len(), 52);
        assert!(!deck.is_empty());

        let cards = deck.get_cards();
        for (index, card) in cards.iter().enumerate() {
            assert_eq!(card.get_identity() as usize, index);
            assert_eq!(card.get_side(), Side::Back);
            assert_eq!(card.get_root(), Some(deck.get_mount_point()));
            let offset = (52.0 - index as f64) / 4.0;
            assert_eq!(card.get_pose(), Pose::new(-offset, -offset, 0.0));
        }

        // The first card is mounted last.
        let mounts: Vec<ElementId> = fixture
            .renderer
            .journal()
            .into_iter()
            .filter_map(|call| match call {
                RenderCall::Mount { element, .. } => Some(element),
                _ => None,
            })
            .collect();
        assert_eq!(mounts.last(), Some(&cards[0].get_element()));

        let with_jokers = Deck::new(&fixture.table, true).unwrap();
        assert_eq!(with_jokers.len(), 54);
    }

    #[test]
    fn test_deck_mount() {
        let fixture = create_fixture();
        let mut deck = Deck::new(&fixture.table, false).unwrap();
        assert_eq!(deck.get_root(), None);

        deck.mount("table").unwrap();
        assert_eq!(deck.get_root(), Some(String::from("table")));
        let state = fixture.renderer.element(deck.get_element()).unwrap();
        assert_eq!(state.root, Some(String::from("table")));

        deck.unmount().unwrap();
        assert_eq!(deck.get_root(), None);
        assert_eq!(
            fixture.renderer.element(deck.get_element()).unwrap().root,
            None
        );
    }

    #[test]
    fn test_lookup_helpers() {
        let fixture = create_fixture();
        let deck = Deck::new(&fixture.table, false).unwrap();

        let card = deck.find_one(17).unwrap();
        assert_eq!(card.get_identity(), 17);
        assert!(deck.find_one(53).is_none());

        let cards = deck.filter(&[40, 2, 60]);
        let identities: Vec<u8> = cards.iter().map(|card| card.get_identity()).collect();
        assert_eq!(identities, vec![2, 40]);
        assert!(deck.filter(&[]).is_empty());
    }

    #[test]
    fn test_custom_queued_actions() {
        let fixture = create_fixture();
        let deck = Deck::new(&fixture.table, false).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        let slot = Arc::new(Mutex::new(None));
        let moved_slot = slot.clone();
        deck.queue(move |resume| {
            *moved_slot.lock() = Some(resume);
            Ok(())
        })
        .unwrap();

        let moved_counter = counter.clone();
        deck.queue(move |resume| {
            moved_counter.fetch_add(1, Ordering::SeqCst);
            resume.done()
        })
        .unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(deck.get_queue().len(), 1);

        let resume = slot.lock().take().unwrap();
        resume.done().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(deck.get_queue().is_idle());
    }

    #[test]
    fn test_gesture_events() {
        let fixture = create_fixture();
        let deck = Deck::new(&fixture.table, false).unwrap();
        let journal = Arc::new(Mutex::new(vec![]));

        let moved_journal = journal.clone();
        deck.on(DeckEvent::OnGestureStart, move |gesture: Gesture| {
            moved_journal.lock().push(format!("start {}", gesture));
            Ok(())
        });
        let moved_journal = journal.clone();
        let handler = deck.on(DeckEvent::OnGestureComplete, move |gesture: Gesture| {
            moved_journal.lock().push(format!("complete {}", gesture));
            Ok(())
        });
        let moved_journal = journal.clone();
        deck.one(DeckEvent::OnGestureComplete, move |_: Gesture| {
            moved_journal.lock().push(String::from("first complete"));
            Ok(())
        });

        deck.run_gesture(Gesture::Flip, |_, resume| resume.done())
            .unwrap();
        deck.unregister(handler);
        deck.run_gesture(Gesture::Fan, |_, resume| resume.done())
            .unwrap();

        assert_eq!(
            *journal.lock(),
            vec![
                "start flip",
                "complete flip",
                "first complete",
                "start fan"
            ]
        );
    }

    #[test]
    fn test_seeded_decks_are_reproducible() {
        use rand::Rng;

        let fixture = create_fixture();
        let first = Deck::new(&fixture.table, false).unwrap().with_seed(7);
        let second = Deck::new(&fixture.table, false).unwrap().with_seed(7);
        let a: u64 = first.with_rng(|rng| rng.gen());
        let b: u64 = second.with_rng(|rng| rng.gen());
        assert_eq!(a, b);
    }
}

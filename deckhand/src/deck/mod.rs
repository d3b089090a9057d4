//! Defines the deck and the action queue serializing its gestures.

pub use crate::deck::deck::{Deck, DeckEvent};
pub use crate::deck::queue::{ActionQueue, Resume};

#[allow(clippy::module_inception)]
mod deck;
mod queue;

#![doc(html_root_url = "https://docs.rs/deckhand/0.1.0")]

//! <h1 align="center">DECKHAND - Animated playing cards, in Rust</h1>
//! <div style="text-align:center;font-style:italic;">Deckhand is the animation and interaction core of a deck of playing cards.</div>
//! <br/>
//!
//! # Features
//!
//! **Deckhand** drives a deck of playing cards drawn by any rendering backend (DOM, canvas,
//! terminal, game engine...). It does not draw anything itself: it tells a
//! [`Renderer`](render::Renderer) where every card stands, which side it shows and how it stacks.
//!
//! - A clock-driven animation [`Scheduler`](animations::Scheduler) advancing many time-bounded
//!   animations per frame, frames being requested from a [`TickHost`](animations::TickHost).
//! - A sequential [`ActionQueue`](deck::ActionQueue) serializing the deck gestures: one gesture
//!   runs at a time per deck.
//! - [`Card`](cards::Card)s with a drag / flip / click interaction state machine coexisting with
//!   their scheduled motions.
//! - A closed set of [`Gesture`](gestures::Gesture)s: shuffle, sort, fan, by-suit, intro, poker
//!   and flip.
//!
//! # Getting Started
//!
//! - Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! deckhand = "0.1.0"
//! ```
//!
//! - Implement the [`Renderer`](render::Renderer) trait for your backend, then create a
//!   [`Table`](table::Table) and a [`Deck`](deck::Deck) on it.
//!
//! The following code shuffles then fans a deck, the frames being provided by a tokio timer.
//! ```ignore
//! use deckhand::deck::{Deck, DeckEvent};
//! use deckhand::gestures::{Fannable, Gesture, Shufflable};
//! use deckhand::mocks::MockRenderer;
//! use deckhand::table::Table;
//! use deckhand::utils::task::until_idle;
//!
//! #[tokio::main]
//! async fn main() {
//!     // A table draws on a renderer: here a mocked one.
//!     let table = Table::run(MockRenderer::default()).unwrap();
//!
//!     let mut deck = Deck::new(&table, false).unwrap();
//!     deck.mount("table").unwrap();
//!     deck.on(DeckEvent::OnGestureComplete, |gesture: Gesture| {
//!         println!("{} is over", gesture);
//!         Ok(())
//!     });
//!
//!     // Gestures are queued: the fan starts once the shuffle is over.
//!     deck.shuffle().unwrap();
//!     deck.fan().unwrap();
//!
//!     until_idle(table.get_scheduler(), 50).await;
//! }
//! ```
//!
//! # Feature flags
//!
//! - **serde** -- Enables serialize/deserialize capabilities for the configuration and most value types.
//! - **mocks** -- Provides mocked renderer, clock and frame host (useful for tests mostly).

#[cfg(test)]
extern crate self as deckhand;

pub mod animations;
pub mod cards;
pub mod deck;
pub mod errors;
pub mod gestures;
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
pub mod render;
pub mod table;
pub mod utils;

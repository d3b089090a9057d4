//! This example plays the gestures given on the command line, one after the other, on a deck drawn
//! by the mocked renderer.
//!
//! ```sh
//! cargo run --example deck_commander --features mocks -- shuffle fan sort flip
//! ```
//!
//! # Notes
//! - Gestures are queued: each one starts once the previous one is over.
//! - The frames are delivered by a [`TimerHost`] every 16ms (about 60 frames per second).
//! - Without argument, the demo sequence is played: intro, shuffle (twice), poker, sort, bysuit,
//!   fan, then flip.

use deckhand::deck::{Deck, DeckEvent};
use deckhand::errors::Error;
use deckhand::gestures::{
    Dealable, Fannable, Flippable, Gesture, Groupable, Revealable, Shufflable, Sortable,
};
use deckhand::mocks::MockRenderer;
use deckhand::table::Table;
use deckhand::utils::task::{until_idle, TimerHost};

const DEMO: [Gesture; 8] = [
    Gesture::Intro,
    Gesture::Shuffle,
    Gesture::Shuffle,
    Gesture::Poker,
    Gesture::Sort,
    Gesture::BySuit,
    Gesture::Fan,
    Gesture::Flip,
];

fn play(deck: &Deck, gesture: Gesture) -> Result<(), Error> {
    match gesture {
        Gesture::Shuffle => deck.shuffle(),
        Gesture::Sort => deck.sort(false),
        Gesture::Fan => deck.fan(),
        Gesture::BySuit => deck.bysuit(),
        Gesture::Intro => deck.intro(),
        Gesture::Poker => deck.poker(),
        Gesture::Flip => deck.flip(None),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let gestures: Vec<Gesture> = match std::env::args().skip(1).collect::<Vec<_>>() {
        names if names.is_empty() => DEMO.to_vec(),
        names => names
            .iter()
            .map(|name| name.parse())
            .collect::<Result<_, _>>()?,
    };

    let renderer = MockRenderer::default();
    let table = Table::new(renderer.clone(), TimerHost::try_current()?.with_interval(16));
    let mut deck = Deck::new(&table, false)?;
    deck.mount("table")?;

    deck.on(DeckEvent::OnGestureStart, |gesture: Gesture| {
        println!("> {}", gesture);
        Ok(())
    });
    let watched = deck.clone();
    deck.on(DeckEvent::OnGestureComplete, move |gesture: Gesture| {
        let top: Vec<String> = watched
            .get_cards()
            .iter()
            .rev()
            .take(5)
            .map(|card| format!("{} of {}", card.get_rank(), card.get_suit()))
            .collect();
        println!("< {} [top: {}]", gesture, top.join(", "));
        Ok(())
    });

    for gesture in gestures {
        play(&deck, gesture)?;
    }

    // The queue may hold a gesture while the scheduler is briefly idle (flip runs without motion).
    while !deck.get_queue().is_idle() || !table.is_idle() {
        until_idle(table.get_scheduler(), 50).await;
        deckhand::pause!(50);
    }
    println!("{} render calls", renderer.journal().len());
    Ok(())
}

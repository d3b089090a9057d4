//! This example deals a poker hand out of a freshly shuffled deck, driving the frames by hand.
//!
//! # Notes
//! - The [`ManualHost`] only delivers frames when told to, and the [`ManualClock`] only moves when
//!   told to: the whole animation is replayed deterministically, without any wait.
//! - A seeded deck shuffles the same way on every run.

use deckhand::cards::Side;
use deckhand::deck::Deck;
use deckhand::errors::Error;
use deckhand::gestures::{Dealable, Shufflable};
use deckhand::mocks::{ManualClock, ManualHost, MockRenderer};
use deckhand::table::Table;

fn main() -> Result<(), Error> {
    let clock = ManualClock::default();
    let host = ManualHost::default();
    let table = Table::new(MockRenderer::default(), host.clone()).with_clock(clock.clone());

    let mut deck = Deck::new(&table, false)?.with_seed(2024);
    deck.mount("table")?;
    deck.shuffle()?;
    deck.poker()?;

    // One frame every 16ms, until every animation is over.
    let frames = host.run_until_idle(&clock, 16)?;
    println!("{} frames played in {}ms", frames, table.now());

    for card in deck.get_cards().iter().filter(|card| card.get_side() == Side::Front) {
        let pose = card.get_pose();
        println!(
            "{:>2} of {:<8} at ({:>5}, {:>5})",
            card.get_rank(),
            card.get_suit(),
            pose.x,
            pose.y
        );
    }
    Ok(())
}

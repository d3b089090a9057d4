use crate::cards::{Card, Motion};
use crate::deck::Deck;
use crate::errors::Error;
use crate::gestures::{round_half_up, Completion, Gesture};

/// Groups the deck by suit: one row per suit, ranks overlapping from left to right.
pub trait Groupable {
    fn bysuit(&self) -> Result<(), Error>;
}

/// Per-card by-suit motion: the card moves to its place in its suit row.
pub trait GroupMotion {
    fn group_motion<F>(&self, index: usize, scale: f64, done: F)
    where
        F: FnMut(usize) -> Result<(), Error> + Send + 'static;
}

impl Groupable for Deck {
    fn bysuit(&self) -> Result<(), Error> {
        self.run_gesture(Gesture::BySuit, |deck, resume| {
            let cards = deck.get_cards();
            if cards.is_empty() {
                return resume.done();
            }

            let scale = deck.get_table().font_scale();
            let completion = Completion::new(resume, cards.len() - 1);
            for (index, card) in cards.iter().enumerate() {
                let completion = completion.clone();
                card.group_motion(index, scale, move |index| completion.done(index));
            }
            Ok(())
        })
    }
}

impl GroupMotion for Card {
    fn group_motion<F>(&self, index: usize, scale: f64, mut done: F)
    where
        F: FnMut(usize) -> Result<(), Error> + Send + 'static,
    {
        let rank = self.get_rank() as f64;
        let suit = self.get_suit().value() as f64;

        self.animate_to(
            Motion::new(400)
                .set_delay(index as u64 * 10)
                .set_position(
                    -round_half_up((6.75 - rank) * 8.0 * scale),
                    -round_half_up((1.5 - suit) * 92.0 * scale),
                )
                .set_rotation(0.0)
                .on_complete(move || done(index)),
        );
    }
}

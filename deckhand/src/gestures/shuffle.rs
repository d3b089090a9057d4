use rand::seq::SliceRandom;
use rand::Rng;

use crate::cards::{Card, Motion};
use crate::deck::Deck;
use crate::errors::Error;
use crate::gestures::{Completion, Gesture};

/// Shuffles the deck: the cards are reordered at random (Fisher-Yates on the deck random source),
/// each card is thrown aside then stacked back at its new place in the pile.
pub trait Shufflable {
    fn shuffle(&self) -> Result<(), Error>;
}

/// Per-card shuffle motion.
pub trait ShuffleMotion {
    /// Throws the card `spread` px aside, then stacks it back at `index`.
    /// `done` is called with `index` once the card is back in the pile.
    fn shuffle_motion<F>(&self, index: usize, spread: f64, done: F)
    where
        F: FnMut(usize) -> Result<(), Error> + Send + 'static;
}

impl Shufflable for Deck {
    fn shuffle(&self) -> Result<(), Error> {
        self.run_gesture(Gesture::Shuffle, |deck, resume| {
            let scale = deck.get_table().font_scale();
            let (cards, spreads) = deck.with_rng(|rng| {
                let cards = deck.with_cards(|cards| {
                    cards.shuffle(rng);
                    cards.clone()
                });
                let spreads: Vec<f64> = cards
                    .iter()
                    .map(|_| {
                        let sign = if rng.gen_bool(0.5) { -1.0 } else { 1.0 };
                        sign * (rng.gen::<f64>() * 40.0 + 20.0) * scale
                    })
                    .collect();
                (cards, spreads)
            });

            if cards.is_empty() {
                return resume.done();
            }
            let completion = Completion::new(resume, cards.len() - 1);
            for (index, card) in cards.iter().enumerate() {
                card.set_position(index);
                let completion = completion.clone();
                card.shuffle_motion(index, spreads[index], move |index| completion.done(index));
            }
            Ok(())
        })
    }
}

impl ShuffleMotion for Card {
    fn shuffle_motion<F>(&self, index: usize, spread: f64, mut done: F)
    where
        F: FnMut(usize) -> Result<(), Error> + Send + 'static,
    {
        let z = index as f64 / 4.0;
        let delay = index as u64 * 2;

        self.animate_to(
            Motion::new(200)
                .set_delay(delay)
                .set_position(spread, -z)
                .set_rotation(0.0),
        );

        let mut card = self.clone();
        self.animate_to(
            Motion::new(200)
                .set_delay(200 + delay)
                .set_position(-z, -z)
                .set_rotation(0.0)
                .on_start(move || {
                    card.set_z_order(index as i64)?;
                    Ok(())
                })
                .on_complete(move || done(index)),
        );
    }
}

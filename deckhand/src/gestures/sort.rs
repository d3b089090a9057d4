use crate::cards::{Card, Motion};
use crate::deck::Deck;
use crate::errors::Error;
use crate::gestures::{Completion, Gesture};

/// Sorts the deck by identity: descending by default, ascending when `reverse` is set.
pub trait Sortable {
    fn sort(&self, reverse: bool) -> Result<(), Error>;
}

/// Per-card sort motion: the card is lifted above the pile, then settles back at `index`.
pub trait SortMotion {
    fn sort_motion<F>(&self, index: usize, done: F)
    where
        F: FnMut(usize) -> Result<(), Error> + Send + 'static;
}

impl Sortable for Deck {
    fn sort(&self, reverse: bool) -> Result<(), Error> {
        self.run_gesture(Gesture::Sort, move |deck, resume| {
            let cards = deck.with_cards(|cards| {
                match reverse {
                    true => cards.sort_by_key(|card| card.get_identity()),
                    false => cards.sort_by_key(|card| std::cmp::Reverse(card.get_identity())),
                }
                cards.clone()
            });

            if cards.is_empty() {
                return resume.done();
            }
            let completion = Completion::new(resume, cards.len() - 1);
            for (index, card) in cards.iter().enumerate() {
                let completion = completion.clone();
                card.sort_motion(index, move |index| completion.done(index));
            }
            Ok(())
        })
    }
}

impl SortMotion for Card {
    fn sort_motion<F>(&self, index: usize, mut done: F)
    where
        F: FnMut(usize) -> Result<(), Error> + Send + 'static,
    {
        let z = index as f64 / 4.0;
        let delay = index as u64 * 10;

        let mut card = self.clone();
        self.animate_to(
            Motion::new(400)
                .set_delay(delay)
                .set_position(-z, -150.0)
                .set_rotation(0.0)
                .on_complete(move || {
                    card.set_z_order(index as i64)?;
                    Ok(())
                }),
        );

        self.animate_to(
            Motion::new(400)
                .set_delay(delay + 500)
                .set_position(-z, -z)
                .set_rotation(0.0)
                .on_complete(move || done(index)),
        );
    }
}

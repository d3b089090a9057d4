use crate::cards::{Card, Motion, Side};
use crate::deck::Deck;
use crate::errors::Error;
use crate::gestures::{round_half_up, Completion, Gesture};

/// Deals a poker hand: the top cards of the deck are dealt face up in a row above the pile.
///
/// The hand size comes from the table configuration.
pub trait Dealable {
    fn poker(&self) -> Result<(), Error>;
}

/// Per-card deal motion.
pub trait DealMotion {
    /// Deals the card at place `index` of the hand, `count` being the deck size and `scale` the
    /// font scale.
    fn deal_motion<F>(&self, index: usize, count: usize, scale: f64, done: F)
    where
        F: FnMut(usize) -> Result<(), Error> + Send + 'static;
}

impl Dealable for Deck {
    fn poker(&self) -> Result<(), Error> {
        self.run_gesture(Gesture::Poker, |deck, resume| {
            let cards = deck.get_cards();
            let size = deck.get_table().get_config().get_hand_size();
            let hand: Vec<Card> = cards
                .iter()
                .skip(cards.len().saturating_sub(size))
                .rev()
                .cloned()
                .collect();
            if hand.is_empty() {
                return resume.done();
            }

            let scale = deck.get_table().font_scale();
            let completion = Completion::new(resume, hand.len() - 1);
            for (index, card) in hand.iter().enumerate() {
                let completion = completion.clone();
                let mut dealt = card.clone();
                card.deal_motion(index, cards.len(), scale, move |index| {
                    dealt.set_side(Side::Front)?;
                    completion.done(index)
                });
            }
            Ok(())
        })
    }
}

impl DealMotion for Card {
    fn deal_motion<F>(&self, index: usize, count: usize, scale: f64, mut done: F)
    where
        F: FnMut(usize) -> Result<(), Error> + Send + 'static,
    {
        let z = (count + index) as i64 - 1;
        let mut card = self.clone();
        self.animate_to(
            Motion::new(250)
                .set_delay(index as u64 * 250)
                .set_position(
                    round_half_up((index as f64 - 2.05) * 70.0 * scale),
                    round_half_up(-110.0 * scale),
                )
                .set_rotation(0.0)
                .on_start(move || {
                    card.set_z_order(z)?;
                    Ok(())
                })
                .on_complete(move || done(index)),
        );
    }
}

use crate::cards::{Card, Motion};
use crate::deck::Deck;
use crate::errors::Error;
use crate::gestures::{Completion, Gesture};

/// Fan radius (in px, at the base font size).
const RADIUS: f64 = 55.0;
/// Angle covered by the fan (in degrees).
const SPREAD: f64 = 260.0;

/// Fans the deck out: the cards are spread on an arc around the deck center.
pub trait Fannable {
    fn fan(&self) -> Result<(), Error>;
}

/// Per-card fan motion: the card is gathered on the pile, then moved to its place on the arc.
pub trait FanMotion {
    /// Moves the card to its place in a fan of `count` cards, `scale` being the font scale.
    fn fan_motion<F>(&self, index: usize, count: usize, scale: f64, done: F)
    where
        F: FnMut(usize) -> Result<(), Error> + Send + 'static;
}

/// Returns the pose (x, y, rotation) of the `index`-th card in a fan of `count` cards.
pub(crate) fn fan_pose(index: usize, count: usize, scale: f64) -> (f64, f64, f64) {
    let rotation = match count {
        0 | 1 => 0.0,
        _ => index as f64 / (count - 1) as f64 * SPREAD - SPREAD / 2.0,
    };
    let angle = (rotation - 90.0).to_radians();
    (
        angle.cos() * RADIUS * scale,
        angle.sin() * RADIUS * scale,
        rotation,
    )
}

impl Fannable for Deck {
    fn fan(&self) -> Result<(), Error> {
        self.run_gesture(Gesture::Fan, |deck, resume| {
            let cards = deck.get_cards();
            if cards.is_empty() {
                return resume.done();
            }

            let scale = deck.get_table().font_scale();
            let completion = Completion::new(resume, cards.len() - 1);
            for (index, card) in cards.iter().enumerate() {
                let completion = completion.clone();
                card.fan_motion(index, cards.len(), scale, move |index| {
                    completion.done(index)
                });
            }
            Ok(())
        })
    }
}

impl FanMotion for Card {
    fn fan_motion<F>(&self, index: usize, count: usize, scale: f64, mut done: F)
    where
        F: FnMut(usize) -> Result<(), Error> + Send + 'static,
    {
        let z = index as f64 / 4.0;
        let delay = index as u64 * 10;
        let (x, y, rotation) = fan_pose(index, count, scale);

        self.animate_to(
            Motion::new(300)
                .set_delay(delay)
                .set_position(-z, -z)
                .set_rotation(0.0),
        );

        let mut card = self.clone();
        self.animate_to(
            Motion::new(300)
                .set_delay(300 + delay)
                .set_position(x, y)
                .set_rotation(rotation)
                .on_start(move || {
                    card.set_z_order(index as i64)?;
                    Ok(())
                })
                .on_complete(move || done(index)),
        );
    }
}

use log::trace;

use crate::animations::AnimationRequest;
use crate::cards::{Card, Motion, Pose, Side};
use crate::deck::Deck;
use crate::errors::Error;
use crate::gestures::{Completion, Gesture};

/// Delay (in ms) between a card landing and it turning back side up.
const FLIP_BACK_DELAY: u64 = 250;

/// Plays the deck introduction: every card falls face up onto the pile while fading in, then
/// turns back side up.
pub trait Revealable {
    fn intro(&self) -> Result<(), Error>;
}

/// Per-card introduction motion.
pub trait RevealMotion {
    /// Places the card above its place in the pile, transparent, then drops it while it fades in.
    /// `done` is called with `index` once the card landed.
    fn reveal_motion<F>(&self, index: usize, done: F) -> Result<(), Error>
    where
        F: FnMut(usize) -> Result<(), Error> + Send + 'static;
}

impl Revealable for Deck {
    fn intro(&self) -> Result<(), Error> {
        self.run_gesture(Gesture::Intro, |deck, resume| {
            let cards = deck.get_cards();
            if cards.is_empty() {
                return resume.done();
            }

            let scheduler = deck.get_table().get_scheduler().clone();
            let completion = Completion::new(resume, cards.len() - 1);
            for (index, card) in cards.iter().enumerate() {
                let mut card = card.clone();
                card.set_side(Side::Front)?;

                let completion = completion.clone();
                let scheduler = scheduler.clone();
                let landed = card.clone();
                card.reveal_motion(index, move |index| {
                    let mut flipped = landed.clone();
                    scheduler.submit(AnimationRequest::new(FLIP_BACK_DELAY, 0).on_start(
                        move || {
                            trace!("Card #{} turned back side up", flipped.get_identity());
                            flipped.set_side(Side::Back)?;
                            Ok(())
                        },
                    ));
                    completion.done(index)
                })?;
            }
            Ok(())
        })
    }
}

impl RevealMotion for Card {
    fn reveal_motion<F>(&self, index: usize, mut done: F) -> Result<(), Error>
    where
        F: FnMut(usize) -> Result<(), Error> + Send + 'static,
    {
        let z = index as f64 / 4.0;
        let mut card = self.clone();
        card.set_pose(Pose::new(-z, -250.0 - z, 0.0))?;
        card.set_opacity(Some(0.0))?;

        let mut on_start = self.clone();
        let mut on_progress = self.clone();
        let mut on_complete = self.clone();
        self.animate_to(
            Motion::new(1000)
                .set_delay(500 + index as u64 * 10)
                .set_position(-z, -z)
                .on_start(move || {
                    on_start.set_z_order(index as i64)?;
                    Ok(())
                })
                .on_progress(move |t, _| {
                    on_progress.set_opacity(Some(t as f64))?;
                    Ok(())
                })
                .on_complete(move || {
                    on_complete.set_opacity(None)?;
                    done(index)
                }),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::gestures::tests::{create_deck, create_fixture};
    use crate::mocks::RenderCall;

    use super::*;

    #[test]
    fn test_intro_places_cards_above_the_pile() {
        let fixture = create_fixture();
        let deck = create_deck(&fixture);
        deck.intro().unwrap();

        let card = deck.get_cards()[4].clone();
        assert_eq!(card.get_side(), Side::Front);
        assert_eq!(card.get_pose(), Pose::new(-1.0, -251.0, 0.0));
        let state = fixture.renderer.element(card.get_element()).unwrap();
        assert_eq!(state.opacity, Some(0.0));
        assert!(state.face);
    }

    #[test]
    fn test_intro_fades_cards_in() {
        let fixture = create_fixture();
        let deck = create_deck(&fixture);
        deck.intro().unwrap();
        let card = deck.get_cards()[0].clone();

        fixture.clock.set(1000);
        fixture.host.run_frame().unwrap();
        let state = fixture.renderer.element(card.get_element()).unwrap();
        assert_eq!(state.opacity, Some(0.5));
        assert_eq!(card.get_side(), Side::Front);
    }

    #[test]
    fn test_intro_completes_then_turns_cards() {
        let fixture = create_fixture();
        let deck = create_deck(&fixture);
        let completed = std::sync::Arc::new(parking_lot::Mutex::new(None));
        let moved_completed = completed.clone();
        let table = fixture.table.clone();
        deck.intro().unwrap();
        deck.queue(move |resume| {
            *moved_completed.lock() = Some(table.now());
            resume.done()
        })
        .unwrap();
        fixture.settle();

        // The last card lands at 500 + 510 + 1000ms.
        let completed = completed.lock().unwrap();
        assert!((2010..2010 + 32).contains(&completed));

        for (index, card) in deck.get_cards().iter().enumerate() {
            let z = index as f64 / 4.0;
            assert_eq!(card.get_pose(), Pose::new(-z, -z, 0.0));
            assert_eq!(card.get_side(), Side::Back);
            let state = fixture.renderer.element(card.get_element()).unwrap();
            assert_eq!(state.opacity, None);
            assert!(state.back);
            assert!(!state.face);
        }

        // Every card showed its face, then its back.
        let card = deck.get_cards()[0].clone();
        let sides: Vec<RenderCall> = fixture
            .renderer
            .journal_of(card.get_element())
            .into_iter()
            .filter(|call| {
                matches!(call, RenderCall::AttachFace(_) | RenderCall::AttachBack(_))
            })
            .collect();
        assert_eq!(sides.len(), 3);
    }

    #[test]
    fn test_intro_empty_deck() {
        let fixture = create_fixture();
        let deck = create_deck(&fixture);
        deck.with_cards(|cards| cards.clear());
        deck.intro().unwrap();
        assert!(deck.get_queue().is_idle());
    }
}

use log::debug;

use crate::cards::Side;
use crate::deck::Deck;
use crate::errors::Error;
use crate::gestures::Gesture;

/// Flips every card of the deck, without motion.
pub trait Flippable {
    /// Turns every card on the given side. Without side, cards are turned back side up when more
    /// than half of them show their face, face up otherwise.
    fn flip(&self, side: Option<Side>) -> Result<(), Error>;
}

/// Returns the side a deck of `cards` cards turns to when `front` of them show their face.
fn majority_side(front: usize, cards: usize) -> Side {
    match cards > 0 && front as f64 / cards as f64 > 0.5 {
        true => Side::Back,
        false => Side::Front,
    }
}

impl Flippable for Deck {
    fn flip(&self, side: Option<Side>) -> Result<(), Error> {
        self.run_gesture(Gesture::Flip, move |deck, resume| {
            let cards = deck.get_cards();
            let side = side.unwrap_or_else(|| {
                let front = cards
                    .iter()
                    .filter(|card| card.get_side() == Side::Front)
                    .count();
                majority_side(front, cards.len())
            });
            debug!("Deck #{} flipped to {}", deck.get_element(), side);

            for mut card in cards {
                card.set_side(side)?;
            }
            resume.done()
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::gestures::tests::{create_deck, create_fixture};

    use super::*;

    fn turn(deck: &Deck, front: usize) {
        for mut card in deck.get_cards().into_iter().take(front) {
            card.set_side(Side::Front).unwrap();
        }
    }

    fn count_front(deck: &Deck) -> usize {
        deck.get_cards()
            .iter()
            .filter(|card| card.get_side() == Side::Front)
            .count()
    }

    #[test]
    fn test_majority_side() {
        assert_eq!(majority_side(30, 52), Side::Back);
        assert_eq!(majority_side(26, 52), Side::Front);
        assert_eq!(majority_side(20, 52), Side::Front);
        assert_eq!(majority_side(0, 0), Side::Front);
    }

    #[test]
    fn test_flip_mostly_front_deck() {
        let fixture = create_fixture();
        let deck = create_deck(&fixture);
        turn(&deck, 30);
        deck.flip(None).unwrap();
        assert_eq!(count_front(&deck), 0);
        assert!(deck.get_queue().is_idle());
    }

    #[test]
    fn test_flip_mostly_back_deck() {
        let fixture = create_fixture();
        let deck = create_deck(&fixture);
        turn(&deck, 20);
        deck.flip(None).unwrap();
        assert_eq!(count_front(&deck), 52);

        // Flipping again turns the deck back.
        deck.flip(None).unwrap();
        assert_eq!(count_front(&deck), 0);
    }

    #[test]
    fn test_flip_to_given_side() {
        let fixture = create_fixture();
        let deck = create_deck(&fixture);
        turn(&deck, 30);
        deck.flip(Some(Side::Front)).unwrap();
        assert_eq!(count_front(&deck), 52);

        let card = deck.get_cards()[40].clone();
        let state = fixture.renderer.element(card.get_element()).unwrap();
        assert!(state.face);
        assert_eq!(state.class, Some((card.get_rank(), card.get_suit())));
    }

    #[test]
    fn test_flip_waits_for_previous_gestures() {
        use crate::gestures::Sortable;

        let fixture = create_fixture();
        let deck = create_deck(&fixture);
        deck.sort(false).unwrap();
        deck.flip(Some(Side::Front)).unwrap();
        assert_eq!(count_front(&deck), 0);

        fixture.settle();
        assert_eq!(count_front(&deck), 52);
        assert!(deck.get_queue().is_idle());
    }

    #[test]
    fn test_flip_empty_deck() {
        let fixture = create_fixture();
        let deck = create_deck(&fixture);
        deck.with_cards(|cards| cards.clear());
        deck.flip(None).unwrap();
        assert!(deck.get_queue().is_idle());
    }
}

//! Defines the playing cards and their interactions.

pub use crate::cards::card::Card;
pub use crate::cards::interaction::{
    classify_release, CardPhase, PointerEvent, PointerKind, PointerSource, Release,
};
pub use crate::cards::motion::{Motion, Pose};
pub use crate::cards::suit::{Side, Suit};

mod card;
mod interaction;
mod motion;
mod suit;

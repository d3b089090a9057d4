//! Defines the animation scheduler driving every card motion, and the easing functions applied to
//! animation progress.

mod easing;
mod scheduler;

pub use easing::Easing;
pub use scheduler::{AnimationHandle, AnimationRequest, Scheduler, TickCallback, TickHost};

use std::fmt::{Debug, Formatter};

use crate::animations::Easing;
use crate::errors::Error;

pub(crate) type MotionHook = Box<dyn FnMut() -> Result<(), Error> + Send>;
pub(crate) type MotionProgressHook = Box<dyn FnMut(f32, f32) -> Result<(), Error> + Send>;

/// Position and rotation (in degrees) of a card, relative to its mount point.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, rotation: f64) -> Self {
        Self { x, y, rotation }
    }

    /// Interpolates from `self` to `target` at the (eased) progress `t`.
    ///
    /// Exact at both ends: `t = 1` yields `target` bit for bit.
    pub fn lerp(&self, target: &Pose, t: f64) -> Pose {
        let lerp = |from: f64, to: f64| from * (1.0 - t) + to * t;
        Pose {
            x: lerp(self.x, target.x),
            y: lerp(self.y, target.y),
            rotation: lerp(self.rotation, target.rotation),
        }
    }
}

/// Describes a card motion, see [`Card::animate_to`](crate::cards::Card::animate_to).
///
/// Axes left unset keep the value the card has when the motion starts.
///
/// # Example
/// ```
/// use deckhand::animations::Easing;
/// use deckhand::cards::Motion;
///
/// let motion = Motion::new(400)
///     .set_position(-10.0, -150.0)
///     .set_delay(20)
///     .set_easing(Easing::QuartOut)
///     .on_complete(|| {
///         println!("Card landed");
///         Ok(())
///     });
/// assert_eq!(motion.get_duration(), 400);
/// ```
#[derive(Default)]
pub struct Motion {
    pub(crate) x: Option<f64>,
    pub(crate) y: Option<f64>,
    pub(crate) rotation: Option<f64>,
    pub(crate) delay: u64,
    pub(crate) duration: u64,
    pub(crate) easing: Option<Easing>,
    pub(crate) on_start: Option<MotionHook>,
    pub(crate) on_progress: Option<MotionProgressHook>,
    pub(crate) on_complete: Option<MotionHook>,
}

impl Motion {
    /// Creates a motion lasting `duration` ms.
    pub fn new(duration: u64) -> Self {
        Self {
            duration,
            ..Default::default()
        }
    }

    pub fn set_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn set_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    pub fn set_position(self, x: f64, y: f64) -> Self {
        self.set_x(x).set_y(y)
    }

    /// Sets the target rotation (in degrees).
    pub fn set_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Sets the delay (in ms) before the motion starts.
    pub fn set_delay(mut self, delay: u64) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the easing function, instead of the table default.
    pub fn set_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Registers a hook called when the motion starts, after the card captured its start pose.
    pub fn on_start<F>(mut self, hook: F) -> Self
    where
        F: FnMut() -> Result<(), Error> + Send + 'static,
    {
        self.on_start = Some(Box::new(hook));
        self
    }

    /// Registers a hook called with the raw and eased progress, before the card moves.
    pub fn on_progress<F>(mut self, hook: F) -> Self
    where
        F: FnMut(f32, f32) -> Result<(), Error> + Send + 'static,
    {
        self.on_progress = Some(Box::new(hook));
        self
    }

    /// Registers a hook called once the motion is over.
    pub fn on_complete<F>(mut self, hook: F) -> Self
    where
        F: FnMut() -> Result<(), Error> + Send + 'static,
    {
        self.on_complete = Some(Box::new(hook));
        self
    }

    pub fn get_delay(&self) -> u64 {
        self.delay
    }

    pub fn get_duration(&self) -> u64 {
        self.duration
    }

    /// Resolves the target pose against the pose the card starts from.
    pub(crate) fn target(&self, from: &Pose) -> Pose {
        Pose {
            x: self.x.unwrap_or(from.x),
            y: self.y.unwrap_or(from.y),
            rotation: self.rotation.unwrap_or(from.rotation),
        }
    }
}

impl Debug for Motion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Motion")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("rotation", &self.rotation)
            .field("delay", &self.delay)
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_lerp() {
        let from = Pose::new(0.0, 10.0, -90.0);
        let to = Pose::new(100.0, -10.0, 90.0);
        assert_eq!(from.lerp(&to, 0.0), from);
        assert_eq!(from.lerp(&to, 1.0), to);
        assert_eq!(from.lerp(&to, 0.5), Pose::new(50.0, 0.0, 0.0));
    }

    #[test]
    fn test_motion_target_keeps_unset_axes() {
        let from = Pose::new(1.0, 2.0, 3.0);
        assert_eq!(Motion::new(100).target(&from), from);
        assert_eq!(
            Motion::new(100).set_y(-20.0).target(&from),
            Pose::new(1.0, -20.0, 3.0)
        );
        assert_eq!(
            Motion::new(100).set_position(5.0, 6.0).set_rotation(45.0).target(&from),
            Pose::new(5.0, 6.0, 45.0)
        );
    }

    #[test]
    fn test_motion_builder() {
        let motion = Motion::new(300)
            .set_delay(40)
            .set_easing(Easing::QuartOut)
            .on_start(|| Ok(()));
        assert_eq!(motion.get_delay(), 40);
        assert_eq!(motion.get_duration(), 300);
        assert_eq!(motion.easing, Some(Easing::QuartOut));
        assert!(motion.on_start.is_some());
        assert!(motion.on_complete.is_none());
    }
}

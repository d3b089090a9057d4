use crate::animations::Easing;

/// Tunable constants shared by every deck and card created on a [`Table`](crate::table::Table).
///
/// # Example
/// ```
/// use deckhand::animations::Easing;
/// use deckhand::table::TableConfig;
///
/// let config = TableConfig::default()
///     .set_raise_distance(40.0)
///     .set_default_easing(Easing::QuadInOut);
/// assert_eq!(config.get_tap_threshold(), 200);
/// assert_eq!(config.get_raise_distance(), 40.0);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct TableConfig {
    /// A release within this many ms after the press may be a tap.
    tap_threshold: u64,
    /// A release further than this many px from the press is a drag.
    tap_slop: f64,
    /// Vertical offset (px) of a raised card.
    raise_distance: f64,
    /// Duration (ms) of the animated raise / lower.
    raise_duration: u64,
    /// Easing applied to card motions that do not specify one.
    default_easing: Easing,
    /// Font size (px) the gesture geometry is designed for.
    base_font_size: f64,
    /// Number of cards dealt by the poker gesture.
    hand_size: usize,
    /// Initial value of the stacking order counter.
    z_base: i64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            tap_threshold: 200,
            tap_slop: 3.0,
            raise_distance: 30.0,
            raise_duration: 200,
            default_easing: Easing::CubicInOut,
            base_font_size: 16.0,
            hand_size: 5,
            z_base: 52,
        }
    }
}

impl TableConfig {
    pub fn get_tap_threshold(&self) -> u64 {
        self.tap_threshold
    }

    pub fn set_tap_threshold(mut self, tap_threshold: u64) -> Self {
        self.tap_threshold = tap_threshold;
        self
    }

    pub fn get_tap_slop(&self) -> f64 {
        self.tap_slop
    }

    pub fn set_tap_slop(mut self, tap_slop: f64) -> Self {
        self.tap_slop = tap_slop;
        self
    }

    pub fn get_raise_distance(&self) -> f64 {
        self.raise_distance
    }

    pub fn set_raise_distance(mut self, raise_distance: f64) -> Self {
        self.raise_distance = raise_distance;
        self
    }

    pub fn get_raise_duration(&self) -> u64 {
        self.raise_duration
    }

    pub fn set_raise_duration(mut self, raise_duration: u64) -> Self {
        self.raise_duration = raise_duration;
        self
    }

    pub fn get_default_easing(&self) -> Easing {
        self.default_easing
    }

    pub fn set_default_easing(mut self, default_easing: Easing) -> Self {
        self.default_easing = default_easing;
        self
    }

    pub fn get_base_font_size(&self) -> f64 {
        self.base_font_size
    }

    pub fn set_base_font_size(mut self, base_font_size: f64) -> Self {
        self.base_font_size = base_font_size;
        self
    }

    pub fn get_hand_size(&self) -> usize {
        self.hand_size
    }

    pub fn set_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    pub fn get_z_base(&self) -> i64 {
        self.z_base
    }

    pub fn set_z_base(mut self, z_base: i64) -> Self {
        self.z_base = z_base;
        self
    }
}

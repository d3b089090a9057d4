use std::fmt::Debug;

use dyn_clone::DynClone;

/// Measures the layout environment: the gesture geometry scales with the font size.
pub trait Metrics: Debug + DynClone + Send + Sync {
    /// Returns the current font size, in px.
    fn font_size(&self) -> f64;
}
dyn_clone::clone_trait_object!(Metrics);

/// [`Metrics`] with a constant font size.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedMetrics(pub f64);

impl Default for FixedMetrics {
    fn default() -> Self {
        Self(16.0)
    }
}

impl Metrics for FixedMetrics {
    fn font_size(&self) -> f64 {
        self.0
    }
}

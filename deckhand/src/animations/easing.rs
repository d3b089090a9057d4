use std::fmt::{Display, Formatter};
use std::str::FromStr;

use simple_easing::*;

use crate::errors::Error;

/// Represents a set of easing function.
///
/// An easing function is a temporal function that takes a time between 0 and 1 (beginning / end)
/// and associate to it a number value according to an ease curve.
///
/// Each variant can also be referred to by its camel-case name (`"cubicInOut"`, `"quartOut"`...),
/// see the [`FromStr`] implementation.
///
/// See <https://easings.net> for a representation of easing methods.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    /// <https://easings.net/#easeInBack>
    BackIn,
    /// <https://easings.net/#easeInOutBack>
    BackInOut,
    /// <https://easings.net/#easeOutBack>
    BackOut,
    /// <https://easings.net/#easeInCubic>
    CubicIn,
    /// <https://easings.net/#easeInOutCubic>
    CubicInOut,
    /// <https://easings.net/#easeOutCubic>
    CubicOut,
    /// <https://easings.net/#easeInExpo>
    ExpoIn,
    /// <https://easings.net/#easeInOutExpo>
    ExpoInOut,
    /// <https://easings.net/#easeOutExpo>
    ExpoOut,
    // Applies no transformation (default).
    #[default]
    Linear,
    /// <https://easings.net/#easeInQuad>
    QuadIn,
    /// <https://easings.net/#easeInOutQuad>
    QuadInOut,
    /// <https://easings.net/#easeOutQuad>
    QuadOut,
    /// <https://easings.net/#easeInQuart>
    QuartIn,
    /// <https://easings.net/#easeInOutQuart>
    QuartInOut,
    /// <https://easings.net/#easeOutQuart>
    QuartOut,
    /// <https://easings.net/#easeInQuint>
    QuintIn,
    /// <https://easings.net/#easeInOutQuint>
    QuintInOut,
    /// <https://easings.net/#easeOutQuint>
    QuintOut,
    /// <https://easings.net/#easeInSine>
    SineIn,
    /// <https://easings.net/#easeInOutSine>
    SineInOut,
    /// <https://easings.net/#easeOutSine>
    SineOut,
}

/// Camel-case names, in declaration order.
const NAMES: [(&str, Easing); 22] = [
    ("backIn", Easing::BackIn),
    ("backInOut", Easing::BackInOut),
    ("backOut", Easing::BackOut),
    ("cubicIn", Easing::CubicIn),
    ("cubicInOut", Easing::CubicInOut),
    ("cubicOut", Easing::CubicOut),
    ("expoIn", Easing::ExpoIn),
    ("expoInOut", Easing::ExpoInOut),
    ("expoOut", Easing::ExpoOut),
    ("linear", Easing::Linear),
    ("quadIn", Easing::QuadIn),
    ("quadInOut", Easing::QuadInOut),
    ("quadOut", Easing::QuadOut),
    ("quartIn", Easing::QuartIn),
    ("quartInOut", Easing::QuartInOut),
    ("quartOut", Easing::QuartOut),
    ("quintIn", Easing::QuintIn),
    ("quintInOut", Easing::QuintInOut),
    ("quintOut", Easing::QuintOut),
    ("sineIn", Easing::SineIn),
    ("sineInOut", Easing::SineInOut),
    ("sineOut", Easing::SineOut),
];

impl Easing {
    /// Calls the easing function on a normalized progress `t`.
    pub fn call(&self, t: f32) -> f32 {
        match self {
            Easing::BackIn => back_in(t),
            Easing::BackInOut => back_in_out(t),
            Easing::BackOut => back_out(t),
            Easing::CubicIn => cubic_in(t),
            Easing::CubicInOut => cubic_in_out(t),
            Easing::CubicOut => cubic_out(t),
            Easing::ExpoIn => expo_in(t),
            Easing::ExpoInOut => expo_in_out(t),
            Easing::ExpoOut => expo_out(t),
            Easing::Linear => t,
            Easing::QuadIn => quad_in(t),
            Easing::QuadInOut => quad_in_out(t),
            Easing::QuadOut => quad_out(t),
            Easing::QuartIn => quart_in(t),
            Easing::QuartInOut => quart_in_out(t),
            Easing::QuartOut => quart_out(t),
            Easing::QuintIn => quint_in(t),
            Easing::QuintInOut => quint_in_out(t),
            Easing::QuintOut => quint_out(t),
            Easing::SineIn => sine_in(t),
            Easing::SineInOut => sine_in_out(t),
            Easing::SineOut => sine_out(t),
        }
    }

    /// Returns the camel-case name of the easing function.
    pub fn name(&self) -> &'static str {
        NAMES
            .iter()
            .find(|(_, easing)| easing == self)
            .map(|(name, _)| *name)
            .unwrap_or("linear")
    }
}

impl FromStr for Easing {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, easing)| *easing)
            .ok_or_else(|| Error::UnknownEasing {
                name: name.to_string(),
            })
    }
}

impl Display for Easing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

use crate::table::TableConfig;

/// What happened to the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Move,
    Release,
}

/// The input family a pointer event comes from. A press session only listens to its own family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch,
}

/// A pointer event targeting a card, in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub source: PointerSource,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, source: PointerSource, x: f64, y: f64) -> Self {
        Self { kind, source, x, y }
    }

    pub fn press(source: PointerSource, x: f64, y: f64) -> Self {
        Self::new(PointerKind::Press, source, x, y)
    }

    pub fn moved(source: PointerSource, x: f64, y: f64) -> Self {
        Self::new(PointerKind::Move, source, x, y)
    }

    pub fn release(source: PointerSource, x: f64, y: f64) -> Self {
        Self::new(PointerKind::Release, source, x, y)
    }
}

/// How a press / release pair is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    /// Short and (almost) motionless: flips or clicks the card.
    Tap,
    /// Anything else: moves the card (when draggable).
    Drag,
}

/// The interaction phase of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardPhase {
    Idle,
    Raised,
    Dragging,
}

/// An ongoing press session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Press {
    pub source: PointerSource,
    pub origin: (f64, f64),
    pub time: u64,
}

impl Press {
    /// Pointer delta between the press and the given position.
    pub fn delta(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.origin.0, y - self.origin.1)
    }
}

/// Classifies a release `elapsed` ms after its press, `displacement` px away from it.
pub fn classify_release(elapsed: u64, displacement: f64, config: &TableConfig) -> Release {
    match elapsed < config.get_tap_threshold() && displacement <= config.get_tap_slop() {
        true => Release::Tap,
        false => Release::Drag,
    }
}

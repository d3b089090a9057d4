//! Mocked collaborators for tests: a recording renderer, a manual clock and a manual tick host.

pub use crate::mocks::clock::ManualClock;
pub use crate::mocks::host::ManualHost;
pub use crate::mocks::renderer::{ElementState, MockRenderer, RenderCall};

mod clock;
mod host;
mod renderer;

pub use tokio;
pub use tokio::time::sleep;

pub use crate::utils::clock::{Clock, SystemClock};

mod clock;
pub mod events;
pub mod task;

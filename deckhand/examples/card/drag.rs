//! This example drags a card around, then taps it to flip it.
//!
//! # Notes
//! - Pointer events come from the host application: here they are simulated.
//! - A press released quickly without moving is a tap: a flippable card flips on tap.
//! - Moving the pointer while pressed drags a draggable card (and stops its running motions).

use std::time::Duration;

use deckhand::cards::{Card, PointerEvent, PointerSource};
use deckhand::errors::Error;
use deckhand::mocks::MockRenderer;
use deckhand::table::Table;
use deckhand::utils::task::TimerHost;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let renderer = MockRenderer::default();
    let table = Table::new(
        renderer.clone(),
        TimerHost::try_current()?.with_interval(16),
    );

    // The queen of hearts.
    let mut card = Card::new(&table, 24)?;
    card.mount("table")?;
    card.enable_dragging()?;
    card.enable_flipping();
    println!("{:?} shows its {}", card.get_pose(), card.get_side());

    // Drag.
    card.handle_pointer(PointerEvent::press(PointerSource::Mouse, 100.0, 100.0))?;
    for step in 1..=5 {
        let offset = step as f64 * 20.0;
        card.handle_pointer(PointerEvent::moved(
            PointerSource::Mouse,
            100.0 + offset,
            100.0 - offset,
        ))?;
        // The card follows the pointer on screen: its pose is only updated on release.
        let drawn = renderer.element(card.get_element()).map(|state| state.transform);
        println!("dragging: drawn at {:?}", drawn);
    }
    card.handle_pointer(PointerEvent::release(PointerSource::Mouse, 200.0, 0.0))?;
    println!("{:?} shows its {}", card.get_pose(), card.get_side());

    // Tap.
    card.handle_pointer(PointerEvent::press(PointerSource::Touch, 200.0, 0.0))?;
    card.handle_pointer(PointerEvent::release(PointerSource::Touch, 201.0, 0.0))?;
    println!("{:?} shows its {}", card.get_pose(), card.get_side());

    // Raise it for a while.
    card.raise(None, 0);
    tokio::time::sleep(Duration::from_millis(300)).await;
    println!("raised: {:?}", card.get_pose());
    Ok(())
}

//! Defines the rendering backend the cards draw through.

use std::fmt::Debug;

use dyn_clone::DynClone;

use crate::cards::Suit;
use crate::errors::Error;

/// Identifies a card visual element in the rendering backend.
pub type ElementId = usize;

/// The rendering backend: a retained scene of card elements.
///
/// Each card owns one element. An element shows either its face or its back (attached/detached as
/// the card flips), carries a 2D transform, a stacking order, an optional opacity and a visual
/// class (the rank/suit skin of the face).
///
/// Implementations are cloned into every card created on a [`Table`](crate::table::Table): clones
/// must share the same underlying scene.
pub trait Renderer: Debug + DynClone + Send + Sync {
    /// Positions the element (in pixels, relative to its mount point) and rotates it (in degrees).
    fn set_transform(&mut self, element: ElementId, x: f64, y: f64, rotation: f64)
        -> Result<(), Error>;

    /// Sets the element stacking order: higher values are drawn on top.
    fn set_z_order(&mut self, element: ElementId, z: i64) -> Result<(), Error>;

    /// Sets the element opacity (0 to 1), or clears it when `None`.
    fn set_opacity(&mut self, element: ElementId, opacity: Option<f64>) -> Result<(), Error>;

    fn set_visibility(&mut self, element: ElementId, visible: bool) -> Result<(), Error>;

    fn attach_face(&mut self, element: ElementId) -> Result<(), Error>;
    fn detach_face(&mut self, element: ElementId) -> Result<(), Error>;
    fn attach_back(&mut self, element: ElementId) -> Result<(), Error>;
    fn detach_back(&mut self, element: ElementId) -> Result<(), Error>;

    /// Applies the face skin for the given rank and suit, or clears it when `None`.
    fn set_visual_class(
        &mut self,
        element: ElementId,
        class: Option<(u8, Suit)>,
    ) -> Result<(), Error>;

    /// Hints the backend whether the element can be grabbed (cursor style, etc.).
    fn set_draggable_hint(&mut self, _element: ElementId, _draggable: bool) -> Result<(), Error> {
        Ok(())
    }

    /// Attaches the element under the named mount point.
    fn mount(&mut self, element: ElementId, root: &str) -> Result<(), Error>;

    /// Detaches the element from its mount point.
    fn unmount(&mut self, element: ElementId) -> Result<(), Error>;
}
dyn_clone::clone_trait_object!(Renderer);

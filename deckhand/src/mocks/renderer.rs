use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::cards::Suit;
use crate::errors::{Error, RenderError};
use crate::render::{ElementId, Renderer};

/// A call received by the [`MockRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCall {
    Transform {
        element: ElementId,
        x: f64,
        y: f64,
        rotation: f64,
    },
    ZOrder {
        element: ElementId,
        z: i64,
    },
    Opacity {
        element: ElementId,
        opacity: Option<f64>,
    },
    Visibility {
        element: ElementId,
        visible: bool,
    },
    AttachFace(ElementId),
    DetachFace(ElementId),
    AttachBack(ElementId),
    DetachBack(ElementId),
    VisualClass {
        element: ElementId,
        class: Option<(u8, Suit)>,
    },
    DraggableHint {
        element: ElementId,
        draggable: bool,
    },
    Mount {
        element: ElementId,
        root: String,
    },
    Unmount(ElementId),
}

impl RenderCall {
    /// Returns the element the call targets.
    pub fn element(&self) -> ElementId {
        match self {
            RenderCall::Transform { element, .. }
            | RenderCall::ZOrder { element, .. }
            | RenderCall::Opacity { element, .. }
            | RenderCall::Visibility { element, .. }
            | RenderCall::VisualClass { element, .. }
            | RenderCall::DraggableHint { element, .. }
            | RenderCall::Mount { element, .. } => *element,
            RenderCall::AttachFace(element)
            | RenderCall::DetachFace(element)
            | RenderCall::AttachBack(element)
            | RenderCall::DetachBack(element)
            | RenderCall::Unmount(element) => *element,
        }
    }
}

/// The last known state of an element in the [`MockRenderer`] scene.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementState {
    pub transform: (f64, f64, f64),
    pub z: i64,
    pub opacity: Option<f64>,
    pub visible: bool,
    pub face: bool,
    pub back: bool,
    pub class: Option<(u8, Suit)>,
    pub draggable: bool,
    pub root: Option<String>,
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            transform: (0.0, 0.0, 0.0),
            z: 0,
            opacity: None,
            visible: true,
            face: false,
            back: false,
            class: None,
            draggable: false,
            root: None,
        }
    }
}

#[derive(Debug, Default)]
struct Scene {
    journal: Vec<RenderCall>,
    elements: HashMap<ElementId, ElementState>,
    failing: bool,
}

/// A [`Renderer`] recording every call it receives and the resulting scene.
/// Clones share the same scene.
#[derive(Clone, Debug, Default)]
pub struct MockRenderer {
    scene: Arc<RwLock<Scene>>,
}

impl MockRenderer {
    /// Returns a copy of every call received so far, in order.
    pub fn journal(&self) -> Vec<RenderCall> {
        self.scene.read().journal.clone()
    }

    /// Returns a copy of the calls received so far targeting `element`, in order.
    pub fn journal_of(&self, element: ElementId) -> Vec<RenderCall> {
        self.scene
            .read()
            .journal
            .iter()
            .filter(|call| call.element() == element)
            .cloned()
            .collect()
    }

    pub fn clear_journal(&self) {
        self.scene.write().journal.clear();
    }

    /// Returns the current state of an element (if it ever received a call).
    pub fn element(&self, element: ElementId) -> Option<ElementState> {
        self.scene.read().elements.get(&element).cloned()
    }

    /// Makes every further call fail with a backend error (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.scene.write().failing = failing;
    }

    fn record<F>(&self, call: RenderCall, update: F) -> Result<(), Error>
    where
        F: FnOnce(&mut ElementState),
    {
        let mut scene = self.scene.write();
        if scene.failing {
            return Err(RenderError::Backend {
                info: format!("{:?} rejected", call),
            }
            .into());
        }
        update(scene.elements.entry(call.element()).or_default());
        scene.journal.push(call);
        Ok(())
    }
}

impl Renderer for MockRenderer {
    fn set_transform(
        &mut self,
        element: ElementId,
        x: f64,
        y: f64,
        rotation: f64,
    ) -> Result<(), Error> {
        let call = RenderCall::Transform {
            element,
            x,
            y,
            rotation,
        };
        self.record(call, |state| state.transform = (x, y, rotation))
    }

    fn set_z_order(&mut self, element: ElementId, z: i64) -> Result<(), Error> {
        self.record(RenderCall::ZOrder { element, z }, |state| state.z = z)
    }

    fn set_opacity(&mut self, element: ElementId, opacity: Option<f64>) -> Result<(), Error> {
        self.record(RenderCall::Opacity { element, opacity }, |state| {
            state.opacity = opacity
        })
    }

    fn set_visibility(&mut self, element: ElementId, visible: bool) -> Result<(), Error> {
        self.record(RenderCall::Visibility { element, visible }, |state| {
            state.visible = visible
        })
    }

    fn attach_face(&mut self, element: ElementId) -> Result<(), Error> {
        self.record(RenderCall::AttachFace(element), |state| state.face = true)
    }

    fn detach_face(&mut self, element: ElementId) -> Result<(), Error> {
        self.record(RenderCall::DetachFace(element), |state| state.face = false)
    }

    fn attach_back(&mut self, element: ElementId) -> Result<(), Error> {
        self.record(RenderCall::AttachBack(element), |state| state.back = true)
    }

    fn detach_back(&mut self, element: ElementId) -> Result<(), Error> {
        self.record(RenderCall::DetachBack(element), |state| state.back = false)
    }

    fn set_visual_class(
        &mut self,
        element: ElementId,
        class: Option<(u8, Suit)>,
    ) -> Result<(), Error> {
        self.record(RenderCall::VisualClass { element, class }, |state| {
            state.class = class
        })
    }

    fn set_draggable_hint(&mut self, element: ElementId, draggable: bool) -> Result<(), Error> {
        self.record(RenderCall::DraggableHint { element, draggable }, |state| {
            state.draggable = draggable
        })
    }

    fn mount(&mut self, element: ElementId, root: &str) -> Result<(), Error> {
        let call = RenderCall::Mount {
            element,
            root: root.to_string(),
        };
        self.record(call, |state| state.root = Some(root.to_string()))
    }

    fn unmount(&mut self, element: ElementId) -> Result<(), Error> {
        self.record(RenderCall::Unmount(element), |state| state.root = None)
    }
}

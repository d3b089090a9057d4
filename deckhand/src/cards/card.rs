use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use log::trace;
use parking_lot::{Mutex, RwLock};

use crate::animations::{AnimationRequest, Easing};
use crate::cards::interaction::{classify_release, Press};
use crate::cards::{CardPhase, Motion, PointerEvent, PointerKind, Pose, Release, Side, Suit};
use crate::errors::Error;
use crate::render::{ElementId, Renderer};
use crate::table::Table;

type ClickCallback = Box<dyn FnMut(bool) -> Result<(), Error> + Send + Sync>;

struct CardState {
    pose: Pose,
    side: Side,
    draggable: bool,
    flippable: bool,
    clickable: bool,
    /// Whether the card is raised above its resting position.
    raised: bool,
    raise_distance: f64,
    on_click: Option<ClickCallback>,
    hidden: bool,
    root: Option<String>,
    /// Order index in the deck (updated by shuffles).
    position: usize,
    /// Motions scheduled before the last `stop()` carry an older generation.
    generation: u64,
    /// Motions scheduled and not yet complete.
    in_flight: usize,
    press: Option<Press>,
}

/// Represents a playing card drawn on a [`Table`].
///
/// A card is a cheap clone-handle: clones share the same state and draw the same element.
/// Its identity (0 to 53) determines its rank and suit: `rank = identity % 13 + 1`,
/// `suit = identity / 13` (the 53rd and 54th cards are jokers).
///
/// # Example
/// ```ignore
/// use deckhand::cards::{Card, Motion, Side, Suit};
/// use deckhand::mocks::{ManualHost, MockRenderer};
/// use deckhand::table::Table;
///
/// let table = Table::new(MockRenderer::default(), ManualHost::default());
/// let mut card = Card::new(&table, 14).unwrap();
/// assert_eq!(card.get_rank(), 2);
/// assert_eq!(card.get_suit(), Suit::Hearts);
///
/// card.set_side(Side::Front).unwrap();
/// card.animate_to(Motion::new(300).set_position(100.0, 0.0));
/// ```
#[derive(Clone)]
pub struct Card {
    identity: u8,
    element: ElementId,
    state: Arc<RwLock<CardState>>,
    renderer: Box<dyn Renderer>,
    table: Table,
}

impl Card {
    /// Creates a card on the table: back side up, at its stacked offset, not mounted.
    pub fn new(table: &Table, identity: u8) -> Result<Self, Error> {
        let element = table.create_element();
        let offset = Self::stack_offset_of(identity as usize);

        let mut card = Self {
            identity,
            element,
            state: Arc::new(RwLock::new(CardState {
                pose: Pose::new(-offset, -offset, 0.0),
                side: Side::Back,
                draggable: false,
                flippable: false,
                clickable: false,
                raised: false,
                raise_distance: table.get_config().get_raise_distance(),
                on_click: None,
                hidden: false,
                root: None,
                position: identity as usize,
                generation: 0,
                in_flight: 0,
                press: None,
            })),
            renderer: table.get_renderer(),
            table: table.clone(),
        };

        card.renderer.attach_back(element)?;
        card.renderer.set_visual_class(element, None)?;
        card.draw()?;
        Ok(card)
    }

    /// The stacked offset of the card at the given index: cards pile up towards the top-left.
    pub(crate) fn stack_offset_of(index: usize) -> f64 {
        (52.0 - index as f64) / 4.0
    }

    // ########################################
    // Accessors

    pub fn get_identity(&self) -> u8 {
        self.identity
    }

    /// Returns the rank (1 to 13).
    pub fn get_rank(&self) -> u8 {
        self.identity % 13 + 1
    }

    pub fn get_suit(&self) -> Suit {
        Suit::from_identity(self.identity)
    }

    /// Returns the card index computed back from its rank and suit.
    pub fn index(&self) -> usize {
        self.get_suit().value() as usize * 13 + self.get_rank() as usize - 1
    }

    /// Returns the stacked offset of the card in a fresh deck.
    pub fn get_stack_offset(&self) -> f64 {
        Self::stack_offset_of(self.identity as usize)
    }

    pub fn get_element(&self) -> ElementId {
        self.element
    }

    pub fn get_pose(&self) -> Pose {
        self.state.read().pose
    }

    pub fn get_side(&self) -> Side {
        self.state.read().side
    }

    pub fn get_root(&self) -> Option<String> {
        self.state.read().root.clone()
    }

    pub fn get_position(&self) -> usize {
        self.state.read().position
    }

    pub(crate) fn set_position(&self, position: usize) {
        self.state.write().position = position;
    }

    pub fn is_draggable(&self) -> bool {
        self.state.read().draggable
    }

    pub fn is_flippable(&self) -> bool {
        self.state.read().flippable
    }

    pub fn is_clickable(&self) -> bool {
        self.state.read().clickable
    }

    pub fn is_raised(&self) -> bool {
        self.state.read().raised
    }

    pub fn is_hidden(&self) -> bool {
        self.state.read().hidden
    }

    /// Indicates whether motions are scheduled on the card and not complete yet.
    pub fn is_animating(&self) -> bool {
        self.state.read().in_flight > 0
    }

    /// Returns the interaction phase of the card.
    pub fn phase(&self) -> CardPhase {
        let state = self.state.read();
        match (state.press.is_some() && state.draggable, state.raised) {
            (true, _) => CardPhase::Dragging,
            (false, true) => CardPhase::Raised,
            (false, false) => CardPhase::Idle,
        }
    }

    pub fn get_raise_distance(&self) -> f64 {
        self.state.read().raise_distance
    }

    /// Sets the distance (px) the card moves up when raised.
    pub fn set_raise_distance(&self, distance: f64) {
        self.state.write().raise_distance = distance;
    }

    // ########################################
    // Drawing

    /// Mounts the card element under the given mount point.
    pub fn mount(&mut self, root: &str) -> Result<&Self, Error> {
        self.renderer.mount(self.element, root)?;
        self.state.write().root = Some(root.to_string());
        Ok(self)
    }

    /// Unmounts the card element (if mounted).
    pub fn unmount(&mut self) -> Result<&Self, Error> {
        let root = self.state.write().root.take();
        if root.is_some() {
            self.renderer.unmount(self.element)?;
        }
        Ok(self)
    }

    /// Shows the given side: the element of the other side is detached.
    pub fn set_side(&mut self, side: Side) -> Result<&Self, Error> {
        let current = std::mem::replace(&mut self.state.write().side, side);
        match (current, side) {
            (Side::Back, Side::Front) => self.renderer.detach_back(self.element)?,
            (Side::Front, Side::Back) => self.renderer.detach_face(self.element)?,
            _ => {}
        }
        match side {
            Side::Front => {
                let class = Some((self.get_rank(), self.get_suit()));
                self.renderer.attach_face(self.element)?;
                self.renderer.set_visual_class(self.element, class)?;
            }
            Side::Back => {
                self.renderer.attach_back(self.element)?;
                self.renderer.set_visual_class(self.element, None)?;
            }
        }
        Ok(self)
    }

    /// Hides (or shows) the card. A hidden card is shown again as soon as a motion starts.
    pub fn set_hidden(&mut self, hidden: bool) -> Result<&Self, Error> {
        self.state.write().hidden = hidden;
        self.renderer.set_visibility(self.element, !hidden)?;
        Ok(self)
    }

    /// Moves the card to the given pose, right away.
    pub fn set_pose(&mut self, pose: Pose) -> Result<&Self, Error> {
        self.state.write().pose = pose;
        self.draw()?;
        Ok(self)
    }

    pub fn set_z_order(&mut self, z: i64) -> Result<&Self, Error> {
        self.renderer.set_z_order(self.element, z)?;
        Ok(self)
    }

    pub fn set_opacity(&mut self, opacity: Option<f64>) -> Result<&Self, Error> {
        self.renderer.set_opacity(self.element, opacity)?;
        Ok(self)
    }

    /// Brings the card to the top of the table stacking order.
    pub fn lift(&mut self) -> Result<&Self, Error> {
        let z = self.table.get_stacking().next();
        self.set_z_order(z)
    }

    /// Writes the current pose to the renderer.
    fn draw(&mut self) -> Result<(), Error> {
        let pose = self.get_pose();
        self.renderer
            .set_transform(self.element, pose.x, pose.y, pose.rotation)
    }

    // ########################################
    // Motion

    /// Animates the card to the motion target pose.
    ///
    /// - The pose the card starts from is captured when the motion starts (after its delay).
    /// - Each progress writes the interpolated pose (through the motion easing, or the table
    ///   default one) and brings the card to the top of the stacking order.
    /// - Motion hooks run before the card own work on start and progress, after it on complete.
    ///
    /// A motion scheduled before a call to [`Self::stop()`] does not move the card anymore, but
    /// still runs its hooks.
    pub fn animate_to(&self, motion: Motion) {
        let easing = motion
            .easing
            .unwrap_or_else(|| self.table.get_config().get_default_easing());
        let target = Arc::new(Mutex::new(Pose::default()));
        let origin = Arc::new(Mutex::new(Pose::default()));

        let generation = {
            let mut state = self.state.write();
            state.in_flight += 1;
            state.generation
        };
        trace!(
            "Card #{} motion scheduled [delay={}ms, duration={}ms]",
            self.identity,
            motion.delay,
            motion.duration
        );

        let request = AnimationRequest::new(motion.delay, motion.duration);
        let Motion {
            mut on_start,
            mut on_progress,
            mut on_complete,
            ..
        } = motion;
        let axes = Motion {
            x: motion.x,
            y: motion.y,
            rotation: motion.rotation,
            ..Default::default()
        };

        // Start: capture the pose, show the card.
        let mut card = self.clone();
        let (start_origin, start_target) = (origin.clone(), target.clone());
        let request = request.on_start(move || {
            let (pose, current) = {
                let mut state = card.state.write();
                let current = state.generation == generation;
                if current {
                    state.hidden = false;
                }
                (state.pose, current)
            };
            *start_origin.lock() = pose;
            *start_target.lock() = axes.target(&pose);
            if current {
                card.renderer.set_visibility(card.element, true)?;
            }
            match on_start.as_mut() {
                None => Ok(()),
                Some(hook) => hook(),
            }
        });

        // Progress: interpolate and draw on top.
        let mut card = self.clone();
        let request = request.on_progress(move |t| {
            let eased = easing.call(t);
            if let Some(hook) = on_progress.as_mut() {
                hook(t, eased)?;
            }

            let pose = origin.lock().lerp(&target.lock(), eased as f64);
            {
                let mut state = card.state.write();
                if state.generation != generation {
                    return Ok(());
                }
                state.pose = pose;
            }
            card.draw()?;
            card.lift()?;
            Ok(())
        });

        // End.
        let card = self.clone();
        let request = request.on_end(move || {
            {
                let mut state = card.state.write();
                state.in_flight = state.in_flight.saturating_sub(1);
            }
            match on_complete.as_mut() {
                None => Ok(()),
                Some(hook) => hook(),
            }
        });

        self.table.get_scheduler().submit(request);
    }

    /// Stops the motions in flight: they leave the card where it is, but still complete.
    pub fn stop(&self) -> &Self {
        self.state.write().generation += 1;
        self
    }

    /// Raises the card (animated), if not raised yet.
    ///
    /// Without a duration, the table `raise_duration` is used.
    pub fn raise(&self, duration: Option<u64>, delay: u64) -> &Self {
        self.animate_raise(true, duration, delay)
    }

    /// Lowers the card (animated), if raised.
    ///
    /// Without a duration, the table `raise_duration` is used.
    pub fn lower(&self, duration: Option<u64>, delay: u64) -> &Self {
        self.animate_raise(false, duration, delay)
    }

    fn animate_raise(&self, raise: bool, duration: Option<u64>, delay: u64) -> &Self {
        let duration =
            duration.unwrap_or_else(|| self.table.get_config().get_raise_duration());
        let target = {
            let mut state = self.state.write();
            if state.raised == raise {
                return self;
            }
            state.raised = raise;
            match raise {
                true => state.pose.y - state.raise_distance,
                false => state.pose.y + state.raise_distance,
            }
        };
        self.animate_to(
            Motion::new(duration)
                .set_delay(delay)
                .set_y(target)
                .set_easing(Easing::QuartOut),
        );
        self
    }

    // ########################################
    // Interactions

    /// Lets the card be moved with the pointer.
    pub fn enable_dragging(&mut self) -> Result<&Self, Error> {
        if std::mem::replace(&mut self.state.write().draggable, true) {
            return Ok(self);
        }
        self.renderer.set_draggable_hint(self.element, true)?;
        Ok(self)
    }

    pub fn disable_dragging(&mut self) -> Result<&Self, Error> {
        if !std::mem::replace(&mut self.state.write().draggable, false) {
            return Ok(self);
        }
        self.renderer.set_draggable_hint(self.element, false)?;
        Ok(self)
    }

    /// Lets a tap flip the card.
    pub fn enable_flipping(&self) -> &Self {
        self.state.write().flippable = true;
        self
    }

    pub fn disable_flipping(&self) -> &Self {
        self.state.write().flippable = false;
        self
    }

    /// Lets a tap raise or lower the card. The callback is notified of the new raised state.
    ///
    /// No-op if clicking is already enabled. A raised card is lowered first.
    pub fn enable_clicking<F>(&mut self, callback: F) -> Result<&Self, Error>
    where
        F: FnMut(bool) -> Result<(), Error> + Send + Sync + 'static,
    {
        let raised = {
            let mut state = self.state.write();
            if state.clickable {
                return Ok(self);
            }
            state.clickable = true;
            state.on_click = Some(Box::new(callback));
            state.raised
        };
        if raised {
            self.toggle_raise()?;
        }
        Ok(self)
    }

    /// No-op if clicking is already disabled. A raised card is lowered first.
    pub fn disable_clicking(&mut self) -> Result<&Self, Error> {
        let raised = {
            let mut state = self.state.write();
            if !state.clickable {
                return Ok(self);
            }
            state.clickable = false;
            state.raised
        };
        if raised {
            self.toggle_raise()?;
        }
        self.state.write().on_click = None;
        Ok(self)
    }

    /// Raises or lowers the card right away and notifies the click callback.
    fn toggle_raise(&mut self) -> Result<(), Error> {
        let (pose, raised, callback) = {
            let mut state = self.state.write();
            state.pose.y += match state.raised {
                true => state.raise_distance,
                false => -state.raise_distance,
            };
            state.raised = !state.raised;
            (state.pose, state.raised, state.on_click.take())
        };

        self.renderer
            .set_transform(self.element, pose.x, pose.y, pose.rotation)?;
        let z = match raised {
            true => self.table.get_stacking().next(),
            false => self.table.get_stacking().previous(),
        };
        self.renderer.set_z_order(self.element, z)?;

        match callback {
            None => Ok(()),
            Some(mut callback) => {
                let result = callback(raised);
                let mut state = self.state.write();
                if state.on_click.is_none() && state.clickable {
                    state.on_click = Some(callback);
                }
                result
            }
        }
    }

    /// Feeds a pointer event targeting the card.
    ///
    /// - A press opens a session for its input family: events of the other family are ignored
    ///   until the session is released.
    /// - A draggable card follows the pointer; its motions in flight are stopped on press.
    /// - A release is either a tap (flip and/or raise toggle) or a drag, see
    ///   [`classify_release`](crate::cards::classify_release).
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<&Self, Error> {
        match event.kind {
            PointerKind::Press => self.on_press(event),
            PointerKind::Move => self.on_move(event),
            PointerKind::Release => self.on_release(event),
        }?;
        Ok(self)
    }

    fn on_press(&mut self, event: PointerEvent) -> Result<(), Error> {
        let now = self.table.now();
        let draggable = {
            let mut state = self.state.write();
            if state.press.is_some() {
                return Ok(());
            }
            state.press = Some(Press {
                source: event.source,
                origin: (event.x, event.y),
                time: now,
            });
            state.draggable
        };
        if !draggable {
            return Ok(());
        }

        self.stop();
        self.draw()?;
        self.lift()?;
        Ok(())
    }

    fn on_move(&mut self, event: PointerEvent) -> Result<(), Error> {
        let (pose, (dx, dy)) = {
            let state = self.state.read();
            match state.press {
                Some(press) if press.source == event.source && state.draggable => {
                    (state.pose, press.delta(event.x, event.y))
                }
                _ => return Ok(()),
            }
        };
        self.renderer.set_transform(
            self.element,
            (pose.x + dx).round(),
            (pose.y + dy).round(),
            pose.rotation,
        )
    }

    fn on_release(&mut self, event: PointerEvent) -> Result<(), Error> {
        let now = self.table.now();
        let press = {
            let mut state = self.state.write();
            match state.press {
                Some(press) if press.source == event.source => {
                    state.press = None;
                    press
                }
                _ => return Ok(()),
            }
        };

        let (dx, dy) = press.delta(event.x, event.y);
        let release = classify_release(
            now.saturating_sub(press.time),
            dx.hypot(dy),
            self.table.get_config(),
        );
        trace!("Card #{} released: {:?}", self.identity, release);

        let (draggable, flippable, clickable) = {
            let state = self.state.read();
            (state.draggable, state.flippable, state.clickable)
        };
        if release == Release::Tap && flippable {
            let side = self.get_side().flipped();
            self.set_side(side)?;
        }
        if release == Release::Tap && clickable {
            return self.toggle_raise();
        }
        if !draggable {
            return Ok(());
        }
        if release == Release::Drag {
            let mut state = self.state.write();
            state.pose.x += dx;
            state.pose.y += dy;
        }
        self.draw()
    }
}

impl Debug for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Card")
            .field("identity", &self.identity)
            .field("element", &self.element)
            .field("pose", &state.pose)
            .field("side", &state.side)
            .field("raised", &state.raised)
            .finish()
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

//! Defines deckhand event manager system.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{error, warn};
use parking_lot::Mutex;

use crate::errors::Error;

pub type EventHandler = usize;

type BoxedCallback = Box<dyn FnMut(Arc<dyn Any + Send + Sync>) -> Result<(), Error> + Send>;

#[derive(Clone, Default)]
pub struct EventManager {
    registry: Arc<Mutex<Registry>>,
    next_id: Arc<AtomicUsize>,
}

/// Handlers per event name.
///
/// Handlers of an event being emitted are out of the map: unregistrations made meanwhile are
/// recorded to be applied when they are put back.
#[derive(Default)]
struct Registry {
    callbacks: HashMap<String, Vec<CallbackWrapper>>,
    /// Number of emits in progress.
    emitting: usize,
    /// Handlers unregistered while emitting.
    unregistered: HashSet<EventHandler>,
    /// Bumped by `unregister_all()`.
    epoch: usize,
}

struct CallbackWrapper {
    id: EventHandler,
    once: bool,
    callback: BoxedCallback,
}

impl EventManager {
    /// Register event handler for a specific event name.
    ///
    /// # Parameters
    /// * `event` - The event name (any type that matches an Into<String>)
    /// * `callback` - A callback that accepts a single parameter as an argument.
    ///                The argument can be anything that might be both `Send + Sync`.
    ///                You can trick multiple parameters by turning them in a single tuple.
    ///
    /// # Return
    /// Returns an EventHandler that can be used by the `unregister()` method.
    ///
    /// # Errors
    /// If the event handler does not match the expected emitted event exactly it will fail silently.
    /// That means if the tuple gave in the callback parameter does not exactly match the emit one
    /// no handler will be called.
    ///
    /// # Example
    ///
    /// ```
    /// use deckhand::utils::events::EventManager;
    ///
    /// let events: EventManager = Default::default();
    ///
    /// // Register various handlers for the same event.
    /// events.on("ready", |_name: String| Ok(()));
    /// events.on("ready", |(name, age): (String, u8)| {
    ///     println!("Event handler with parameters: {} {}.", name, age);
    ///     Ok(())
    /// });
    ///
    /// // Invoke handlers for "ready" event.
    /// events.emit("ready", (String::from("foo"), 69u8));
    ///
    /// // No matching handler (because of parameters) will be called
    /// events.emit("ready", "bar");
    /// ```
    pub fn on<S, F, T>(&self, event: S, callback: F) -> EventHandler
    where
        S: Into<String>,
        T: 'static + Send + Sync + Clone,
        F: FnMut(T) -> Result<(), Error> + Send + 'static,
    {
        self.register(event.into(), false, callback)
    }

    /// Same as [`Self::on`] but the handler is unregistered after its first call.
    pub fn one<S, F, T>(&self, event: S, callback: F) -> EventHandler
    where
        S: Into<String>,
        T: 'static + Send + Sync + Clone,
        F: FnMut(T) -> Result<(), Error> + Send + 'static,
    {
        self.register(event.into(), true, callback)
    }

    fn register<F, T>(&self, event_name: String, once: bool, mut callback: F) -> EventHandler
    where
        T: 'static + Send + Sync + Clone,
        F: FnMut(T) -> Result<(), Error> + Send + 'static,
    {
        let callback_event = event_name.clone();
        // Generate a unique ID.
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        // Boxes the callback and downcast its parameter.
        let boxed_callback = Box::new(move |arg: Arc<dyn Any + Send + Sync>| {
            match arg.downcast::<T>() {
                Ok(arg) => (callback)((*arg).clone()),
                Err(_) => {
                    warn!(
                        "The callback for event '{}' could not be called because parameter does not match",
                        callback_event
                    );
                    Ok(())
                }
            }
        });

        self.registry
            .lock()
            .callbacks
            .entry(event_name)
            .or_default()
            .push(CallbackWrapper {
                id,
                once,
                callback: boxed_callback,
            });

        id
    }

    /// Invoke all event handlers registered for a specific event name.
    /// Only the callback registered by the `on()` method and whose payload matches the declared
    /// callback type will be called. All others will be silently skipped.
    ///
    /// Handlers are called in registration order, outside the registry lock: a handler may
    /// register new handlers (called from the next emit on) or unregister handlers (taking effect
    /// once this emit is over). An emit of the same event from within a handler reaches no handler.
    /// A failing handler is logged and does not prevent the next ones from being called.
    ///
    /// # Parameters
    /// * `event`:  The event name (any type that matches an `Into<String>`)
    /// * `payload`: The event payload (must be `'static + Send + Sync`)
    ///
    /// # Example
    ///
    /// ```
    /// use deckhand::utils::events::EventManager;
    ///
    /// let events: EventManager = Default::default();
    /// events.on("ready", |age: u8| {
    ///     println!("Callback called with {}", age);
    ///     Ok(())
    /// });
    ///
    /// // Invoke handlers for "ready" event matching u8 parameter.
    /// events.emit("ready", 42u8);
    ///
    /// // No event registered for "nothing" event.
    /// events.emit("nothing", ());
    /// ```
    pub fn emit<S, T>(&self, event: S, payload: T)
    where
        S: Into<String>,
        T: 'static + Send + Sync,
    {
        let event_name = event.into();
        let payload_any: Arc<dyn Any + Send + Sync> = Arc::new(payload);

        let (mut wrappers, epoch) = {
            let mut registry = self.registry.lock();
            let wrappers = match registry.callbacks.get_mut(&event_name) {
                None => return,
                Some(callbacks) => std::mem::take(callbacks),
            };
            registry.emitting += 1;
            (wrappers, registry.epoch)
        };

        for wrapper in wrappers.iter_mut() {
            if let Err(err) = (wrapper.callback)(payload_any.clone()) {
                error!("Event '{}' handler #{} failed: {}", event_name, wrapper.id, err);
            }
        }

        // Put the handlers back, ahead of the ones registered while emitting.
        let mut registry = self.registry.lock();
        let cleared = registry.epoch != epoch;
        let unregistered = &registry.unregistered;
        wrappers.retain(|wrapper| {
            !cleared && !wrapper.once && !unregistered.contains(&wrapper.id)
        });
        let entry = registry.callbacks.entry(event_name).or_default();
        let registered_meanwhile = std::mem::replace(entry, wrappers);
        entry.extend(registered_meanwhile);

        registry.emitting -= 1;
        if registry.emitting == 0 {
            registry.unregistered.clear();
        }
    }

    /// Unregister a given handler if found.
    ///
    /// # Example
    ///
    /// ```
    /// use deckhand::utils::events::EventManager;
    ///
    /// let events: EventManager = Default::default();
    /// let handler = events.on("ready", |_age: u8| Ok(()));
    ///
    /// events.unregister(handler);
    /// // No callback remains to be called here.
    /// events.emit("ready", 42u8);
    /// ```
    pub fn unregister(&self, handler: EventHandler) {
        let mut registry = self.registry.lock();
        registry
            .callbacks
            .values_mut()
            .for_each(|v| v.retain(|cb| cb.id != handler));
        if registry.emitting > 0 {
            registry.unregistered.insert(handler);
        }
    }

    /// Unregister all handlers of all events.
    pub fn unregister_all(&self) {
        let mut registry = self.registry.lock();
        registry.callbacks.clear();
        registry.epoch += 1;
    }

    /// Returns the number of handlers registered for the given event.
    pub fn count<S: Into<String>>(&self, event: S) -> usize {
        self.registry
            .lock()
            .callbacks
            .get(&event.into())
            .map_or(0, |callbacks| callbacks.len())
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("EventManager")
            .field("events", &registry.callbacks.keys().collect::<Vec<_>>())
            .finish()
    }
}

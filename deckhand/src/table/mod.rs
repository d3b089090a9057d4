//! Defines the table: the shared context every deck and card is created against.

use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub use crate::table::config::TableConfig;
pub use crate::table::metrics::{FixedMetrics, Metrics};
pub use crate::table::stacking::Stacking;

use crate::animations::{Scheduler, TickHost};
use crate::errors::Error;
use crate::render::{ElementId, Renderer};
use crate::utils::task::TimerHost;
use crate::utils::{Clock, SystemClock};

mod config;
mod metrics;
mod stacking;

/// Represents the surface cards are played on.
///
/// A table bundles everything cards and decks created on it share: the animation [`Scheduler`],
/// the [`Stacking`] order counter, the [`Renderer`] backend, the font-size [`Metrics`], the
/// [`Clock`] and the [`TableConfig`].
/// Two tables are fully isolated from each other.
///
/// The table is a cheap clone-handle.
///
/// # Example
/// ```ignore
/// use deckhand::deck::Deck;
/// use deckhand::mocks::{ManualHost, MockRenderer};
/// use deckhand::table::Table;
///
/// let table = Table::new(MockRenderer::default(), ManualHost::default());
/// let deck = Deck::new(&table, false).unwrap();
/// assert_eq!(deck.len(), 52);
/// ```
#[derive(Clone)]
pub struct Table {
    scheduler: Scheduler,
    stacking: Stacking,
    renderer: Box<dyn Renderer>,
    metrics: Box<dyn Metrics>,
    clock: Arc<dyn Clock>,
    host: Arc<dyn TickHost>,
    config: TableConfig,
    next_element: Arc<AtomicUsize>,
}

impl Table {
    /// Creates a table drawing through `renderer` and animated by the frames of `host`.
    ///
    /// The table uses the [`SystemClock`], a 16px [`FixedMetrics`] and the default
    /// [`TableConfig`]: see the `with_*` methods to change them.
    pub fn new<R, H>(renderer: R, host: H) -> Self
    where
        R: Renderer + 'static,
        H: TickHost + 'static,
    {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::default());
        let host: Arc<dyn TickHost> = Arc::new(host);
        let config = TableConfig::default();
        Self {
            scheduler: Scheduler::from_parts(clock.clone(), host.clone()),
            stacking: Stacking::new(config.get_z_base()),
            renderer: Box::new(renderer),
            metrics: Box::new(FixedMetrics::default()),
            clock,
            host,
            config,
            next_element: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Creates a table animated by a [`TimerHost`] on the current tokio runtime.
    ///
    /// # Errors
    /// * `RuntimeError`: called outside a tokio runtime.
    pub fn run<R: Renderer + 'static>(renderer: R) -> Result<Self, Error> {
        Ok(Self::new(renderer, TimerHost::try_current()?))
    }

    /// Replaces the clock (and with it, the scheduler).
    ///
    /// Must be called before any card is created on the table.
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self.scheduler = Scheduler::from_parts(self.clock.clone(), self.host.clone());
        self
    }

    pub fn with_metrics<M: Metrics + 'static>(mut self, metrics: M) -> Self {
        self.metrics = Box::new(metrics);
        self
    }

    /// Replaces the configuration (and with it, the stacking counter).
    ///
    /// Must be called before any card is created on the table.
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.stacking = Stacking::new(config.get_z_base());
        self.config = config;
        self
    }

    pub fn get_scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn get_stacking(&self) -> &Stacking {
        &self.stacking
    }

    pub fn get_config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns the current time (in ms) of the table clock.
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Returns the current font size.
    pub fn font_size(&self) -> f64 {
        self.metrics.font_size()
    }

    /// Returns the ratio between the current font size and the configured base font size.
    pub fn font_scale(&self) -> f64 {
        self.font_size() / self.config.get_base_font_size()
    }

    /// Indicates whether no animation is in flight on this table.
    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    /// Returns a handle on the renderer, for a card or a deck created on this table.
    pub(crate) fn get_renderer(&self) -> Box<dyn Renderer> {
        self.renderer.clone()
    }

    /// Allocates a new element id in the renderer scene.
    pub(crate) fn create_element(&self) -> ElementId {
        self.next_element.fetch_add(1, Ordering::Relaxed)
    }
}

impl Debug for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("scheduler", &self.scheduler)
            .field("stacking", &self.stacking.peek())
            .field("renderer", &self.renderer)
            .field("config", &self.config)
            .finish()
    }
}

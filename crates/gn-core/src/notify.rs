//! Grid change notification.
//!
//! The layout engine emits `GridSignal` after every rebuild so view layers
//! can re-render without holding a reference to the engine. Delivery is
//! synchronous and subscriber order is unspecified.
//!
//! Subscribers only see `&Grid`; the engine stays mutably borrowed for the
//! whole emission, so a handler cannot call back into it.

use crate::model::Grid;

/// Handle returned by [`GridSignal::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut(&Grid)>;

#[derive(Default)]
pub struct GridSignal {
    listeners: Vec<(Subscription, Listener)>,
    next: u64,
}

impl GridSignal {
    /// The signal's name, as exposed to JS listeners.
    pub const NAME: &'static str = "grid-changed";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Grid) + 'static) -> Subscription {
        let subscription = Subscription(self.next);
        self.next += 1;
        self.listeners.push((subscription, Box::new(listener)));
        subscription
    }

    /// Returns `false` if the subscription was already removed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(s, _)| *s != subscription);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn emit(&mut self, grid: &Grid) {
        log::trace!("{} → {} subscriber(s)", Self::NAME, self.listeners.len());
        for (_, listener) in &mut self.listeners {
            listener(grid);
        }
    }
}

impl std::fmt::Debug for GridSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridSignal")
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}

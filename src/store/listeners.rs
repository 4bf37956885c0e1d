//! Change listeners - dependents told that a recompute is due.

use std::fmt;

type Listener<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Ordered list of callbacks fired synchronously on `emit`.
pub struct Listeners<T> {
    listeners: Vec<Listener<T>>,
}

impl<T> Listeners<T> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a listener. Listeners fire in registration order.
    pub fn on<F>(&mut self, listener: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&self, event: &T) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}

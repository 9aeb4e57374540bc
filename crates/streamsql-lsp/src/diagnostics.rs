//! Diagnostics bridge
//!
//! Stream SQL does not diagnose buffers itself. The host computes markers
//! (syntax validity from the rule engine, for instance) and this bridge hands
//! every update to a caller-supplied callback unchanged.

use lsp_types::Diagnostic;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

/// Callback receiving each marker update
pub type MarkerListener = Box<dyn Fn(&[Diagnostic]) + Send + Sync>;

/// A host that reports marker updates for its buffer
pub trait MarkerHost {
    /// Register `listener`; it stays registered until the returned
    /// subscription is disposed or dropped
    fn subscribe_markers(&self, listener: MarkerListener) -> MarkerSubscription;
}

/// Registration handle; unregisters on drop
#[must_use = "dropping the subscription unregisters the listener"]
pub struct MarkerSubscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl MarkerSubscription {
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Subscription with nothing to unregister
    pub fn detached() -> Self {
        Self { unsubscribe: None }
    }

    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for MarkerSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for MarkerSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerSubscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

/// Forwards a host's marker updates verbatim to a callback
#[derive(Debug)]
pub struct DiagnosticsBridge {
    subscription: MarkerSubscription,
}

impl DiagnosticsBridge {
    pub fn register<H>(host: &H, callback: impl Fn(&[Diagnostic]) + Send + Sync + 'static) -> Self
    where
        H: MarkerHost + ?Sized,
    {
        tracing::debug!("Registering diagnostics bridge");
        let subscription = host.subscribe_markers(Box::new(move |markers: &[Diagnostic]| {
            tracing::trace!(count = markers.len(), "Forwarding markers");
            callback(markers);
        }));
        Self { subscription }
    }

    /// Stop forwarding; dropping the bridge has the same effect
    pub fn dispose(self) {
        self.subscription.dispose();
    }
}

type SharedListener = Arc<dyn Fn(&[Diagnostic]) + Send + Sync>;

#[derive(Default)]
struct RegistryState {
    next_id: u64,
    listeners: Vec<(u64, SharedListener)>,
}

/// Listener registry a host can embed to implement [`MarkerHost`]
#[derive(Clone, Default)]
pub struct MarkerRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `markers` to every registered listener
    ///
    /// Listeners run outside the registry lock, so a listener may subscribe
    /// or unsubscribe while being notified.
    pub fn publish(&self, markers: &[Diagnostic]) {
        let listeners: Vec<SharedListener> = self
            .state
            .lock()
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        tracing::debug!(
            markers = markers.len(),
            listeners = listeners.len(),
            "Publishing markers"
        );
        for listener in listeners {
            listener(markers);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }

    fn unsubscribe(state: &Weak<Mutex<RegistryState>>, id: u64) {
        if let Some(state) = state.upgrade() {
            state.lock().listeners.retain(|(listener_id, _)| *listener_id != id);
        }
    }
}

impl MarkerHost for MarkerRegistry {
    fn subscribe_markers(&self, listener: MarkerListener) -> MarkerSubscription {
        let id = {
            let mut state = self.state.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.push((id, Arc::from(listener)));
            id
        };

        let state = Arc::downgrade(&self.state);
        MarkerSubscription::new(move || Self::unsubscribe(&state, id))
    }
}

impl fmt::Debug for MarkerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerRegistry")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

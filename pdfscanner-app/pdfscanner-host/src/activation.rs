//! Hand-off point between the platform entry points and whoever owns the host.
//!
//! Activations can arrive before the owner has registered (the activity is
//! created before the UI runtime finishes its setup). The launch activation
//! is parked in a single slot and later ones replace it; new intents are kept
//! in arrival order. Everything is replayed on registration, launch first, so
//! the host's pending path slot ends up holding the newest resolved PDF.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::{debug, warn};

use crate::intent::ActivationEvent;
use crate::pending::PendingSlot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The event the activity was created with, if any.
    Launch(Option<ActivationEvent>),
    /// An event delivered to the running activity.
    NewIntent(ActivationEvent),
}

pub type ActivationSink = Arc<dyn Fn(Activation) + Send + Sync>;

#[derive(Default)]
struct RouterState {
    sink: Option<ActivationSink>,
    launch: PendingSlot<Option<ActivationEvent>>,
    new_intents: VecDeque<ActivationEvent>,
}

impl RouterState {
    fn park(&mut self, activation: Activation) {
        match activation {
            Activation::Launch(event) => {
                if self.launch.store(event).is_some() {
                    warn!("Parked launch activation overwritten");
                }
            }
            Activation::NewIntent(event) => self.new_intents.push_back(event),
        }
    }

    fn drain(&mut self) -> Vec<Activation> {
        let launch = self.launch.take().map(Activation::Launch);
        launch
            .into_iter()
            .chain(self.new_intents.drain(..).map(Activation::NewIntent))
            .collect()
    }
}

#[derive(Default)]
pub struct ActivationRouter {
    state: Mutex<RouterState>,
}

impl ActivationRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the sink and replay whatever was parked before it existed.
    pub fn register(&self, sink: ActivationSink) {
        let parked = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.sink = Some(sink.clone());
            state.drain()
        };
        if !parked.is_empty() {
            debug!("Replaying {} parked activations", parked.len());
        }
        for activation in parked {
            sink(activation);
        }
    }

    pub fn unregister(&self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .sink = None;
    }

    pub fn dispatch(&self, activation: Activation) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(sink) = state.sink.clone() else {
            state.park(activation);
            return;
        };
        drop(state);
        sink(activation);
    }
}

/// Process-wide router used by the platform entry points.
pub fn router() -> &'static ActivationRouter {
    static ROUTER: OnceLock<ActivationRouter> = OnceLock::new();
    ROUTER.get_or_init(ActivationRouter::new)
}

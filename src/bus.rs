//! Observer registry notified after every non-silent mutation.

use std::error::Error;
use std::panic::{self, AssertUnwindSafe};

use log::error;

use crate::model::Tree;

pub type ListenerError = Box<dyn Error + Send + Sync>;

type Listener = Box<dyn FnMut(&Tree) -> Result<(), ListenerError>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct SubscriptionBus {
    next: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl SubscriptionBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Tree) -> Result<(), ListenerError> + 'static,
    {
        self.next += 1;
        let id = SubscriptionId(self.next);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false when the id was never issued or is already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Calls every listener in registration order and returns how many failed.
    ///
    /// A failing or panicking listener is logged and skipped; the rest still run.
    pub fn notify(&mut self, tree: &Tree) -> usize {
        let mut failures = 0;
        for (id, listener) in &mut self.listeners {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(tree)));
            let reason = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => err.to_string(),
                Err(payload) => panic_message(payload.as_ref()),
            };
            failures += 1;
            error!(
                "event=listener_failed module=bus status=error subscription={} reason={}",
                id.0, reason
            );
        }
        failures
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        format!("panic: {text}")
    } else if let Some(text) = payload.downcast_ref::<String>() {
        format!("panic: {text}")
    } else {
        "panic".to_string()
    }
}

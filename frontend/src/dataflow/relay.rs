//! Event streaming Relay
//!
//! A relay carries raw UI events (search text, picked menu options, loaded
//! files) to the actor or area that owns the matching state. Sending never
//! blocks and never fails: once the consumer is gone, events are dropped.

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use std::fmt;
use std::panic::Location;
use std::sync::{Arc, OnceLock};

/// Sending half of a relay.
///
/// Relays are named `{source}_{event}_relay` and are sent from one place
/// only. Debug builds panic when a second call site sends on the same relay
/// (clones included), so every event has a single, greppable origin.
///
/// ```rust
/// let (option_selected_relay, mut option_selected_stream) = relay::<String>();
///
/// option_selected_relay.send("showExtraNodes".to_string());
///
/// while let Some(key) = option_selected_stream.next().await {
///     tree_preferences.toggle(&key);
/// }
/// ```
pub struct Relay<T> {
    sender: UnboundedSender<T>,
    origin: Arc<OnceLock<&'static Location<'static>>>,
}

/// Create a relay and the stream its events arrive on.
pub fn relay<T>() -> (Relay<T>, UnboundedReceiver<T>) {
    let (sender, receiver) = unbounded();
    let relay = Relay {
        sender,
        origin: Arc::new(OnceLock::new()),
    };
    (relay, receiver)
}

impl<T> Relay<T> {
    #[track_caller]
    pub fn send(&self, value: T) {
        let caller = Location::caller();
        let origin = *self.origin.get_or_init(|| caller);
        if cfg!(debug_assertions) && origin != caller {
            panic!("relay sent from {} after {}", caller, origin);
        }

        if self.sender.unbounded_send(value).is_err() {
            log::debug!("relay event from {} dropped, nobody listens", origin);
        }
    }
}

impl<T> Clone for Relay<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            origin: Arc::clone(&self.origin),
        }
    }
}

impl<T> fmt::Debug for Relay<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relay")
            .field("origin", &self.origin.get())
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

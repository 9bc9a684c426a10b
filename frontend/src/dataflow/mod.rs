//! Reactive state primitives
//!
//! - **[`Relay`]** - event streaming from views to state owners
//! - **[`Actor`]** - single-value state mutated only by its processor task
//! - **[`Observable`]** - view-local state with synchronous change listeners
//!
//! Relays follow the `{source}_{event}_relay` naming pattern.

pub mod actor;
pub mod observable;
pub mod relay;

pub use actor::Actor;
pub use observable::{Observable, Subscription};
pub use relay::{Relay, relay};

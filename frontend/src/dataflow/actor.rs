//! Single-value Actor
//!
//! An Actor owns a `Mutable<T>` and is the only place that mutates it. Its
//! processor task consumes relay streams one event at a time; views bind to
//! the state through signals.

use std::future::Future;
use std::sync::Arc;
use zoon::{Mutable, Signal, Task, TaskHandle};

/// # Examples
///
/// ```rust
/// let (file_loaded_relay, mut file_loaded_stream) = relay();
///
/// let loaded_inventory_actor = Actor::new(None, async move |state| {
///     while let Some(inventory) = file_loaded_stream.next().await {
///         state.set(Some(inventory));
///     }
/// });
///
/// El::new().child_signal(loaded_inventory_actor.signal().map(|inventory| ...))
/// ```
#[derive(Clone, Debug)]
pub struct Actor<T>
where
    T: Clone + Send + Sync + 'static,
{
    state: Mutable<T>,
    // Dropping the last clone stops the processor.
    #[allow(dead_code)]
    task_handle: Arc<TaskHandle>,
}

impl<T> Actor<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(initial_state: T, processor: F) -> Self
    where
        F: FnOnce(Mutable<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let state = Mutable::new(initial_state);
        let task_handle = Arc::new(Task::start_droppable(processor(state.clone())));

        Self { state, task_handle }
    }

    pub fn signal(&self) -> impl Signal<Item = T> + use<T> {
        self.state.signal_cloned()
    }

    /// Signal of a value derived from the state without cloning it.
    pub fn signal_ref<U>(&self, f: impl Fn(&T) -> U + Send + Sync + 'static) -> impl Signal<Item = U>
    where
        U: PartialEq + Send + Sync + 'static,
    {
        self.state.signal_ref(f)
    }
}

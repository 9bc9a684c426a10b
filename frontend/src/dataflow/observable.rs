//! Observable view state with synchronous listeners
//!
//! Actors apply changes from their own task, so observers see them one tick
//! later. State that drives imperative code in the same event handler (the
//! tree widget bridge) uses `Observable` instead: `set` stores the value and
//! runs every listener before it returns. A `Mutable` mirror keeps the value
//! bindable from declarative views.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use zoon::{Mutable, Signal};

type Listener<T> = Rc<dyn Fn(&T)>;

struct Listeners<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

pub struct Observable<T: Clone + 'static> {
    state: Mutable<T>,
    listeners: Rc<RefCell<Listeners<T>>>,
}

impl<T: Clone + 'static> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            listeners: self.listeners.clone(),
        }
    }
}

impl<T: Clone + 'static> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            state: Mutable::new(initial),
            listeners: Rc::new(RefCell::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub fn get(&self) -> T {
        self.state.get_cloned()
    }

    /// Store `value` and notify every listener before returning.
    pub fn set(&self, value: T) {
        self.state.set(value.clone());

        // Listeners may subscribe, unsubscribe or set again while notified.
        let listeners: Vec<Listener<T>> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&value);
        }
    }

    pub fn update(&self, f: impl FnOnce(T) -> T) {
        self.set(f(self.get()));
    }

    /// The listener stays registered until the returned subscription drops.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_change(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let listener: Listener<T> = Rc::new(listener);
        let id = {
            let mut listeners = self.listeners.borrow_mut();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, listener));
            id
        };

        let listeners: Weak<RefCell<Listeners<T>>> = Rc::downgrade(&self.listeners);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(listeners) = listeners.upgrade() {
                    listeners.borrow_mut().entries.retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    pub fn signal(&self) -> impl Signal<Item = T> + use<T> {
        self.state.signal_cloned()
    }
}

/// Registration handle returned by [`Observable::on_change`].
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

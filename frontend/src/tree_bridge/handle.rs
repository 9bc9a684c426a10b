use super::bridge::{BridgeError, BridgePhase, HiddenSet, TreeBridge};
use super::widget::TreeWidget;
use shared::{Preferences, TreeConfig};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// Shared handle to a [`TreeBridge`] for element hooks and listeners.
///
/// Events the widget raises on its own (ready signal, clicks) are pumped as
/// soon as they arrive. Events raised while the bridge is busy are picked up
/// by the running operation.
pub struct BridgeHandle<W: TreeWidget + 'static> {
    bridge: Rc<RefCell<TreeBridge<W>>>,
}

impl<W: TreeWidget + 'static> Clone for BridgeHandle<W> {
    fn clone(&self) -> Self {
        Self {
            bridge: self.bridge.clone(),
        }
    }
}

impl<W: TreeWidget + 'static> Default for BridgeHandle<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: TreeWidget + 'static> BridgeHandle<W> {
    pub fn new() -> Self {
        let bridge = Rc::new(RefCell::new(TreeBridge::new()));
        let weak_bridge = Rc::downgrade(&bridge);
        bridge.borrow().events().set_waker(move || {
            let Some(bridge) = weak_bridge.upgrade() else {
                return;
            };
            if let Ok(mut bridge) = bridge.try_borrow_mut() {
                bridge.pump_events();
            }
        });
        Self { bridge }
    }

    pub fn mount(&self, container: W::Container, config: Arc<TreeConfig>) -> Result<(), BridgeError> {
        self.bridge.borrow_mut().mount(container, config)
    }

    pub fn apply_search(&self, query: Option<&str>) -> Result<(), BridgeError> {
        self.bridge.borrow_mut().apply_search(query)
    }

    pub fn apply_preferences(&self, preferences: Preferences) -> Result<HiddenSet, BridgeError> {
        self.bridge.borrow_mut().apply_preferences(preferences)
    }

    pub fn run_context_action(&self, action: &str, node: &str) -> Result<(), BridgeError> {
        self.bridge.borrow_mut().run_context_action(action, node)
    }

    pub fn unmount(&self) -> Result<(), BridgeError> {
        self.bridge.borrow_mut().unmount()
    }

    pub fn phase(&self) -> BridgePhase {
        self.bridge.borrow().phase()
    }

    pub fn with_bridge<R>(&self, f: impl FnOnce(&TreeBridge<W>) -> R) -> R {
        f(&self.bridge.borrow())
    }
}

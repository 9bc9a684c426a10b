//! Seam between the bridge and the imperative tree widget.
//!
//! The widget owns its DOM subtree and reports what happens inside it through
//! a [`WidgetEvents`] queue. The bridge is the only caller of these methods.

use shared::{NodeId, NodeType, TreeConfig};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Snapshot of one node as the widget currently holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetNode {
    pub id: NodeId,
    pub node_type: NodeType,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Initial data finished loading; the widget accepts calls from now on.
    Ready,
    NodeOpened(NodeId),
    ContextAction { action: String, node: NodeId },
}

#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("tree widget failed to initialize: {0}")]
    Initialization(String),
}

#[derive(Default)]
struct EventQueue {
    pending: VecDeque<WidgetEvent>,
    waker: Option<Rc<dyn Fn()>>,
}

/// Queue the widget pushes its events into.
///
/// Pushing wakes the consumer so events raised outside of any bridge call
/// (user clicks, the asynchronous ready signal) get processed right away.
#[derive(Clone, Default)]
pub struct WidgetEvents {
    queue: Rc<RefCell<EventQueue>>,
}

impl WidgetEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: WidgetEvent) {
        let waker = {
            let mut queue = self.queue.borrow_mut();
            queue.pending.push_back(event);
            queue.waker.clone()
        };
        // The waker drains this very queue.
        if let Some(waker) = waker {
            waker();
        }
    }

    pub fn pop(&self) -> Option<WidgetEvent> {
        self.queue.borrow_mut().pending.pop_front()
    }

    pub fn set_waker(&self, waker: impl Fn() + 'static) {
        self.queue.borrow_mut().waker = Some(Rc::new(waker));
    }

    pub fn clear(&self) {
        self.queue.borrow_mut().pending.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Imperative tree widget driven by [`TreeBridge`](super::TreeBridge).
///
/// Calls naming unknown node ids are ignored, like jsTree does.
pub trait TreeWidget: Sized {
    /// Mount point the widget renders into.
    type Container;

    /// Start building the widget. Completion is signalled later through
    /// [`WidgetEvent::Ready`].
    fn create(
        container: Self::Container,
        config: &TreeConfig,
        events: WidgetEvents,
    ) -> Result<Self, WidgetError>;

    fn node(&self, id: &str) -> Option<WidgetNode>;

    /// True when the node has no children of its own.
    fn is_leaf(&self, id: &str) -> bool;

    fn is_open(&self, id: &str) -> bool;

    fn set_type(&mut self, id: &str, node_type: NodeType);

    fn hide_node(&mut self, id: &str);

    /// Reveal every hidden node, returning the ids that were hidden.
    fn show_all(&mut self) -> Vec<NodeId>;

    fn search(&mut self, query: &str);

    fn clear_search(&mut self);

    /// Raises [`WidgetEvent::NodeOpened`] when the node actually opens.
    fn open_node(&mut self, id: &str);

    fn toggle_node(&mut self, id: &str);

    /// Open the node and its whole subtree.
    fn open_all(&mut self, id: &str);

    /// Close the node and its whole subtree.
    fn close_all(&mut self, id: &str);

    /// Tear the widget down and release its DOM subtree.
    fn destroy(self);
}

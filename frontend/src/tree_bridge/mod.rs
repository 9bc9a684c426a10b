//! Bridge between the declarative views and the imperative jsTree widget.
//!
//! [`TreeBridge`] is a small state machine owning the widget instance. It
//! turns search and preference changes into widget calls and reacts to the
//! widget's own events (ready, node opened, context menu). [`tree_widget_host`]
//! is the element that gives the widget its DOM mount point.

mod bridge;
mod handle;
mod host;
mod jstree;
mod widget;

#[cfg(test)]
mod memory;
#[cfg(test)]
mod tests;

pub use bridge::{BridgeError, BridgePhase, HiddenSet, TreeBridge};
pub use handle::BridgeHandle;
pub use host::tree_widget_host;
pub use jstree::JsTreeWidget;
pub use widget::{TreeWidget, WidgetError, WidgetEvent, WidgetEvents, WidgetNode};

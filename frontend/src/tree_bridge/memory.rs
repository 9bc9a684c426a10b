//! In-memory tree widget for exercising the bridge without a browser.
//!
//! Models the jsTree behaviour the bridge relies on: hidden flags, node types,
//! open state with `open_node` events, and searching with
//! `show_only_matches`, which hides every non-match through the same hidden
//! flags and restores exactly those on `clear_search`. The [`MemoryHost`]
//! plays the role of the DOM mount point and lets tests act as the user.

use super::widget::{TreeWidget, WidgetError, WidgetEvent, WidgetEvents, WidgetNode};
use indexmap::IndexMap;
use shared::{NodeId, NodeType, TreeConfig};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

#[derive(Debug, Clone)]
struct MemoryNode {
    label: String,
    node_type: NodeType,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    opened: bool,
    hidden: bool,
}

struct MemoryState {
    nodes: IndexMap<NodeId, MemoryNode>,
    search: Option<String>,
    /// Nodes the active search hid.
    search_hidden: Vec<NodeId>,
    case_sensitive: bool,
    show_only_matches: bool,
    events: WidgetEvents,
}

#[derive(Default)]
struct HostSlot {
    tree: Option<MemoryState>,
    created: usize,
    destroyed: usize,
    fail_next_create: bool,
}

/// Mount point shared between the test and the widget living in it.
#[derive(Clone, Default)]
pub struct MemoryHost {
    slot: Rc<RefCell<HostSlot>>,
}

pub struct MemoryTree {
    host: MemoryHost,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_create(&self) {
        self.slot.borrow_mut().fail_next_create = true;
    }

    pub fn is_mounted(&self) -> bool {
        self.slot.borrow().tree.is_some()
    }

    pub fn created(&self) -> usize {
        self.slot.borrow().created
    }

    pub fn destroyed(&self) -> usize {
        self.slot.borrow().destroyed
    }

    /// Initial data finished loading.
    pub fn finish_loading(&self) {
        self.emit(WidgetEvent::Ready);
    }

    /// The user clicks the expander of `id`.
    pub fn user_opens(&self, id: &str) {
        let event = self.with_tree(|tree| tree.open(id)).flatten();
        if let Some(event) = event {
            self.emit(event);
        }
    }

    /// The user picks a context menu entry on `node`.
    pub fn user_picks(&self, action: &str, node: &str) {
        self.emit(WidgetEvent::ContextAction {
            action: action.to_string(),
            node: node.to_string(),
        });
    }

    pub fn node_type(&self, id: &str) -> Option<NodeType> {
        self.with_tree(|tree| tree.nodes.get(id).map(|node| node.node_type))
            .flatten()
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.with_tree(|tree| tree.nodes.get(id).is_some_and(|node| node.hidden))
            .unwrap_or(false)
    }

    pub fn is_opened(&self, id: &str) -> bool {
        self.with_tree(|tree| tree.nodes.get(id).is_some_and(|node| node.opened))
            .unwrap_or(false)
    }

    pub fn search_query(&self) -> Option<String> {
        self.with_tree(|tree| tree.search.clone()).flatten()
    }

    /// Ids of the nodes a user could see with every branch expanded.
    pub fn visible_ids(&self) -> BTreeSet<NodeId> {
        self.with_tree(|tree| tree.visible_ids()).unwrap_or_default()
    }

    fn with_tree<R>(&self, f: impl FnOnce(&mut MemoryState) -> R) -> Option<R> {
        self.slot.borrow_mut().tree.as_mut().map(f)
    }

    fn emit(&self, event: WidgetEvent) {
        let events = self.with_tree(|tree| tree.events.clone());
        // Pushing may re-enter the widget through the bridge.
        if let Some(events) = events {
            events.push(event);
        }
    }
}

impl MemoryState {
    fn from_config(config: &TreeConfig, events: WidgetEvents) -> Self {
        let nodes = config
            .data
            .iter()
            .map(|node| {
                let memory_node = MemoryNode {
                    label: node.label.clone(),
                    node_type: node.node_type,
                    children: node.children.clone(),
                    parent: config.data.parent_of(&node.id).map(str::to_owned),
                    opened: node.state.opened && !node.children.is_empty(),
                    hidden: node.state.hidden,
                };
                (node.id.clone(), memory_node)
            })
            .collect();

        Self {
            nodes,
            search: None,
            search_hidden: Vec::new(),
            case_sensitive: config.search.case_sensitive,
            show_only_matches: config.search.show_only_matches,
            events,
        }
    }

    fn open(&mut self, id: &str) -> Option<WidgetEvent> {
        let node = self.nodes.get_mut(id)?;
        if node.opened || node.children.is_empty() {
            return None;
        }
        node.opened = true;
        Some(WidgetEvent::NodeOpened(id.to_string()))
    }

    fn subtree(&self, id: &str) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().rev().cloned());
                ids.push(current);
            }
        }
        ids
    }

    fn matches(&self, node: &MemoryNode, query: &str) -> bool {
        if self.case_sensitive {
            node.label.contains(query)
        } else {
            node.label.to_lowercase().contains(&query.to_lowercase())
        }
    }

    fn visible_ids(&self) -> BTreeSet<NodeId> {
        self.nodes
            .keys()
            .filter(|id| !self.hidden_with_ancestors(id))
            .cloned()
            .collect()
    }

    fn search(&mut self, query: &str) {
        self.clear_search();
        self.search = Some(query.to_string());
        if !self.show_only_matches {
            return;
        }

        let matched: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| self.matches(node, query))
            .map(|(id, _)| id.clone())
            .collect();

        for (id, node) in self.nodes.iter_mut().filter(|(_, node)| !node.hidden) {
            node.hidden = true;
            self.search_hidden.push(id.clone());
        }
        // Matches stay visible together with their ancestors.
        for id in matched {
            let mut current = Some(id);
            while let Some(id) = current {
                let Some(node) = self.nodes.get_mut(&id) else {
                    break;
                };
                node.hidden = false;
                current = node.parent.clone();
            }
        }
    }

    fn clear_search(&mut self) {
        for id in self.search_hidden.drain(..) {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.hidden = false;
            }
        }
        self.search = None;
    }

    fn hidden_with_ancestors(&self, id: &str) -> bool {
        let mut current = self.nodes.get(id);
        while let Some(node) = current {
            if node.hidden {
                return true;
            }
            current = node.parent.as_deref().and_then(|parent| self.nodes.get(parent));
        }
        false
    }
}

impl MemoryTree {
    fn with_tree<R>(&self, f: impl FnOnce(&mut MemoryState) -> R) -> Option<R> {
        self.host.with_tree(f)
    }

    fn emit_all(&self, events: Vec<WidgetEvent>) {
        for event in events {
            self.host.emit(event);
        }
    }
}

impl TreeWidget for MemoryTree {
    type Container = MemoryHost;

    fn create(
        container: MemoryHost,
        config: &TreeConfig,
        events: WidgetEvents,
    ) -> Result<Self, WidgetError> {
        {
            let mut slot = container.slot.borrow_mut();
            if slot.fail_next_create {
                slot.fail_next_create = false;
                return Err(WidgetError::Initialization("host refused the widget".into()));
            }
            slot.tree = Some(MemoryState::from_config(config, events));
            slot.created += 1;
        }
        Ok(Self { host: container })
    }

    fn node(&self, id: &str) -> Option<WidgetNode> {
        self.with_tree(|tree| {
            tree.nodes.get(id).map(|node| WidgetNode {
                id: id.to_string(),
                node_type: node.node_type,
                children: node.children.clone(),
            })
        })
        .flatten()
    }

    fn is_leaf(&self, id: &str) -> bool {
        self.with_tree(|tree| tree.nodes.get(id).is_some_and(|node| node.children.is_empty()))
            .unwrap_or(false)
    }

    fn is_open(&self, id: &str) -> bool {
        self.host.is_opened(id)
    }

    fn set_type(&mut self, id: &str, node_type: NodeType) {
        self.with_tree(|tree| {
            if let Some(node) = tree.nodes.get_mut(id) {
                node.node_type = node_type;
            }
        });
    }

    fn hide_node(&mut self, id: &str) {
        self.with_tree(|tree| {
            if let Some(node) = tree.nodes.get_mut(id) {
                node.hidden = true;
            }
        });
    }

    fn show_all(&mut self) -> Vec<NodeId> {
        self.with_tree(|tree| {
            tree.nodes
                .iter_mut()
                .filter(|(_, node)| node.hidden)
                .map(|(id, node)| {
                    node.hidden = false;
                    id.clone()
                })
                .collect()
        })
        .unwrap_or_default()
    }

    fn search(&mut self, query: &str) {
        self.with_tree(|tree| tree.search(query));
    }

    fn clear_search(&mut self) {
        self.with_tree(|tree| tree.clear_search());
    }

    fn open_node(&mut self, id: &str) {
        let event = self.with_tree(|tree| tree.open(id)).flatten();
        self.emit_all(event.into_iter().collect());
    }

    fn toggle_node(&mut self, id: &str) {
        if self.is_open(id) {
            self.with_tree(|tree| {
                if let Some(node) = tree.nodes.get_mut(id) {
                    node.opened = false;
                }
            });
        } else {
            self.open_node(id);
        }
    }

    fn open_all(&mut self, id: &str) {
        let events: Vec<WidgetEvent> = self
            .with_tree(|tree| {
                tree.subtree(id)
                    .iter()
                    .filter_map(|node| tree.open(node))
                    .collect()
            })
            .unwrap_or_default();
        self.emit_all(events);
    }

    fn close_all(&mut self, id: &str) {
        self.with_tree(|tree| {
            for node in tree.subtree(id) {
                if let Some(node) = tree.nodes.get_mut(&node) {
                    node.opened = false;
                }
            }
        });
    }

    fn destroy(self) {
        let mut slot = self.host.slot.borrow_mut();
        slot.tree = None;
        slot.destroyed += 1;
    }
}

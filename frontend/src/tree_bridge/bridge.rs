use super::widget::{TreeWidget, WidgetError, WidgetEvent, WidgetEvents};
use indexmap::IndexSet;
use shared::{MenuEffect, NodeId, NodeType, Preferences, TreeConfig};
use std::mem;
use std::sync::Arc;

/// Node ids the bridge keeps track of for the metadata filter.
pub type HiddenSet = IndexSet<NodeId>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgePhase {
    Unmounted,
    Initializing,
    Ready,
    Destroyed,
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("tree bridge is not mounted")]
    NotMounted,
    #[error("tree bridge is already mounted")]
    AlreadyMounted,
    #[error("tree bridge has been destroyed")]
    Destroyed,
    #[error("tree widget is not ready yet")]
    NotReady,
    #[error("unknown context menu action '{0}'")]
    UnknownContextAction(String),
    #[error(transparent)]
    Widget(#[from] WidgetError),
}

enum Phase<W> {
    Unmounted,
    Initializing(W),
    Ready(W),
    Destroyed,
}

/// Requests that arrived while the widget was still loading.
#[derive(Default)]
struct Deferred {
    search: Option<Option<String>>,
    preferences: Option<Preferences>,
    opened: IndexSet<NodeId>,
}

/// Owns one imperative tree widget and keeps it in sync with the search
/// query and the visibility preferences.
///
/// ```text
/// Unmounted --mount--> Initializing --Ready event--> Ready
///                          |                          |
///                          +--------unmount-----------+--> Destroyed
/// ```
///
/// Every operation drains the widget's event queue before returning, so
/// events raised by the operation itself are handled in the same call.
pub struct TreeBridge<W: TreeWidget> {
    phase: Phase<W>,
    events: WidgetEvents,
    config: Option<Arc<TreeConfig>>,
    preferences: Preferences,
    /// Query currently applied to the widget, never empty.
    search: Option<String>,
    hidden: HiddenSet,
    deferred: Deferred,
}

impl<W: TreeWidget> Default for TreeBridge<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: TreeWidget> TreeBridge<W> {
    pub fn new() -> Self {
        Self {
            phase: Phase::Unmounted,
            events: WidgetEvents::new(),
            config: None,
            preferences: Preferences::default(),
            search: None,
            hidden: HiddenSet::new(),
            deferred: Deferred::default(),
        }
    }

    pub fn phase(&self) -> BridgePhase {
        match self.phase {
            Phase::Unmounted => BridgePhase::Unmounted,
            Phase::Initializing(_) => BridgePhase::Initializing,
            Phase::Ready(_) => BridgePhase::Ready,
            Phase::Destroyed => BridgePhase::Destroyed,
        }
    }

    /// Queue handed to the widget on mount.
    pub fn events(&self) -> &WidgetEvents {
        &self.events
    }

    pub fn widget(&self) -> Option<&W> {
        match &self.phase {
            Phase::Initializing(widget) | Phase::Ready(widget) => Some(widget),
            Phase::Unmounted | Phase::Destroyed => None,
        }
    }

    /// Preferences last applied to the widget.
    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn search_query(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn hidden_nodes(&self) -> &HiddenSet {
        &self.hidden
    }

    pub fn mount(
        &mut self,
        container: W::Container,
        config: Arc<TreeConfig>,
    ) -> Result<(), BridgeError> {
        match self.phase {
            Phase::Unmounted => {}
            Phase::Initializing(_) | Phase::Ready(_) => return Err(BridgeError::AlreadyMounted),
            Phase::Destroyed => return Err(BridgeError::Destroyed),
        }

        let widget = W::create(container, &config, self.events.clone())?;
        log::debug!("tree widget created with {} nodes", config.data.len());
        self.phase = Phase::Initializing(widget);
        self.config = Some(config);

        // Some widgets are ready synchronously.
        self.pump_events();
        Ok(())
    }

    /// Filter the tree by `query`. An empty or absent query clears the
    /// active filter.
    pub fn apply_search(&mut self, query: Option<&str>) -> Result<(), BridgeError> {
        match &mut self.phase {
            Phase::Unmounted => return Err(BridgeError::NotMounted),
            Phase::Destroyed => return Err(BridgeError::Destroyed),
            Phase::Initializing(_) => {
                self.deferred.search = Some(query.map(str::to_owned));
            }
            Phase::Ready(widget) => {
                self.search = active_query(query);
                search_widget(widget, self.search.as_deref());
            }
        }
        self.pump_events();
        Ok(())
    }

    /// Apply the visibility preferences and return the nodes now tracked
    /// for the metadata filter.
    pub fn apply_preferences(&mut self, preferences: Preferences) -> Result<HiddenSet, BridgeError> {
        match &mut self.phase {
            Phase::Unmounted => return Err(BridgeError::NotMounted),
            Phase::Destroyed => return Err(BridgeError::Destroyed),
            Phase::Initializing(_) => {
                self.deferred.preferences = Some(preferences);
            }
            Phase::Ready(widget) => {
                sync_extra_nodes(
                    widget,
                    &mut self.hidden,
                    self.search.as_deref(),
                    self.preferences,
                    preferences,
                );
                self.preferences = preferences;
            }
        }
        self.pump_events();
        Ok(self.hidden.clone())
    }

    /// Run a context menu entry on `node`.
    pub fn run_context_action(&mut self, action: &str, node: &str) -> Result<(), BridgeError> {
        let effect = self
            .config
            .as_ref()
            .and_then(|config| config.context_menu_action(action))
            .map(|menu_action| menu_action.effect);

        match &mut self.phase {
            Phase::Unmounted => return Err(BridgeError::NotMounted),
            Phase::Destroyed => return Err(BridgeError::Destroyed),
            Phase::Initializing(_) => return Err(BridgeError::NotReady),
            Phase::Ready(widget) => {
                let effect =
                    effect.ok_or_else(|| BridgeError::UnknownContextAction(action.to_string()))?;
                apply_menu_effect(widget, effect, node);
            }
        }
        self.pump_events();
        Ok(())
    }

    /// Tear the widget down. The bridge accepts no further calls.
    pub fn unmount(&mut self) -> Result<(), BridgeError> {
        match mem::replace(&mut self.phase, Phase::Destroyed) {
            Phase::Initializing(widget) | Phase::Ready(widget) => {
                widget.destroy();
                self.events.clear();
                self.config = None;
                self.search = None;
                self.hidden.clear();
                self.deferred = Deferred::default();
                log::debug!("tree widget destroyed");
                Ok(())
            }
            Phase::Unmounted => {
                self.phase = Phase::Unmounted;
                Err(BridgeError::NotMounted)
            }
            Phase::Destroyed => Err(BridgeError::Destroyed),
        }
    }

    /// Handle every event the widget has queued so far.
    pub fn pump_events(&mut self) {
        while let Some(event) = self.events.pop() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: WidgetEvent) {
        match event {
            WidgetEvent::Ready => self.on_ready(),
            WidgetEvent::NodeOpened(node) => self.on_node_opened(node),
            WidgetEvent::ContextAction { action, node } => {
                if let Err(error) = self.run_context_action(&action, &node) {
                    log::warn!("context menu action '{}' on '{}' failed: {}", action, node, error);
                }
            }
        }
    }

    fn on_ready(&mut self) {
        match mem::replace(&mut self.phase, Phase::Unmounted) {
            Phase::Initializing(widget) => self.phase = Phase::Ready(widget),
            other => {
                self.phase = other;
                log::debug!("ignoring repeated ready signal");
                return;
            }
        }
        log::debug!("tree widget ready");

        let deferred = mem::take(&mut self.deferred);
        let Phase::Ready(widget) = &mut self.phase else {
            return;
        };
        for node in &deferred.opened {
            classify_children(widget, node, self.preferences, &mut self.hidden);
        }
        if let Some(query) = &deferred.search {
            self.search = active_query(query.as_deref());
            search_widget(widget, self.search.as_deref());
        }
        if let Some(preferences) = deferred.preferences {
            sync_extra_nodes(
                widget,
                &mut self.hidden,
                self.search.as_deref(),
                self.preferences,
                preferences,
            );
            self.preferences = preferences;
        }
    }

    fn on_node_opened(&mut self, node: NodeId) {
        match &mut self.phase {
            Phase::Ready(widget) => {
                classify_children(widget, &node, self.preferences, &mut self.hidden);
            }
            // Initially opened nodes report before the widget is ready.
            Phase::Initializing(_) => {
                self.deferred.opened.insert(node);
            }
            Phase::Unmounted | Phase::Destroyed => {
                log::debug!("ignoring open of '{}' without a widget", node);
            }
        }
    }
}

impl<W: TreeWidget> Drop for TreeBridge<W> {
    fn drop(&mut self) {
        if let Phase::Initializing(widget) | Phase::Ready(widget) =
            mem::replace(&mut self.phase, Phase::Destroyed)
        {
            widget.destroy();
        }
    }
}

fn active_query(query: Option<&str>) -> Option<String> {
    query.filter(|query| !query.is_empty()).map(str::to_owned)
}

fn search_widget<W: TreeWidget>(widget: &mut W, query: Option<&str>) {
    match query {
        Some(query) => widget.search(query),
        None => widget.clear_search(),
    }
}

/// Hide metadata children of a freshly opened node and mark childless ones
/// as leaves.
fn classify_children<W: TreeWidget>(
    widget: &mut W,
    node: &str,
    preferences: Preferences,
    hidden: &mut HiddenSet,
) {
    let Some(opened) = widget.node(node) else {
        log::warn!("opened node '{}' is unknown to the widget", node);
        return;
    };

    for child_id in &opened.children {
        let Some(child) = widget.node(child_id) else {
            continue;
        };
        if child.node_type == NodeType::ResponseMetadata {
            if preferences.show_extra_nodes {
                hidden.insert(child.id);
            } else {
                widget.hide_node(&child.id);
            }
        } else if widget.is_leaf(&child.id) {
            widget.set_type(&child.id, NodeType::Leaf);
        }
    }
}

/// Reveal or re-hide the extra nodes. A `show_only_matches` search hides
/// through the same flags, so an active query is lifted around the change
/// and applied again afterwards.
fn sync_extra_nodes<W: TreeWidget>(
    widget: &mut W,
    hidden: &mut HiddenSet,
    search: Option<&str>,
    current: Preferences,
    requested: Preferences,
) {
    if current.show_extra_nodes == requested.show_extra_nodes {
        return;
    }

    if search.is_some() {
        widget.clear_search();
    }

    if requested.show_extra_nodes {
        *hidden = widget.show_all().into_iter().collect();
        log::debug!("revealed {} extra nodes", hidden.len());
    } else {
        log::debug!("hiding {} extra nodes", hidden.len());
        for node in hidden.drain(..) {
            widget.hide_node(&node);
        }
    }

    if let Some(query) = search {
        widget.search(query);
    }
}

fn apply_menu_effect<W: TreeWidget>(widget: &mut W, effect: MenuEffect, node: &str) {
    match effect {
        MenuEffect::ToggleChildren => {
            if !widget.is_open(node) {
                widget.open_node(node);
            }
            let children = widget
                .node(node)
                .map(|node| node.children)
                .unwrap_or_default();
            for child in &children {
                widget.toggle_node(child);
            }
        }
        MenuEffect::ToggleDescendants => {
            if widget.is_open(node) {
                widget.close_all(node);
            } else {
                widget.open_all(node);
            }
        }
    }
}

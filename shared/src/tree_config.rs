use crate::document::{InventoryDocument, NodeForest, NodeType};
use crate::viewer_config::{SearchSection, TreeSection, ViewerConfig};
use serde_json::{Map, Value, json};

// ===== ICONS =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Home,
    Cloud,
    Globe,
    Play,
    Stop,
}

impl Icon {
    pub fn css_class(self) -> &'static str {
        match self {
            Icon::Home => "glyphicon glyphicon-home",
            Icon::Cloud => "glyphicon glyphicon-cloud",
            Icon::Globe => "glyphicon glyphicon-globe",
            Icon::Play => "glyphicon glyphicon-play",
            Icon::Stop => "glyphicon glyphicon-stop",
        }
    }
}

impl NodeType {
    /// Fixed node type to icon table.
    pub fn icon(self) -> Option<Icon> {
        match self {
            NodeType::Root => Some(Icon::Home),
            NodeType::Service => Some(Icon::Cloud),
            NodeType::Region => Some(Icon::Globe),
            NodeType::Operation => Some(Icon::Play),
            NodeType::Leaf => Some(Icon::Stop),
            NodeType::ResponseMetadata | NodeType::Default => None,
        }
    }
}

// ===== CONTEXT MENU =====

/// Tree traversal performed by a context menu entry on the node it was
/// opened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEffect {
    /// Open the node if needed, then toggle each direct child.
    ToggleChildren,
    /// Close the whole subtree when open, otherwise open it entirely.
    ToggleDescendants,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextMenuAction {
    pub id: &'static str,
    pub label: &'static str,
    pub separator_after: bool,
    pub effect: MenuEffect,
}

pub const CONTEXT_MENU_ACTIONS: [ContextMenuAction; 2] = [
    ContextMenuAction {
        id: "toggle_siblings",
        label: "Toggle children",
        separator_after: true,
        effect: MenuEffect::ToggleChildren,
    },
    ContextMenuAction {
        id: "toggle_children",
        label: "Toggle descendants",
        separator_after: false,
        effect: MenuEffect::ToggleDescendants,
    },
];

// ===== CONFIG =====

/// Everything the tree widget needs for one mount. Derived once per document.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeConfig {
    pub data: NodeForest,
    pub icons: Vec<(NodeType, Option<Icon>)>,
    pub context_menu_actions: Vec<ContextMenuAction>,
    pub searchable: bool,
    pub tree: TreeSection,
    pub search: SearchSection,
}

/// Pure: the document is only read, and equal inputs give equal configs.
pub fn build_tree_config(document: &InventoryDocument, viewer_config: &ViewerConfig) -> TreeConfig {
    TreeConfig {
        data: document.nodes.clone(),
        icons: NodeType::ALL
            .iter()
            .map(|node_type| (*node_type, node_type.icon()))
            .collect(),
        context_menu_actions: CONTEXT_MENU_ACTIONS.to_vec(),
        searchable: true,
        tree: viewer_config.tree.clone(),
        search: viewer_config.search.clone(),
    }
}

impl TreeConfig {
    pub fn context_menu_action(&self, id: &str) -> Option<&ContextMenuAction> {
        self.context_menu_actions.iter().find(|action| action.id == id)
    }

    pub fn icon_for(&self, node_type: NodeType) -> Option<Icon> {
        self.icons
            .iter()
            .find(|(candidate, _)| *candidate == node_type)
            .and_then(|(_, icon)| *icon)
    }

    /// jsTree settings object. Context menu items carry labels only; the
    /// widget adapter attaches the callbacks.
    pub fn to_jstree_settings(&self) -> Value {
        let mut types = Map::new();
        for (node_type, icon) in &self.icons {
            let entry = match icon {
                Some(icon) => json!({ "icon": icon.css_class() }),
                None => json!({}),
            };
            types.insert(node_type.as_str().to_string(), entry);
        }

        let mut items = Map::new();
        for action in &self.context_menu_actions {
            items.insert(
                action.id.to_string(),
                json!({ "label": action.label, "separator_after": action.separator_after }),
            );
        }

        let mut plugins = vec!["contextmenu"];
        if self.searchable {
            plugins.push("search");
        }
        plugins.push("types");

        json!({
            "core": {
                "themes": { "icons": self.tree.icons, "responsive": self.tree.responsive },
                "force_text": self.tree.force_text,
                "data": self.data.to_jstree_nodes(),
            },
            "contextmenu": { "items": items },
            "types": types,
            "search": {
                "show_only_matches": self.search.show_only_matches,
                "case_sensitive": self.search.case_sensitive,
            },
            "plugins": plugins,
        })
    }
}

//! Platform-independent inventory model shared by the viewer and its tooling.

pub mod document;
pub mod preferences;
pub mod response_store;
pub mod tree_config;
pub mod viewer_config;

pub use document::{
    DocumentError, InventoryDocument, Node, NodeForest, NodeId, NodeState, NodeType, RunMetadata,
};
pub use preferences::{PreferenceKey, Preferences, UnknownPreference};
pub use response_store::ResponseStore;
pub use tree_config::{
    CONTEXT_MENU_ACTIONS, ContextMenuAction, Icon, MenuEffect, TreeConfig, build_tree_config,
};
pub use viewer_config::{ConfigError, SearchSection, TreeSection, ViewerConfig};

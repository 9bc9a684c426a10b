use super::memory::{MemoryHost, MemoryTree};
use super::{BridgeError, BridgeHandle, BridgePhase, TreeBridge};
use shared::{
    InventoryDocument, Node, NodeForest, NodeType, Preferences, RunMetadata, TreeConfig,
    ViewerConfig, build_tree_config,
};
use std::collections::BTreeSet;
use std::sync::Arc;

const SHOW_EXTRA: Preferences = Preferences {
    show_extra_nodes: true,
};
const HIDE_EXTRA: Preferences = Preferences {
    show_extra_nodes: false,
};

fn inventory_config() -> Arc<TreeConfig> {
    let nodes = NodeForest::from_nodes(vec![
        Node::new("root", "[inventory]", NodeType::Root).with_children(["svc1", "ec2"]),
        Node::new("svc1", "lambda", NodeType::Service),
        Node::new("ec2", "ec2", NodeType::Service).with_children(["us-east-1"]),
        Node::new("us-east-1", "us-east-1", NodeType::Region).with_children(["vpcs", "empty"]),
        Node::new("vpcs", "DescribeVpcs (1)", NodeType::Operation)
            .with_children(["vpc-list", "meta"]),
        Node::new("vpc-list", "Vpcs", NodeType::Default).with_children(["vpc-1"]),
        Node::new("vpc-1", "VpcId = vpc-1", NodeType::Default),
        Node::new("meta", "ResponseMetadata", NodeType::ResponseMetadata)
            .with_children(["request-id"]),
        Node::new("request-id", "RequestId = abc", NodeType::Default),
        Node::new("empty", "DescribeSnapshots", NodeType::Operation)
            .with_children(["snapshots"])
            .hidden(true),
        Node::new("snapshots", "Snapshots = []", NodeType::Default),
    ])
    .unwrap();
    let document = InventoryDocument::new(RunMetadata::default(), nodes);
    Arc::new(build_tree_config(&document, &ViewerConfig::default()))
}

fn ready_bridge() -> (TreeBridge<MemoryTree>, MemoryHost) {
    let host = MemoryHost::new();
    let mut bridge = TreeBridge::new();
    bridge.mount(host.clone(), inventory_config()).unwrap();
    host.finish_loading();
    bridge.pump_events();
    assert_eq!(bridge.phase(), BridgePhase::Ready);
    (bridge, host)
}

fn ids(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

fn open_path(bridge: &mut TreeBridge<MemoryTree>, host: &MemoryHost, path: &[&str]) {
    for id in path {
        host.user_opens(id);
        bridge.pump_events();
    }
}

// ===== NODE OPENING =====

#[test]
fn opening_root_marks_childless_service_as_leaf() {
    let (mut bridge, host) = ready_bridge();
    assert_eq!(host.node_type("svc1"), Some(NodeType::Service));

    open_path(&mut bridge, &host, &["root"]);

    assert_eq!(host.node_type("svc1"), Some(NodeType::Leaf));
    assert_eq!(host.node_type("ec2"), Some(NodeType::Service));
}

#[test]
fn childless_nodes_stay_untyped_until_parent_opens() {
    let (mut bridge, host) = ready_bridge();

    open_path(&mut bridge, &host, &["root", "ec2", "us-east-1", "vpcs"]);
    assert_eq!(host.node_type("vpc-1"), Some(NodeType::Default));
    assert_eq!(host.node_type("vpc-list"), Some(NodeType::Default));

    open_path(&mut bridge, &host, &["vpc-list"]);
    assert_eq!(host.node_type("vpc-1"), Some(NodeType::Leaf));
}

#[test]
fn metadata_hidden_on_open_and_revealed_without_remount() {
    let (mut bridge, host) = ready_bridge();

    open_path(&mut bridge, &host, &["root", "ec2", "us-east-1", "vpcs"]);
    assert!(host.is_hidden("meta"));
    assert!(!host.is_hidden("vpc-list"));

    let hidden = bridge.apply_preferences(SHOW_EXTRA).unwrap();

    assert!(!host.is_hidden("meta"));
    assert!(!host.is_hidden("empty"));
    assert!(hidden.contains("meta"));
    assert!(hidden.contains("empty"));
    assert_eq!(host.created(), 1);
}

#[test]
fn metadata_revealed_while_extras_shown_is_hidden_again() {
    let (mut bridge, host) = ready_bridge();

    bridge.apply_preferences(SHOW_EXTRA).unwrap();
    open_path(&mut bridge, &host, &["root", "ec2", "us-east-1", "vpcs"]);
    assert!(!host.is_hidden("meta"));
    assert!(bridge.hidden_nodes().contains("meta"));

    let hidden = bridge.apply_preferences(HIDE_EXTRA).unwrap();

    assert!(hidden.is_empty());
    assert!(host.is_hidden("meta"));
    assert!(host.is_hidden("empty"));
}

// ===== PREFERENCES =====

#[test]
fn toggling_extra_nodes_on_then_off_restores_visibility() {
    let (mut bridge, host) = ready_bridge();
    open_path(&mut bridge, &host, &["root", "ec2", "us-east-1", "vpcs"]);
    let before = host.visible_ids();

    bridge.apply_preferences(SHOW_EXTRA).unwrap();
    assert!(host.visible_ids().contains("request-id"));
    assert!(host.visible_ids().contains("snapshots"));

    bridge.apply_preferences(HIDE_EXTRA).unwrap();
    assert_eq!(host.visible_ids(), before);
}

#[test]
fn applying_same_preferences_twice_is_idempotent() {
    let (mut bridge, host) = ready_bridge();
    open_path(&mut bridge, &host, &["root", "ec2", "us-east-1", "vpcs"]);

    let first = bridge.apply_preferences(SHOW_EXTRA).unwrap();
    let visible = host.visible_ids();
    let second = bridge.apply_preferences(SHOW_EXTRA).unwrap();

    assert_eq!(first, second);
    assert_eq!(host.visible_ids(), visible);

    let initial = bridge.apply_preferences(HIDE_EXTRA).unwrap();
    let repeated = bridge.apply_preferences(HIDE_EXTRA).unwrap();
    assert_eq!(initial, repeated);
    assert!(host.is_hidden("meta"));
}

// ===== SEARCH =====

#[test]
fn clearing_search_restores_full_visibility() {
    let (mut bridge, host) = ready_bridge();
    let everything = host.visible_ids();

    bridge.apply_search(Some("vpc-1")).unwrap();
    let matches = host.visible_ids();
    assert!(matches.contains("vpc-1"));
    assert!(matches.contains("root"));
    assert!(!matches.contains("svc1"));

    bridge.apply_search(None).unwrap();
    assert_eq!(host.visible_ids(), everything);
    assert_eq!(host.search_query(), None);
}

#[test]
fn empty_query_clears_the_filter() {
    let (mut bridge, host) = ready_bridge();

    bridge.apply_search(Some("LAMBDA")).unwrap();
    assert_eq!(host.search_query().as_deref(), Some("LAMBDA"));
    assert!(host.visible_ids().contains("svc1"));

    bridge.apply_search(Some("")).unwrap();
    assert_eq!(host.search_query(), None);
}

#[test]
fn search_stays_applied_while_extra_nodes_toggle() {
    let (mut bridge, host) = ready_bridge();
    open_path(&mut bridge, &host, &["root", "ec2", "us-east-1", "vpcs"]);
    let unfiltered = host.visible_ids();

    bridge.apply_search(Some("vpc-1")).unwrap();
    let filtered = host.visible_ids();
    assert_eq!(
        filtered,
        ids(&["root", "ec2", "us-east-1", "vpcs", "vpc-list", "vpc-1"])
    );

    let hidden = bridge.apply_preferences(SHOW_EXTRA).unwrap();
    assert_eq!(hidden.iter().cloned().collect::<BTreeSet<_>>(), ids(&["meta", "empty"]));
    assert_eq!(host.visible_ids(), filtered);
    assert_eq!(host.search_query().as_deref(), Some("vpc-1"));

    let hidden = bridge.apply_preferences(HIDE_EXTRA).unwrap();
    assert!(hidden.is_empty());
    assert_eq!(host.visible_ids(), filtered);

    bridge.apply_search(None).unwrap();
    assert_eq!(host.visible_ids(), unfiltered);
    assert!(host.is_hidden("meta"));
    assert!(host.is_hidden("empty"));
}

#[test]
fn extra_nodes_shown_under_search_appear_once_search_clears() {
    let (mut bridge, host) = ready_bridge();
    open_path(&mut bridge, &host, &["root", "ec2", "us-east-1", "vpcs"]);

    bridge.apply_search(Some("lambda")).unwrap();
    bridge.apply_preferences(SHOW_EXTRA).unwrap();
    assert_eq!(host.visible_ids(), ids(&["root", "svc1"]));

    bridge.apply_search(None).unwrap();
    assert!(host.visible_ids().contains("request-id"));
    assert!(host.visible_ids().contains("snapshots"));
}

// ===== LIFECYCLE =====

#[test]
fn unmount_during_initializing_leaves_no_widget() {
    let host = MemoryHost::new();
    let mut bridge = TreeBridge::<MemoryTree>::new();
    bridge.mount(host.clone(), inventory_config()).unwrap();
    assert_eq!(bridge.phase(), BridgePhase::Initializing);

    bridge.unmount().unwrap();

    assert_eq!(bridge.phase(), BridgePhase::Destroyed);
    assert!(!host.is_mounted());
    assert_eq!(host.destroyed(), 1);

    host.finish_loading();
    bridge.pump_events();
    assert_eq!(bridge.phase(), BridgePhase::Destroyed);
    assert!(matches!(bridge.apply_search(None), Err(BridgeError::Destroyed)));
    assert!(matches!(bridge.unmount(), Err(BridgeError::Destroyed)));
}

#[test]
fn requests_before_ready_keep_only_latest() {
    let host = MemoryHost::new();
    let mut bridge = TreeBridge::<MemoryTree>::new();
    bridge.mount(host.clone(), inventory_config()).unwrap();

    bridge.apply_search(Some("lambda")).unwrap();
    bridge.apply_search(Some("vpc-1")).unwrap();
    bridge.apply_preferences(SHOW_EXTRA).unwrap();
    assert_eq!(host.search_query(), None);
    assert!(host.is_hidden("empty"));

    host.finish_loading();
    bridge.pump_events();

    assert_eq!(bridge.phase(), BridgePhase::Ready);
    assert_eq!(bridge.preferences(), SHOW_EXTRA);
    assert_eq!(host.search_query().as_deref(), Some("vpc-1"));
    assert_eq!(bridge.search_query(), Some("vpc-1"));
    assert_eq!(
        host.visible_ids(),
        ids(&["root", "ec2", "us-east-1", "vpcs", "vpc-list", "vpc-1"])
    );
    assert_eq!(bridge.hidden_nodes().iter().collect::<Vec<_>>(), ["empty"]);

    bridge.apply_search(None).unwrap();
    assert!(host.visible_ids().contains("snapshots"));
}

#[test]
fn opens_before_ready_are_classified_once_ready() {
    let host = MemoryHost::new();
    let mut bridge = TreeBridge::<MemoryTree>::new();
    bridge.mount(host.clone(), inventory_config()).unwrap();

    host.user_opens("root");
    bridge.pump_events();
    assert_eq!(host.node_type("svc1"), Some(NodeType::Service));

    host.finish_loading();
    bridge.pump_events();
    assert_eq!(host.node_type("svc1"), Some(NodeType::Leaf));
}

#[test]
fn calls_on_unmounted_bridge_are_rejected() {
    let mut bridge = TreeBridge::<MemoryTree>::new();

    assert!(matches!(bridge.apply_search(Some("ec2")), Err(BridgeError::NotMounted)));
    assert!(matches!(
        bridge.apply_preferences(SHOW_EXTRA),
        Err(BridgeError::NotMounted)
    ));
    assert!(matches!(
        bridge.run_context_action("toggle_children", "root"),
        Err(BridgeError::NotMounted)
    ));
    assert!(matches!(bridge.unmount(), Err(BridgeError::NotMounted)));
    assert_eq!(bridge.phase(), BridgePhase::Unmounted);
}

#[test]
fn mounting_twice_is_rejected() {
    let (mut bridge, host) = ready_bridge();

    assert!(matches!(
        bridge.mount(host.clone(), inventory_config()),
        Err(BridgeError::AlreadyMounted)
    ));
    assert_eq!(host.created(), 1);
}

#[test]
fn failed_widget_creation_keeps_bridge_unmounted() {
    let host = MemoryHost::new();
    host.fail_next_create();
    let mut bridge = TreeBridge::<MemoryTree>::new();

    let result = bridge.mount(host.clone(), inventory_config());

    assert!(matches!(result, Err(BridgeError::Widget(_))));
    assert_eq!(bridge.phase(), BridgePhase::Unmounted);
    assert!(bridge.mount(host.clone(), inventory_config()).is_ok());
}

#[test]
fn dropping_mounted_bridge_destroys_widget() {
    let (bridge, host) = ready_bridge();

    drop(bridge);

    assert!(!host.is_mounted());
    assert_eq!(host.destroyed(), 1);
}

// ===== CONTEXT MENU =====

#[test]
fn toggle_children_action_opens_node_and_toggles_each_child() {
    let (mut bridge, host) = ready_bridge();

    bridge.run_context_action("toggle_siblings", "root").unwrap();

    assert!(host.is_opened("root"));
    assert!(host.is_opened("ec2"));
    assert_eq!(host.node_type("svc1"), Some(NodeType::Leaf));

    bridge.run_context_action("toggle_siblings", "root").unwrap();
    assert!(host.is_opened("root"));
    assert!(!host.is_opened("ec2"));
}

#[test]
fn toggle_descendants_action_opens_then_closes_subtree() {
    let (mut bridge, host) = ready_bridge();

    bridge.run_context_action("toggle_children", "ec2").unwrap();

    for id in ["ec2", "us-east-1", "vpcs", "vpc-list"] {
        assert!(host.is_opened(id), "{id} should be open");
    }
    assert!(host.is_hidden("meta"));
    assert_eq!(host.node_type("vpc-1"), Some(NodeType::Leaf));

    bridge.run_context_action("toggle_children", "ec2").unwrap();
    for id in ["ec2", "us-east-1", "vpcs", "vpc-list"] {
        assert!(!host.is_opened(id), "{id} should be closed");
    }
}

#[test]
fn unknown_context_action_is_rejected() {
    let (mut bridge, host) = ready_bridge();

    assert!(matches!(
        bridge.run_context_action("delete", "root"),
        Err(BridgeError::UnknownContextAction(action)) if action == "delete"
    ));

    host.user_picks("delete", "root");
    bridge.pump_events();
    assert!(!host.is_opened("root"));
}

#[test]
fn context_action_before_ready_is_rejected() {
    let host = MemoryHost::new();
    let mut bridge = TreeBridge::<MemoryTree>::new();
    bridge.mount(host.clone(), inventory_config()).unwrap();

    assert!(matches!(
        bridge.run_context_action("toggle_children", "root"),
        Err(BridgeError::NotReady)
    ));
}

// ===== HANDLE =====

#[test]
fn handle_pumps_widget_events_as_they_arrive() {
    let host = MemoryHost::new();
    let handle = BridgeHandle::<MemoryTree>::new();
    handle.mount(host.clone(), inventory_config()).unwrap();
    handle.apply_search(Some("ec2")).unwrap();

    host.finish_loading();
    assert_eq!(handle.phase(), BridgePhase::Ready);
    assert_eq!(host.search_query().as_deref(), Some("ec2"));

    host.user_picks("toggle_children", "ec2");
    assert!(host.is_opened("us-east-1"));
    assert!(host.is_hidden("meta"));

    handle.unmount().unwrap();
    assert!(!host.is_mounted());
    assert!(handle.with_bridge(|bridge| bridge.widget().is_none()));
}

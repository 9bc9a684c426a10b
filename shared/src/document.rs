use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

pub type NodeId = String;

// ===== NODE TYPES =====

/// Display class of a tree node. Unknown names fall back to `Default`,
/// matching how jsTree treats types missing from its `types` table.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Root,
    Service,
    Region,
    Operation,
    Leaf,
    ResponseMetadata,
    #[default]
    Default,
}

impl NodeType {
    pub const ALL: [NodeType; 7] = [
        NodeType::Default,
        NodeType::Root,
        NodeType::Service,
        NodeType::Region,
        NodeType::Operation,
        NodeType::Leaf,
        NodeType::ResponseMetadata,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Root => "root",
            NodeType::Service => "service",
            NodeType::Region => "region",
            NodeType::Operation => "operation",
            NodeType::Leaf => "leaf",
            NodeType::ResponseMetadata => "response_metadata",
            NodeType::Default => "default",
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "root" => NodeType::Root,
            "service" => NodeType::Service,
            "region" => NodeType::Region,
            "operation" => NodeType::Operation,
            "leaf" => NodeType::Leaf,
            "response_metadata" => NodeType::ResponseMetadata,
            _ => NodeType::Default,
        }
    }
}

impl From<String> for NodeType {
    fn from(name: String) -> Self {
        NodeType::from_name(&name)
    }
}

impl From<NodeType> for String {
    fn from(node_type: NodeType) -> Self {
        node_type.as_str().to_string()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== NODES =====

/// Initial widget state of a node as written by the data-file generator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeState {
    #[serde(default)]
    pub opened: bool,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub node_type: NodeType,
    pub children: Vec<NodeId>,
    /// Raw response content, when the node carries any.
    pub data: Option<Value>,
    pub state: NodeState,
    /// Tooltip shown on the node anchor.
    pub title: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_type,
            children: Vec::new(),
            data: None,
            state: NodeState::default(),
            title: None,
        }
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.state.hidden = hidden;
        self
    }

    pub fn is_childless(&self) -> bool {
        self.children.is_empty()
    }
}

// ===== FOREST =====

/// Validated node forest: unique ids, every child resolves, every non-root
/// node has exactly one parent and is reachable from a root.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeForest {
    nodes: IndexMap<NodeId, Node>,
    parents: IndexMap<NodeId, NodeId>,
    roots: Vec<NodeId>,
}

impl NodeForest {
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self, DocumentError> {
        let mut by_id = IndexMap::with_capacity(nodes.len());
        for node in nodes {
            if by_id.contains_key(&node.id) {
                return Err(DocumentError::DuplicateNodeId(node.id));
            }
            by_id.insert(node.id.clone(), node);
        }

        let mut parents: IndexMap<NodeId, NodeId> = IndexMap::new();
        for node in by_id.values() {
            for child in &node.children {
                if !by_id.contains_key(child) {
                    return Err(DocumentError::UnknownChild {
                        parent: node.id.clone(),
                        child: child.clone(),
                    });
                }
                if let Some(first) = parents.insert(child.clone(), node.id.clone()) {
                    return Err(DocumentError::MultipleParents {
                        node: child.clone(),
                        first,
                        second: node.id.clone(),
                    });
                }
            }
        }

        let roots: Vec<NodeId> = by_id
            .keys()
            .filter(|id| !parents.contains_key(*id))
            .cloned()
            .collect();

        // With single parents guaranteed, anything unreachable sits on a cycle.
        let mut reached: IndexSet<&str> = IndexSet::with_capacity(by_id.len());
        let mut pending: Vec<&str> = roots.iter().map(String::as_str).collect();
        while let Some(id) = pending.pop() {
            if reached.insert(id) {
                if let Some(node) = by_id.get(id) {
                    pending.extend(node.children.iter().map(String::as_str));
                }
            }
        }
        if let Some(orphan) = by_id.keys().find(|id| !reached.contains(id.as_str())) {
            return Err(DocumentError::Unreachable(orphan.clone()));
        }

        Ok(Self {
            nodes: by_id,
            parents,
            roots,
        })
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.parents.get(id).map(String::as_str)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Nodes in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Render the forest in jsTree's nested node layout, which is also the
    /// layout of the generated data file.
    pub fn to_jstree_nodes(&self) -> Vec<Value> {
        self.roots
            .iter()
            .filter_map(|id| self.jstree_node(id))
            .collect()
    }

    fn jstree_node(&self, id: &str) -> Option<Value> {
        let node = self.nodes.get(id)?;
        let mut object = Map::new();
        object.insert("id".into(), Value::String(node.id.clone()));
        object.insert("text".into(), Value::String(node.label.clone()));
        if node.node_type != NodeType::Default {
            object.insert("type".into(), Value::String(node.node_type.as_str().into()));
        }
        if node.state != NodeState::default() {
            object.insert(
                "state".into(),
                serde_json::json!({ "opened": node.state.opened, "hidden": node.state.hidden }),
            );
        }
        if let Some(title) = &node.title {
            object.insert("a_attr".into(), serde_json::json!({ "title": title }));
        }
        if let Some(data) = &node.data {
            object.insert("data".into(), data.clone());
        }
        if !node.children.is_empty() {
            let children = node
                .children
                .iter()
                .filter_map(|child| self.jstree_node(child))
                .collect();
            object.insert("children".into(), Value::Array(children));
        }
        Some(Value::Object(object))
    }
}

// ===== DRAFTS =====

/// Node description before ids are assigned and references resolved.
/// Both the nested data-file layout and the flat id-referenced layout
/// deserialize into drafts, as does the response store output.
#[derive(Deserialize, Debug, Clone, Default)]
pub(crate) struct NodeDraft {
    #[serde(default)]
    pub id: Option<NodeId>,
    #[serde(default, alias = "label", deserialize_with = "label_from_value")]
    pub text: String,
    #[serde(default, rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub children: Vec<ChildDraft>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub state: NodeState,
    #[serde(default)]
    pub a_attr: Option<AnchorAttributes>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub(crate) struct AnchorAttributes {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub(crate) enum ChildDraft {
    Reference(NodeId),
    Inline(NodeDraft),
}

/// Leaf labels in generated files may be any scalar (numbers, booleans, null).
fn label_from_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => text,
        other => other.to_string(),
    })
}

/// Assign ids (`n1`, `n2`, … in pre-order) to drafts without one and produce
/// the flat node list, parents before their inline children. Generated ids
/// skip any id a draft already carries.
pub(crate) fn flatten_drafts(drafts: Vec<NodeDraft>) -> Vec<Node> {
    let mut ids = GeneratedIds::default();
    for draft in &drafts {
        ids.reserve(draft);
    }
    let mut nodes = Vec::new();
    for draft in drafts {
        flatten_draft(draft, &mut ids, &mut nodes);
    }
    nodes
}

#[derive(Default)]
struct GeneratedIds {
    next: usize,
    taken: HashSet<NodeId>,
}

impl GeneratedIds {
    fn reserve(&mut self, draft: &NodeDraft) {
        if let Some(id) = &draft.id {
            self.taken.insert(id.clone());
        }
        for child in &draft.children {
            match child {
                ChildDraft::Reference(id) => {
                    self.taken.insert(id.clone());
                }
                ChildDraft::Inline(inline) => self.reserve(inline),
            }
        }
    }

    fn next_free(&mut self) -> NodeId {
        loop {
            self.next += 1;
            let id = format!("n{}", self.next);
            if !self.taken.contains(&id) {
                return id;
            }
        }
    }
}

fn flatten_draft(draft: NodeDraft, ids: &mut GeneratedIds, nodes: &mut Vec<Node>) -> NodeId {
    let id = draft.id.unwrap_or_else(|| ids.next_free());
    let index = nodes.len();
    nodes.push(Node {
        id: id.clone(),
        label: draft.text,
        node_type: draft.node_type,
        children: Vec::new(),
        data: draft.data,
        state: draft.state,
        title: draft.a_attr.and_then(|attributes| attributes.title),
    });

    let children = draft
        .children
        .into_iter()
        .map(|child| match child {
            ChildDraft::Reference(child_id) => child_id,
            ChildDraft::Inline(inline) => flatten_draft(inline, ids, nodes),
        })
        .collect();
    nodes[index].children = children;
    id
}

// ===== DOCUMENT =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RunMetadata {
    pub run_date: String,
    pub commandline: String,
    pub version: String,
    pub botocore_version: String,
}

/// Parsed inventory data file. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryDocument {
    pub run: RunMetadata,
    pub nodes: NodeForest,
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(flatten)]
    run: RunMetadata,
    responses: Vec<NodeDraft>,
}

impl InventoryDocument {
    pub fn new(run: RunMetadata, nodes: NodeForest) -> Self {
        Self { run, nodes }
    }

    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        let raw: RawDocument = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    pub fn from_json_slice(json: &[u8]) -> Result<Self, DocumentError> {
        let raw: RawDocument = serde_json::from_slice(json)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawDocument) -> Result<Self, DocumentError> {
        let nodes = NodeForest::from_nodes(flatten_drafts(raw.responses))?;
        Ok(Self {
            run: raw.run,
            nodes,
        })
    }

    /// Serialize as a data file in the nested jsTree layout.
    pub fn to_json_value(&self) -> Value {
        serde_json::json!({
            "run_date": self.run.run_date,
            "commandline": self.run.commandline,
            "version": self.run.version,
            "botocore_version": self.run.botocore_version,
            "responses": self.nodes.to_jstree_nodes(),
        })
    }
}

// ===== ERRORS =====

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid inventory data file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate node id '{0}'")]
    DuplicateNodeId(NodeId),
    #[error("node '{parent}' references unknown child '{child}'")]
    UnknownChild { parent: NodeId, child: NodeId },
    #[error("node '{node}' has more than one parent ('{first}' and '{second}')")]
    MultipleParents {
        node: NodeId,
        first: NodeId,
        second: NodeId,
    },
    #[error("node '{0}' is not reachable from any root")]
    Unreachable(NodeId),
}

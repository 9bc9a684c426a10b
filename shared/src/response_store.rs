//! Builds the inventory data file from raw API responses.
//!
//! Responses are stored as `service -> region -> operation -> response` and
//! rendered into the nested tree the viewer loads: one root, then service,
//! region and operation levels, then the response content expanded key by
//! key. Operations whose responses hold nothing but metadata start hidden.

use crate::document::{
    AnchorAttributes, ChildDraft, DocumentError, InventoryDocument, NodeDraft, NodeForest,
    NodeState, NodeType, RunMetadata, flatten_drafts,
};
use indexmap::IndexMap;
use serde_json::Value;

const ROOT_LABEL: &str = "[inventory]";
const RESPONSE_METADATA_LABEL: &str = "ResponseMetadata";

type RegionResponses = IndexMap<String, Value>;
type ServiceResponses = IndexMap<String, RegionResponses>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseStore {
    responses: IndexMap<String, ServiceResponses>,
}

impl ResponseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the response of an operation in a region, replacing any
    /// earlier one.
    pub fn add_response(
        &mut self,
        service: impl Into<String>,
        region: impl Into<String>,
        operation: impl Into<String>,
        response: Value,
    ) {
        self.responses
            .entry(service.into())
            .or_default()
            .entry(region.into())
            .or_default()
            .insert(operation.into(), response);
    }

    pub fn response(&self, service: &str, region: &str, operation: &str) -> Option<&Value> {
        self.responses.get(service)?.get(region)?.get(operation)
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Plain `{service: {region: {operation: response}}}` JSON.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.responses
                .iter()
                .map(|(service, regions)| {
                    let regions = regions
                        .iter()
                        .map(|(region, operations)| {
                            let operations = operations
                                .iter()
                                .map(|(operation, response)| (operation.clone(), response.clone()))
                                .collect();
                            (region.clone(), Value::Object(operations))
                        })
                        .collect();
                    (service.clone(), Value::Object(regions))
                })
                .collect(),
        )
    }

    pub fn to_document(&self, run: RunMetadata) -> Result<InventoryDocument, DocumentError> {
        let mut root = NodeDraft {
            text: ROOT_LABEL.to_string(),
            ..NodeDraft::default()
        };
        if let Expanded::Children(children) = expand(&self.to_value()) {
            root.children = children;
        }
        assign_types(&mut root);

        let nodes = NodeForest::from_nodes(flatten_drafts(vec![root]))?;
        Ok(InventoryDocument::new(run, nodes))
    }
}

enum Expanded {
    Children(Vec<ChildDraft>),
    Scalar,
}

fn expand(value: &Value) -> Expanded {
    match value {
        Value::Object(map) => Expanded::Children(
            map.iter()
                .map(|(key, item)| match expand(item) {
                    Expanded::Children(children) if !children.is_empty() => {
                        branch(key.clone(), children)
                    }
                    _ => leaf(format!("{} = {}", key, display_value(item))),
                })
                .collect(),
        ),
        Value::Array(items) => Expanded::Children(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| match expand(item) {
                    Expanded::Children(children) if !children.is_empty() => {
                        branch(format!("[{}]", index), children)
                    }
                    _ => leaf(display_value(item)),
                })
                .collect(),
        ),
        _ => Expanded::Scalar,
    }
}

fn branch(text: String, children: Vec<ChildDraft>) -> ChildDraft {
    ChildDraft::Inline(NodeDraft {
        text,
        children,
        ..NodeDraft::default()
    })
}

fn leaf(text: String) -> ChildDraft {
    ChildDraft::Inline(NodeDraft {
        text,
        ..NodeDraft::default()
    })
}

/// Scalars print the way the collection tool always printed them.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        other => other.to_string(),
    }
}

fn inline_children(draft: &mut NodeDraft) -> impl Iterator<Item = &mut NodeDraft> {
    draft.children.iter_mut().filter_map(|child| match child {
        ChildDraft::Inline(inline) => Some(inline),
        ChildDraft::Reference(_) => None,
    })
}

fn assign_types(root: &mut NodeDraft) {
    root.node_type = NodeType::Root;
    root.state.opened = true;

    for service in inline_children(root) {
        service.node_type = NodeType::Service;
        service.state.opened = true;

        for region in inline_children(service) {
            region.node_type = NodeType::Region;
            region.state.opened = true;

            let mut hidden_operations = 0usize;
            for operation in inline_children(region) {
                operation.node_type = NodeType::Operation;
                if operation.children.is_empty() {
                    // scalar response rendered as "operation = value"
                    continue;
                }

                let mut non_empty_responses = 0usize;
                for response in inline_children(operation) {
                    if response.text == RESPONSE_METADATA_LABEL {
                        response.node_type = NodeType::ResponseMetadata;
                        continue;
                    }
                    if !response.children.is_empty() {
                        non_empty_responses += 1;
                    }
                }

                if non_empty_responses > 0 {
                    operation.text = format!("{} ({})", operation.text, non_empty_responses);
                } else {
                    hidden_operations += 1;
                    operation.state = NodeState {
                        opened: false,
                        hidden: true,
                    };
                }
            }

            region.a_attr = Some(AnchorAttributes {
                title: Some(format!("{} hidden operations", hidden_operations)),
            });
        }
    }
}

//! Loaded inventory domain
//!
//! Reads the data file picked by the user, parses it and derives the tree
//! configuration once. A new file replaces the previous inventory wholesale.

use crate::dataflow::{Actor, Relay, relay};
use futures::{StreamExt, select};
use shared::{DocumentError, InventoryDocument, TreeConfig, ViewerConfig, build_tree_config};
use std::sync::Arc;
use wasm_bindgen_futures::JsFuture;

/// A parsed data file together with the tree configuration derived from it.
#[derive(Debug, PartialEq)]
pub struct LoadedInventory {
    pub file_name: String,
    pub document: InventoryDocument,
    pub tree_config: Arc<TreeConfig>,
}

pub fn load_inventory(
    file_name: impl Into<String>,
    contents: &str,
    viewer_config: &ViewerConfig,
) -> Result<LoadedInventory, DocumentError> {
    let document = InventoryDocument::from_json_str(contents)?;
    let tree_config = Arc::new(build_tree_config(&document, viewer_config));
    Ok(LoadedInventory {
        file_name: file_name.into(),
        document,
        tree_config,
    })
}

#[derive(Clone, Debug, Default)]
pub struct InventoryState {
    pub loaded: Option<Arc<LoadedInventory>>,
    /// Last load failure. Cleared by the next successful load.
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct InventoryStore {
    pub inventory_actor: Actor<InventoryState>,
    pub viewer_config: Arc<ViewerConfig>,

    pub file_loaded_relay: Relay<Arc<LoadedInventory>>,
    pub file_load_failed_relay: Relay<String>,
}

impl InventoryStore {
    pub fn new(viewer_config: ViewerConfig) -> Self {
        let (file_loaded_relay, mut file_loaded_stream) = relay::<Arc<LoadedInventory>>();
        let (file_load_failed_relay, mut file_load_failed_stream) = relay::<String>();

        let inventory_actor = Actor::new(InventoryState::default(), async move |state| {
            loop {
                select! {
                    inventory = file_loaded_stream.next() => {
                        let Some(inventory) = inventory else { break };
                        log::info!(
                            "loaded '{}' with {} nodes",
                            inventory.file_name,
                            inventory.document.nodes.len()
                        );
                        state.set(InventoryState {
                            loaded: Some(inventory),
                            error: None,
                        });
                    }
                    message = file_load_failed_stream.next() => {
                        let Some(message) = message else { break };
                        state.lock_mut().error = Some(message);
                    }
                }
            }
        });

        Self {
            inventory_actor,
            viewer_config: Arc::new(viewer_config),
            file_loaded_relay,
            file_load_failed_relay,
        }
    }

    /// Read and parse a picked file, reporting the outcome through the
    /// relays.
    pub async fn read_file(&self, file: web_sys::File) {
        let file_name = file.name();
        let result = match read_text(&file).await {
            Ok(contents) => load_inventory(file_name.clone(), &contents, &self.viewer_config)
                .map_err(|error| error.to_string()),
            Err(error) => Err(error),
        };

        match result {
            Ok(inventory) => self.file_loaded_relay.send(Arc::new(inventory)),
            Err(message) => {
                log::warn!("failed to load '{}': {}", file_name, message);
                self.file_load_failed_relay
                    .send(format!("Cannot load {}: {}", file_name, message));
            }
        }
    }
}

async fn read_text(file: &web_sys::File) -> Result<String, String> {
    let text = JsFuture::from(file.text())
        .await
        .map_err(|error| format!("{:?}", error))?;
    text.as_string()
        .ok_or_else(|| "file content is not text".to_string())
}

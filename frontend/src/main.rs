//! Inventory viewer entry point

use std::sync::OnceLock;
use zoon::*;

mod app;
mod dataflow;
mod file_input;
mod help_area;
mod inventory_area;
mod inventory_store;
mod logging;
mod search_filter;
mod toolbar;
mod tree_bridge;
mod tree_preferences;
mod viewer_config;

/// Application domains live for the whole page.
static APP: OnceLock<app::InventoryViewerApp> = OnceLock::new();

pub fn main() {
    logging::init();
    log::info!("starting inventory viewer");

    let app = APP.get_or_init(app::InventoryViewerApp::new);
    start_app("app", move || app.root());
}

//! Inventory page: toolbar on top, tree below.

use crate::dataflow::{Relay, relay};
use crate::inventory_store::LoadedInventory;
use crate::search_filter::SearchFilter;
use crate::toolbar::inventory_toolbar;
use crate::tree_bridge::tree_widget_host;
use crate::tree_preferences::TreePreferences;
use futures::{StreamExt, select};
use shared::Preferences;
use std::sync::Arc;
use zoon::*;

/// View state of one inventory page. Lives as long as the page element.
pub struct InventoryArea {
    pub search_filter: SearchFilter,
    pub tree_preferences: TreePreferences,

    pub search_text_changed_relay: Relay<String>,
    pub option_selected_relay: Relay<String>,

    // Applies toolbar events to the holders.
    _toolbar_events: TaskHandle,
}

impl InventoryArea {
    pub fn new(initial_preferences: Preferences) -> Self {
        let (search_text_changed_relay, mut search_text_changed_stream) = relay::<String>();
        let (option_selected_relay, mut option_selected_stream) = relay::<String>();

        let search_filter = SearchFilter::new();
        let tree_preferences = TreePreferences::new(initial_preferences);

        let toolbar_events = Task::start_droppable({
            let search_filter = search_filter.clone();
            let tree_preferences = tree_preferences.clone();
            async move {
                loop {
                    select! {
                        text = search_text_changed_stream.next() => {
                            let Some(text) = text else { break };
                            search_filter.set_text(text);
                        }
                        key = option_selected_stream.next() => {
                            let Some(key) = key else { break };
                            tree_preferences.toggle(&key);
                        }
                    }
                }
            }
        });

        Self {
            search_filter,
            tree_preferences,
            search_text_changed_relay,
            option_selected_relay,
            _toolbar_events: toolbar_events,
        }
    }
}

pub fn inventory_area(inventory: Arc<LoadedInventory>, initial_preferences: Preferences) -> impl Element {
    // Nothing to show for a document without nodes.
    let content = (!inventory.tree_config.data.is_empty()).then(|| {
        let area = InventoryArea::new(initial_preferences);

        Column::new()
            .s(Width::fill())
            .s(Padding::new().x(16))
            .item(inventory_toolbar(
                &area.tree_preferences,
                area.option_selected_relay.clone(),
                area.search_text_changed_relay.clone(),
            ))
            .item(tree_widget_host(
                inventory.tree_config.clone(),
                area.search_filter.clone(),
                area.tree_preferences.clone(),
            ))
            .after_remove(move |_| drop(area))
    });

    El::new().s(Width::fill()).child(content)
}

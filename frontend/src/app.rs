//! InventoryViewerApp: navbar, Home, Inventory and Help pages.

use crate::dataflow::{Actor, Relay, relay};
use crate::file_input::file_input;
use crate::help_area::help_area;
use crate::inventory_area::inventory_area;
use crate::inventory_store::InventoryStore;
use futures::StreamExt;
use shared::RunMetadata;
use zoon::*;

const PROJECT_URL: &str = "https://github.com/nccgroup/aws-inventory";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Home,
    Inventory,
    Help,
}

pub struct InventoryViewerApp {
    pub inventory_store: InventoryStore,
    pub page_actor: Actor<Page>,
    pub page_selected_relay: Relay<Page>,
}

impl InventoryViewerApp {
    pub fn new() -> Self {
        let inventory_store = InventoryStore::new(crate::viewer_config::load());

        let (page_selected_relay, mut page_selected_stream) = relay::<Page>();
        let page_actor = Actor::new(Page::Home, async move |state| {
            while let Some(page) = page_selected_stream.next().await {
                state.set_neq(page);
            }
        });

        Self {
            inventory_store,
            page_actor,
            page_selected_relay,
        }
    }

    pub fn root(&self) -> impl Element {
        Column::new()
            .s(Width::fill())
            .s(Height::screen())
            .s(Font::new().family([FontFamily::new("Helvetica Neue"), FontFamily::SansSerif]))
            .item(self.navbar())
            .item(self.load_error_banner())
            .item(self.page_content())
    }

    fn navbar(&self) -> impl Element {
        let has_inventory = self
            .inventory_store
            .inventory_actor
            .signal_ref(|state| state.loaded.is_some());

        Row::new()
            .s(Width::fill())
            .s(Gap::new().x(16))
            .s(Padding::new().x(16).y(12))
            .s(Background::new().color("#222"))
            .s(Font::new().color("#9d9d9d"))
            .item(El::new().s(Font::new().size(18).color("white")).child("AWS Inventory"))
            .item(
                Row::new()
                    .s(Gap::new().x(12))
                    .item(nav_button("Home", Page::Home, self.page_selected_relay.clone()))
                    .item_signal(has_inventory.map_true({
                        let page_selected_relay = self.page_selected_relay.clone();
                        move || nav_button("Inventory", Page::Inventory, page_selected_relay.clone())
                    }))
                    .item(nav_button("Help", Page::Help, self.page_selected_relay.clone()))
                    .item(
                        RawHtmlEl::new("a")
                            .attr("href", PROJECT_URL)
                            .attr("target", "_blank")
                            .attr("rel", "noopener noreferrer")
                            .style("color", "inherit")
                            .child("About"),
                    ),
            )
    }

    fn load_error_banner(&self) -> impl Element {
        El::new().child_signal(
            self.inventory_store
                .inventory_actor
                .signal_ref(|state| state.error.clone())
                .map(|error| {
                    error.map(|message| {
                        El::new()
                            .s(Padding::new().x(16).y(8))
                            .s(Background::new().color("#f2dede"))
                            .s(Font::new().color("#a94442"))
                            .child(message)
                    })
                }),
        )
    }

    fn page_content(&self) -> impl Element {
        let inventory_store = self.inventory_store.clone();
        let loaded_signal = self
            .inventory_store
            .inventory_actor
            .signal_ref(|state| state.loaded.clone());

        let page_signal = map_ref! {
            let page = self.page_actor.signal(),
            let loaded = loaded_signal => (*page, loaded.clone())
        };

        El::new().s(Width::fill()).child_signal(page_signal.dedupe_cloned().map(
            move |(page, loaded)| match (page, loaded) {
                (Page::Help, _) => help_area().unify(),
                (Page::Inventory, Some(inventory)) => {
                    let preferences = inventory_store.viewer_config.preferences;
                    inventory_area(inventory, preferences).unify()
                }
                (_, Some(inventory)) => home_area(&inventory.document.run).unify(),
                // Nothing to show on the inventory page before a file is loaded.
                (_, None) => file_input(&inventory_store).unify(),
            },
        ))
    }
}

fn nav_button(label: &'static str, page: Page, page_selected_relay: Relay<Page>) -> impl Element {
    Button::new()
        .s(Font::new().color("#9d9d9d"))
        .label(label)
        .on_press(move || page_selected_relay.send(page))
}

fn home_area(run: &RunMetadata) -> impl Element + use<> {
    let field = |name: &str, value: &str| {
        Row::new()
            .s(Gap::new().x(8))
            .item(El::new().s(Font::new().size(20).weight(FontWeight::Bold)).child(format!("{}:", name)))
            .item(El::new().s(Font::new().size(16).color("#777")).child(value.to_string()))
    };

    Column::new()
        .s(Gap::new().y(12))
        .s(Padding::all(32))
        .s(Background::new().color("#eee"))
        .s(RoundedCorners::all(6))
        .item(field("run date", &run.run_date))
        .item(field("commandline", &run.commandline))
        .item(field("version", &run.version))
        .item(field("botocore version", &run.botocore_version))
}

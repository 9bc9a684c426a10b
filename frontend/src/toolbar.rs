//! Inventory toolbar: options menu and search box.
//!
//! Emits raw values only. What they mean is decided by the inventory area.

use crate::dataflow::Relay;
use crate::tree_preferences::TreePreferences;
use shared::PreferenceKey;
use zoon::*;

const SHOW_EXTRA_NODES_LABEL: &str = "Show extra nodes (metadata and empty)";

pub fn inventory_toolbar(
    tree_preferences: &TreePreferences,
    option_selected_relay: Relay<String>,
    search_text_changed_relay: Relay<String>,
) -> impl Element + use<> {
    Row::new()
        .s(Gap::new().x(8))
        .s(Padding::new().y(8))
        .s(Align::new().top())
        .item(options_menu(tree_preferences.clone(), option_selected_relay))
        .item(search_box(search_text_changed_relay))
}

fn options_menu(tree_preferences: TreePreferences, option_selected_relay: Relay<String>) -> impl Element {
    let menu_open = Mutable::new(false);

    Column::new()
        .item(
            Button::new()
                .s(Padding::new().x(12).y(6))
                .s(Borders::all(Border::new().width(1).color("#ccc")))
                .s(RoundedCorners::all(4))
                .label("Options ▾")
                .on_press({
                    let menu_open = menu_open.clone();
                    move || menu_open.update(|open| !open)
                }),
        )
        .item_signal(menu_open.signal().map_true({
            let menu_open = menu_open.clone();
            move || {
                Button::new()
                    .s(Padding::new().x(12).y(6))
                    .s(Background::new().color("white"))
                    .label_signal(tree_preferences.signal().map(|preferences| {
                        let check = if preferences.show_extra_nodes { "✓ " } else { "" };
                        format!("{}{}", check, SHOW_EXTRA_NODES_LABEL)
                    }))
                    .on_press({
                        let option_selected_relay = option_selected_relay.clone();
                        let menu_open = menu_open.clone();
                        move || {
                            option_selected_relay
                                .send(PreferenceKey::ShowExtraNodes.as_str().to_string());
                            menu_open.set(false);
                        }
                    })
            }
        }))
}

fn search_box(search_text_changed_relay: Relay<String>) -> impl Element {
    let search_text = Mutable::new(String::new());

    // Typing and clearing both land in `search_text`; the relay follows it.
    let search_text_forwarder = Task::start_droppable(search_text.signal_cloned().for_each_sync(
        move |text| search_text_changed_relay.send(text),
    ));

    Row::new()
        .s(Gap::new().x(4))
        .item(
            TextInput::new()
                .s(Width::exact(240))
                .s(Padding::new().x(8).y(6))
                .s(Borders::all(Border::new().width(1).color("#ccc")))
                .label_hidden("Search")
                .placeholder(Placeholder::new("Search"))
                .text_signal(search_text.signal_cloned())
                .on_change({
                    let search_text = search_text.clone();
                    move |text| search_text.set_neq(text)
                }),
        )
        .item(
            Button::new()
                .s(Padding::all(6))
                .label("✕")
                .on_press(move || search_text.set_neq(String::new())),
        )
        .after_remove(move |_| drop(search_text_forwarder))
}

//! Help page: icon legend, mouse and keyboard controls.

use shared::{CONTEXT_MENU_ACTIONS, NodeType};
use zoon::*;

const KEYBOARD_CONTROLS: [(&str, &str); 3] = [
    ("Home", "focus root node"),
    ("End", "focus deepest expanded node"),
    ("← → ↑ ↓", "move/expand/collapse nodes"),
];

const NOTES: [&str; 2] = [
    "Operations with no response data are hidden. Hover over region nodes to see number of hidden operations.",
    "The number in parentheses after operations is the number of non-empty responses.",
];

pub fn help_area() -> impl Element {
    Column::new()
        .s(Gap::new().y(8))
        .s(Padding::all(32))
        .item(
            El::new()
                .s(Font::new().size(20).weight(FontWeight::Bold))
                .child("Help"),
        )
        .item(help_item(icon_legend()))
        .item(help_item(Text::new(context_menu_hint())))
        .item(help_item(Text::new("Double-click: expand node")))
        .items(KEYBOARD_CONTROLS.iter().map(|(keys, effect)| {
            help_item(
                Row::new()
                    .s(Gap::new().x(4))
                    .item(
                        El::new()
                            .s(Padding::new().x(4))
                            .s(Background::new().color("#333"))
                            .s(Font::new().color("white"))
                            .s(RoundedCorners::all(3))
                            .child(*keys),
                    )
                    .item(Text::new(format!(": {}", effect))),
            )
        }))
        .items(NOTES.iter().map(|note| help_item(Text::new(*note))))
}

fn help_item(content: impl Element) -> impl Element {
    El::new()
        .s(Width::fill())
        .s(Padding::new().x(16).y(10))
        .s(Borders::all(Border::new().width(1).color("#ddd")))
        .child(content)
}

fn icon_legend() -> impl Element {
    Column::new()
        .s(Gap::new().y(4))
        .item(Text::new("Icon Legend"))
        .item(
            Row::new()
                .s(Gap::new().x(12))
                .items(NodeType::ALL.iter().filter_map(|node_type| {
                    let icon = node_type.icon()?;
                    Some(
                        Row::new()
                            .s(Gap::new().x(4))
                            .item(RawHtmlEl::new("span").class(icon.css_class()))
                            .item(Text::new(legend_label(*node_type))),
                    )
                })),
        )
}

fn legend_label(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Root => "root node",
        NodeType::Leaf => "leaf node",
        other => other.as_str(),
    }
}

fn context_menu_hint() -> String {
    let entries: Vec<&str> = CONTEXT_MENU_ACTIONS.iter().map(|action| action.label).collect();
    format!("Right-click: context menu ({})", entries.join(", "))
}

use super::bridge::BridgeError;
use super::handle::BridgeHandle;
use super::jstree::JsTreeWidget;
use crate::dataflow::Subscription;
use crate::search_filter::SearchFilter;
use crate::tree_preferences::TreePreferences;
use shared::{Preferences, TreeConfig};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use zoon::*;

/// Empty element the jsTree widget renders into.
///
/// Zoon never gets children for this element, so it never touches the
/// widget's DOM. Mounting happens once the element is in the document.
pub fn tree_widget_host(
    tree_config: Arc<TreeConfig>,
    search_filter: SearchFilter,
    tree_preferences: TreePreferences,
) -> impl Element {
    let bridge = BridgeHandle::<JsTreeWidget>::new();
    let subscriptions = Rc::new(RefCell::new(Vec::<Subscription>::new()));

    RawHtmlEl::new("div")
        .class("inventory-tree")
        .after_insert({
            let bridge = bridge.clone();
            let subscriptions = subscriptions.clone();
            move |element: web_sys::HtmlElement| {
                if let Err(error) = bridge.mount(element, tree_config) {
                    log::error!("failed to mount inventory tree: {}", error);
                    return;
                }

                report(bridge.apply_search(search_filter.query().as_deref()));
                report(bridge.apply_preferences(tree_preferences.get()));

                let mut subscriptions = subscriptions.borrow_mut();
                subscriptions.push(search_filter.on_change({
                    let bridge = bridge.clone();
                    move |query: &Option<String>| report(bridge.apply_search(query.as_deref()))
                }));
                subscriptions.push(tree_preferences.on_change(move |preferences: &Preferences| {
                    report(bridge.apply_preferences(*preferences))
                }));
            }
        })
        .after_remove(move |_| {
            subscriptions.borrow_mut().clear();
            if let Err(error) = bridge.unmount() {
                log::warn!("inventory tree teardown: {}", error);
            }
        })
}

fn report<T>(result: Result<T, BridgeError>) {
    if let Err(error) = result {
        log::warn!("inventory tree: {}", error);
    }
}

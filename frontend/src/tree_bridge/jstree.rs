//! [`TreeWidget`] over the jQuery jsTree plugin.
//!
//! Every call goes through the DOM element the tree was created on; nothing
//! is looked up by a global id.

use super::widget::{TreeWidget, WidgetError, WidgetEvent, WidgetEvents, WidgetNode};
use serde::{Deserialize, Serialize};
use shared::{NodeId, NodeType, TreeConfig};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

#[wasm_bindgen(inline_js = r#"
const tree = (element) => window.jQuery(element).jstree(true);

export function jstree_create(element, settings, on_event) {
  const $ = window.jQuery;
  if (typeof $ === 'undefined' || typeof $.jstree === 'undefined') {
    throw new Error('jQuery with the jsTree plugin is not loaded');
  }
  const items = settings.contextmenu.items;
  settings.contextmenu.items = () => {
    const menu = {};
    for (const [action, item] of Object.entries(items)) {
      menu[action] = {
        label: item.label,
        separator_after: item.separator_after,
        action: (data) => on_event('context_action', tree(element).get_node(data.reference).id, action),
      };
    }
    return menu;
  };
  $(element)
    .on('ready.jstree', () => on_event('ready', '', ''))
    .on('open_node.jstree', (_event, data) => on_event('open_node', data.node.id, ''))
    .jstree(settings);
}

export function jstree_node(element, id) {
  const node = tree(element).get_node(id);
  if (!node) return null;
  return { id: node.id, type: node.type, children: node.children.slice() };
}

export function jstree_is_leaf(element, id) { return tree(element).is_leaf(id); }
export function jstree_is_open(element, id) { return tree(element).is_open(id); }
export function jstree_set_type(element, id, type) { tree(element).set_type(id, type); }
export function jstree_hide_node(element, id) { tree(element).hide_node(id); }
export function jstree_show_all(element) { return tree(element).show_all(); }
export function jstree_search(element, query) { tree(element).search(query); }
export function jstree_clear_search(element) { tree(element).clear_search(); }
export function jstree_open_node(element, id) { tree(element).open_node(id); }
export function jstree_toggle_node(element, id) { tree(element).toggle_node(id); }
export function jstree_open_all(element, id) { tree(element).open_all(id); }
export function jstree_close_all(element, id) { tree(element).close_all(id); }

export function jstree_destroy(element) {
  const $element = window.jQuery(element);
  $element.off('.jstree');
  const instance = $element.jstree(true);
  if (instance) instance.destroy();
}
"#)]
extern "C" {
    #[wasm_bindgen(catch)]
    fn jstree_create(
        element: &HtmlElement,
        settings: JsValue,
        on_event: &Closure<dyn FnMut(String, String, String)>,
    ) -> Result<(), JsValue>;
    fn jstree_node(element: &HtmlElement, id: &str) -> JsValue;
    fn jstree_is_leaf(element: &HtmlElement, id: &str) -> bool;
    fn jstree_is_open(element: &HtmlElement, id: &str) -> bool;
    fn jstree_set_type(element: &HtmlElement, id: &str, node_type: &str);
    fn jstree_hide_node(element: &HtmlElement, id: &str);
    fn jstree_show_all(element: &HtmlElement) -> js_sys::Array;
    fn jstree_search(element: &HtmlElement, query: &str);
    fn jstree_clear_search(element: &HtmlElement);
    fn jstree_open_node(element: &HtmlElement, id: &str);
    fn jstree_toggle_node(element: &HtmlElement, id: &str);
    fn jstree_open_all(element: &HtmlElement, id: &str);
    fn jstree_close_all(element: &HtmlElement, id: &str);
    fn jstree_destroy(element: &HtmlElement);
}

#[derive(Deserialize)]
struct JsNode {
    id: NodeId,
    #[serde(rename = "type")]
    node_type: String,
    children: Vec<NodeId>,
}

pub struct JsTreeWidget {
    element: HtmlElement,
    // Must outlive every jsTree handler that calls into it.
    _on_event: Closure<dyn FnMut(String, String, String)>,
}

impl TreeWidget for JsTreeWidget {
    type Container = HtmlElement;

    fn create(
        container: HtmlElement,
        config: &TreeConfig,
        events: WidgetEvents,
    ) -> Result<Self, WidgetError> {
        let settings = config
            .to_jstree_settings()
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|error| WidgetError::Initialization(error.to_string()))?;

        let on_event = Closure::<dyn FnMut(String, String, String)>::new(
            move |kind: String, node: String, action: String| {
                let event = match kind.as_str() {
                    "ready" => WidgetEvent::Ready,
                    "open_node" => WidgetEvent::NodeOpened(node),
                    "context_action" => WidgetEvent::ContextAction { action, node },
                    other => {
                        log::warn!("unexpected jsTree event '{}'", other);
                        return;
                    }
                };
                events.push(event);
            },
        );

        jstree_create(&container, settings, &on_event)
            .map_err(|error| WidgetError::Initialization(format!("{:?}", error)))?;

        Ok(Self {
            element: container,
            _on_event: on_event,
        })
    }

    fn node(&self, id: &str) -> Option<WidgetNode> {
        let node: Option<JsNode> =
            serde_wasm_bindgen::from_value(jstree_node(&self.element, id)).ok()?;
        node.map(|node| WidgetNode {
            id: node.id,
            node_type: NodeType::from_name(&node.node_type),
            children: node.children,
        })
    }

    fn is_leaf(&self, id: &str) -> bool {
        jstree_is_leaf(&self.element, id)
    }

    fn is_open(&self, id: &str) -> bool {
        jstree_is_open(&self.element, id)
    }

    fn set_type(&mut self, id: &str, node_type: NodeType) {
        jstree_set_type(&self.element, id, node_type.as_str());
    }

    fn hide_node(&mut self, id: &str) {
        jstree_hide_node(&self.element, id);
    }

    fn show_all(&mut self) -> Vec<NodeId> {
        jstree_show_all(&self.element)
            .iter()
            .filter_map(|id| id.as_string())
            .collect()
    }

    fn search(&mut self, query: &str) {
        jstree_search(&self.element, query);
    }

    fn clear_search(&mut self) {
        jstree_clear_search(&self.element);
    }

    fn open_node(&mut self, id: &str) {
        jstree_open_node(&self.element, id);
    }

    fn toggle_node(&mut self, id: &str) {
        jstree_toggle_node(&self.element, id);
    }

    fn open_all(&mut self, id: &str) {
        jstree_open_all(&self.element, id);
    }

    fn close_all(&mut self, id: &str) {
        jstree_close_all(&self.element, id);
    }

    fn destroy(self) {
        jstree_destroy(&self.element);
    }
}

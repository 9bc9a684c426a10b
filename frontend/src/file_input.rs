use crate::inventory_store::InventoryStore;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use zoon::*;

/// File picker for the data file written by the command line tool.
pub fn file_input(inventory_store: &InventoryStore) -> impl Element + use<> {
    let input_element = Rc::new(RefCell::new(None::<web_sys::HtmlInputElement>));

    Column::new()
        .s(Gap::new().y(8))
        .s(Padding::all(16))
        .item(
            El::new()
                .s(Font::new().weight(FontWeight::Bold))
                .child("Select data file (from commandline tool)."),
        )
        .item(
            RawHtmlEl::new("input")
                .attr("type", "file")
                .attr("accept", ".json, application/json")
                .attr("id", "file")
                .after_insert({
                    let input_element = input_element.clone();
                    move |element: web_sys::HtmlElement| {
                        *input_element.borrow_mut() = element.dyn_into().ok();
                    }
                })
                .event_handler({
                    let inventory_store = inventory_store.clone();
                    move |_: events::Change| {
                        let file = input_element
                            .borrow()
                            .as_ref()
                            .and_then(|input| input.files())
                            .and_then(|files| files.get(0));
                        let Some(file) = file else {
                            return;
                        };
                        let inventory_store = inventory_store.clone();
                        Task::start(async move { inventory_store.read_file(file).await });
                    }
                }),
        )
}

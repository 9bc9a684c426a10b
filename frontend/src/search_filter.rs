use crate::dataflow::{Observable, Subscription};
use zoon::Signal;

/// Current tree search query. `None` means no filter.
#[derive(Clone)]
pub struct SearchFilter {
    query: Observable<Option<String>>,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchFilter {
    pub fn new() -> Self {
        Self {
            query: Observable::new(None),
        }
    }

    pub fn query(&self) -> Option<String> {
        self.query.get()
    }

    /// Raw text from the search input. Empty text clears the filter.
    pub fn set_text(&self, text: String) {
        self.set_query((!text.is_empty()).then_some(text));
    }

    pub fn set_query(&self, query: Option<String>) {
        if self.query.get() != query {
            self.query.set(query);
        }
    }

    pub fn clear(&self) {
        self.set_query(None);
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_change(&self, listener: impl Fn(&Option<String>) + 'static) -> Subscription {
        self.query.on_change(listener)
    }

    pub fn query_signal(&self) -> impl Signal<Item = Option<String>> + use<> {
        self.query.signal()
    }
}

use crate::dataflow::{Observable, Subscription};
use shared::{PreferenceKey, Preferences};
use zoon::Signal;

/// Visibility toggles of the inventory tree for the current session.
#[derive(Clone)]
pub struct TreePreferences {
    preferences: Observable<Preferences>,
}

impl TreePreferences {
    pub fn new(initial: Preferences) -> Self {
        Self {
            preferences: Observable::new(initial),
        }
    }

    pub fn get(&self) -> Preferences {
        self.preferences.get()
    }

    pub fn set(&self, preferences: Preferences) {
        self.preferences.set(preferences);
    }

    /// Flip the preference named by a toolbar option key.
    pub fn toggle(&self, key: &str) {
        match key.parse::<PreferenceKey>() {
            Ok(key) => self.preferences.update(|preferences| preferences.toggled(key)),
            Err(error) => log::warn!("ignoring toolbar option: {}", error),
        }
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_change(&self, listener: impl Fn(&Preferences) + 'static) -> Subscription {
        self.preferences.on_change(listener)
    }

    pub fn signal(&self) -> impl Signal<Item = Preferences> + use<> {
        self.preferences.signal()
    }
}

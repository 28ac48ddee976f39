//! Drafts and preferences on top of a [`KeyValueStore`].
//!
//! Every operation is best-effort. A failing store never interrupts the
//! editor: failed writes are logged and dropped, failed reads look like
//! absent values.

use super::KeyValueStore;
use crate::preferences::SessionPreferences;

pub const DRAFT_KEY_PREFIX: &str = "code_";
pub const DARK_MODE_KEY: &str = "darkMode";
pub const FONT_SIZE_KEY: &str = "fontSize";

pub fn draft_key(language_id: &str) -> String {
    format!("{}{}", DRAFT_KEY_PREFIX, language_id)
}

pub struct PersistenceAdapter {
    store: Box<dyn KeyValueStore>,
}

impl PersistenceAdapter {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// An empty stored draft counts as no draft, so callers fall back to the
    /// starter source.
    pub fn load_draft(&self, language_id: &str) -> Option<String> {
        self.read(&draft_key(language_id))
            .filter(|draft| !draft.is_empty())
    }

    pub fn save_draft(&mut self, language_id: &str, text: &str) {
        self.write(&draft_key(language_id), text);
    }

    pub fn clear_draft(&mut self, language_id: &str) {
        let key = draft_key(language_id);
        if let Err(e) = self.store.remove(&key) {
            log::warn!("Failed to remove '{}' from local store: {}", key, e);
        }
    }

    pub fn load_preferences(&self) -> SessionPreferences {
        let dark_mode = self.read(DARK_MODE_KEY);
        let font_size = self.read(FONT_SIZE_KEY);
        SessionPreferences::from_stored(dark_mode.as_deref(), font_size.as_deref())
    }

    pub fn save_preferences(&mut self, preferences: &SessionPreferences) {
        self.write(DARK_MODE_KEY, &preferences.dark_mode.to_string());
        self.write(FONT_SIZE_KEY, &preferences.font_size_px.to_string());
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to read '{}' from local store: {}", key, e);
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            log::warn!("Failed to write '{}' to local store: {}", key, e);
        }
    }
}

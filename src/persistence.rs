use tauri::{AppHandle, Manager};
use tauri_plugin_store::StoreExt;

use crate::state::{AppState, Settings};

const STORE_FILE: &str = "settings.json";
const SETTINGS_KEY: &str = "settings";

/// Read settings from the store, falling back to defaults on any
/// failure so a corrupt store never blocks startup.
pub fn load_settings(app_handle: &AppHandle) -> Settings {
    let value = match app_handle.store(STORE_FILE) {
        Ok(store) => store.get(SETTINGS_KEY),
        Err(e) => {
            tracing::warn!("Failed to open settings store: {}. Using defaults.", e);
            return Settings::default();
        }
    };

    let Some(value) = value else {
        tracing::info!("No stored settings found. Using defaults.");
        return Settings::default();
    };

    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!("Stored settings are unreadable: {}. Using defaults.", e);
        Settings::default()
    })
}

/// Persist the current in-memory settings.
pub fn save_settings(app_handle: &AppHandle) {
    let settings = {
        let state = app_handle.state::<AppState>();
        let guard = state.settings.lock().unwrap();
        guard.clone()
    };

    let value = match serde_json::to_value(&settings) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("Failed to serialize settings: {}", e);
            return;
        }
    };

    match app_handle.store(STORE_FILE) {
        Ok(store) => {
            store.set(SETTINGS_KEY, value);
            if let Err(e) = store.save() {
                tracing::error!("Failed to write settings store: {}", e);
            }
        }
        Err(e) => {
            tracing::error!("Failed to open settings store for saving: {}", e);
        }
    }
}

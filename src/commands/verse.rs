use anyhow::Result;
use tauri::{AppHandle, Manager};

use crate::gateway;
use crate::state::AppState;

/// Tauri command: look up the verse text for a reference and store it
/// in the session.
#[tauri::command]
pub async fn fetch_verse(app_handle: AppHandle, reference: String) -> Result<String, String> {
    do_fetch_verse(&app_handle, reference)
        .await
        .map_err(|e| e.to_string())
}

async fn do_fetch_verse(app_handle: &AppHandle, reference: String) -> Result<String> {
    let reference = reference.trim().to_string();
    if reference.is_empty() {
        anyhow::bail!("Please enter a verse reference (e.g. John 3:16)");
    }

    let gateway_settings = {
        let state = app_handle.state::<AppState>();
        let settings = state.settings.lock().unwrap();
        settings.gateway.clone()
    };

    let text = gateway::fetch_verse_text(&gateway_settings, &reference).await;

    {
        let state = app_handle.state::<AppState>();
        let mut session = state.session.lock().unwrap();
        session.reference = reference.clone();
        session.verse_text = text.clone();
    }

    tracing::info!("Verse loaded for '{}'", reference);
    Ok(text)
}

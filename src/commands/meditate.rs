use anyhow::Result;
use tauri::{AppHandle, Manager};

use crate::gateway;
use crate::session::MeditationSession;
use crate::state::AppState;

/// Tauri command: generate the AI commentary from the loaded verse and
/// the user's notes.
#[tauri::command]
pub async fn generate_commentary(app_handle: AppHandle, notes: String) -> Result<String, String> {
    do_generate_commentary(&app_handle, notes)
        .await
        .map_err(|e| e.to_string())
}

/// Tauri command: generate the AI declaration/prayer from the loaded
/// verse.
#[tauri::command]
pub async fn generate_declaration(app_handle: AppHandle) -> Result<String, String> {
    do_generate_declaration(&app_handle)
        .await
        .map_err(|e| e.to_string())
}

/// Tauri command: sync the user-authored fields into the session so
/// export and sharing see them.
#[tauri::command]
pub fn update_session(
    app_handle: AppHandle,
    notes: String,
    declaration: String,
) -> Result<(), String> {
    let state = app_handle.state::<AppState>();
    let mut session = state.session.lock().unwrap();
    session.notes = notes;
    session.declaration = declaration;
    Ok(())
}

/// Tauri command: current session snapshot.
#[tauri::command]
pub fn get_session(app_handle: AppHandle) -> Result<MeditationSession, String> {
    let state = app_handle.state::<AppState>();
    let session = state.session.lock().unwrap().clone();
    Ok(session)
}

async fn do_generate_commentary(app_handle: &AppHandle, notes: String) -> Result<String> {
    let (gateway_settings, reference) = {
        let state = app_handle.state::<AppState>();
        let settings = state.settings.lock().unwrap().gateway.clone();
        let mut session = state.session.lock().unwrap();
        if !session.has_verse() {
            anyhow::bail!("Please load a verse first.");
        }
        session.notes = notes.clone();
        (settings, session.reference.clone())
    };

    let commentary = gateway::generate_commentary(&gateway_settings, &reference, &notes).await;

    {
        let state = app_handle.state::<AppState>();
        state.session.lock().unwrap().ai_commentary = commentary.clone();
    }

    tracing::info!("Commentary generated for '{}'", reference);
    Ok(commentary)
}

async fn do_generate_declaration(app_handle: &AppHandle) -> Result<String> {
    let (gateway_settings, reference) = {
        let state = app_handle.state::<AppState>();
        let settings = state.settings.lock().unwrap().gateway.clone();
        let session = state.session.lock().unwrap();
        if !session.has_verse() {
            anyhow::bail!("Please load a verse to base your declaration on.");
        }
        (settings, session.reference.clone())
    };

    let declaration = gateway::generate_declaration(&gateway_settings, &reference).await;

    {
        let state = app_handle.state::<AppState>();
        state.session.lock().unwrap().ai_declaration = declaration.clone();
    }

    tracing::info!("Declaration generated for '{}'", reference);
    Ok(declaration)
}

use anyhow::Result;
use tauri::{AppHandle, Manager};
use tauri_plugin_opener::OpenerExt;

use crate::export::{pdf, share};
use crate::state::AppState;

/// Tauri command: write the session to a PDF in the downloads folder
/// and return the path.
#[tauri::command]
pub fn export_pdf(app_handle: AppHandle) -> Result<String, String> {
    do_export_pdf(&app_handle).map_err(|e| e.to_string())
}

/// Tauri command: open a WhatsApp share link for the session in the
/// default browser and return the URL.
#[tauri::command]
pub fn share_session(app_handle: AppHandle) -> Result<String, String> {
    do_share_session(&app_handle).map_err(|e| e.to_string())
}

fn do_export_pdf(app_handle: &AppHandle) -> Result<String> {
    let session = {
        let state = app_handle.state::<AppState>();
        let session = state.session.lock().unwrap().clone();
        session
    };

    let path = pdf::export_session(&session)?;
    tracing::info!("Session exported to {}", path.display());
    Ok(path.display().to_string())
}

fn do_share_session(app_handle: &AppHandle) -> Result<String> {
    let session = {
        let state = app_handle.state::<AppState>();
        let session = state.session.lock().unwrap().clone();
        session
    };

    let url = share::share_url(&session)?;
    app_handle.opener().open_url(&url, None::<&str>)?;
    tracing::info!("Share link opened");
    Ok(url)
}

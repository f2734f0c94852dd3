use anyhow::Result;
use tauri::{AppHandle, Emitter, Manager};

use crate::audio::playback::PlaybackStatus;
use crate::audio::{decode, PlaybackError, SPEECH_CHANNELS, SPEECH_SAMPLE_RATE};
use crate::gateway;
use crate::state::AppState;

/// Tauri command: read a piece of content aloud. Returns false when the
/// request is dropped because a playback is already active (deliberate
/// policy: no queueing, no preemption). Resolves when playback ends.
#[tauri::command]
pub async fn play_speech(
    app_handle: AppHandle,
    text: String,
    tag: String,
) -> Result<bool, String> {
    do_play_speech(&app_handle, text, tag)
        .await
        .map_err(|e| e.to_string())
}

/// Tauri command: which phase the playback controller is in and which
/// content is being read aloud.
#[tauri::command]
pub fn playback_status(app_handle: AppHandle) -> Result<PlaybackStatus, String> {
    let state = app_handle.state::<AppState>();
    Ok(state.playback.status())
}

fn emit_status(app_handle: &AppHandle) {
    let status = app_handle.state::<AppState>().playback.status();
    let _ = app_handle.emit("speech-status", status);
}

async fn do_play_speech(app_handle: &AppHandle, text: String, tag: String) -> Result<bool> {
    let state = app_handle.state::<AppState>();

    if !state.playback.try_begin(&tag) {
        return Ok(false);
    }
    emit_status(app_handle);

    let gateway_settings = {
        let settings = state.settings.lock().unwrap();
        settings.gateway.clone()
    };

    let payload = match gateway::synthesize_speech(&gateway_settings, &text).await {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            state.playback.abort();
            emit_status(app_handle);
            return Err(PlaybackError::SynthesisUnavailable.into());
        }
        Err(e) => {
            state.playback.abort();
            emit_status(app_handle);
            return Err(e.context("Speech synthesis failed"));
        }
    };

    let decoded = match decode::decode_pcm_base64(&payload, SPEECH_SAMPLE_RATE, SPEECH_CHANNELS) {
        Ok(audio) => audio,
        Err(e) => {
            state.playback.abort();
            emit_status(app_handle);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Reading '{}' aloud: {} frames at {}Hz",
        tag,
        decoded.frame_count(),
        decoded.sample_rate
    );

    if let Err(e) = state.playback.start_playing(decoded) {
        emit_status(app_handle);
        return Err(e.into());
    }
    // Now in the playing phase; tell the UI which content is being
    // read aloud, then let playback run to natural completion.
    emit_status(app_handle);

    state.playback.wait_until_idle().await;
    emit_status(app_handle);

    Ok(true)
}

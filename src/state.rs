use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::audio::playback::PlaybackController;
use crate::session::MeditationSession;

pub struct AppState {
    pub playback: PlaybackController,
    pub session: Mutex<MeditationSession>,
    pub settings: Mutex<Settings>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            playback: PlaybackController::new(),
            session: Mutex::new(MeditationSession::default()),
            settings: Mutex::new(Settings::default()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub gateway: GatewaySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySettings {
    /// Overrides the GEMINI_API_KEY environment variable when set.
    pub api_key: Option<String>,
    pub text_model: String,
    pub tts_model: String,
    pub voice: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            api_key: None,
            text_model: "gemini-2.5-flash".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            voice: "Kore".to_string(),
        }
    }
}

pub mod api;
pub mod prompts;

use anyhow::Result;

use crate::state::GatewaySettings;

// Fallback text shown when a text operation fails: these operations
// never fail hard, they always return something displayable.
const VERSE_UNAVAILABLE: &str = "Could not load the verse text. Please try again.";
const COMMENTARY_UNAVAILABLE: &str =
    "Could not generate the reflection right now. Please try again later.";
const DECLARATION_UNAVAILABLE: &str = "Could not generate your declaration right now.";

/// Resolve the API key: explicit setting first, then the environment.
pub fn resolve_api_key(settings: &GatewaySettings) -> Result<String> {
    if let Some(key) = settings
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
    {
        return Ok(key.to_string());
    }
    std::env::var("GEMINI_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No API key configured. Set one in settings or in the GEMINI_API_KEY environment variable."
            )
        })
}

/// Look up the verse body for a reference. Always returns displayable
/// text; an invalid reference comes back as the model's "not found"
/// answer, errors as a fallback message.
pub async fn fetch_verse_text(settings: &GatewaySettings, reference: &str) -> String {
    let key = match resolve_api_key(settings) {
        Ok(k) => k,
        Err(e) => return e.to_string(),
    };

    let body = api::text_request_body(&prompts::verse_prompt(reference));
    match api::generate_content(&key, &settings.text_model, &body).await {
        Ok(resp) => resp
            .first_text()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| VERSE_UNAVAILABLE.to_string()),
        Err(e) => {
            tracing::error!("Verse lookup failed: {}", e);
            VERSE_UNAVAILABLE.to_string()
        }
    }
}

pub async fn generate_commentary(
    settings: &GatewaySettings,
    verse: &str,
    user_notes: &str,
) -> String {
    let key = match resolve_api_key(settings) {
        Ok(k) => k,
        Err(e) => return e.to_string(),
    };

    let body = api::text_request_body(&prompts::commentary_prompt(verse, user_notes));
    match api::generate_content(&key, &settings.text_model, &body).await {
        Ok(resp) => resp
            .first_text()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| COMMENTARY_UNAVAILABLE.to_string()),
        Err(e) => {
            tracing::error!("Commentary generation failed: {}", e);
            COMMENTARY_UNAVAILABLE.to_string()
        }
    }
}

pub async fn generate_declaration(settings: &GatewaySettings, verse: &str) -> String {
    let key = match resolve_api_key(settings) {
        Ok(k) => k,
        Err(e) => return e.to_string(),
    };

    let body = api::text_request_body(&prompts::declaration_prompt(verse));
    match api::generate_content(&key, &settings.text_model, &body).await {
        Ok(resp) => resp
            .first_text()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DECLARATION_UNAVAILABLE.to_string()),
        Err(e) => {
            tracing::error!("Declaration generation failed: {}", e);
            DECLARATION_UNAVAILABLE.to_string()
        }
    }
}

/// Synthesize speech for a piece of text. `Ok(None)` means the service
/// answered but produced no audio payload; the caller decides how to
/// surface that.
pub async fn synthesize_speech(
    settings: &GatewaySettings,
    text: &str,
) -> Result<Option<String>> {
    let key = resolve_api_key(settings)?;
    let body = api::speech_request_body(&prompts::read_aloud_prompt(text), &settings.voice);
    let resp = api::generate_content(&key, &settings.tts_model, &body).await?;
    Ok(resp.inline_data().map(|d| d.to_string()))
}

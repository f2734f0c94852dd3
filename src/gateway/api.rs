use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Response shape of `models/*:generateContent`. Only the fields we
/// consume; text lives in `parts[].text`, synthesized speech arrives as
/// base64 PCM in `parts[].inlineData.data`.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: Option<String>,
    pub data: String,
}

impl GenerateContentResponse {
    /// First text part of the first candidate, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .find_map(|p| p.text.as_deref())
    }

    /// First inline (base64) payload of the first candidate, if any.
    pub fn inline_data(&self) -> Option<&str> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .find_map(|p| p.inline_data.as_ref().map(|d| d.data.as_str()))
    }
}

/// Request body for a plain text generation.
pub fn text_request_body(prompt: &str) -> Value {
    json!({
        "contents": [{
            "parts": [{ "text": prompt }]
        }]
    })
}

/// Request body for speech synthesis: audio modality plus a prebuilt
/// voice. The response rate/channels are fixed out-of-band (24 kHz mono).
pub fn speech_request_body(prompt: &str, voice: &str) -> Value {
    json!({
        "contents": [{
            "parts": [{ "text": prompt }]
        }],
        "generationConfig": {
            "responseModalities": ["AUDIO"],
            "speechConfig": {
                "voiceConfig": {
                    "prebuiltVoiceConfig": { "voiceName": voice }
                }
            }
        }
    })
}

pub async fn generate_content(
    api_key: &str,
    model: &str,
    body: &Value,
) -> Result<GenerateContentResponse> {
    let url = format!("{}/{}:generateContent", API_BASE, model);
    let client = reqwest::Client::new();
    let resp = client
        .post(&url)
        .header("x-goog-api-key", api_key)
        .header("User-Agent", "DailyVerse/0.1")
        .json(body)
        .send()
        .await?
        .error_for_status()?;

    let parsed: GenerateContentResponse = resp.json().await?;
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_response() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [{ "text": "For God so loved the world..." }],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.first_text(), Some("For God so loved the world..."));
        assert!(resp.inline_data().is_none());
    }

    #[test]
    fn parses_inline_audio_response() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [{
                        "inlineData": {
                            "mimeType": "audio/L16;codec=pcm;rate=24000",
                            "data": "AAAA"
                        }
                    }]
                }
            }]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.inline_data(), Some("AAAA"));
        assert!(resp.first_text().is_none());
    }

    #[test]
    fn empty_candidates_yield_nothing() {
        let resp: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.first_text().is_none());
        assert!(resp.inline_data().is_none());
    }

    #[test]
    fn text_body_carries_the_prompt() {
        let body = text_request_body("John 3:16");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "John 3:16");
    }

    #[test]
    fn speech_body_requests_audio_with_voice() {
        let body = speech_request_body("Read this", "Kore");
        assert_eq!(body["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            body["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Kore"
        );
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Read this");
    }
}

use anyhow::Result;
use reqwest::Url;

use crate::session::MeditationSession;

/// Assemble the WhatsApp-formatted share message (`*bold*`, `_italic_`)
/// from the filled parts of the session.
pub fn share_message(session: &MeditationSession) -> String {
    let mut message = String::from("\u{1F4D6} *Daily Verse - My Meditation*\n\n");

    if !session.reference.trim().is_empty() {
        message.push_str(&format!("*Verse:* {}\n", session.reference));
        if !session.verse_text.trim().is_empty() {
            message.push_str(&format!("_\"{}\"_\n", session.verse_text));
        }
        message.push('\n');
    }
    if !session.ai_commentary.trim().is_empty() {
        message.push_str(&format!("\u{2728} *Reflection:*\n{}\n\n", session.ai_commentary));
    }
    if !session.ai_declaration.trim().is_empty() {
        message.push_str(&format!(
            "\u{1F64F} *Prayer of Faith:*\n{}\n\n",
            session.ai_declaration
        ));
    }
    message.push_str("Shared from the *Daily Verse* app");
    message
}

/// Build the `wa.me` link carrying the message as a query parameter.
pub fn share_url(session: &MeditationSession) -> Result<String> {
    let message = share_message(session);
    let url = Url::parse_with_params("https://wa.me/", &[("text", message.as_str())])?;
    Ok(url.to_string())
}

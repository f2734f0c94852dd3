use serde::{Deserialize, Serialize};

/// The devotional session being built up in the UI: the verse under
/// meditation, the user's own writing, and the generated content.
/// Snapshot consumed by PDF export and share-link construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeditationSession {
    pub reference: String,
    pub verse_text: String,
    pub notes: String,
    pub ai_commentary: String,
    pub declaration: String,
    pub ai_declaration: String,
}

impl MeditationSession {
    pub fn has_verse(&self) -> bool {
        !self.reference.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_has_no_verse() {
        let session = MeditationSession::default();
        assert!(!session.has_verse());
    }

    #[test]
    fn whitespace_reference_does_not_count() {
        let session = MeditationSession {
            reference: "   ".into(),
            ..Default::default()
        };
        assert!(!session.has_verse());
    }
}

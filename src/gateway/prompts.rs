//! Prompt templates for the devotional operations.

pub fn verse_prompt(reference: &str) -> String {
    format!(
        "Act as a Holy Bible API. \
         Return only the text of the requested verse, with no extra commentary. \
         If the reference is invalid, say \"Reference not found\". \
         Reference: \"{reference}\" \
         Translation: New International Version or similar."
    )
}

pub fn commentary_prompt(verse: &str, user_notes: &str) -> String {
    format!(
        "You are a deep and empathetic spiritual counselor. \
         Based on the Bible verse: \"{verse}\" \
         and these thoughts from the reader: \"{user_notes}\" \
         write a short meditative commentary (at most 3 paragraphs) that brings \
         comfort, wisdom and practical application. Use a warm, poetic tone."
    )
}

pub fn declaration_prompt(verse: &str) -> String {
    format!(
        "Based on the Bible verse: \"{verse}\" \
         write a short, powerful \"Declaration of Faith\" or personal prayer, \
         in the first person (\"I declare...\", \"Lord, I thank you because...\"), \
         meant to be read aloud. At most 4 impactful sentences."
    )
}

pub fn read_aloud_prompt(text: &str) -> String {
    format!("Read calmly and serenely: {text}")
}

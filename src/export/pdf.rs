use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rgb,
};

use crate::session::MeditationSession;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const TEXT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
// Start a new page once the cursor passes this line.
const BOTTOM_LIMIT_MM: f32 = 280.0;

const PT_TO_MM: f32 = 0.352_778;
// Average Helvetica glyph advance as a fraction of the point size,
// used for the character-count line estimate.
const AVG_GLYPH_EM: f32 = 0.5;

const ACCENT_BLUE: (u8, u8, u8) = (37, 140, 244);
const ACCENT_PURPLE: (u8, u8, u8) = (168, 85, 247);
const MUTED_GRAY: (u8, u8, u8) = (100, 100, 100);
const QUOTE_GRAY: (u8, u8, u8) = (60, 60, 60);
const BLACK: (u8, u8, u8) = (0, 0, 0);

#[derive(Clone, Copy)]
enum Face {
    Regular,
    Bold,
    Italic,
}

struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    /// Distance of the baseline from the top of the page, in mm.
    cursor: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let italic = doc.add_builtin_font(BuiltinFont::HelveticaOblique)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            italic,
            cursor: MARGIN_MM,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = MARGIN_MM;
    }

    /// Write a wrapped block of text and advance the cursor, breaking
    /// the page first if the whole block would run past the bottom.
    fn add_block(&mut self, text: &str, size: f32, face: Face, color: (u8, u8, u8)) {
        let font = match face {
            Face::Regular => self.regular.clone(),
            Face::Bold => self.bold.clone(),
            Face::Italic => self.italic.clone(),
        };

        let lines = wrap_text(text, chars_per_line(size));
        let line_height = size / 2.5;

        if self.cursor + lines.len() as f32 * (size / 2.0) > BOTTOM_LIMIT_MM {
            self.new_page();
        }

        let (r, g, b) = color;
        self.layer.set_fill_color(Color::Rgb(Rgb::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            None,
        )));

        for line in &lines {
            self.layer.use_text(
                line.clone(),
                size,
                Mm(MARGIN_MM),
                Mm(PAGE_HEIGHT_MM - self.cursor),
                &font,
            );
            self.cursor += line_height;
        }
        self.cursor += 5.0;
    }

    fn space(&mut self, mm: f32) {
        self.cursor += mm;
    }

    fn finish(self) -> Result<Vec<u8>> {
        Ok(self.doc.save_to_bytes()?)
    }
}

fn chars_per_line(size: f32) -> usize {
    let glyph_mm = size * PT_TO_MM * AVG_GLYPH_EM;
    ((TEXT_WIDTH_MM / glyph_mm) as usize).max(1)
}

/// Greedy word wrap to a maximum character count; words longer than a
/// full line are hard-split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word.to_string();
            while word.chars().count() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let head: String = word.chars().take(max_chars).collect();
                word = word.chars().skip(max_chars).collect();
                lines.push(head);
            }
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Render the session as a PDF document, one section per filled field.
pub fn render_session(session: &MeditationSession) -> Result<Vec<u8>> {
    let mut writer = PdfWriter::new("Daily Verse - My Meditation")?;

    writer.add_block("Daily Verse - My Meditation", 22.0, Face::Bold, ACCENT_BLUE);
    let date = chrono::Local::now().format("%B %e, %Y").to_string();
    writer.add_block(&date, 10.0, Face::Regular, MUTED_GRAY);
    writer.space(5.0);

    if !session.reference.trim().is_empty() {
        writer.add_block("Verse:", 14.0, Face::Bold, ACCENT_BLUE);
        writer.add_block(&session.reference, 12.0, Face::Bold, BLACK);
        if !session.verse_text.trim().is_empty() {
            let quoted = format!("\"{}\"", session.verse_text);
            writer.add_block(&quoted, 11.0, Face::Italic, QUOTE_GRAY);
        }
        writer.space(5.0);
    }

    if !session.notes.trim().is_empty() {
        writer.add_block("My Reflections:", 14.0, Face::Bold, ACCENT_BLUE);
        writer.add_block(&session.notes, 11.0, Face::Regular, BLACK);
        writer.space(5.0);
    }

    if !session.ai_commentary.trim().is_empty() {
        writer.add_block("AI Reflection:", 14.0, Face::Bold, ACCENT_PURPLE);
        writer.add_block(&session.ai_commentary, 11.0, Face::Italic, BLACK);
        writer.space(5.0);
    }

    if !session.declaration.trim().is_empty() {
        writer.add_block("My Declaration:", 14.0, Face::Bold, ACCENT_BLUE);
        writer.add_block(&session.declaration, 11.0, Face::Regular, BLACK);
        writer.space(5.0);
    }

    if !session.ai_declaration.trim().is_empty() {
        writer.add_block("Prayer of Faith (AI):", 14.0, Face::Bold, ACCENT_PURPLE);
        writer.add_block(&session.ai_declaration, 11.0, Face::Italic, BLACK);
    }

    writer.finish()
}

/// `Meditation_John_3_16.pdf`-style name derived from the reference.
pub fn file_name(reference: &str) -> String {
    let sanitized: String = reference
        .trim()
        .chars()
        .map(|c| if c == ':' || c == ' ' { '_' } else { c })
        .collect();
    if sanitized.is_empty() {
        "Meditation_Daily.pdf".to_string()
    } else {
        format!("Meditation_{}.pdf", sanitized)
    }
}

fn output_dir() -> Result<PathBuf> {
    dirs::download_dir()
        .or_else(dirs::document_dir)
        .or_else(dirs::home_dir)
        .context("Cannot find a directory to write the PDF to")
}

/// Render and write the PDF, returning the path it was saved to.
pub fn export_session(session: &MeditationSession) -> Result<PathBuf> {
    let bytes = render_session(session)?;
    let path = output_dir()?.join(file_name(&session.reference));
    fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_word_boundaries() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 15);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 15, "line too long: {line:?}");
        }
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn splits_oversized_words() {
        let lines = wrap_text("supercalifragilisticexpialidocious", 10);
        assert!(lines.len() >= 3);
        for line in &lines {
            assert!(line.chars().count() <= 10);
        }
    }

    #[test]
    fn preserves_paragraph_breaks() {
        let lines = wrap_text("first paragraph\nsecond paragraph", 80);
        assert_eq!(lines, vec!["first paragraph", "second paragraph"]);
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        assert_eq!(wrap_text("", 80), vec![String::new()]);
    }

    #[test]
    fn file_name_sanitizes_reference() {
        assert_eq!(file_name("John 3:16"), "Meditation_John_3_16.pdf");
        assert_eq!(file_name(""), "Meditation_Daily.pdf");
    }

    #[test]
    fn renders_a_pdf_document() {
        let session = MeditationSession {
            reference: "John 3:16".into(),
            verse_text: "For God so loved the world...".into(),
            notes: "A note to myself.".into(),
            ai_commentary: "A short reflection. ".repeat(200),
            declaration: String::new(),
            ai_declaration: "I declare that I am loved.".into(),
        };
        let bytes = render_session(&session).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}

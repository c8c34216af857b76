use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, warn};

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedDocument,
};

/// TJ adjustments at or below this (thousandths of text space) read as a word gap.
const WORD_GAP_ADJUSTMENT: f32 = -200.0;
const BASELINE_TOLERANCE: f32 = 0.01;
/// Share of unreadable characters above which the walker output is discarded.
const GARBLED_RATIO: f32 = 0.3;

#[derive(Clone)]
pub struct PdfExtractor {
    password: String,
    max_file_size: usize,
}

impl PdfExtractor {
    pub fn new(max_file_size: usize) -> Self {
        Self {
            password: String::new(),
            max_file_size,
        }
    }

    fn extract_sync(&self, data: &[u8]) -> Result<ExtractedDocument, DocumentExtractionError> {
        let mut doc = Document::load_mem(data)
            .map_err(|e| DocumentExtractionError::CorruptedFile(e.to_string()))?;

        if doc.is_encrypted() {
            doc.decrypt(&self.password).map_err(|_e| {
                DocumentExtractionError::CorruptedFile(
                    "Failed to decrypt PDF - a password is required".to_string(),
                )
            })?;
        }

        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(DocumentExtractionError::NoExtractableText);
        }

        let mut page_texts: Vec<(u32, String)> = pages
            .into_par_iter()
            .map(|(page_num, page_id)| (page_num, page_text(&doc, page_num, page_id)))
            .collect();
        page_texts.sort_by_key(|(page_num, _)| *page_num);

        let extracted =
            ExtractedDocument::from_pages(page_texts.into_iter().map(|(_, text)| text).collect());
        debug!("Extracted text from {} pages", extracted.page_count);

        if !extracted.has_text() {
            return Err(DocumentExtractionError::NoExtractableText);
        }

        Ok(extracted)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new(10 * 1024 * 1024)
    }
}

fn page_text(doc: &Document, page_num: u32, page_id: (u32, u16)) -> String {
    let walked = doc
        .get_page_content(page_id)
        .and_then(|raw| Content::decode(&raw))
        .map(|content| walk_operations(&content.operations));

    match walked {
        Ok(text) if !text.trim().is_empty() && !looks_garbled(&text) => text,
        Ok(_) => fallback_text(doc, page_num),
        Err(e) => {
            warn!("Could not decode content of page {}: {}", page_num, e);
            fallback_text(doc, page_num)
        }
    }
}

fn fallback_text(doc: &Document, page_num: u32) -> String {
    match doc.extract_text(&[page_num]) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to extract text from page {}: {}", page_num, e);
            String::new()
        }
    }
}

/// Text state needed to notice baseline changes.
#[derive(Default)]
struct TextCursor {
    y: f32,
    leading: f32,
    last_shown_y: Option<f32>,
    out: String,
}

impl TextCursor {
    fn next_line(&mut self) {
        self.y -= self.leading;
    }

    fn show(&mut self, text: &str) {
        if let Some(last) = self.last_shown_y {
            if (self.y - last).abs() > BASELINE_TOLERANCE && !self.out.ends_with('\n') {
                self.out.push('\n');
            }
        }
        self.last_shown_y = Some(self.y);
        self.out.push_str(text);
    }
}

fn number(operand: Option<&Object>) -> Option<f32> {
    operand.and_then(|object| object.as_float().ok())
}

fn walk_operations(operations: &[Operation]) -> String {
    let mut cursor = TextCursor::default();

    for operation in operations {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "BT" => cursor.y = 0.0,
            "TL" => {
                if let Some(leading) = number(operands.first()) {
                    cursor.leading = leading;
                }
            }
            "Td" => {
                if let Some(ty) = number(operands.get(1)) {
                    cursor.y += ty;
                }
            }
            "TD" => {
                if let Some(ty) = number(operands.get(1)) {
                    cursor.leading = -ty;
                    cursor.y += ty;
                }
            }
            "Tm" => {
                if let Some(f) = number(operands.get(5)) {
                    cursor.y = f;
                }
            }
            "T*" => cursor.next_line(),
            "Tj" => {
                if let Some(text) = operands.first().and_then(decode_string) {
                    cursor.show(&text);
                }
            }
            "'" => {
                cursor.next_line();
                if let Some(text) = operands.first().and_then(decode_string) {
                    cursor.show(&text);
                }
            }
            "\"" => {
                cursor.next_line();
                if let Some(text) = operands.get(2).and_then(decode_string) {
                    cursor.show(&text);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let mut text = String::new();
                    for item in items {
                        match item {
                            Object::String(..) => {
                                if let Some(piece) = decode_string(item) {
                                    text.push_str(&piece);
                                }
                            }
                            other => {
                                if other.as_float().is_ok_and(|gap| gap <= WORD_GAP_ADJUSTMENT)
                                    && !text.ends_with(' ')
                                {
                                    text.push(' ');
                                }
                            }
                        }
                    }
                    cursor.show(&text);
                }
            }
            _ => {}
        }
    }

    cursor.out
}

/// UTF-16BE when the string starts with a byte-order mark, Latin-1 otherwise.
fn decode_string(object: &Object) -> Option<String> {
    let Object::String(bytes, _) = object else {
        return None;
    };

    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return Some(String::from_utf16_lossy(&units));
    }

    Some(bytes.iter().map(|byte| *byte as char).collect())
}

fn looks_garbled(text: &str) -> bool {
    let mut total = 0usize;
    let mut unreadable = 0usize;
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        total += 1;
        if c.is_control() || c == char::REPLACEMENT_CHARACTER {
            unreadable += 1;
        }
    }
    total > 0 && unreadable as f32 / total as f32 > GARBLED_RATIO
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract_pages(&self, data: &[u8]) -> Result<ExtractedDocument, DocumentExtractionError> {
        if data.len() > self.max_file_size {
            return Err(DocumentExtractionError::ExtractionFailed(format!(
                "PDF exceeds {} bytes",
                self.max_file_size
            )));
        }

        let data = data.to_vec();
        let extractor = self.clone();
        tokio::task::spawn_blocking(move || extractor.extract_sync(&data))
            .await
            .map_err(|e| DocumentExtractionError::ExtractionFailed(e.to_string()))?
    }
}

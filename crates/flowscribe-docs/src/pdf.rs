//! PDF text extraction and the PDF report exporter.
//!
//! Extraction concatenates the text of every page in page order, one `\n`
//! between pages.  Pages without a text layer (scanned images) contribute
//! nothing.
//!
//! The exporter lays out the same content as the Markdown report on A4 pages
//! with the built-in Helvetica font, so no font files are needed.  Labels
//! are encoded as WinAnsi; characters outside it print as `?`.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use tracing::debug;

use flowscribe_core::Step;

use crate::error::{DocsError, Result};
use crate::export::{ExportFormat, Exporter};
use crate::report::ReportMetadata;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 56;
const TITLE_SIZE: i64 = 18;
const BODY_SIZE: i64 = 11;
const LINE_HEIGHT: i64 = 16;
/// Helvetica at 11pt fits roughly this many characters between the margins.
const WRAP_CHARS: usize = 85;

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Extract the text layer of a PDF document.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let doc = Document::load_mem(bytes).map_err(pdf_error)?;
    let pages = doc.get_pages();

    let mut texts = Vec::with_capacity(pages.len());
    for &number in pages.keys() {
        let text = doc.extract_text(&[number]).map_err(pdf_error)?;
        texts.push(text.trim_end_matches('\n').to_string());
    }

    debug!(pages = texts.len(), "pdf text extracted");
    Ok(texts.join("\n"))
}

fn pdf_error(e: impl std::fmt::Display) -> DocsError {
    DocsError::Pdf {
        reason: e.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Title, optional metadata, then one `Step <n>: <label>` line per step.
#[derive(Debug, Clone)]
pub struct PdfExporter {
    pub title: String,
    pub metadata: Option<ReportMetadata>,
}

impl Exporter for PdfExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn export(&self, _steps: &[Step]) -> Result<String> {
        Err(DocsError::BinaryFormat {
            format: ExportFormat::Pdf,
        })
    }

    fn render(&self, steps: &[Step]) -> Result<Vec<u8>> {
        let mut lines = Vec::new();
        if let Some(meta) = &self.metadata {
            lines.push(format!(
                "Generated: {}",
                meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
            lines.push(format!("Steps: {}", steps.len()));
            if let Some(source) = &meta.source {
                lines.push(format!("Source: {source}"));
            }
            lines.push(String::new());
        }
        for step in steps {
            lines.extend(wrap(&step.to_string(), WRAP_CHARS));
        }

        build_document(self.title.trim(), &lines)
    }
}

/// One text block per line so extraction yields one line each.
fn build_document(title: &str, lines: &[String]) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let per_page = ((PAGE_HEIGHT - 2 * MARGIN - 2 * LINE_HEIGHT) / LINE_HEIGHT) as usize;
    let mut chunks: Vec<&[String]> = lines.chunks(per_page.max(1)).collect();
    if chunks.is_empty() {
        chunks.push(&[]);
    }

    let mut kids = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        let mut operations = Vec::new();
        let mut y = PAGE_HEIGHT - MARGIN;
        if index == 0 {
            text_line(&mut operations, title, TITLE_SIZE, y);
            y -= 2 * LINE_HEIGHT;
        }
        for line in chunk.iter() {
            y -= LINE_HEIGHT;
            if !line.is_empty() {
                text_line(&mut operations, line, BODY_SIZE, y);
            }
        }

        let content = Content { operations }.encode().map_err(pdf_error)?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id);
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids.into_iter().map(Object::from).collect::<Vec<_>>(),
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id: ObjectId = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(pdf_error)?;
    debug!(pages = count, bytes = out.len(), "pdf report rendered");
    Ok(out)
}

fn text_line(operations: &mut Vec<Operation>, text: &str, size: i64, y: i64) {
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new(
        "Tf",
        vec!["F1".into(), Object::Integer(size)],
    ));
    operations.push(Operation::new(
        "Td",
        vec![Object::Integer(MARGIN), Object::Integer(y)],
    ));
    operations.push(Operation::new(
        "Tj",
        vec![Object::string_literal(win_ansi(text))],
    ));
    operations.push(Operation::new("ET", vec![]));
}

fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(line: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let split = word
                .char_indices()
                .nth(width)
                .map_or(word.len(), |(i, _)| i);
            let rest = word.split_off(split);
            out.push(word);
            word = rest;
        }
        let needed =
            current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
        if needed > width && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}

//! Document text extraction.
//!
//! Turns an uploaded document into the single text string the classifier
//! expects.  Plain-text documents are decoded as UTF-8, falling back to
//! Latin-1 when the bytes are not valid UTF-8, so extraction never fails on
//! encoding alone.  PDF documents contribute the text of every page, pages
//! joined by `\n`.  Other formats (Word, images) are rejected with
//! [`DocsError::UnsupportedFormat`].

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{DocsError, Result};
use crate::pdf::extract_pdf_text;

/// Extensions treated as plain text.  An empty string means "no extension".
const TEXT_EXTENSIONS: &[&str] = &["", "txt", "text", "md", "markdown"];

/// How a document's bytes become text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Text,
    Pdf,
}

/// Read a document from disk and return its text.
pub async fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let kind = document_kind(path)?;

    let bytes = tokio::fs::read(path).await.map_err(|source| DocsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let text = decode(kind, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), chars = text.chars().count(), "document extracted");
    Ok(text)
}

/// Extract text from an in-memory upload named `name`.
pub fn extract_from_bytes(name: &str, bytes: &[u8]) -> Result<String> {
    let kind = document_kind(Path::new(name))?;
    let text = decode(kind, bytes)?;
    debug!(name, bytes = bytes.len(), "upload extracted");
    Ok(text)
}

/// Cap `text` at `max_chars` characters, cutting on a char boundary.
pub fn truncate_input(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            warn!(max_chars, "input truncated");
            &text[..byte_index]
        }
        None => text,
    }
}

fn document_kind(path: &Path) -> Result<DocumentKind> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    if TEXT_EXTENSIONS.contains(&extension.as_str()) {
        Ok(DocumentKind::Text)
    } else if extension == "pdf" {
        Ok(DocumentKind::Pdf)
    } else {
        Err(DocsError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        })
    }
}

fn decode(kind: DocumentKind, bytes: &[u8]) -> Result<String> {
    let text = match kind {
        DocumentKind::Text => decode_text(bytes),
        DocumentKind::Pdf => extract_pdf_text(bytes)?,
    };
    Ok(text.replace("\r\n", "\n"))
}

/// UTF-8 first, Latin-1 otherwise.
fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            debug!(error = %e, "not valid utf-8, decoding as latin-1");
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use flowscribe_core::Step;

    use super::*;
    use crate::export::Exporter;
    use crate::pdf::PdfExporter;

    #[test]
    fn utf8_upload() {
        let text = extract_from_bytes("notes.txt", "Café order.\r\nPay.".as_bytes()).unwrap();
        assert_eq!(text, "Café order.\nPay.");
    }

    #[test]
    fn latin1_fallback() {
        let text = extract_from_bytes("notes.TXT", b"Caf\xe9 order").unwrap();
        assert_eq!(text, "Café order");
    }

    #[test]
    fn bom_is_stripped() {
        let text = extract_from_bytes("notes.md", b"\xEF\xBB\xBFSave it").unwrap();
        assert_eq!(text, "Save it");
    }

    #[test]
    fn word_documents_are_unsupported() {
        let err = extract_from_bytes("report.docx", b"PK\x03\x04").unwrap_err();
        assert!(matches!(
            err,
            DocsError::UnsupportedFormat { ref extension, .. } if extension == "docx"
        ));
    }

    #[test]
    fn pdf_upload_yields_page_text() {
        let bytes = PdfExporter {
            title: "Intake".into(),
            metadata: None,
        }
        .render(&[Step::matched(1, "Admit patient")])
        .unwrap();

        let text = extract_from_bytes("Intake.PDF", &bytes).unwrap();
        assert!(text.contains("Intake"));
        assert!(text.contains("Step 1: Admit patient"));
    }

    #[test]
    fn broken_pdf_is_an_error() {
        let err = extract_from_bytes("report.pdf", b"%PDF-1.7 truncated").unwrap_err();
        assert!(matches!(err, DocsError::Pdf { .. }));
    }

    #[test]
    fn no_extension_is_text() {
        assert_eq!(extract_from_bytes("README", b"hello").unwrap(), "hello");
    }

    #[test]
    fn truncate_on_char_boundary() {
        assert_eq!(truncate_input("héllo world", 5), "héllo");
        assert_eq!(truncate_input("short", 10), "short");
        assert_eq!(truncate_input("", 0), "");
    }

    #[tokio::test]
    async fn extract_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("process.txt");
        std::fs::write(&path, "Customer places order.\nSend email.").unwrap();

        let text = extract_text(&path).await.unwrap();
        assert_eq!(text, "Customer places order.\nSend email.");

        let missing = extract_text(dir.path().join("missing.txt")).await;
        assert!(matches!(missing, Err(DocsError::Io { .. })));
    }
}

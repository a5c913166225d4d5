//! CV text extraction from uploaded documents.
//!
//! PDF goes through `pdf-extract`, DOCX is read straight out of the
//! `word/document.xml` part of the archive, and plain text is taken as-is.

use std::io::{Cursor, Read};
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("No text could be extracted from the document. It might be scanned or contain only images. Please paste the text of your CV directly.")]
    NoText,

    #[error("Please upload a PDF or DOCX file, or paste your CV directly.")]
    Unsupported,

    #[error("Error extracting text from PDF: {0}")]
    Pdf(String),

    #[error("Error extracting text from DOCX: {0}")]
    Docx(String),

    #[error("Could not read document: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    /// Picks the kind from a file name's extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" | "md" => Some(Self::PlainText),
            _ => None,
        }
    }
}

/// Reads the file at `path` and extracts its text.
pub fn extract_file(path: &Path) -> Result<String, ExtractionError> {
    let kind = DocumentKind::from_path(path).ok_or(ExtractionError::Unsupported)?;
    let bytes = std::fs::read(path)?;
    extract_cv_text(kind, &bytes)
}

/// Extracts trimmed text from a document; empty output is [`ExtractionError::NoText`].
pub fn extract_cv_text(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = match kind {
        DocumentKind::Pdf => pdf_text(bytes)?,
        DocumentKind::Docx => docx_text(bytes)?,
        DocumentKind::PlainText => String::from_utf8_lossy(bytes).into_owned(),
    };

    let text = text.trim();
    if text.is_empty() {
        warn!("Extraction of {kind:?} document produced no text");
        return Err(ExtractionError::NoText);
    }
    debug!("Extracted {} characters from {kind:?} document", text.len());
    Ok(text.to_string())
}

fn pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    let text = pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    Ok(text)
}

fn docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractionError::Docx(e.to_string()))?;
    let mut part = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;
    Ok(document_xml_text(&xml))
}

/// Collects the `<w:t>` runs of a WordprocessingML body, one line per paragraph.
fn document_xml_text(xml: &str) -> String {
    let mut out = String::new();
    let mut rest = xml;
    let mut in_text = false;

    while let Some(open) = rest.find('<') {
        if in_text {
            out.push_str(&unescape(&rest[..open]));
        }
        let Some(len) = rest[open..].find('>') else {
            break;
        };
        let close = open + len;
        let tag = &rest[open + 1..close];
        let closing = tag.starts_with('/');
        let self_closing = tag.ends_with('/');
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default();

        match name {
            "w:t" => in_text = !closing && !self_closing,
            "w:p" if closing || self_closing => out.push('\n'),
            "w:br" | "w:cr" => out.push('\n'),
            "w:tab" if self_closing => out.push('\t'),
            _ => {}
        }
        rest = &rest[close + 1..];
    }
    out
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Named XML entities plus decimal (`&#8217;`) and hex (`&#x2019;`) references.
fn decode_entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse::<u32>().ok()?,
            };
            char::from_u32(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn make_docx(body: &str) -> Vec<u8> {
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    /// Builds a one-page PDF whose page content is `content`, with a correct xref table.
    fn make_pdf(content: &str) -> Vec<u8> {
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref_at = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(xref.as_bytes());
        pdf
    }

    #[test]
    fn test_pdf_text_is_extracted() {
        let pdf = make_pdf("BT /F1 12 Tf 72 700 Td (Jane Doe) Tj ET");
        let text = extract_cv_text(DocumentKind::Pdf, &pdf).unwrap();
        assert!(text.contains("Jane"), "got: {text:?}");
        assert!(text.contains("Doe"), "got: {text:?}");
    }

    #[test]
    fn test_pdf_without_text_is_no_text() {
        let pdf = make_pdf("");
        assert!(matches!(
            extract_cv_text(DocumentKind::Pdf, &pdf),
            Err(ExtractionError::NoText)
        ));
    }

    #[test]
    fn test_kind_from_path() {
        assert_eq!(DocumentKind::from_path(Path::new("cv.PDF")), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_path(Path::new("a/cv.docx")), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_path(Path::new("cv.md")), Some(DocumentKind::PlainText));
        assert_eq!(DocumentKind::from_path(Path::new("cv.doc")), None);
        assert_eq!(DocumentKind::from_path(Path::new("cv")), None);
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let docx = make_docx(
            "<w:p><w:pPr><w:pStyle w:val=\"Title\"/></w:pPr>\
             <w:r><w:t>Jane</w:t></w:r><w:r><w:t xml:space=\"preserve\"> Doe</w:t></w:r></w:p>\
             <w:p><w:r><w:t>R&amp;D engineer</w:t><w:tab/><w:t>2019</w:t></w:r></w:p>",
        );
        let text = extract_cv_text(DocumentKind::Docx, &docx).unwrap();
        assert_eq!(text, "Jane Doe\nR&D engineer\t2019");
    }

    #[test]
    fn test_docx_character_references_and_empty_paragraphs() {
        let docx = make_docx(
            "<w:p><w:r><w:t>I&#8217;m a caf&#xE9; owner &amp; chef</w:t></w:r></w:p>\
             <w:p/>\
             <w:p><w:r><w:t>Fish &amp chips &#xZZ;</w:t></w:r></w:p>",
        );
        let text = extract_cv_text(DocumentKind::Docx, &docx).unwrap();
        assert_eq!(text, "I\u{2019}m a caf\u{e9} owner & chef\n\nFish &amp chips &#xZZ;");
    }

    #[test]
    fn test_docx_without_text_is_no_text() {
        let docx = make_docx("<w:p><w:r><w:drawing/></w:r></w:p>");
        assert!(matches!(
            extract_cv_text(DocumentKind::Docx, &docx),
            Err(ExtractionError::NoText)
        ));
    }

    #[test]
    fn test_docx_missing_document_part() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        assert!(matches!(
            extract_cv_text(DocumentKind::Docx, &bytes),
            Err(ExtractionError::Docx(_))
        ));
    }

    #[test]
    fn test_garbage_is_reported_per_format() {
        assert!(matches!(
            extract_cv_text(DocumentKind::Docx, b"not a zip"),
            Err(ExtractionError::Docx(_))
        ));
        assert!(matches!(
            extract_cv_text(DocumentKind::Pdf, b"not a pdf"),
            Err(ExtractionError::Pdf(_))
        ));
    }

    #[test]
    fn test_plain_text_is_trimmed() {
        let text = extract_cv_text(DocumentKind::PlainText, b"\n  Jane Doe\nEngineer \n").unwrap();
        assert_eq!(text, "Jane Doe\nEngineer");
        assert!(matches!(
            extract_cv_text(DocumentKind::PlainText, b" \n\t"),
            Err(ExtractionError::NoText)
        ));
    }

    #[test]
    fn test_extract_file_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.odt");
        std::fs::write(&path, "text").unwrap();
        assert!(matches!(extract_file(&path), Err(ExtractionError::Unsupported)));

        let path = dir.path().join("cv.txt");
        std::fs::write(&path, "Jane Doe").unwrap();
        assert_eq!(extract_file(&path).unwrap(), "Jane Doe");
    }
}

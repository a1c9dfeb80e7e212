//! Text Extractor: turns an uploaded PDF/DOCX into raw text.
//!
//! The upload is staged in a scoped temp file for the duration of one
//! extraction. The file is removed when the guard drops, on every exit path.

use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;
use zip::ZipArchive;

use crate::parsing::error::ParseError;

/// Extensions accepted for upload, lowercase with the leading dot.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = [".pdf", ".docx", ".doc"];

const DOCX_BODY_PART: &str = "word/document.xml";
const DOCX_HEADER_STEM: &str = "word/header";
const DOCX_FOOTER_STEM: &str = "word/footer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    /// `.docx`, and `.doc` routed through the same reader.
    WordProcessing,
}

impl DocumentKind {
    /// Dispatches on the filename's extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Result<Self, ParseError> {
        let extension = file_extension(filename);
        match extension.as_str() {
            ".pdf" => Ok(DocumentKind::Pdf),
            ".docx" | ".doc" => Ok(DocumentKind::WordProcessing),
            _ => Err(ParseError::UnsupportedFormat {
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    extension
                },
            }),
        }
    }
}

/// Lowercased extension with its leading dot, or an empty string.
pub fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Extracts the text of `bytes`, interpreted according to `filename`'s extension.
///
/// Unsupported extensions fail before anything touches the disk. Otherwise the
/// bytes are written to a temp file under `scratch_dir` which is deleted when
/// this function returns.
pub fn extract(bytes: &[u8], filename: &str, scratch_dir: &Path) -> Result<String, ParseError> {
    let kind = DocumentKind::from_filename(filename)?;

    let mut staged = tempfile::Builder::new()
        .prefix("cvfiller-")
        .suffix(&file_extension(filename))
        .tempfile_in(scratch_dir)
        .map_err(|e| ParseError::ExtractionFailed(format!("could not stage upload: {e}")))?;
    staged
        .write_all(bytes)
        .and_then(|_| staged.flush())
        .map_err(|e| ParseError::ExtractionFailed(format!("could not stage upload: {e}")))?;

    debug!("Staged {} bytes at {}", bytes.len(), staged.path().display());

    match kind {
        DocumentKind::Pdf => extract_pdf(staged.path()),
        DocumentKind::WordProcessing => extract_docx(staged.path()),
    }
}

/// Page texts in document order, concatenated as the PDF library yields them.
fn extract_pdf(path: &Path) -> Result<String, ParseError> {
    pdf_extract::extract_text(path)
        .map_err(|e| ParseError::ExtractionFailed(format!("unreadable PDF: {e}")))
}

/// Header parts, then the body, then footer parts, each flattened in turn.
fn extract_docx(path: &Path) -> Result<String, ParseError> {
    let file = File::open(path)
        .map_err(|e| ParseError::ExtractionFailed(format!("could not reopen upload: {e}")))?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| ParseError::ExtractionFailed(format!("not a DOCX container: {e}")))?;

    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    let headers = numbered_parts(&names, DOCX_HEADER_STEM);
    let footers = numbered_parts(&names, DOCX_FOOTER_STEM);

    let mut text = String::new();
    for part in headers
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(DOCX_BODY_PART))
        .chain(footers.iter().map(String::as_str))
    {
        text.push_str(&part_text(&mut archive, part)?);
    }
    Ok(text)
}

/// `word/header1.xml`, `word/header2.xml`, ... in numeric order.
fn numbered_parts(names: &[String], stem: &str) -> Vec<String> {
    let mut parts: Vec<&String> = names
        .iter()
        .filter(|name| {
            name.strip_prefix(stem)
                .and_then(|rest| rest.strip_suffix(".xml"))
                .is_some_and(|number| number.chars().all(|c| c.is_ascii_digit()))
        })
        .collect();
    parts.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    parts.into_iter().cloned().collect()
}

fn part_text<R: Read + Seek>(archive: &mut ZipArchive<R>, part: &str) -> Result<String, ParseError> {
    let mut xml = String::new();
    archive
        .by_name(part)
        .map_err(|e| ParseError::ExtractionFailed(format!("missing {part}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ParseError::ExtractionFailed(format!("unreadable {part}: {e}")))?;

    document_xml_to_text(&xml)
        .map_err(|e| ParseError::ExtractionFailed(format!("malformed {part}: {e}")))
}

/// Flattens WordprocessingML into text: runs in order, tabs and breaks kept,
/// one newline per paragraph.
fn document_xml_to_text(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" | b"p" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => text.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

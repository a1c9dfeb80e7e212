//! In-memory document fixtures shared by the parsing and routing tests.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// A ZIP archive holding `(name, content)` entries in the given order.
pub fn zip_with_entries(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn zip_with_entry(name: &str, content: &str) -> Vec<u8> {
    zip_with_entries(&[(name, content)])
}

/// One `<w:p>` per entry; each entry is the paragraph's inner run XML.
fn paragraphs_xml(paragraphs: &[&str]) -> String {
    paragraphs
        .iter()
        .map(|runs| format!("<w:p>{runs}</w:p>"))
        .collect()
}

fn document_xml(paragraphs: &[&str]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{WORDPROCESSING_NS}"><w:body>{}</w:body></w:document>"#,
        paragraphs_xml(paragraphs)
    )
}

/// `root` is `hdr` or `ftr`.
fn header_footer_xml(root: &str, paragraphs: &[&str]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:{root} xmlns:w="{WORDPROCESSING_NS}">{}</w:{root}>"#,
        paragraphs_xml(paragraphs)
    )
}

/// A minimal DOCX whose body holds one `<w:p>` per entry of `paragraphs`
/// (each entry is the paragraph's inner run XML).
pub fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
    zip_with_entry("word/document.xml", &document_xml(paragraphs))
}

/// A minimal DOCX with one single-run paragraph per line of plain text.
pub fn docx_with_lines(lines: &[&str]) -> Vec<u8> {
    let runs: Vec<String> = lines
        .iter()
        .map(|line| format!("<w:r><w:t>{line}</w:t></w:r>"))
        .collect();
    let runs: Vec<&str> = runs.iter().map(String::as_str).collect();
    docx_with_paragraphs(&runs)
}

/// A DOCX with `word/header1.xml` and `word/footer1.xml` parts around the body.
/// The footer entry is written before the body and the header last, so
/// readers cannot rely on archive order.
pub fn docx_with_header_and_footer(header: &[&str], body: &[&str], footer: &[&str]) -> Vec<u8> {
    let footer = header_footer_xml("ftr", footer);
    let body = document_xml(body);
    let header = header_footer_xml("hdr", header);
    zip_with_entries(&[
        ("word/footer1.xml", footer.as_str()),
        ("word/document.xml", body.as_str()),
        ("word/header1.xml", header.as_str()),
    ])
}

/// A one-page PDF drawing `text` in Helvetica. `text` must be plain ASCII
/// without parentheses or backslashes.
pub fn one_page_pdf(text: &str) -> Vec<u8> {
    single_page_pdf(
        &format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET"),
        vec![
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ],
    )
}

/// A one-page PDF drawing `text` with a Type0 font under Identity-H, where
/// each code is the character's UTF-16 unit and a ToUnicode CMap maps it
/// back. `text` must stay within the BMP and hold at most 100 distinct chars.
pub fn one_page_cjk_pdf(text: &str) -> Vec<u8> {
    let units: Vec<u16> = text.encode_utf16().collect();
    let shown: String = units.iter().map(|unit| format!("{unit:04X}")).collect();

    let mut distinct = units.clone();
    distinct.sort_unstable();
    distinct.dedup();
    let mappings: String = distinct
        .iter()
        .map(|unit| format!("<{unit:04X}> <{unit:04X}>\n"))
        .collect();
    let to_unicode = format!(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n\
         {} beginbfchar\n\
         {mappings}endbfchar\n\
         endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end",
        distinct.len()
    );

    single_page_pdf(
        &format!("BT /F1 12 Tf 72 720 Td <{shown}> Tj ET"),
        vec![
            "<< /Type /Font /Subtype /Type0 /BaseFont /CvfillerCJK /Encoding /Identity-H \
             /DescendantFonts [6 0 R] /ToUnicode 8 0 R >>"
                .to_string(),
            "<< /Type /Font /Subtype /CIDFontType2 /BaseFont /CvfillerCJK \
             /CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> \
             /FontDescriptor 7 0 R /DW 1000 >>"
                .to_string(),
            "<< /Type /FontDescriptor /FontName /CvfillerCJK /Flags 4 \
             /FontBBox [0 -120 1000 880] /ItalicAngle 0 /Ascent 880 /Descent -120 \
             /CapHeight 700 /StemV 80 >>"
                .to_string(),
            stream_object(&to_unicode),
        ],
    )
}

fn stream_object(content: &str) -> String {
    format!(
        "<< /Length {} >>\nstream\n{}\nendstream",
        content.len(),
        content
    )
}

/// Objects 1-4 are catalog, page tree, page and content; `font_objects`
/// follow from object 5, which the page uses as `/F1`.
fn single_page_pdf(content: &str, font_objects: Vec<String>) -> Vec<u8> {
    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
            .to_string(),
        stream_object(content),
    ];
    objects.extend(font_objects);

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", index + 1, object).as_bytes());
    }

    let xref_offset = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    pdf
}

//! Minimal `.docx` authoring.
//!
//! [`DocumentBuilder`] appends paragraphs (title, headings, body text,
//! label/value lines) and emits a complete package with an A4 section.

use crate::package::{DocxPackage, CONTENT_TYPES_PART, DOCUMENT_PART, DOCUMENT_RELS_PART};
use crate::xml::run_text;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#;

const DOCUMENT_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>"#;

/// A4 portrait with 2.54 cm margins.
const SECTION_XML: &str = r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr>"#;

const DOCUMENT_CLOSE: &str = "</w:body></w:document>";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Justify,
}

#[derive(Debug, Clone, Copy, Default)]
struct RunStyle {
    bold: bool,
    /// Font size in half-points.
    size: Option<u32>,
}

#[derive(Debug, Clone)]
struct Paragraph {
    align: Alignment,
    runs: Vec<(String, RunStyle)>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    paragraphs: Vec<Paragraph>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Large, bold, centred line.
    pub fn title(self, text: &str) -> Self {
        self.push(
            Alignment::Center,
            vec![(text.to_string(), RunStyle { bold: true, size: Some(32) })],
        )
    }

    pub fn heading(self, text: &str) -> Self {
        self.push(
            Alignment::Left,
            vec![(text.to_string(), RunStyle { bold: true, size: Some(26) })],
        )
    }

    /// Justified body text. `\n` produces line breaks.
    pub fn paragraph(self, text: &str) -> Self {
        self.push(Alignment::Justify, vec![(text.to_string(), RunStyle::default())])
    }

    pub fn centered(self, text: &str) -> Self {
        self.push(Alignment::Center, vec![(text.to_string(), RunStyle::default())])
    }

    /// `Label: value` with the label in bold.
    pub fn labeled(self, label: &str, value: &str) -> Self {
        self.push(
            Alignment::Left,
            vec![
                (format!("{label}: "), RunStyle { bold: true, size: None }),
                (value.to_string(), RunStyle::default()),
            ],
        )
    }

    pub fn blank(self) -> Self {
        self.push(Alignment::Left, Vec::new())
    }

    fn push(mut self, align: Alignment, runs: Vec<(String, RunStyle)>) -> Self {
        self.paragraphs.push(Paragraph { align, runs });
        self
    }

    /// The `word/document.xml` content.
    pub fn document_xml(&self) -> String {
        let mut xml = String::from(DOCUMENT_OPEN);
        for paragraph in &self.paragraphs {
            xml.push_str(&paragraph_xml(paragraph));
        }
        xml.push_str(SECTION_XML);
        xml.push_str(DOCUMENT_CLOSE);
        xml
    }

    pub fn build(&self) -> DocxPackage {
        let mut package = DocxPackage::default();
        package.set_part(CONTENT_TYPES_PART, CONTENT_TYPES_XML.as_bytes().to_vec());
        package.set_part("_rels/.rels", ROOT_RELS_XML.as_bytes().to_vec());
        package.set_part(DOCUMENT_PART, self.document_xml().into_bytes());
        package.set_part(DOCUMENT_RELS_PART, DOCUMENT_RELS_XML.as_bytes().to_vec());
        package
    }
}

fn paragraph_xml(paragraph: &Paragraph) -> String {
    let mut xml = String::from("<w:p>");
    match paragraph.align {
        Alignment::Left => {}
        Alignment::Center => xml.push_str(r#"<w:pPr><w:jc w:val="center"/></w:pPr>"#),
        Alignment::Justify => xml.push_str(r#"<w:pPr><w:jc w:val="both"/></w:pPr>"#),
    }
    for (text, style) in &paragraph.runs {
        xml.push_str("<w:r>");
        if style.bold || style.size.is_some() {
            xml.push_str("<w:rPr>");
            if style.bold {
                xml.push_str("<w:b/>");
            }
            if let Some(size) = style.size {
                xml.push_str(&format!(r#"<w:sz w:val="{size}"/>"#));
            }
            xml.push_str("</w:rPr>");
        }
        xml.push_str(&format!(r#"<w:t xml:space="preserve">{}</w:t>"#, run_text(text)));
        xml.push_str("</w:r>");
    }
    xml.push_str("</w:p>");
    xml
}

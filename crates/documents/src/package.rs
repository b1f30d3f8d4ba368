//! In-memory `.docx` package.
//!
//! Parts are kept in archive order so a read-modify-write cycle produces a
//! package Word still opens; `[Content_Types].xml` stays first.

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::DocumentError;

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    parts: Vec<(String, Vec<u8>)>,
}

impl DocxPackage {
    /// Read a package from the bytes of a `.docx` file.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            parts.push((file.name().to_string(), data));
        }

        let package = Self { parts };
        if package.part(DOCUMENT_PART).is_none() {
            return Err(DocumentError::MissingPart(DOCUMENT_PART.to_string()));
        }
        Ok(package)
    }

    /// Serialise the package as a deflated zip archive.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, data) in &self.parts {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(data)?;
        }
        Ok(writer.finish()?.into_inner())
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }

    /// A part decoded as UTF-8 XML.
    pub fn xml_part(&self, name: &str) -> Result<&str, DocumentError> {
        let data = self
            .part(name)
            .ok_or_else(|| DocumentError::MissingPart(name.to_string()))?;
        std::str::from_utf8(data).map_err(|_| DocumentError::Encoding(name.to_string()))
    }

    /// Insert or replace a part, keeping the position of an existing one.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = data,
            None => self.parts.push((name.to_string(), data)),
        }
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(n, _)| n.as_str())
    }

    /// Parts whose paragraphs carry visible text: the body, headers, and
    /// footers.
    pub fn text_part_names(&self) -> Vec<String> {
        self.part_names()
            .filter(|n| {
                *n == DOCUMENT_PART
                    || (n.starts_with("word/header") && n.ends_with(".xml"))
                    || (n.starts_with("word/footer") && n.ends_with(".xml"))
            })
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DocumentBuilder;

    #[test]
    fn round_trips_through_zip() {
        let package = DocumentBuilder::new().paragraph("Hola").build();
        let bytes = package.to_bytes().unwrap();
        let read = DocxPackage::from_bytes(&bytes).unwrap();

        let names: Vec<_> = read.part_names().collect();
        assert_eq!(names.first(), Some(&CONTENT_TYPES_PART));
        assert!(read.xml_part(DOCUMENT_PART).unwrap().contains("Hola"));
    }

    #[test]
    fn rejects_non_docx_archives() {
        assert!(matches!(
            DocxPackage::from_bytes(b"plain text"),
            Err(DocumentError::Zip(_))
        ));

        let mut other = DocxPackage::default();
        other.set_part("readme.txt", b"x".to_vec());
        let bytes = other.to_bytes().unwrap();
        assert!(matches!(
            DocxPackage::from_bytes(&bytes),
            Err(DocumentError::MissingPart(_))
        ));
    }

    #[test]
    fn set_part_replaces_in_place() {
        let mut package = DocumentBuilder::new().build();
        let before: Vec<String> = package.part_names().map(str::to_string).collect();
        package.set_part(DOCUMENT_PART, b"<w:document/>".to_vec());
        let after: Vec<String> = package.part_names().map(str::to_string).collect();
        assert_eq!(before, after);
        assert_eq!(package.part(DOCUMENT_PART), Some(&b"<w:document/>"[..]));
    }
}

//! Header picture embedding.
//!
//! The picture is stored as a media part, referenced from the document
//! relationships, and shown inline, centred, in a new first paragraph of the
//! body. Wide images are scaled down to the text width.

use std::io::Cursor;
use std::sync::LazyLock;

use image::{ImageFormat, ImageReader};
use regex::Regex;

use crate::error::DocumentError;
use crate::package::{DocxPackage, CONTENT_TYPES_PART, DOCUMENT_PART, DOCUMENT_RELS_PART};

/// Largest header image accepted, in bytes.
pub const MAX_HEADER_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// EMUs per pixel at 96 dpi.
const EMU_PER_PX: u64 = 9525;

/// Text width of an A4 page with 2.54 cm margins (6.27 in), in EMUs.
const MAX_WIDTH_EMU: u64 = 5_733_288;

const RELATIONSHIP_ID: &str = "rIdMediarHeader";

static BODY_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<w:body(?:\s[^>]*)?>").expect("valid regex"));

#[derive(Debug, Clone)]
pub struct HeaderImage {
    bytes: Vec<u8>,
    format: ImageFormat,
    width: u32,
    height: u32,
}

impl HeaderImage {
    /// Sniff the format (PNG or JPEG) and read the pixel dimensions.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, DocumentError> {
        if bytes.len() > MAX_HEADER_IMAGE_BYTES {
            return Err(DocumentError::Image(format!(
                "{} bytes exceeds the {MAX_HEADER_IMAGE_BYTES} byte limit",
                bytes.len()
            )));
        }
        let format =
            image::guess_format(&bytes).map_err(|e| DocumentError::Image(e.to_string()))?;
        if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
            return Err(DocumentError::Image(format!("{format:?} is not PNG or JPEG")));
        }
        let (width, height) = ImageReader::with_format(Cursor::new(&bytes), format)
            .into_dimensions()
            .map_err(|e| DocumentError::Image(e.to_string()))?;
        if width == 0 || height == 0 {
            return Err(DocumentError::Image("empty image".to_string()));
        }
        Ok(Self {
            bytes,
            format,
            width,
            height,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn extension(&self) -> &'static str {
        match self.format {
            ImageFormat::Png => "png",
            _ => "jpeg",
        }
    }

    fn content_type(&self) -> &'static str {
        match self.format {
            ImageFormat::Png => "image/png",
            _ => "image/jpeg",
        }
    }

    /// Display size in EMUs, capped at the text width, aspect preserved.
    fn extent_emu(&self) -> (u64, u64) {
        let cx = u64::from(self.width) * EMU_PER_PX;
        let cy = u64::from(self.height) * EMU_PER_PX;
        if cx <= MAX_WIDTH_EMU {
            (cx, cy)
        } else {
            (MAX_WIDTH_EMU, cy * MAX_WIDTH_EMU / cx)
        }
    }
}

/// Embed `image` as the first paragraph of the document body.
pub fn embed_header_image(
    package: &mut DocxPackage,
    image: &HeaderImage,
) -> Result<(), DocumentError> {
    let media_name = format!("mediar_header.{}", image.extension());
    package.set_part(&format!("word/media/{media_name}"), image.bytes.clone());

    let rels = match package.part(DOCUMENT_RELS_PART) {
        Some(_) => package.xml_part(DOCUMENT_RELS_PART)?.to_string(),
        None => r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#
            .to_string(),
    };
    if !rels.contains(&format!(r#"Id="{RELATIONSHIP_ID}""#)) {
        let relationship = format!(
            r#"<Relationship Id="{RELATIONSHIP_ID}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/{media_name}"/>"#
        );
        let rels = insert_before_close(&rels, "</Relationships>", &relationship)?;
        package.set_part(DOCUMENT_RELS_PART, rels.into_bytes());
    }

    let types = package.xml_part(CONTENT_TYPES_PART)?.to_string();
    let extension = image.extension();
    if !types.contains(&format!(r#"Extension="{extension}""#)) {
        let default = format!(
            r#"<Default Extension="{extension}" ContentType="{}"/>"#,
            image.content_type()
        );
        let types = insert_before_close(&types, "</Types>", &default)?;
        package.set_part(CONTENT_TYPES_PART, types.into_bytes());
    }

    let document = package.xml_part(DOCUMENT_PART)?;
    let body = BODY_OPEN_RE
        .find(document)
        .ok_or_else(|| DocumentError::MissingPart("w:body".to_string()))?;
    let (cx, cy) = image.extent_emu();
    let mut updated = String::with_capacity(document.len() + 1500);
    updated.push_str(&document[..body.end()]);
    updated.push_str(&drawing_paragraph(&media_name, cx, cy));
    updated.push_str(&document[body.end()..]);
    package.set_part(DOCUMENT_PART, updated.into_bytes());

    tracing::debug!(width = image.width, height = image.height, "Embedded header image");
    Ok(())
}

fn insert_before_close(xml: &str, close: &str, fragment: &str) -> Result<String, DocumentError> {
    let at = xml
        .rfind(close)
        .ok_or_else(|| DocumentError::MissingPart(close.to_string()))?;
    Ok(format!("{}{fragment}{}", &xml[..at], &xml[at..]))
}

fn drawing_paragraph(media_name: &str, cx: u64, cy: u64) -> String {
    format!(
        r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"><wp:extent cx="{cx}" cy="{cy}"/><wp:docPr id="9001" name="Encabezado"/><a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:nvPicPr><pic:cNvPr id="0" name="{media_name}"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="{RELATIONSHIP_ID}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::builder::DocumentBuilder;
    use crate::xml::paragraphs;

    /// A valid 1x1 PNG.
    pub(crate) const PIXEL_PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0xDA, 0x63, 0x64,
        0x60, 0xF8, 0x5F, 0x0F, 0x00, 0x02, 0x87, 0x01, 0x80, 0xEB, 0x47, 0xBA, 0x92, 0x00, 0x00,
        0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn reads_png_dimensions() {
        let image = HeaderImage::from_bytes(PIXEL_PNG.to_vec()).unwrap();
        assert_eq!(image.dimensions(), (1, 1));
        assert_eq!(image.extent_emu(), (EMU_PER_PX, EMU_PER_PX));
    }

    #[test]
    fn rejects_non_images() {
        assert!(matches!(
            HeaderImage::from_bytes(b"<html></html>".to_vec()),
            Err(DocumentError::Image(_))
        ));
    }

    #[test]
    fn wide_images_are_scaled_to_text_width() {
        let image = HeaderImage {
            bytes: Vec::new(),
            format: ImageFormat::Png,
            width: 2000,
            height: 500,
        };
        let (cx, cy) = image.extent_emu();
        assert_eq!(cx, MAX_WIDTH_EMU);
        assert_eq!(cy, MAX_WIDTH_EMU / 4);
    }

    #[test]
    fn embeds_as_first_paragraph_with_relationship() {
        let mut package = DocumentBuilder::new().title("ACTA").build();
        let image = HeaderImage::from_bytes(PIXEL_PNG.to_vec()).unwrap();
        embed_header_image(&mut package, &image).unwrap();

        assert_eq!(package.part("word/media/mediar_header.png"), Some(PIXEL_PNG));
        let rels = package.xml_part(DOCUMENT_RELS_PART).unwrap();
        assert!(rels.contains(r#"Target="media/mediar_header.png""#));
        let types = package.xml_part(CONTENT_TYPES_PART).unwrap();
        assert!(types.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));

        let document = package.xml_part(DOCUMENT_PART).unwrap();
        let drawing = document.find("<w:drawing>").unwrap();
        let title = document.find("ACTA").unwrap();
        assert!(drawing < title);
        assert_eq!(paragraphs(document), vec!["", "ACTA"]);
    }
}

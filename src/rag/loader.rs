//! PDF loading.
//!
//! Uploaded bytes are written to a named temporary file, parsed with `lopdf`
//! and returned as one text entry per page. The temporary file is removed
//! when it goes out of scope, including on error paths.

use std::io::Write;
use std::path::Path;

use lopdf::Document;

use crate::core::errors::RagError;

/// Text of a single PDF page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageText {
    /// 1-based page number
    pub page: u32,
    pub text: String,
}

pub fn load_pdf_pages(bytes: &[u8]) -> Result<Vec<PageText>, RagError> {
    load_pdf_pages_in(&std::env::temp_dir(), bytes)
}

/// Same as [`load_pdf_pages`], with the temporary file created in `dir`.
pub fn load_pdf_pages_in(dir: &Path, bytes: &[u8]) -> Result<Vec<PageText>, RagError> {
    if bytes.is_empty() {
        return Err(RagError::Ingestion("uploaded file is empty".to_string()));
    }

    let mut file = tempfile::Builder::new()
        .prefix("temp_")
        .suffix(".pdf")
        .tempfile_in(dir)
        .map_err(|e| RagError::Ingestion(format!("failed to create temp file: {}", e)))?;
    file.write_all(bytes)
        .and_then(|_| file.flush())
        .map_err(|e| RagError::Ingestion(format!("failed to write temp file: {}", e)))?;

    let document = Document::load(file.path())
        .map_err(|e| RagError::Ingestion(format!("failed to parse PDF: {}", e)))?;

    if document.is_encrypted() {
        return Err(RagError::Ingestion("encrypted PDFs are not supported".to_string()));
    }

    let mut pages = Vec::new();
    for page_number in document.get_pages().into_keys() {
        match document.extract_text(&[page_number]) {
            Ok(text) => pages.push(PageText {
                page: page_number,
                text,
            }),
            Err(e) => {
                tracing::warn!("Skipping page {}: text extraction failed: {}", page_number, e);
            }
        }
    }

    Ok(pages)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds an in-memory PDF with one page per entry of `page_texts`.
    pub fn pdf_with_pages(page_texts: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids = Vec::new();
        for text in page_texts {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let encoded = content.encode().unwrap();
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::from(page_id));
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::pdf_with_pages;
    use super::*;

    #[test]
    fn extracts_text_per_page() {
        let bytes = pdf_with_pages(&["hello world", "second page"]);
        let pages = load_pdf_pages(&bytes).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page, 1);
        assert!(pages[0].text.contains("hello world"));
        assert_eq!(pages[1].page, 2);
        assert!(pages[1].text.contains("second page"));
    }

    #[test]
    fn empty_upload_is_an_ingestion_error() {
        let err = load_pdf_pages(&[]).unwrap_err();
        assert!(matches!(err, RagError::Ingestion(_)));
    }

    fn entries(dir: &tempfile::TempDir) -> usize {
        std::fs::read_dir(dir.path()).unwrap().count()
    }

    #[test]
    fn temp_file_is_removed_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let pages = load_pdf_pages_in(dir.path(), &pdf_with_pages(&["hello world"])).unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(entries(&dir), 0);
    }

    #[test]
    fn temp_file_is_removed_after_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_pdf_pages_in(dir.path(), b"not a pdf").unwrap_err();

        assert!(matches!(err, RagError::Ingestion(_)));
        assert_eq!(entries(&dir), 0);
    }

    #[test]
    fn non_pdf_bytes_are_an_ingestion_error() {
        let err = load_pdf_pages(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, RagError::Ingestion(msg) if msg.contains("parse")));
    }
}

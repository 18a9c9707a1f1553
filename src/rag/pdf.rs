use lopdf::Document;

use crate::core::errors::ApiError;

/// Per-page text extraction from an uploaded document.
pub trait PageExtractor: Send + Sync {
    /// One entry per page, in page order. Pages without decodable text are
    /// returned as empty strings rather than errors.
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ApiError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfExtractor;

impl PageExtractor for LopdfExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ApiError> {
        let document = Document::load_mem(bytes)
            .map_err(|err| ApiError::Internal(format!("Failed to read PDF: {}", err)))?;

        let pages = document
            .get_pages()
            .keys()
            .map(|&page_number| {
                document.extract_text(&[page_number]).unwrap_or_else(|err| {
                    tracing::debug!("No extractable text on page {}: {}", page_number, err);
                    String::new()
                })
            })
            .collect();

        Ok(pages)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    use super::*;

    /// Builds a PDF with one page per entry; `None` pages carry no text.
    pub(crate) fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
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

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let operations = match text {
                Some(text) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
                None => Vec::new(),
            };
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn extracts_text_per_page_in_order() {
        let bytes = build_pdf(&[Some("Hello World"), None, Some("Third page")]);
        let pages = LopdfExtractor.extract_pages(&bytes).unwrap();

        assert_eq!(pages.len(), 3);
        assert!(pages[0].contains("Hello World"));
        assert!(pages[1].trim().is_empty());
        assert!(pages[2].contains("Third page"));
    }

    #[test]
    fn garbage_bytes_are_an_error() {
        let err = LopdfExtractor
            .extract_pages(b"definitely not a pdf")
            .unwrap_err();
        assert!(err.message().starts_with("Failed to read PDF"));
    }
}

//! Paginated page-image ingestion.
//!
//! The alternate input path: a document with no container structure, just
//! pages that an external collaborator can rasterize and (optionally) read
//! a text layer from. Each page becomes one slide holding a single
//! full-bleed image element; extracted text lands in the slide notes. When
//! the native text layer is too thin to be useful, an optional OCR
//! collaborator is consulted instead, and its output is prefixed so
//! downstream consumers can tell the two apart.

use bytes::Bytes;

use crate::common::Result;
use crate::common::unit::{PAGE_HEIGHT_EMU, PAGE_WIDTH_EMU};
use crate::model::{
    Background, ElementCommon, ImageElement, ImageSource, Metadata, Position, Presentation, Size,
    Slide, SlideElement, fresh_id,
};

/// Native text layers shorter than this are considered empty enough to
/// hand the page to OCR.
const OCR_TEXT_THRESHOLD: usize = 10;

/// Prefix marking recognized (rather than natively extracted) text.
const OCR_PREFIX: &str = "[OCR] ";

/// One rasterized page.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub data: Bytes,
    pub mime: String,
    /// Rendered pixel dimensions
    pub width: f64,
    pub height: f64,
}

/// A paginated document the host knows how to rasterize and read.
pub trait PageDocument {
    fn page_count(&self) -> usize;

    /// Rasterize one page. A failure here aborts the import.
    fn render_page(&self, index: usize) -> Result<PageImage>;

    /// The page's native text layer, empty when the page has none.
    fn page_text(&self, index: usize) -> Result<String>;
}

/// External text-recognition collaborator.
pub trait OcrEngine {
    fn recognize(&self, image: &PageImage) -> Result<String>;
}

/// Switches for [`import_paged_document`].
#[derive(Debug, Clone)]
pub struct PagedImportOptions {
    /// Hard cap on imported pages
    pub max_pages: usize,
    /// Read the native text layer into slide notes
    pub extract_text: bool,
    /// Consult the OCR collaborator when the text layer is too thin
    pub use_ocr: bool,
}

impl Default for PagedImportOptions {
    fn default() -> Self {
        Self {
            max_pages: 100,
            extract_text: true,
            use_ocr: true,
        }
    }
}

/// Import a paginated document, one slide per page in ascending page
/// order.
///
/// Every slide gets a white background and a single image element
/// covering the full page at z-index 0. OCR failures are tolerated (the
/// page keeps whatever native text it had); rasterization failures are
/// not.
pub fn import_paged_document(
    doc: &dyn PageDocument,
    ocr: Option<&dyn OcrEngine>,
    options: &PagedImportOptions,
) -> Result<Presentation> {
    let page_count = doc.page_count().min(options.max_pages);
    let mut slides = Vec::with_capacity(page_count);

    for index in 0..page_count {
        let image = doc.render_page(index)?;
        let notes = if options.extract_text {
            extract_page_text(doc, ocr, index, &image, options)
        } else {
            None
        };

        slides.push(Slide {
            id: fresh_id("slide"),
            index,
            elements: vec![full_bleed_image(index, image)],
            background: Some(Background::Solid {
                color: "#FFFFFF".to_string(),
            }),
            notes,
            transition: None,
        });
    }

    if slides.is_empty() {
        slides.push(Slide::blank(0));
    }

    Ok(Presentation {
        title: "Imported Document".to_string(),
        slides,
        theme: None,
        metadata: Some(Metadata {
            author: None,
            page_width: Some(PAGE_WIDTH_EMU),
            page_height: Some(PAGE_HEIGHT_EMU),
        }),
    })
}

fn extract_page_text(
    doc: &dyn PageDocument,
    ocr: Option<&dyn OcrEngine>,
    index: usize,
    image: &PageImage,
    options: &PagedImportOptions,
) -> Option<String> {
    let native = doc.page_text(index).unwrap_or_default();
    let native = native.trim().to_string();

    if native.len() < OCR_TEXT_THRESHOLD
        && options.use_ocr
        && let Some(engine) = ocr
    {
        match engine.recognize(image) {
            Ok(recognized) => {
                let recognized = recognized.trim();
                if !recognized.is_empty() {
                    return Some(format!("{}{}", OCR_PREFIX, recognized));
                }
            },
            Err(e) => {
                tracing::debug!(page = index, error = %e, "ocr failed, keeping native text");
            },
        }
    }

    if native.is_empty() { None } else { Some(native) }
}

fn full_bleed_image(index: usize, image: PageImage) -> SlideElement {
    SlideElement::Image(ImageElement {
        common: ElementCommon {
            id: format!("image-{}-0", index),
            position: Position::from_emu(0, 0),
            size: Size::from_emu(PAGE_WIDTH_EMU, PAGE_HEIGHT_EMU),
            rotation: 0.0,
            z_index: 0,
            locked: None,
            name: Some(format!("page {}", index + 1)),
        },
        src: ImageSource::Embedded {
            data: image.data,
            mime: image.mime,
        },
        original_width: Some(image.width),
        original_height: Some(image.height),
        crop: None,
        filters: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;

    struct StubDocument {
        texts: Vec<&'static str>,
    }

    impl PageDocument for StubDocument {
        fn page_count(&self) -> usize {
            self.texts.len()
        }

        fn render_page(&self, _index: usize) -> Result<PageImage> {
            Ok(PageImage {
                data: Bytes::from_static(b"raster"),
                mime: "image/png".to_string(),
                width: 960.0,
                height: 720.0,
            })
        }

        fn page_text(&self, index: usize) -> Result<String> {
            Ok(self.texts[index].to_string())
        }
    }

    struct StubOcr {
        output: &'static str,
    }

    impl OcrEngine for StubOcr {
        fn recognize(&self, _image: &PageImage) -> Result<String> {
            Ok(self.output.to_string())
        }
    }

    struct FailingOcr;

    impl OcrEngine for FailingOcr {
        fn recognize(&self, _image: &PageImage) -> Result<String> {
            Err(Error::Other("ocr backend offline".to_string()))
        }
    }

    #[test]
    fn test_one_slide_per_page_with_full_bleed_image() {
        let doc = StubDocument {
            texts: vec!["This page has plenty of native text.", "Another page of text."],
        };
        let pres = import_paged_document(&doc, None, &PagedImportOptions::default()).unwrap();

        assert_eq!(pres.slides.len(), 2);
        for (i, slide) in pres.slides.iter().enumerate() {
            assert_eq!(slide.index, i);
            assert_eq!(slide.elements.len(), 1);
            assert_eq!(
                slide.background,
                Some(Background::Solid {
                    color: "#FFFFFF".to_string()
                })
            );
            let common = slide.elements[0].common();
            assert_eq!(common.z_index, 0);
            assert_eq!(common.position.x, 0);
            assert_eq!(common.size.width, PAGE_WIDTH_EMU);
            assert_eq!(common.size.height, PAGE_HEIGHT_EMU);
        }
    }

    #[test]
    fn test_native_text_goes_to_notes() {
        let doc = StubDocument {
            texts: vec!["This page has plenty of native text."],
        };
        let pres = import_paged_document(&doc, None, &PagedImportOptions::default()).unwrap();
        assert_eq!(
            pres.slides[0].notes.as_deref(),
            Some("This page has plenty of native text.")
        );
    }

    #[test]
    fn test_thin_text_layer_triggers_ocr_with_prefix() {
        let doc = StubDocument { texts: vec!["hi"] };
        let ocr = StubOcr {
            output: "Recognized heading",
        };
        let pres =
            import_paged_document(&doc, Some(&ocr), &PagedImportOptions::default()).unwrap();
        assert_eq!(
            pres.slides[0].notes.as_deref(),
            Some("[OCR] Recognized heading")
        );
    }

    #[test]
    fn test_rich_text_layer_skips_ocr() {
        let doc = StubDocument {
            texts: vec!["Long enough native text layer."],
        };
        let ocr = StubOcr {
            output: "should not be used",
        };
        let pres =
            import_paged_document(&doc, Some(&ocr), &PagedImportOptions::default()).unwrap();
        assert!(!pres.slides[0].notes.as_deref().unwrap().starts_with("[OCR]"));
    }

    #[test]
    fn test_ocr_failure_keeps_native_text() {
        let doc = StubDocument { texts: vec!["hi"] };
        let pres =
            import_paged_document(&doc, Some(&FailingOcr), &PagedImportOptions::default()).unwrap();
        assert_eq!(pres.slides[0].notes.as_deref(), Some("hi"));
    }

    #[test]
    fn test_max_pages_cap() {
        let doc = StubDocument {
            texts: vec!["a", "b", "c", "d"],
        };
        let options = PagedImportOptions {
            max_pages: 2,
            ..Default::default()
        };
        let pres = import_paged_document(&doc, None, &options).unwrap();
        assert_eq!(pres.slides.len(), 2);
    }

    #[test]
    fn test_empty_document_yields_blank_slide() {
        let doc = StubDocument { texts: vec![] };
        let pres = import_paged_document(&doc, None, &PagedImportOptions::default()).unwrap();
        assert_eq!(pres.slides.len(), 1);
        assert!(pres.slides[0].elements.is_empty());
    }

    #[test]
    fn test_extract_text_disabled() {
        let doc = StubDocument { texts: vec!["hi"] };
        let options = PagedImportOptions {
            extract_text: false,
            ..Default::default()
        };
        let ocr = StubOcr { output: "unused" };
        let pres = import_paged_document(&doc, Some(&ocr), &options).unwrap();
        assert!(pres.slides[0].notes.is_none());
    }
}

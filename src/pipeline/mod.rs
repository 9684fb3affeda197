//! End-to-end form filling.
//!
//! ```text
//! DynamicImage[]
//!     ↓
//! [FieldNameSource] (once per document → FieldLabel[])
//!     ↓
//! per page: [TextDetector] → Token[]
//!           [Correlator]   → Correlation[]
//!           [Resolver]     → Resolution[]
//!           [OverlayRenderer] → filled page
//!     ↓
//! [write_pdf] (filled pages → PDF file)
//! ```
//!
//! Pages share nothing but the read-only field list, so callers that want
//! parallelism can drive [`FormFiller::fill_page`] themselves and keep the
//! results in page order.

use crate::config::FillConfig;
use crate::correlate::Correlator;
use crate::discovery::{discover_fields, FieldLabel, FieldNameSource};
use crate::error::{Error, Result};
use crate::ocr::{words_from_annotations, TextDetector, Token};
use crate::overlay::OverlayRenderer;
use crate::resolve::{AnswerSet, Resolver};
use crate::writer::write_pdf;
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// What happened on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageReport {
    /// Zero-based page index
    pub page_index: usize,
    /// OCR word tokens considered
    pub tokens: usize,
    /// Labels anchored to a token
    pub correlations: usize,
    /// Correlations that found an answer
    pub resolved: usize,
    /// Correlations left blank
    pub blank: usize,
    /// Values drawn onto the page
    pub drawn: usize,
    /// Values skipped as consecutive repeats
    pub duplicates: usize,
}

/// Outcome of a fill run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillReport {
    /// Field labels discovered for the document
    pub fields: Vec<FieldLabel>,
    /// Per-page outcomes in page order
    pub pages: Vec<PageReport>,
    /// Written document, when one was written
    pub output: Option<PathBuf>,
}

impl FillReport {
    /// Values drawn across all pages.
    pub fn total_drawn(&self) -> usize {
        self.pages.iter().map(|p| p.drawn).sum()
    }

    /// Correlations left blank across all pages.
    pub fn total_blank(&self) -> usize {
        self.pages.iter().map(|p| p.blank).sum()
    }

    /// Correlations across all pages.
    pub fn total_correlations(&self) -> usize {
        self.pages.iter().map(|p| p.correlations).sum()
    }
}

/// Form filling pipeline.
#[derive(Debug)]
pub struct FormFiller {
    config: FillConfig,
    correlator: Correlator,
    resolver: Resolver,
    renderer: OverlayRenderer,
}

impl Default for FormFiller {
    fn default() -> Self {
        Self::new()
    }
}

impl FormFiller {
    /// Create a filler with default configuration.
    pub fn new() -> Self {
        Self::with_config(FillConfig::default())
    }

    /// Create a filler with custom configuration. The overlay font is loaded
    /// here, once.
    pub fn with_config(config: FillConfig) -> Self {
        let renderer = OverlayRenderer::new(&config.overlay_config());
        Self {
            correlator: config.correlator(),
            resolver: config.resolver(),
            renderer,
            config,
        }
    }

    /// Replace the overlay renderer.
    pub fn with_renderer(mut self, renderer: OverlayRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    /// Discover the document's field labels.
    pub fn discover_fields(
        &self,
        pages: &[DynamicImage],
        source: &dyn FieldNameSource,
    ) -> Result<Vec<FieldLabel>> {
        discover_fields(pages, source)
    }

    /// Correlate, resolve and draw one page.
    pub fn fill_page(
        &self,
        page_index: usize,
        page: DynamicImage,
        tokens: &[Token],
        fields: &[FieldLabel],
        answers: &AnswerSet,
    ) -> (DynamicImage, PageReport) {
        let correlations = self.correlator.correlate(tokens, fields);
        let resolutions = self.resolver.resolve_all(&correlations, answers);
        let resolved = resolutions.iter().filter(|r| r.is_resolved()).count();
        let (page, overlay) = self.renderer.render(page, &resolutions);

        let report = PageReport {
            page_index,
            tokens: tokens.len(),
            correlations: correlations.len(),
            resolved,
            blank: resolutions.len() - resolved,
            drawn: overlay.placements.len(),
            duplicates: overlay.duplicates,
        };
        log::info!(
            "Page {}: {} tokens, {} correlations, {} resolved, {} drawn",
            page_index,
            report.tokens,
            report.correlations,
            report.resolved,
            report.drawn
        );
        (page, report)
    }

    /// Run OCR on every page and fill it against an already-known field list.
    ///
    /// Pages come back in input order. The first detector failure aborts the
    /// run.
    pub fn fill_pages(
        &self,
        pages: Vec<DynamicImage>,
        detector: &dyn TextDetector,
        fields: &[FieldLabel],
        answers: &AnswerSet,
    ) -> Result<(Vec<DynamicImage>, Vec<PageReport>)> {
        let mut filled = Vec::with_capacity(pages.len());
        let mut reports = Vec::with_capacity(pages.len());

        for (index, page) in pages.into_iter().enumerate() {
            let annotations = detector.detect(index, &page)?;
            let tokens = words_from_annotations(&annotations);
            let (page, report) = self.fill_page(index, page, &tokens, fields, answers);
            filled.push(page);
            reports.push(report);
        }

        Ok((filled, reports))
    }

    /// Discover fields, then fill every page. Nothing is written.
    pub fn fill(
        &self,
        pages: Vec<DynamicImage>,
        detector: &dyn TextDetector,
        source: &dyn FieldNameSource,
        answers: &AnswerSet,
    ) -> Result<(Vec<DynamicImage>, FillReport)> {
        let fields = self.discover_fields(&pages, source)?;
        let (filled, page_reports) = self.fill_pages(pages, detector, &fields, answers)?;
        let report = FillReport {
            fields,
            pages: page_reports,
            output: None,
        };
        Ok((filled, report))
    }

    /// Fill a document and write the result to `output`.
    ///
    /// An empty page list fails with [`Error::InvalidInput`] before any
    /// collaborator is called.
    pub fn fill_document(
        &self,
        pages: Vec<DynamicImage>,
        detector: &dyn TextDetector,
        source: &dyn FieldNameSource,
        answers: &AnswerSet,
        output: impl AsRef<Path>,
    ) -> Result<FillReport> {
        if pages.is_empty() {
            return Err(Error::InvalidInput("document has no pages".to_string()));
        }
        let output = output.as_ref();

        let (filled, mut report) = self.fill(pages, detector, source, answers)?;
        write_pdf(&filled, output, &self.config.assembly_config())?;
        report.output = Some(output.to_path_buf());

        log::info!(
            "Filled {} pages: {} values drawn, {} fields left blank",
            report.pages.len(),
            report.total_drawn(),
            report.total_blank()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::DiscoveryRequest;
    use crate::geometry::Quad;
    use crate::ocr::{BoundingPoly, TextAnnotation, Vertex};
    use crate::overlay::OverlayFont;
    use image::{Rgb, RgbImage, Rgba};
    use std::cell::Cell;
    use tempfile::tempdir;

    fn annotation(text: &str, x: i32, y: i32) -> TextAnnotation {
        TextAnnotation {
            description: text.to_string(),
            bounding_poly: BoundingPoly {
                vertices: vec![
                    Vertex { x, y },
                    Vertex { x: x + 40, y },
                    Vertex { x: x + 40, y: y + 20 },
                    Vertex { x, y: y + 20 },
                ],
            },
        }
    }

    struct FixedDetector;

    impl TextDetector for FixedDetector {
        fn detect(&self, page_index: usize, _page: &DynamicImage) -> Result<Vec<TextAnnotation>> {
            let mut annotations = vec![annotation("whole page", 0, 0)];
            if page_index == 0 {
                annotations.push(annotation("Make", 10, 10));
                annotations.push(annotation("Selling", 10, 60));
                annotations.push(annotation("Price", 60, 60));
            }
            Ok(annotations)
        }
    }

    struct FailingDetector;

    impl TextDetector for FailingDetector {
        fn detect(&self, _page_index: usize, _page: &DynamicImage) -> Result<Vec<TextAnnotation>> {
            Err(Error::Upstream("ocr quota exceeded".to_string()))
        }
    }

    struct CountingSource {
        calls: Cell<usize>,
    }

    impl FieldNameSource for CountingSource {
        fn list_fields(&self, _request: &DiscoveryRequest) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            Ok("Make, Selling Price".to_string())
        }
    }

    fn filler() -> FormFiller {
        FormFiller::new().with_renderer(OverlayRenderer::with_font(
            OverlayFont::embedded(),
            20.0,
            Rgba([0, 0, 0, 255]),
        ))
    }

    fn blank_page() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 200, Rgb([255, 255, 255])))
    }

    fn answers() -> AnswerSet {
        [("Make", "TOYOTA"), ("Selling Price", "$15,000")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_fill_page_counts() {
        let tokens = vec![
            Token::new("Make", Quad::from_rect(10.0, 10.0, 40.0, 20.0)),
            Token::new("Color", Quad::from_rect(10.0, 40.0, 40.0, 20.0)),
        ];
        let fields = vec![FieldLabel::from("Make"), FieldLabel::from("Color")];
        let answers: AnswerSet = [("Make", "TOYOTA")].into_iter().collect();

        let (_, report) = filler().fill_page(3, blank_page(), &tokens, &fields, &answers);
        assert_eq!(report.page_index, 3);
        assert_eq!(report.tokens, 2);
        assert_eq!(report.correlations, 2);
        assert_eq!(report.resolved, 1);
        assert_eq!(report.blank, 1);
        assert_eq!(report.drawn, 1);
    }

    #[test]
    fn test_fill_discovers_once_and_keeps_page_order() {
        let source = CountingSource { calls: Cell::new(0) };
        let (pages, report) = filler()
            .fill(vec![blank_page(), blank_page()], &FixedDetector, &source, &answers())
            .unwrap();

        assert_eq!(source.calls.get(), 1);
        assert_eq!(pages.len(), 2);
        assert_eq!(report.fields.len(), 2);
        assert_eq!(report.pages[0].page_index, 0);
        assert_eq!(report.pages[0].correlations, 2);
        assert_eq!(report.pages[1].correlations, 0);
        assert_eq!(report.total_drawn(), 2);
        assert!(report.output.is_none());
    }

    #[test]
    fn test_detector_failure_propagates() {
        let source = CountingSource { calls: Cell::new(0) };
        let result = filler().fill(vec![blank_page()], &FailingDetector, &source, &answers());
        assert!(matches!(result, Err(Error::Upstream(_))));
    }

    #[test]
    fn test_fill_document_writes_pdf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("filled.pdf");
        let source = CountingSource { calls: Cell::new(0) };

        let report = filler()
            .fill_document(vec![blank_page()], &FixedDetector, &source, &answers(), &path)
            .unwrap();
        assert_eq!(report.output.as_deref(), Some(path.as_path()));
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF-"));
    }

    #[test]
    fn test_fill_document_without_pages_calls_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("filled.pdf");
        let source = CountingSource { calls: Cell::new(0) };

        let result = filler().fill_document(Vec::new(), &FixedDetector, &source, &answers(), &path);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(source.calls.get(), 0);
        assert!(!path.exists());
    }
}

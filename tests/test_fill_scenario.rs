//! End-to-end form filling through the public API.
//!
//! Uses canned OCR and discovery replies so the whole flow runs offline:
//! annotations → tokens → correlations → resolutions → overlay → PDF.

use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba};
use pdf_formfill::correlate::correlate;
use pdf_formfill::discovery::{parse_field_list, DiscoveryRequest};
use pdf_formfill::geometry::{Point, Quad};
use pdf_formfill::ocr::{annotations_from_json, words_from_annotations, TextAnnotation};
use pdf_formfill::overlay::OverlayFont;
use pdf_formfill::resolve::resolve;
use pdf_formfill::{
    AnswerSet, FieldLabel, FieldNameSource, FormFiller, OverlayRenderer, Result,
    TextDetector, Token,
};
use tempfile::tempdir;

const PAGE_OCR: &str = r#"{
    "textAnnotations": [
        {"description": "Make Toyota Buyer's Name", "boundingPoly": {"vertices": [{"x": 5, "y": 5}, {"x": 500, "y": 5}, {"x": 500, "y": 150}, {"x": 5, "y": 150}]}},
        {"description": "Make", "boundingPoly": {"vertices": [{"x": 10, "y": 10}, {"x": 60, "y": 10}, {"x": 60, "y": 30}, {"x": 10, "y": 30}]}},
        {"description": "Toyota", "boundingPoly": {"vertices": [{"x": 80, "y": 10}, {"x": 150, "y": 10}, {"x": 150, "y": 30}, {"x": 80, "y": 30}]}},
        {"description": "Buyer's", "boundingPoly": {"vertices": [{"x": 10, "y": 80}, {"x": 90, "y": 80}, {"x": 90, "y": 100}, {"x": 10, "y": 100}]}},
        {"description": "Name", "boundingPoly": {"vertices": [{"x": 100, "y": 80}, {"x": 150, "y": 80}, {"x": 150, "y": 100}, {"x": 100, "y": 100}]}}
    ]
}"#;

struct CannedOcr;

impl TextDetector for CannedOcr {
    fn detect(&self, _page_index: usize, _page: &DynamicImage) -> Result<Vec<TextAnnotation>> {
        annotations_from_json(PAGE_OCR)
    }
}

struct CannedVision;

impl FieldNameSource for CannedVision {
    fn list_fields(&self, request: &DiscoveryRequest) -> Result<String> {
        assert_eq!(request.image_count(), 1);
        Ok("Make, Buyer's Name".to_string())
    }
}

fn answers() -> AnswerSet {
    AnswerSet::from_json_str(r#"{"Make": "Toyota", "Buyer Name": "Jane Smith"}"#).unwrap()
}

fn white_page() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(600, 200, Rgb([255, 255, 255])))
}

/// Count dark pixels inside `[x0, x1) x [y0, y1)`.
fn ink_in(page: &DynamicImage, x0: u32, y0: u32, x1: u32, y1: u32) -> usize {
    page.pixels()
        .filter(|(x, y, p)| *x >= x0 && *x < x1 && *y >= y0 && *y < y1 && p[0] < 128)
        .count()
}

fn embedded_font_filler() -> FormFiller {
    FormFiller::new().with_renderer(OverlayRenderer::with_font(
        OverlayFont::embedded(),
        20.0,
        Rgba([0, 0, 0, 255]),
    ))
}

#[test]
fn test_stages_match_worked_example() {
    let fields = parse_field_list("Make, Buyer's Name");
    let tokens = words_from_annotations(&annotations_from_json(PAGE_OCR).unwrap());
    assert_eq!(tokens.len(), 4);

    let correlations = correlate(&tokens, &fields);
    assert_eq!(correlations.len(), 2);
    assert_eq!(correlations[0].field, FieldLabel::from("Make"));
    assert_eq!(correlations[0].anchor.top_left(), Point::new(10.0, 10.0));
    assert_eq!(correlations[1].field, FieldLabel::from("Buyer's Name"));
    assert_eq!(correlations[1].anchor.top_left(), Point::new(10.0, 80.0));

    let answers = answers();
    let values: Vec<String> = correlations
        .iter()
        .map(|c| resolve(c, &answers).value)
        .collect();
    assert_eq!(values, vec!["Toyota", "Jane Smith"]);
}

#[test]
fn test_fill_document_end_to_end() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("output.pdf");

    let report = embedded_font_filler()
        .fill_document(vec![white_page()], &CannedOcr, &CannedVision, &answers(), &path)
        .unwrap();

    assert_eq!(report.fields.len(), 2);
    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.pages[0].correlations, 2);
    assert_eq!(report.pages[0].resolved, 2);
    assert_eq!(report.total_drawn(), 2);

    let bytes = std::fs::read(&path).unwrap();
    let content = String::from_utf8_lossy(&bytes);
    assert!(content.starts_with("%PDF-"));
    assert!(content.contains("/Count 1"));
}

#[test]
fn test_values_drawn_at_label_boxes() {
    let (pages, _) = embedded_font_filler()
        .fill(vec![white_page()], &CannedOcr, &CannedVision, &answers())
        .unwrap();
    let page = &pages[0];

    // "Toyota" at box1, "Jane Smith" at box3
    assert!(ink_in(page, 10, 10, 150, 40) > 0);
    assert!(ink_in(page, 10, 80, 150, 110) > 0);
    // Nothing between the two lines or far right of the page
    assert_eq!(ink_in(page, 0, 45, 600, 78), 0);
    assert_eq!(ink_in(page, 300, 0, 600, 200), 0);
}

#[test]
fn test_missing_answers_leave_fields_blank() {
    let answers: AnswerSet = [("Odometer", "12000")].into_iter().collect();
    let (pages, report) = embedded_font_filler()
        .fill(vec![white_page()], &CannedOcr, &CannedVision, &answers)
        .unwrap();

    assert_eq!(report.pages[0].correlations, 2);
    assert_eq!(report.pages[0].blank, 2);
    assert_eq!(report.total_drawn(), 0);
    assert_eq!(pages[0], white_page());
}

#[test]
fn test_malformed_ocr_box_is_skipped() {
    struct BrokenOcr;

    impl TextDetector for BrokenOcr {
        fn detect(&self, _page_index: usize, _page: &DynamicImage) -> Result<Vec<TextAnnotation>> {
            annotations_from_json(
                r#"[{"description": "page"}, {"description": "Make", "boundingPoly": {"vertices": [{"x": 1}, {"x": 2}]}}]"#,
            )
        }
    }

    let (pages, report) = embedded_font_filler()
        .fill(vec![white_page()], &BrokenOcr, &CannedVision, &answers())
        .unwrap();
    assert_eq!(report.pages[0].tokens, 0);
    assert_eq!(report.pages[0].correlations, 0);
    assert_eq!(pages[0], white_page());
}

#[test]
fn test_repeated_label_across_line_writes_once() {
    let fields = vec![FieldLabel::from("Seller's Name")];
    let tokens = vec![
        Token::new("Seller's", Quad::from_rect(10.0, 10.0, 60.0, 20.0)),
        Token::new("Name", Quad::from_rect(80.0, 10.0, 40.0, 20.0)),
        Token::new("Seller's", Quad::from_rect(300.0, 10.0, 60.0, 20.0)),
        Token::new("Name", Quad::from_rect(370.0, 10.0, 40.0, 20.0)),
    ];
    let answers: AnswerSet = [("Seller Name", "John Doe")].into_iter().collect();

    let (page, report) = embedded_font_filler().fill_page(0, white_page(), &tokens, &fields, &answers);
    assert_eq!(report.correlations, 2);
    assert_eq!(report.drawn, 1);
    assert_eq!(report.duplicates, 1);
    assert!(ink_in(&page, 10, 10, 200, 45) > 0);
    assert_eq!(ink_in(&page, 250, 0, 600, 200), 0);
}

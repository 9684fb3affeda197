//! Fill an image-only form from files on disk.
//!
//! Pages are PNG/JPEG renders of the form, one OCR response JSON per page
//! (whole-page entry first), a field list as returned by the vision model
//! (comma-separated) and an answers JSON object whose key order is kept.
//!
//! Usage:
//!   cargo run --release --bin fill_form -- \
//!     --pages p1.png,p2.png --ocr p1.json,p2.json \
//!     --fields fields.txt --answers answers.json \
//!     [--config fill.json] [--output filled.pdf]

use pdf_formfill::discovery::{DiscoveryRequest, FieldNameSource};
use pdf_formfill::ocr::{annotations_from_json, TextAnnotation, TextDetector};
use pdf_formfill::{AnswerSet, Error, FillConfig, FormFiller, Result};
use image::DynamicImage;
use std::fs;
use std::path::PathBuf;

struct FillArgs {
    pages: Vec<PathBuf>,
    ocr: Vec<PathBuf>,
    fields: PathBuf,
    answers: PathBuf,
    config: Option<PathBuf>,
    output: PathBuf,
}

impl FillArgs {
    fn from_args() -> std::result::Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut pages = Vec::new();
        let mut ocr = Vec::new();
        let mut fields = None;
        let mut answers = None;
        let mut config = None;
        let mut output = PathBuf::from("output.pdf");

        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            i += 1;
            let value = match args.get(i) {
                Some(v) => v.clone(),
                None => return Err(format!("missing value for {}", flag)),
            };
            match flag {
                "--pages" => pages.extend(split_list(&value)),
                "--ocr" => ocr.extend(split_list(&value)),
                "--fields" => fields = Some(PathBuf::from(value)),
                "--answers" => answers = Some(PathBuf::from(value)),
                "--config" => config = Some(PathBuf::from(value)),
                "--output" | "-o" => output = PathBuf::from(value),
                other => return Err(format!("unknown argument {}", other)),
            }
            i += 1;
        }

        if pages.len() != ocr.len() {
            return Err(format!(
                "{} pages but {} OCR files; pass one OCR file per page",
                pages.len(),
                ocr.len()
            ));
        }

        Ok(Self {
            pages,
            ocr,
            fields: fields.ok_or("--fields is required")?,
            answers: answers.ok_or("--answers is required")?,
            config,
            output,
        })
    }
}

fn split_list(value: &str) -> impl Iterator<Item = PathBuf> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Drop one trailing line ending left by editors, so the last field label
/// does not end in a newline.
fn strip_line_terminator(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

/// OCR responses saved to disk, one file per page.
struct SavedOcr {
    files: Vec<PathBuf>,
}

impl TextDetector for SavedOcr {
    fn detect(&self, page_index: usize, _page: &DynamicImage) -> Result<Vec<TextAnnotation>> {
        let path = self
            .files
            .get(page_index)
            .ok_or_else(|| Error::Upstream(format!("no OCR response for page {}", page_index)))?;
        let json = fs::read_to_string(path)?;
        annotations_from_json(&json)
    }
}

/// A field list saved from an earlier discovery call.
struct SavedFields {
    reply: String,
}

impl FieldNameSource for SavedFields {
    fn list_fields(&self, request: &DiscoveryRequest) -> Result<String> {
        log::debug!("Answering discovery request for {} pages from file", request.image_count());
        Ok(self.reply.clone())
    }
}

fn run(args: FillArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => FillConfig::from_json_file(path)?,
        None => FillConfig::default(),
    };
    let answers = AnswerSet::from_json_file(&args.answers)?;
    let reply = fs::read_to_string(&args.fields)?;
    let source = SavedFields {
        reply: strip_line_terminator(&reply).to_string(),
    };

    let pages = args
        .pages
        .iter()
        .map(|path| {
            image::open(path).map_err(|e| Error::Image(format!("{}: {}", path.display(), e)))
        })
        .collect::<Result<Vec<_>>>()?;

    let detector = SavedOcr { files: args.ocr };
    let filler = FormFiller::with_config(config);
    let report = filler.fill_document(pages, &detector, &source, &answers, &args.output)?;

    println!("Fields: {}", report.fields.len());
    for page in &report.pages {
        println!(
            "  page {}: {} correlations, {} resolved, {} blank, {} drawn",
            page.page_index + 1,
            page.correlations,
            page.resolved,
            page.blank,
            page.drawn
        );
    }
    println!("Written to {}", args.output.display());
    Ok(())
}

fn main() {
    env_logger::init();

    let args = match FillArgs::from_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!(
                "Usage: fill_form --pages <p1,p2,..> --ocr <o1,o2,..> --fields <file> --answers <file> [--config <file>] [--output <file>]"
            );
            std::process::exit(2);
        },
    };

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

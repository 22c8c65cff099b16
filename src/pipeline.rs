use crate::classifier::{classify_with, KeywordSets};
use crate::error::{ImportError, ValidationError};
use crate::model::{ClassifiedFacts, NutritionRecord};
use crate::normalizer::normalize;
use crate::ocr::{extract_lines, DocumentAnalyzer};
use crate::providers::LlmProvider;
use crate::spreadsheet::build_workbook;
use image::ImageReader;
use log::{debug, info};
use std::io::Cursor;

/// An image file received from a client
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Everything one pipeline run produced
#[derive(Debug, Clone)]
pub struct LabelImport {
    /// OCR lines in reading order
    pub lines: Vec<String>,
    pub classified: ClassifiedFacts,
    pub record: NutritionRecord,
    /// The finished xlsx buffer
    pub workbook: Vec<u8>,
}

/// Check an upload before any provider is contacted
///
/// # Errors
/// Returns `ValidationError` if:
/// - No file was uploaded
/// - The filename is empty
/// - The image is larger than `max_bytes`
/// - The bytes do not carry a readable image header
///
/// Only the header is parsed; pixel data is left to the OCR provider.
pub fn validate_upload(
    upload: Option<&UploadedImage>,
    max_bytes: usize,
) -> Result<&UploadedImage, ValidationError> {
    let upload = upload.ok_or(ValidationError::NoFile)?;

    if upload.filename.is_empty() {
        return Err(ValidationError::NoFileSelected);
    }

    if upload.bytes.len() > max_bytes {
        return Err(ValidationError::TooLarge {
            size: upload.bytes.len(),
            limit: max_bytes,
        });
    }

    let (width, height) = ImageReader::new(Cursor::new(&upload.bytes))
        .with_guessed_format()
        .map_err(|e| ValidationError::NotAnImage(e.to_string()))?
        .into_dimensions()
        .map_err(|e| ValidationError::NotAnImage(e.to_string()))?;
    debug!("Upload '{}' is {}x{}", upload.filename, width, height);

    Ok(upload)
}

/// Run OCR, classification, normalization and rendering in order
pub async fn process(
    analyzer: &dyn DocumentAnalyzer,
    provider: &dyn LlmProvider,
    keywords: &KeywordSets,
    image: &[u8],
) -> Result<LabelImport, ImportError> {
    let analysis = analyzer.analyze(image).await?;
    let lines = extract_lines(&analysis);
    debug!(
        "{} returned {} lines",
        analyzer.provider_name(),
        lines.len()
    );

    let classified = classify_with(&lines, keywords);
    let record = normalize(provider, &classified).await?;
    let workbook = build_workbook(&record, &lines)?;

    info!(
        "Built workbook: {} nutrients, {} lines, {} bytes",
        record.nutrients.len(),
        lines.len(),
        workbook.len()
    );

    Ok(LabelImport {
        lines,
        classified,
        record,
        workbook,
    })
}

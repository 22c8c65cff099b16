pub mod builder;
pub mod classifier;
pub mod config;
pub mod error;
pub mod model;
pub mod normalizer;
pub mod ocr;
pub mod pipeline;
pub mod providers;
pub mod server;
pub mod spreadsheet;

// Re-export commonly used types
pub use builder::{LabelImporter, LabelImporterBuilder};
pub use classifier::{classify, classify_with, KeywordSets};
pub use config::AppConfig;
pub use error::{ImportError, OcrError, ValidationError};
pub use model::{AnalyzeDocumentOutput, Block, ClassifiedFacts, NutritionRecord};
pub use normalizer::{normalize, parse_response};
pub use ocr::{extract_lines, AwsCredentials, DocumentAnalyzer, TextractClient};
pub use pipeline::{validate_upload, LabelImport, UploadedImage};
pub use providers::{LlmProvider, OpenAIProvider};
pub use spreadsheet::{build_workbook, SHEET_NAMES};

use std::path::Path;

/// Run the full pipeline on an image file using clients built from `config`.
///
/// The file goes through the same validation as an HTTP upload.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use nutrition_label_import::{import_image_file, AppConfig};
///
/// let config = AppConfig::load()?;
/// let result = import_image_file(&config, "label.jpg").await?;
/// std::fs::write("output.xlsx", &result.workbook)?;
/// # Ok(())
/// # }
/// ```
pub async fn import_image_file(
    config: &AppConfig,
    path: impl AsRef<Path>,
) -> Result<LabelImport, ImportError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ImportError::Unexpected(format!("{}: {}", path.display(), e)))?;

    let upload = UploadedImage {
        filename: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        bytes,
    };

    LabelImporter::from_config(config)?
        .import(Some(&upload))
        .await
}

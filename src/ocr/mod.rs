mod sigv4;
mod textract;

pub use sigv4::AwsCredentials;
pub use textract::TextractClient;

use crate::error::OcrError;
use crate::model::AnalyzeDocumentOutput;
use async_trait::async_trait;

/// Block type whose text is used as a label line
pub const LINE_BLOCK_TYPE: &str = "LINE";

/// A document-analysis service that turns image bytes into typed blocks
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Get the provider name (e.g., "textract")
    fn provider_name(&self) -> &str;

    /// Analyse one image and return its blocks in reading order
    async fn analyze(&self, document: &[u8]) -> Result<AnalyzeDocumentOutput, OcrError>;
}

/// Pull the text of every `LINE` block, keeping reading order
pub fn extract_lines(output: &AnalyzeDocumentOutput) -> Vec<String> {
    output
        .blocks
        .iter()
        .filter(|block| block.block_type == LINE_BLOCK_TYPE)
        .map(|block| block.text.clone().unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;

    #[test]
    fn test_extract_lines_keeps_only_lines_in_order() {
        let output = AnalyzeDocumentOutput {
            blocks: vec![
                Block {
                    block_type: "PAGE".to_string(),
                    ..Default::default()
                },
                Block::line("Supplement Facts"),
                Block {
                    block_type: "WORD".to_string(),
                    text: Some("Supplement".to_string()),
                    ..Default::default()
                },
                Block::line("Serving Size 2 Capsules"),
                Block::line("Vitamin C 500mg"),
            ],
        };

        assert_eq!(
            extract_lines(&output),
            vec!["Supplement Facts", "Serving Size 2 Capsules", "Vitamin C 500mg"]
        );
    }

    #[test]
    fn test_extract_lines_empty() {
        assert!(extract_lines(&AnalyzeDocumentOutput::default()).is_empty());
    }

    #[test]
    fn test_block_type_match_is_exact() {
        let output = AnalyzeDocumentOutput {
            blocks: vec![Block {
                block_type: "line".to_string(),
                text: Some("lowercase tag".to_string()),
                ..Default::default()
            }],
        };
        assert!(extract_lines(&output).is_empty());
    }
}

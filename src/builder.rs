use std::sync::Arc;
use std::time::Duration;

use crate::classifier::KeywordSets;
use crate::config::AppConfig;
use crate::ocr::{DocumentAnalyzer, TextractClient};
use crate::pipeline::{self, LabelImport, UploadedImage};
use crate::providers::{LlmProvider, OpenAIProvider};
use crate::ImportError;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Builder for configuring a [`LabelImporter`]
#[derive(Default)]
pub struct LabelImporterBuilder {
    analyzer: Option<Arc<dyn DocumentAnalyzer>>,
    provider: Option<Arc<dyn LlmProvider>>,
    keywords: Option<KeywordSets>,
    max_upload_bytes: Option<usize>,
}

impl LabelImporterBuilder {
    /// Set the document-analysis (OCR) client
    ///
    /// # Example
    /// ```
    /// use nutrition_label_import::{LabelImporter, TextractClient, AwsCredentials};
    /// use std::sync::Arc;
    ///
    /// let textract = TextractClient::with_endpoint(
    ///     "https://textract.us-east-1.amazonaws.com",
    ///     "us-east-1",
    ///     AwsCredentials {
    ///         access_key_id: "AKID".to_string(),
    ///         secret_access_key: "secret".to_string(),
    ///         session_token: None,
    ///     },
    /// )
    /// .unwrap();
    /// let builder = LabelImporter::builder().analyzer(Arc::new(textract));
    /// ```
    pub fn analyzer(mut self, analyzer: Arc<dyn DocumentAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Set the language model used to normalize the facts panel
    ///
    /// # Example
    /// ```
    /// use nutrition_label_import::{LabelImporter, OpenAIProvider};
    /// use std::sync::Arc;
    ///
    /// let openai = OpenAIProvider::with_api_key("key".to_string(), "gpt-3.5-turbo".to_string());
    /// let builder = LabelImporter::builder().provider(Arc::new(openai));
    /// ```
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Replace the classifier keyword sets
    pub fn keywords(mut self, keywords: KeywordSets) -> Self {
        self.keywords = Some(keywords);
        self
    }

    /// Set the largest accepted image in bytes (default 5 MiB)
    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = Some(bytes);
        self
    }

    /// Finish configuration
    ///
    /// # Errors
    /// Returns `ImportError::BuilderError` if either provider handle is missing
    pub fn build(self) -> Result<LabelImporter, ImportError> {
        let analyzer = self.analyzer.ok_or_else(|| {
            ImportError::BuilderError(
                "No document analyzer specified. Use .analyzer()".to_string(),
            )
        })?;
        let provider = self.provider.ok_or_else(|| {
            ImportError::BuilderError("No LLM provider specified. Use .provider()".to_string())
        })?;

        Ok(LabelImporter {
            analyzer,
            provider,
            keywords: self.keywords.unwrap_or_default(),
            max_upload_bytes: self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        })
    }
}

/// Turns label images into workbooks using injected provider handles
#[derive(Clone)]
pub struct LabelImporter {
    analyzer: Arc<dyn DocumentAnalyzer>,
    provider: Arc<dyn LlmProvider>,
    keywords: KeywordSets,
    max_upload_bytes: usize,
}

impl LabelImporter {
    /// Creates a new builder
    pub fn builder() -> LabelImporterBuilder {
        LabelImporterBuilder::default()
    }

    /// Construct the Textract and OpenAI clients described by `config`
    pub fn from_config(config: &AppConfig) -> Result<Self, ImportError> {
        let timeout = Duration::from_secs(config.timeout);

        let textract = TextractClient::new(&config.textract, timeout)
            .map_err(|e| ImportError::BuilderError(e.to_string()))?;
        let openai = OpenAIProvider::new(&config.llm, timeout)
            .map_err(|e| ImportError::BuilderError(e.to_string()))?;

        Self::builder()
            .analyzer(Arc::new(textract))
            .provider(Arc::new(openai))
            .max_upload_bytes(config.server.max_upload_bytes)
            .build()
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Validate an upload, then run the full pipeline on it
    ///
    /// No provider is contacted when validation fails.
    pub async fn import(&self, upload: Option<&UploadedImage>) -> Result<LabelImport, ImportError> {
        let upload = pipeline::validate_upload(upload, self.max_upload_bytes)?;
        self.process(&upload.bytes).await
    }

    /// Run the pipeline on image bytes that are already validated
    pub async fn process(&self, image: &[u8]) -> Result<LabelImport, ImportError> {
        pipeline::process(
            self.analyzer.as_ref(),
            self.provider.as_ref(),
            &self.keywords,
            image,
        )
        .await
    }
}

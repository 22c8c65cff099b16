use super::sigv4::{sign_post, AwsCredentials, SigningParams};
use super::DocumentAnalyzer;
use crate::config::TextractConfig;
use crate::error::OcrError;
use crate::model::AnalyzeDocumentOutput;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use log::debug;
use reqwest::{Client, Url};
use serde_json::{json, Value};
use std::time::Duration;

const SERVICE: &str = "textract";
const DEFAULT_REGION: &str = "us-east-1";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const ANALYZE_DOCUMENT_TARGET: &str = "Textract.AnalyzeDocument";

/// AWS Textract `AnalyzeDocument` over its JSON API
pub struct TextractClient {
    client: Client,
    endpoint: Url,
    host: String,
    region: String,
    credentials: AwsCredentials,
    feature_types: Vec<String>,
}

impl TextractClient {
    /// Create a new Textract client from configuration
    pub fn new(config: &TextractConfig, timeout: Duration) -> Result<Self, OcrError> {
        // Try config first, then fall back to the standard AWS variables
        let access_key_id = config
            .access_key_id
            .clone()
            .or_else(|| std::env::var("AWS_ACCESS_KEY_ID").ok())
            .ok_or_else(|| {
                OcrError::MissingCredentials(
                    "AWS_ACCESS_KEY_ID not found in config or environment".to_string(),
                )
            })?;
        let secret_access_key = config
            .secret_access_key
            .clone()
            .or_else(|| std::env::var("AWS_SECRET_ACCESS_KEY").ok())
            .ok_or_else(|| {
                OcrError::MissingCredentials(
                    "AWS_SECRET_ACCESS_KEY not found in config or environment".to_string(),
                )
            })?;
        let session_token = config
            .session_token
            .clone()
            .or_else(|| std::env::var("AWS_SESSION_TOKEN").ok());

        let region = config
            .region
            .clone()
            .or_else(|| std::env::var("AWS_REGION").ok())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://textract.{}.amazonaws.com", region));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OcrError::Transport(e.to_string()))?;

        let mut textract = Self::build(
            client,
            &endpoint,
            region,
            AwsCredentials {
                access_key_id,
                secret_access_key,
                session_token,
            },
        )?;
        textract.feature_types = config.feature_types.clone();
        Ok(textract)
    }

    #[doc(hidden)]
    pub fn with_endpoint(
        endpoint: &str,
        region: &str,
        credentials: AwsCredentials,
    ) -> Result<Self, OcrError> {
        Self::build(Client::new(), endpoint, region.to_string(), credentials)
    }

    fn build(
        client: Client,
        endpoint: &str,
        region: String,
        credentials: AwsCredentials,
    ) -> Result<Self, OcrError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| OcrError::InvalidResponse(format!("invalid endpoint {}: {}", endpoint, e)))?;
        let host = match (endpoint.host_str(), endpoint.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(OcrError::InvalidResponse(format!(
                    "endpoint {} has no host",
                    endpoint
                )))
            }
        };

        Ok(TextractClient {
            client,
            endpoint,
            host,
            region,
            credentials,
            feature_types: vec!["TABLES".to_string()],
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl DocumentAnalyzer for TextractClient {
    fn provider_name(&self) -> &str {
        "textract"
    }

    async fn analyze(&self, document: &[u8]) -> Result<AnalyzeDocumentOutput, OcrError> {
        let body = json!({
            "Document": {"Bytes": STANDARD.encode(document)},
            "FeatureTypes": self.feature_types,
        });
        let payload = serde_json::to_vec(&body)
            .map_err(|e| OcrError::InvalidResponse(e.to_string()))?;

        let params = SigningParams {
            credentials: &self.credentials,
            region: &self.region,
            service: SERVICE,
            time: Utc::now(),
        };
        let signed = sign_post(
            &params,
            &self.host,
            &[
                ("content-type", CONTENT_TYPE),
                ("x-amz-target", ANALYZE_DOCUMENT_TARGET),
            ],
            &payload,
        );

        debug!(
            "Sending AnalyzeDocument request to {} ({} image bytes)",
            self.endpoint,
            document.len()
        );

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header("content-type", CONTENT_TYPE)
            .header("x-amz-target", ANALYZE_DOCUMENT_TARGET);
        for (name, value) in &signed {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.body(payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let header_type = response
                .headers()
                .get("x-amzn-errortype")
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            let text = response.text().await.unwrap_or_default();
            debug!("Textract returned {}: {}", status, text);
            return Err(service_error(header_type.as_deref(), &text));
        }

        let output: AnalyzeDocumentOutput = response
            .json()
            .await
            .map_err(|e| OcrError::InvalidResponse(e.to_string()))?;
        debug!("Textract returned {} blocks", output.blocks.len());

        Ok(output)
    }
}

/// Map an AWS JSON error body onto a service error
fn service_error(header_type: Option<&str>, body: &str) -> OcrError {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    let code = parsed["__type"]
        .as_str()
        .or(header_type)
        .map(|t| {
            // "com.amazonaws.textract#InvalidParameterException" or "Code:http://..."
            let t = t.rsplit('#').next().unwrap_or(t);
            t.split(':').next().unwrap_or(t).to_string()
        })
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    let message = parsed["message"]
        .as_str()
        .or_else(|| parsed["Message"].as_str())
        .unwrap_or("No message provided")
        .to_string();

    OcrError::Service { code, message }
}

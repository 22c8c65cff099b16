use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Document analysis (Textract) settings
    #[serde(default)]
    pub textract: TextractConfig,
    /// Language model settings
    #[serde(default)]
    pub llm: ProviderConfig,
    /// Request timeout in seconds for outbound calls
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            textract: TextractConfig::default(),
            llm: ProviderConfig::default(),
            timeout: default_timeout(),
        }
    }
}

/// Configuration for the upload server
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Largest accepted image, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Largest accepted request body, in bytes. Must exceed
    /// `max_upload_bytes` so oversize images get a proper validation error.
    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_bytes: default_max_upload_bytes(),
            max_request_bytes: default_max_request_bytes(),
        }
    }
}

/// Configuration for AWS Textract
#[derive(Debug, Deserialize, Clone)]
pub struct TextractConfig {
    /// AWS region (falls back to AWS_REGION, then us-east-1)
    pub region: Option<String>,
    /// Endpoint override, e.g. for a local stand-in
    pub endpoint: Option<String>,
    /// Access key id (can also be set via AWS_ACCESS_KEY_ID)
    pub access_key_id: Option<String>,
    /// Secret key (can also be set via AWS_SECRET_ACCESS_KEY)
    pub secret_access_key: Option<String>,
    /// Session token for temporary credentials (AWS_SESSION_TOKEN)
    pub session_token: Option<String>,
    /// Analysis features to request
    #[serde(default = "default_feature_types")]
    pub feature_types: Vec<String>,
}

impl Default for TextractConfig {
    fn default() -> Self {
        Self {
            region: None,
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            feature_types: default_feature_types(),
        }
    }
}

/// Configuration for the language model provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Model identifier (e.g., "gpt-3.5-turbo")
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature; the provider default is used when unset
    pub temperature: Option<f32>,
    /// Maximum tokens to generate; the provider default is used when unset
    pub max_tokens: Option<u32>,
    /// API key for authentication (can also be set via OPENAI_API_KEY)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: None,
            max_tokens: None,
            api_key: None,
            base_url: None,
        }
    }
}

// Default value functions
fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_max_request_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_feature_types() -> Vec<String> {
    vec!["TABLES".to_string()]
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with LABEL_IMPORT__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: LABEL_IMPORT__LLM__MODEL
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the layering rules.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: LABEL_IMPORT__TEXTRACT__REGION
        .add_source(
            Environment::with_prefix("LABEL_IMPORT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

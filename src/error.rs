use thiserror::Error;

/// Reasons an upload is rejected before any provider is contacted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The multipart body had no `image` field
    #[error("No file uploaded")]
    NoFile,

    /// The `image` field was present but carried an empty filename
    #[error("No file selected")]
    NoFileSelected,

    /// The image is larger than the configured limit
    #[error("Image size exceeds {} limit", describe_limit(.limit))]
    TooLarge { size: usize, limit: usize },

    /// The bytes could not be decoded as an image
    #[error("Uploaded file is not a valid image: {0}")]
    NotAnImage(String),
}

const MIB: usize = 1024 * 1024;

// Whole mebibytes read as "5 MB"; anything else is shown in bytes
fn describe_limit(limit: &usize) -> String {
    if *limit >= MIB && limit % MIB == 0 {
        format!("{} MB", limit / MIB)
    } else {
        format!("{} byte", limit)
    }
}

/// Errors raised by a document-analysis (OCR) provider
#[derive(Error, Debug)]
pub enum OcrError {
    /// The service answered with an error code, e.g. a failed signature check
    #[error("{code} - {message}")]
    Service { code: String, message: String },

    /// The request never produced a service answer
    #[error("request failed: {0}")]
    Transport(String),

    /// The service answered with something we could not decode
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// No credentials were available to sign the request
    #[error("missing credentials: {0}")]
    MissingCredentials(String),
}

impl From<reqwest::Error> for OcrError {
    fn from(err: reqwest::Error) -> Self {
        OcrError::Transport(err.to_string())
    }
}

/// Errors that can occur while turning a label image into a workbook
#[derive(Error, Debug)]
pub enum ImportError {
    /// The upload was rejected; the caller can fix this
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The OCR provider reported a service-level failure
    #[error("AWS Textract error: {code} - {message}")]
    Provider { code: String, message: String },

    /// Anything else that aborted the pipeline
    #[error("Unexpected error: {0}")]
    Unexpected(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl ImportError {
    /// Whether the failure is the caller's fault rather than ours
    pub fn is_client_error(&self) -> bool {
        matches!(self, ImportError::Validation(_))
    }
}

impl From<OcrError> for ImportError {
    fn from(err: OcrError) -> Self {
        match err {
            OcrError::Service { code, message } => ImportError::Provider { code, message },
            other => ImportError::Unexpected(other.to_string()),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for ImportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ImportError::Unexpected(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(ValidationError::NoFile.to_string(), "No file uploaded");
        assert_eq!(ValidationError::NoFileSelected.to_string(), "No file selected");
        let too_large = ValidationError::TooLarge {
            size: 6 * 1024 * 1024,
            limit: 5 * 1024 * 1024,
        };
        assert_eq!(too_large.to_string(), "Image size exceeds 5 MB limit");
    }

    #[test]
    fn test_size_limit_below_whole_mebibyte() {
        let half = ValidationError::TooLarge {
            size: 600_000,
            limit: 512 * 1024,
        };
        assert_eq!(half.to_string(), "Image size exceeds 524288 byte limit");

        let fractional = ValidationError::TooLarge {
            size: 2 * MIB,
            limit: MIB + MIB / 2,
        };
        assert_eq!(fractional.to_string(), "Image size exceeds 1572864 byte limit");
    }

    #[test]
    fn test_service_error_becomes_provider_error() {
        let err: ImportError = OcrError::Service {
            code: "InvalidSignatureException".to_string(),
            message: "bad signature".to_string(),
        }
        .into();

        assert_eq!(
            err.to_string(),
            "AWS Textract error: InvalidSignatureException - bad signature"
        );
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_transport_error_becomes_unexpected() {
        let err: ImportError = OcrError::Transport("connection refused".to_string()).into();
        assert!(matches!(err, ImportError::Unexpected(_)));
        assert!(err.to_string().starts_with("Unexpected error: "));
    }
}

//! Error types module
//!
//! Every failure the upload pipeline can record against a file is an
//! [`UploadError`]. Transport-level failures from the HTTP boundary are
//! [`ApiError`] and conversion failures are [`ConversionError`]; both fold
//! into the pipeline taxonomy.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected failures such as a missing language selection
    Debug,
    /// Remote-side problems that affect a single file
    Warn,
    /// Unexpected failures
    Error,
}

/// Failure at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// HTTP status code if the server answered with a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure while driving an external conversion job.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("Conversion is not configured")]
    NotConfigured,

    #[error("Conversion submission failed: {0}")]
    Submission(String),

    #[error("Conversion job response is missing {0}")]
    MissingJobField(&'static str),

    #[error("Conversion status check failed: {0}")]
    StatusCheck(String),

    #[error("Conversion failed with state {0}")]
    UnexpectedState(String),

    #[error("Conversion timed out after {attempts} polls")]
    TimedOut { attempts: u32 },

    #[error("Conversion produced no output")]
    NoOutput,

    #[error("Converted file download failed: {0}")]
    Download(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UploadError {
    #[error("API key is missing or invalid")]
    Credential,

    #[error("Catalog request failed: {0}")]
    Catalog(#[source] ApiError),

    #[error("Video search failed: {0}")]
    Resolution(#[source] ApiError),

    #[error("No matching video found for title '{title}'")]
    NoMatchingAsset { title: String },

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("Upload token unavailable: {0}")]
    TokenUnavailable(String),

    #[error("Caption upload failed: {0}")]
    Upload(#[source] ApiError),

    #[error("Language not selected")]
    LanguageNotSelected,

    #[error("No files to upload")]
    EmptyQueue,

    #[error("No destination folder selected")]
    NoFolder,

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl UploadError {
    /// Machine-readable error code (e.g. "RESOLUTION_ERROR")
    pub fn error_code(&self) -> &'static str {
        match self {
            UploadError::Credential => "CREDENTIAL_ERROR",
            UploadError::Catalog(_) => "CATALOG_ERROR",
            UploadError::Resolution(_) | UploadError::NoMatchingAsset { .. } => "RESOLUTION_ERROR",
            UploadError::Conversion(_) => "CONVERSION_ERROR",
            UploadError::TokenUnavailable(_) => "TOKEN_ERROR",
            UploadError::Upload(_) => "UPLOAD_ERROR",
            UploadError::LanguageNotSelected => "LANGUAGE_NOT_SELECTED",
            UploadError::EmptyQueue | UploadError::NoFolder => "PRECONDITION_FAILED",
            UploadError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            UploadError::Storage(_) => "STORAGE_ERROR",
            UploadError::HttpClient(_) => "HTTP_CLIENT_ERROR",
        }
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        match self {
            UploadError::LanguageNotSelected
            | UploadError::NoMatchingAsset { .. }
            | UploadError::EmptyQueue
            | UploadError::NoFolder
            | UploadError::UnsupportedFormat(_) => LogLevel::Debug,
            UploadError::Resolution(_)
            | UploadError::Conversion(_)
            | UploadError::TokenUnavailable(_)
            | UploadError::Upload(_)
            | UploadError::Catalog(_) => LogLevel::Warn,
            UploadError::Credential | UploadError::Storage(_) | UploadError::HttpClient(_) => {
                LogLevel::Error
            }
        }
    }
}

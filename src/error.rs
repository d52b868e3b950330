use crate::error_code::ErrorKind;
use thiserror::Error;

/// Structured error context for configuration and validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Configuration key or field that caused the error (e.g., "POEMS_TABLE_NAME")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected shape, actual value)
    pub details: Option<String>,
    /// Component that raised the error (e.g., "sqlite_store", "service_config")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the poem service.
///
/// Each variant resolves to one [`ErrorKind`] via [`Error::kind`]; the HTTP
/// boundary uses the kind to pick a status code.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Artwork catalog unavailable: {message}")]
    UpstreamUnavailable { message: String, status: Option<u16> },

    #[error("Artwork catalog returned a malformed body: {message}")]
    UpstreamMalformed { message: String },

    #[error("Poem generation failed: {message}")]
    GenerationFailed { message: String, status: Option<u16> },

    #[error("Poem store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Poem store record is corrupt: {message}")]
    StoreCorrupt { message: String, id: Option<String> },

    #[error("Poem already exists for id {id}")]
    AlreadyExists { id: String },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Request cancelled: {message}")]
    Cancelled { message: String },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Error::InvalidRequest {
            message: msg.into(),
        }
    }

    pub fn upstream_unavailable(msg: impl Into<String>, status: Option<u16>) -> Self {
        Error::UpstreamUnavailable {
            message: msg.into(),
            status,
        }
    }

    pub fn upstream_malformed(msg: impl Into<String>) -> Self {
        Error::UpstreamMalformed {
            message: msg.into(),
        }
    }

    pub fn generation_failed(msg: impl Into<String>, status: Option<u16>) -> Self {
        Error::GenerationFailed {
            message: msg.into(),
            status,
        }
    }

    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Error::StoreUnavailable {
            message: msg.into(),
        }
    }

    pub fn store_corrupt(msg: impl Into<String>, id: Option<String>) -> Self {
        Error::StoreCorrupt {
            message: msg.into(),
            id,
        }
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Error::Cancelled {
            message: msg.into(),
        }
    }

    /// Create a configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Shorthand for a required setting that is absent.
    pub fn config_missing(key: &str) -> Self {
        Self::configuration_with_context(
            format!("{} not set", key),
            ErrorContext::new().with_field_path(key),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Error::UpstreamUnavailable { .. } => ErrorKind::UpstreamUnavailable,
            Error::UpstreamMalformed { .. } => ErrorKind::UpstreamMalformed,
            Error::GenerationFailed { .. } => ErrorKind::GenerationFailed,
            Error::StoreUnavailable { .. } => ErrorKind::StoreUnavailable,
            Error::StoreCorrupt { .. } => ErrorKind::StoreCorrupt,
            Error::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Error::Configuration { .. } => ErrorKind::ConfigMissing,
            Error::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}

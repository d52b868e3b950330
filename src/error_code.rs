//! Error kinds surfaced at the service boundary.
//!
//! Every [`crate::Error`] resolves to exactly one [`ErrorKind`], which carries a
//! stable code string, a snake_case name, a category and the HTTP status the
//! boundary responds with.
//!
//! ## Code Categories
//!
//! | Prefix | Category    | Description                          |
//! |--------|-------------|--------------------------------------|
//! | E1xxx  | client      | Caller supplied an unusable request  |
//! | E2xxx  | upstream    | Artwork catalog or generation failed |
//! | E3xxx  | store       | Poem store failed or is inconsistent |
//! | E4xxx  | operational | Configuration, races, cancellation   |
//!
//! ## Example
//!
//! ```rust
//! use artwork_poems::error_code::ErrorKind;
//!
//! let kind = ErrorKind::GenerationFailed;
//! assert_eq!(kind.code(), "E2003");
//! assert_eq!(kind.http_status(), 502);
//! assert_eq!(kind.category(), "upstream");
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// E1001: Identifier missing or blank
    InvalidRequest,
    /// E2001: Artwork catalog unreachable or returned a non-success status
    UpstreamUnavailable,
    /// E2002: Artwork catalog answered with a body we could not decode
    UpstreamMalformed,
    /// E2003: Text generation service failed or returned no usable poem
    GenerationFailed,
    /// E3001: Store configuration, connection or transport failure
    StoreUnavailable,
    /// E3002: Record present but does not decode into a poem
    StoreCorrupt,
    /// E4001: Conditional write lost to an existing record
    AlreadyExists,
    /// E4002: Required configuration absent
    ConfigMissing,
    /// E4003: Request cancelled or its deadline elapsed
    Cancelled,
}

impl ErrorKind {
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "E1001",
            Self::UpstreamUnavailable => "E2001",
            Self::UpstreamMalformed => "E2002",
            Self::GenerationFailed => "E2003",
            Self::StoreUnavailable => "E3001",
            Self::StoreCorrupt => "E3002",
            Self::AlreadyExists => "E4001",
            Self::ConfigMissing => "E4002",
            Self::Cancelled => "E4003",
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::UpstreamUnavailable => "upstream_unavailable",
            Self::UpstreamMalformed => "upstream_malformed",
            Self::GenerationFailed => "generation_failed",
            Self::StoreUnavailable => "store_unavailable",
            Self::StoreCorrupt => "store_corrupt",
            Self::AlreadyExists => "already_exists",
            Self::ConfigMissing => "config_missing",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns the category: `"client"`, `"upstream"`, `"store"` or `"operational"`.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "client",
            Self::UpstreamUnavailable | Self::UpstreamMalformed | Self::GenerationFailed => {
                "upstream"
            }
            Self::StoreUnavailable | Self::StoreCorrupt => "store",
            Self::AlreadyExists | Self::ConfigMissing | Self::Cancelled => "operational",
        }
    }

    /// HTTP status the boundary answers with for this kind.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest => 400,
            Self::UpstreamUnavailable | Self::UpstreamMalformed | Self::GenerationFailed => 502,
            Self::StoreUnavailable => 503,
            Self::StoreCorrupt | Self::ConfigMissing => 500,
            Self::AlreadyExists => 409,
            Self::Cancelled => 504,
        }
    }

    /// Parses a snake_case name back into a kind.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "invalid_request" => Self::InvalidRequest,
            "upstream_unavailable" => Self::UpstreamUnavailable,
            "upstream_malformed" => Self::UpstreamMalformed,
            "generation_failed" => Self::GenerationFailed,
            "store_unavailable" => Self::StoreUnavailable,
            "store_corrupt" => Self::StoreCorrupt,
            "already_exists" => Self::AlreadyExists,
            "config_missing" => Self::ConfigMissing,
            "cancelled" => Self::Cancelled,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

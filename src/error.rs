//! Application-wide error types.
//!
//! This module provides a unified error hierarchy for the application.
//! Library modules return [`Error`] via `thiserror`, while CLI/main uses
//! `anyhow` for convenient error propagation at the binary edge.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Every variant carries a stable machine-readable [`Error::code`] that
//!   is part of the HTTP contract and must not change casually
//! - All errors implement `std::error::Error` for compatibility
//!
//! # Example
//!
//! ```ignore
//! use airsift::error::{Error, Result};
//!
//! fn fetch_page(page: u32) -> Result<()> {
//!     if page < 1 {
//!         return Err(Error::validation("page must be >= 1"));
//!     }
//!     Ok(())
//! }
//! ```

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
///
/// Aggregates errors from all subsystems for unified handling. Variants
/// are `String`-based so the enum stays `Clone` (test mocks script
/// failures by cloning a prepared error).
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Caller supplied invalid input (bad paging, unknown country)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream authentication failed (bad credentials, unrecoverable 401)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Upstream throttled us (HTTP 429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Upstream unreachable (connect failure, timeout, 5xx)
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Upstream responded but violated its contract
    #[error("Upstream error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal invariant violation
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Create a rate-limited error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited(message.into())
    }

    /// Create an upstream-unavailable error.
    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(message.into())
    }

    /// Create an upstream contract error.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Human-readable message without the variant prefix `Display` adds.
    ///
    /// This is what the HTTP `{error, code}` body carries; the prefixed
    /// `Display` form is for logs. Context wrappers are transparent here
    /// like they are for [`Error::code`].
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg)
            | Self::Auth(msg)
            | Self::RateLimited(msg)
            | Self::UpstreamUnavailable(msg)
            | Self::Config(msg)
            | Self::Internal(msg) => msg,
            Self::Upstream { message, .. } => message,
            Self::WithContext { source, .. } => source.message(),
        }
    }

    /// Stable machine-readable code for API responses and logs.
    ///
    /// Context wrappers are transparent: the code of the innermost
    /// error wins.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Auth(_) => "auth_error",
            Self::RateLimited(_) => "rate_limit_error",
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
            Self::Upstream { .. } => "upstream_error",
            Self::Config(_) | Self::Internal(_) => "internal_error",
            Self::WithContext { source, .. } => source.code(),
        }
    }

    /// HTTP status this error maps to at the API surface.
    ///
    /// Auth failures are always upstream-origin here (this service does
    /// not authenticate its own callers), so they surface as 502 rather
    /// than leaking a misleading 401.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Auth(_) => 502,
            Self::RateLimited(_) => 429,
            Self::UpstreamUnavailable(_) => 503,
            Self::Upstream { .. } => 502,
            Self::Config(_) | Self::Internal(_) => 500,
            Self::WithContext { source, .. } => source.http_status(),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

//! 上游错误分类：将模型服务的失败归入少量可操作的类别。
//!
//! Provider failure categories.
//!
//! Outbound calls fail for many reasons, but callers can only act on a few of
//! them: an exhausted quota needs billing attention, a rejected credential
//! needs configuration, a rate limit needs patience. Everything else is
//! reported as [`ProviderErrorKind::Other`].
//!
//! | Code  | Name              | Typical cause                          |
//! |-------|-------------------|----------------------------------------|
//! | P2002 | `quota_exhausted` | Billing or daily quota reached         |
//! | P1002 | `authentication`  | Missing, invalid or revoked API key    |
//! | P2001 | `rate_limited`    | Too many requests in a short window    |
//! | P9999 | `other`           | Anything that could not be classified  |
//!
//! ## Example
//!
//! ```rust
//! use grounded_qa::error_code::ProviderErrorKind;
//!
//! let kind = ProviderErrorKind::from_provider_status("RESOURCE_EXHAUSTED");
//! assert_eq!(kind, Some(ProviderErrorKind::QuotaExhausted));
//! assert_eq!(ProviderErrorKind::from_http_status(401), ProviderErrorKind::Authentication);
//! ```

use std::fmt;

/// Coarse category of a failed outbound model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// P2002: Account usage quota or billing limit reached
    QuotaExhausted,
    /// P1002: Invalid, expired, or unauthorized API key
    Authentication,
    /// P2001: Request rate limit exceeded
    RateLimited,
    /// P9999: Provider failure that could not be classified
    Other,
}

impl ProviderErrorKind {
    /// Returns the stable code string (e.g., `"P2002"`).
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::QuotaExhausted => "P2002",
            Self::Authentication => "P1002",
            Self::RateLimited => "P2001",
            Self::Other => "P9999",
        }
    }

    /// Returns the standard name (e.g., `"quota_exhausted"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::QuotaExhausted => "quota_exhausted",
            Self::Authentication => "authentication",
            Self::RateLimited => "rate_limited",
            Self::Other => "other",
        }
    }

    /// Human-readable hint for the person at the keyboard.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::QuotaExhausted => "The model provider's usage quota has been exhausted.",
            Self::Authentication => "The model provider rejected the configured API key.",
            Self::RateLimited => "Too many requests were sent to the model provider; try again shortly.",
            Self::Other => "The model provider returned an error.",
        }
    }

    /// Maps a provider status string to a category.
    ///
    /// Accepts the Google RPC status names and `ErrorInfo` reasons used in
    /// Gemini error bodies (`RESOURCE_EXHAUSTED`, `UNAUTHENTICATED`,
    /// `API_KEY_INVALID`, ...) as well as the standard
    /// names returned by [`name`](Self::name). Returns `None` for anything
    /// else so callers can fall back to the HTTP status.
    pub fn from_provider_status(status: &str) -> Option<Self> {
        let kind = match status {
            "RESOURCE_EXHAUSTED" | "quota_exhausted" | "insufficient_quota" => {
                Self::QuotaExhausted
            }
            "UNAUTHENTICATED" | "PERMISSION_DENIED" | "API_KEY_INVALID" | "authentication"
            | "invalid_api_key" => {
                Self::Authentication
            }
            "rate_limited" | "rate_limit_exceeded" => Self::RateLimited,
            _ => return None,
        };
        Some(kind)
    }

    /// Maps an HTTP status code to the most likely category.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Authentication,
            429 => Self::RateLimited,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

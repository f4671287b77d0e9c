use crate::error_code::ProviderErrorKind;
use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "questions", "config.temperature")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected range, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "input_validator", "config_loader")
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

/// Unified error type for grounded question answering.
///
/// Every failure of [`QaClient::answer`](crate::QaClient::answer) lands in one
/// of these categories so callers can render a distinct message for each.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid input: {message}{}", format_context(.context))]
    InvalidInput {
        message: String,
        context: ErrorContext,
    },

    #[error("Not configured: {message}")]
    NotConfigured { message: String },

    #[error("Malformed model response: {message}")]
    MalformedResponse { message: String, raw: String },

    #[error("Provider error ({kind}){}: {message}", format_status(.status))]
    Provider {
        kind: ProviderErrorKind,
        status: Option<u16>,
        message: String,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
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

fn format_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" HTTP {}", code),
        None => String::new(),
    }
}

impl Error {
    /// Create a new invalid-input error with structured context
    pub fn invalid_input_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::InvalidInput {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn not_configured(msg: impl Into<String>) -> Self {
        Error::NotConfigured {
            message: msg.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>, raw: impl Into<String>) -> Self {
        Error::MalformedResponse {
            message: msg.into(),
            raw: raw.into(),
        }
    }

    pub fn provider(kind: ProviderErrorKind, status: Option<u16>, msg: impl Into<String>) -> Self {
        Error::Provider {
            kind,
            status,
            message: msg.into(),
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::InvalidInput { context, .. } | Error::Configuration { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// Provider category for failures of the outbound call.
    ///
    /// Transport failures never reached the provider's classifier and are
    /// reported as [`ProviderErrorKind::Other`].
    pub fn provider_kind(&self) -> Option<ProviderErrorKind> {
        match self {
            Error::Provider { kind, .. } => Some(*kind),
            Error::Transport(_) => Some(ProviderErrorKind::Other),
            _ => None,
        }
    }

    /// Whether the person who submitted the request can fix it by editing the input.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Error::InvalidInput { .. })
    }

    /// Short message suitable for display next to the form.
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidInput { message, .. } => message.clone(),
            Error::NotConfigured { .. } => {
                "No API key is configured for the model provider.".to_string()
            }
            Error::MalformedResponse { .. } => {
                "The model returned a response that could not be understood.".to_string()
            }
            Error::Provider { kind, .. } => kind.user_message().to_string(),
            Error::Transport(_) => "Could not reach the model provider.".to_string(),
            other => other.to_string(),
        }
    }
}

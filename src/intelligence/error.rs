use std::fmt;

/// Failures of a generation call.
///
/// `InvalidInput` is the caller's fault; everything else is a server-side
/// failure whose detail must stay in the logs.
#[derive(Debug)]
pub enum GenerationError {
    /// Missing/empty text or an unsupported option value
    InvalidInput(String),
    /// No provider credential configured
    MissingApiKey,
    /// Transport failure or non-success status from the provider
    Upstream(String),
    /// Provider answered without any message content
    EmptyCompletion,
    /// Provider content did not match the expected schema
    MalformedResponse(String),
}

impl GenerationError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, GenerationError::InvalidInput(_))
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::InvalidInput(msg) => write!(f, "{}", msg),
            GenerationError::MissingApiKey => write!(f, "Server is missing OPENAI_API_KEY"),
            GenerationError::Upstream(msg) => write!(f, "Provider request failed: {}", msg),
            GenerationError::EmptyCompletion => write!(f, "Provider returned no content"),
            GenerationError::MalformedResponse(msg) => {
                write!(f, "Provider returned malformed output: {}", msg)
            }
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        GenerationError::Upstream(e.to_string())
    }
}

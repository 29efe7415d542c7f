use reqwest::Url;
use std::error::Error;
use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    InvalidApiKey(String),
    InvalidModel(String),
    InvalidBaseUrl(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationError::InvalidApiKey(msg) => write!(f, "Invalid API Key: {}", msg),
            ValidationError::InvalidModel(msg) => write!(f, "Invalid Model: {}", msg),
            ValidationError::InvalidBaseUrl(msg) => write!(f, "Invalid Base URL: {}", msg),
        }
    }
}

impl Error for ValidationError {}

/// Validates the API credential.
/// Must be non-empty once trimmed and contain no inner whitespace,
/// since it is sent verbatim as a bearer token.
pub fn validate_api_key(api_key: &str) -> Result<String, ValidationError> {
    let api_key = api_key.trim();

    if api_key.is_empty() {
        return Err(ValidationError::InvalidApiKey(
            "API key cannot be empty".to_string(),
        ));
    }

    if api_key.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidApiKey(
            "API key cannot contain whitespace".to_string(),
        ));
    }

    Ok(api_key.to_string())
}

/// Validates a chat-completion model identifier
pub fn validate_model(model: &str) -> Result<String, ValidationError> {
    let model = model.trim();

    if model.is_empty() {
        return Err(ValidationError::InvalidModel(
            "Model name cannot be empty".to_string(),
        ));
    }

    if model.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidModel(format!(
            "Model name '{}' cannot contain whitespace",
            model
        )));
    }

    Ok(model.to_string())
}

/// Validates the API base URL.
/// Must be an absolute http(s) URL; the trailing slash is stripped so
/// endpoint paths can be appended with a single `/`.
pub fn validate_base_url(base_url: &str) -> Result<String, ValidationError> {
    let base_url = base_url.trim();

    let parsed = Url::parse(base_url).map_err(|e| {
        ValidationError::InvalidBaseUrl(format!("'{}' is not a valid URL ({})", base_url, e))
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ValidationError::InvalidBaseUrl(format!(
            "Unsupported scheme '{}'. Only http and https are allowed",
            parsed.scheme()
        )));
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ValidationError::InvalidBaseUrl(
            "Base URL cannot carry a query string or fragment".to_string(),
        ));
    }

    Ok(base_url.trim_end_matches('/').to_string())
}

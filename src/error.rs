use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

/// Everything that can end a chat session. Every variant is fatal to the
/// process; nothing is retried.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("env file not found: {}", .0.display())]
    EnvFileMissing(PathBuf),

    #[error("failed to load env file {}: {source}", .path.display())]
    EnvFileMalformed {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },

    #[error("{0} not set in environment")]
    MissingCredential(&'static str),

    #[error(transparent)]
    InvalidConfig(#[from] ValidationError),

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("chat completion returned no choices")]
    EmptyCompletion,

    #[error("chat completion returned neither content nor a refusal")]
    BlankCompletion,

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_names_the_variable() {
        let err = ChatError::MissingCredential("OPENAI_API_KEY");
        assert_eq!(err.to_string(), "OPENAI_API_KEY not set in environment");
    }

    #[test]
    fn api_error_carries_status_and_message() {
        let err = ChatError::Api {
            endpoint: "threads".to_string(),
            status: 401,
            message: "Incorrect API key provided".to_string(),
        };
        assert_eq!(err.to_string(), "threads returned 401: Incorrect API key provided");
    }
}

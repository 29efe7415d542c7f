use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ChatError, Result};
use crate::validation;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const MODEL_VAR: &str = "OPENAI_MODEL";

pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Command-line overrides, as parsed by `cli::parse_run_options`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub env_file: Option<PathBuf>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub render_markdown: bool,
    pub show_history: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub render_markdown: bool,
    pub show_history: bool,
}

impl Config {
    /// Loads the env file into the process environment, then reads the
    /// configuration from it.
    pub fn load(options: &RunOptions) -> Result<Self> {
        let env_file = options
            .env_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));
        load_env_file(&env_file)?;
        Self::from_lookup(options, |key| std::env::var(key).ok())
    }

    /// Builds the configuration from `lookup` without touching the process
    /// environment. CLI options win over variables.
    pub fn from_lookup<F>(options: &RunOptions, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.is_empty())
            .ok_or(ChatError::MissingCredential(API_KEY_VAR))?;
        let api_key = validation::validate_api_key(&api_key)?;

        let base_url = options
            .base_url
            .clone()
            .or_else(|| lookup(BASE_URL_VAR))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = validation::validate_base_url(&base_url)?;

        let model = options
            .model
            .clone()
            .or_else(|| lookup(MODEL_VAR))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let model = validation::validate_model(&model)?;

        Ok(Self {
            api_key,
            base_url,
            model,
            render_markdown: options.render_markdown,
            show_history: options.show_history,
        })
    }
}

/// Populates the process environment from a dotenv file. A missing file is
/// an error, reported separately from a malformed one.
pub fn load_env_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(ChatError::EnvFileMissing(path.to_path_buf()));
    }
    dotenv::from_path(path).map_err(|source| ChatError::EnvFileMalformed {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "env file loaded");
    Ok(())
}

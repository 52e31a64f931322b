//! Settings for parlor bots
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables (after loading `.env`). Credentials are only
//! checked when a bot asks for them through [`Settings::require`], so each
//! bot fails fast on exactly the keys it needs, before any network call.

mod error;

pub use error::{ConfigError, Result};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Gemini's OpenAI-compatible endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// Default for the guardrail and hotel bots
pub const GUARDED_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_WEATHER_URL: &str = "http://api.weatherapi.com/v1";
pub const DEFAULT_SEARCH_URL: &str = "https://api.tavily.com";
pub const DEFAULT_MAX_TURNS: usize = 10;

pub const ENV_MODEL_KEY: &str = "GEMINI_API_KEY";
pub const ENV_SEARCH_KEY: &str = "TAVILY_API_KEY";
pub const ENV_WEATHER_KEY: &str = "WEATHER_API_KEY";
pub const ENV_MODEL: &str = "PARLOR_MODEL";
pub const ENV_BASE_URL: &str = "PARLOR_BASE_URL";
pub const ENV_MAX_TURNS: &str = "PARLOR_MAX_TURNS";

/// A secret some bots need
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    /// Chat model API key
    Model,
    /// Web search API key
    Search,
    /// Weather API key
    Weather,
}

impl Credential {
    pub fn env_var(self) -> &'static str {
        match self {
            Credential::Model => ENV_MODEL_KEY,
            Credential::Search => ENV_SEARCH_KEY,
            Credential::Weather => ENV_WEATHER_KEY,
        }
    }
}

/// Hosted chat model endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelEndpoint {
    pub base_url: String,
    /// Unset means each bot uses its own default
    pub name: Option<String>,
    pub api_key: Option<String>,
}

impl Default for ModelEndpoint {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            name: None,
            api_key: None,
        }
    }
}

impl ModelEndpoint {
    pub fn name_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(default)
    }
}

/// Weather service used by the weather tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherService {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for WeatherService {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_WEATHER_URL.to_string(),
            api_key: None,
        }
    }
}

/// Web search service used by the search tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchService {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for SearchService {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_URL.to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: ModelEndpoint,
    pub weather: WeatherService,
    pub search: SearchService,
    pub max_turns: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: ModelEndpoint::default(),
            weather: WeatherService::default(),
            search: SearchService::default(),
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl Settings {
    /// Load `.env`, the settings file and the process environment
    ///
    /// Without an explicit path, `<config dir>/parlor/parlor.toml` is read if
    /// it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// `<config dir>/parlor/parlor.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("parlor").join("parlor.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let settings = Self::from_toml(&contents)?;
        debug!(path = %path.display(), "Loaded settings file");
        Ok(settings)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Overlay values found through `lookup`; empty values are ignored
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_MODEL_KEY) {
            self.model.api_key = Some(key);
        }
        if let Some(key) = get(ENV_SEARCH_KEY) {
            self.search.api_key = Some(key);
        }
        if let Some(key) = get(ENV_WEATHER_KEY) {
            self.weather.api_key = Some(key);
        }
        if let Some(model) = get(ENV_MODEL) {
            self.model.name = Some(model);
        }
        if let Some(url) = get(ENV_BASE_URL) {
            self.model.base_url = url;
        }
        if let Some(turns) = get(ENV_MAX_TURNS) {
            self.max_turns = turns.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_MAX_TURNS,
                message: format!("expected a positive integer, got {:?}", turns),
            })?;
        }
        Ok(())
    }

    /// The credential's value, or an error naming the missing variable
    pub fn require(&self, credential: Credential) -> Result<&str> {
        let value = match credential {
            Credential::Model => self.model.api_key.as_deref(),
            Credential::Search => self.search.api_key.as_deref(),
            Credential::Weather => self.weather.api_key.as_deref(),
        };
        value
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingCredential(credential.env_var()))
    }

    /// Check several credentials at once, reporting the first missing one
    pub fn require_all(&self, credentials: &[Credential]) -> Result<()> {
        for credential in credentials {
            self.require(*credential)?;
        }
        Ok(())
    }
}

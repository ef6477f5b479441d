//! Handles settings for the application.
//!
//! Values come from an optional `settings.toml` (see `settings.example.toml`)
//! and are overridden by `DRAWRUN__*` environment variables, e.g.
//! `DRAWRUN__APP__POLICY=item_and_budget` or
//! `DRAWRUN__SOURCE__FILE=fixtures/sample.json`.
use std::{fmt, path::PathBuf};

use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use engine::DrawPolicy;
use serde::Deserialize;

const BUDGETS_URL: &str = "http://built-budgets";
const DRAWS_URL: &str = "http://built-draws";

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub policy: DrawPolicy,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
            policy: DrawPolicy::default(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Http {
    #[serde(default = "default_budgets_url")]
    pub budgets_url: String,
    #[serde(default = "default_draws_url")]
    pub draws_url: String,
    pub timeout_secs: Option<u64>,
}

fn default_budgets_url() -> String {
    BUDGETS_URL.to_string()
}

fn default_draws_url() -> String {
    DRAWS_URL.to_string()
}

/// Where the budgets, items and draw requests of a run come from.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Http(Http),
    /// A JSON snapshot holding all three collections.
    File(PathBuf),
}

impl Default for Source {
    fn default() -> Self {
        Self::Http(Http {
            budgets_url: default_budgets_url(),
            draws_url: default_draws_url(),
            timeout_secs: None,
        })
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(http) => write!(f, "{} and {}", http.budgets_url, http.draws_url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub source: Source,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        Self::build(
            Config::builder()
                .add_source(File::with_name(path).required(false))
                .add_source(Environment::with_prefix("DRAWRUN").separator("__")),
        )
    }

    fn build(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

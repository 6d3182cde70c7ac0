//! Configuration management for Showcase.
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present) into a process-wide instance.

use std::env;
use std::sync::OnceLock;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Initialize configuration (call once at startup)
pub fn init() -> &'static Config {
    config()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub rules: ProjectRulesConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

/// Business rules applied by the validation gate.
#[derive(Debug, Clone)]
pub struct ProjectRulesConfig {
    /// Maximum title length in characters, measured after trimming.
    pub title_max_chars: usize,
}

impl Default for ProjectRulesConfig {
    fn default() -> Self {
        Self {
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
        }
    }
}

pub const DEFAULT_TITLE_MAX_CHARS: usize = 40;

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            server: ServerConfig {
                host: env_or("SHOWCASE_HOST", "0.0.0.0"),
                port: env_or("SHOWCASE_PORT", "8765").parse().unwrap_or(8765),
            },
            database: DatabaseConfig {
                path: env_or("DATABASE_PATH", "./data/showcase.db"),
            },
            rules: ProjectRulesConfig {
                title_max_chars: env_or("PROJECT_TITLE_MAX_CHARS", "40")
                    .parse()
                    .unwrap_or(DEFAULT_TITLE_MAX_CHARS),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

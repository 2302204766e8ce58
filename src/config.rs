use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_FILE: &str = ".env";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub production: ProductionConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_request_timeout() -> u64 { 10_000 }

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    /// Farm to open on startup. The first farm the account can see when unset.
    pub farm_id: Option<i64>,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_s: u64,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_refresh_interval() -> u64 { 300 }
fn default_log_file() -> PathBuf { PathBuf::from("farm-dash.log") }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            farm_id: None,
            refresh_interval_s: default_refresh_interval(),
            log_file: default_log_file(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProductionConfig {
    /// Drop monthly-total records whose label names another year.
    #[serde(default = "default_true")]
    pub enforce_year_match: bool,
}

fn default_true() -> bool { true }

impl Default for ProductionConfig {
    fn default() -> Self {
        Self { enforce_year_match: true }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
}

fn default_session_file() -> PathBuf { PathBuf::from(".farm-dash/session.json") }

impl Default for StorageConfig {
    fn default() -> Self {
        Self { session_file: default_session_file() }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse config TOML")
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let path = Path::new(ENV_FILE);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        for line in content.lines() {
            let line = line.trim().trim_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim().trim_matches('"').trim_matches('\'');
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
        }
    }

    /// Token from `FARM_API_TOKEN`, if set.
    pub fn env_token() -> Option<String> {
        std::env::var("FARM_API_TOKEN")
            .ok()
            .map(|t| sanitize_key(&t))
            .filter(|t| !t.is_empty())
    }

    /// Interactive sign-in prompt. The username defaults to `FARM_USERNAME`.
    pub fn prompt_credentials() -> Result<(String, String)> {
        let username = match std::env::var("FARM_USERNAME") {
            Ok(u) if !u.is_empty() => sanitize_key(&u),
            _ => prompt("Username")?,
        };
        let password = prompt("Password")?;
        Ok((username, password))
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("  {} > ", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let value = input.trim().to_string();
    if value.is_empty() {
        anyhow::bail!("{} cannot be empty", label);
    }
    Ok(value)
}

/// Strip carriage returns, BOM, and other invisible chars from a pasted value.
fn sanitize_key(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses() {
        let config = Config::load(Path::new("config.toml")).unwrap();
        assert!(config.api.base_url.starts_with("http"));
        assert_eq!(config.dashboard.refresh_interval_s, 300);
        assert!(config.production.enforce_year_match);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::parse("[api]\nbase_url = \"http://localhost:8000\"\n").unwrap();
        assert_eq!(config.api.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.dashboard.farm_id, None);
        assert_eq!(config.dashboard.log_file, PathBuf::from("farm-dash.log"));
        assert_eq!(config.storage.session_file, PathBuf::from(".farm-dash/session.json"));
    }

    #[test]
    fn test_missing_api_section_fails() {
        assert!(Config::parse("[dashboard]\nfarm_id = 3\n").is_err());
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("\u{feff}tok\r\n"), "tok");
    }
}

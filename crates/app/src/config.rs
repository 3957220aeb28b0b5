use anyhow::{Context, Result};
use ledgerai_assist::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use ledgerai_assist::GeminiConfig;
use ledgerai_reconcile::{MatchPolicy, StatementProfile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "ledgerai.toml";
pub const DATABASE_FILE: &str = "ledger.db";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Falls back to `<data dir>/ledger.db` when unset.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub gemini: GeminiSettings,
    pub matching: MatchPolicy,
    pub statement: StatementProfile,
}

impl AppConfig {
    pub fn from_toml(s: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(s).context("Failed to parse config")?;
        config.matching.validate()?;
        Ok(config)
    }

    /// Reads `explicit` if given (it must exist), otherwise `default_path`
    /// if present, otherwise built-in defaults.
    pub fn load(explicit: Option<&Path>, default_path: Option<&Path>) -> Result<Self> {
        let path = match (explicit, default_path) {
            (Some(p), _) => p,
            (None, Some(p)) if p.exists() => p,
            _ => return Ok(Self::default()),
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| data_dir.join(DATABASE_FILE))
    }

    pub fn gemini_config(&self, api_key: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: api_key.to_string(),
            model: self.gemini.model.clone(),
            base_url: self.gemini.base_url.clone(),
            timeout: Duration::from_secs(self.gemini.timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.matching.fee_text_threshold, 60);
    }

    #[test]
    fn sections_override() {
        let config = AppConfig::from_toml(
            r#"
[database]
path = "/tmp/books.db"

[gemini]
model = "gemini-2.5-pro"

[matching]
exact_text_threshold = 55
judge_timeout_secs = 10

[statement]
delimiter = ";"
has_header = false
"#,
        )
        .unwrap();
        assert_eq!(config.database_path(Path::new("/data")), PathBuf::from("/tmp/books.db"));
        assert_eq!(config.gemini.model, "gemini-2.5-pro");
        assert_eq!(config.gemini.timeout_secs, 60);
        assert_eq!(config.matching.exact_text_threshold, 55);
        assert_eq!(config.matching.fee_text_threshold, 60);
        assert_eq!(config.statement.delimiter, ";");
        assert!(!config.statement.has_header);
    }

    #[test]
    fn statement_columns_without_type_use_signed_amounts() {
        let config = AppConfig::from_toml(
            "[statement.columns]\ndate = 0\ndescription = 2\namount = 1\n",
        )
        .unwrap();
        assert_eq!(config.statement.columns.description, 2);
        assert_eq!(config.statement.columns.kind, None);
        assert_eq!(config.statement.date_format, "%Y-%m-%d");
    }

    #[test]
    fn invalid_policy_is_rejected() {
        assert!(AppConfig::from_toml("[matching]\nfee_tolerance = \"2\"").is_err());
    }

    #[test]
    fn default_database_lives_in_data_dir() {
        let config = AppConfig::default();
        assert_eq!(config.database_path(Path::new("/data")), PathBuf::from("/data/ledger.db"));
    }

    #[test]
    fn load_prefers_explicit_then_default_then_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("custom.toml");
        std::fs::write(&explicit, "[gemini]\ntimeout_secs = 5\n").unwrap();
        let fallback = dir.path().join(CONFIG_FILE);

        let config = AppConfig::load(Some(&explicit), Some(&fallback)).unwrap();
        assert_eq!(config.gemini.timeout_secs, 5);

        let config = AppConfig::load(None, Some(&fallback)).unwrap();
        assert_eq!(config, AppConfig::default());

        std::fs::write(&fallback, "[matching]\nfee_text_threshold = 75\n").unwrap();
        let config = AppConfig::load(None, Some(&fallback)).unwrap();
        assert_eq!(config.matching.fee_text_threshold, 75);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("nope.toml")), None).is_err());
    }

    #[test]
    fn gemini_config_carries_settings() {
        let config = AppConfig::default();
        let gemini = config.gemini_config("key");
        assert_eq!(gemini.api_key, "key");
        assert_eq!(gemini.timeout, Duration::from_secs(60));
    }
}

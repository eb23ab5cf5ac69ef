use config::builder::{ConfigBuilder, DefaultState};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub sources: SourceConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Where tickers and fundamentals come from
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default = "default_europe_csv")]
    pub europe_csv: PathBuf,

    #[serde(default = "default_index_url")]
    pub index_url: String,

    #[serde(default = "default_quote_summary_url")]
    pub quote_summary_url: String,

    #[serde(default = "default_cookie_url")]
    pub cookie_url: String,

    #[serde(default = "default_crumb_url")]
    pub crumb_url: String,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; sector-treemap/0.1)".to_string()
}
fn default_europe_csv() -> PathBuf {
    PathBuf::from("europe_tickers.csv")
}
fn default_index_url() -> String {
    "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies".to_string()
}
fn default_quote_summary_url() -> String {
    "https://query1.finance.yahoo.com/v10/finance/quoteSummary".to_string()
}
fn default_cookie_url() -> String {
    "https://fc.yahoo.com".to_string()
}
fn default_crumb_url() -> String {
    "https://query1.finance.yahoo.com/v1/test/getcrumb".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            europe_csv: default_europe_csv(),
            index_url: default_index_url(),
            quote_summary_url: default_quote_summary_url(),
            cookie_url: default_cookie_url(),
            crumb_url: default_crumb_url(),
        }
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides.
    /// Anything unreadable or invalid falls back to the defaults.
    pub fn load() -> Self {
        dotenv::dotenv().ok();

        let builder = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("TREEMAP").separator("__"));

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Self {
        let cfg = match builder.build() {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Unreadable configuration ({}), using defaults", e);
                return AppConfig::default();
            }
        };

        cfg.try_deserialize().unwrap_or_else(|e| {
            warn!("Invalid configuration ({}), using defaults", e);
            AppConfig::default()
        })
    }
}

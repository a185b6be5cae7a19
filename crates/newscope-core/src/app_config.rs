//! Typed application configuration.

use std::path::PathBuf;

/// Deployment environment, parsed from `NEWSCOPE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

/// All runtime configuration consumed by the collection pipeline.
///
/// Credentials are resolved once at startup and handed to adapters at
/// construction time; nothing here is mutated afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,

    /// Naver Open API credential pair; both required to register the adapter.
    pub naver_client_id: Option<String>,
    pub naver_client_secret: Option<String>,

    /// Google Custom Search credential pair; both required to register the adapter.
    pub google_api_key: Option<String>,
    pub google_cse_cx: Option<String>,

    /// WebDriver endpoint the newsroom scrapers connect to.
    pub webdriver_url: String,

    pub http_timeout_secs: u64,
    /// Bounded wait for an article's content container to appear.
    pub element_wait_secs: u64,
    pub user_agent: String,

    /// Root directory for the JSON export side-channel.
    pub export_dir: PathBuf,
}

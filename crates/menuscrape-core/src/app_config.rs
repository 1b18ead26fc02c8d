use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Directory the per-site menu JSON files are written to and served from.
    pub output_dir: PathBuf,
    /// Directory holding the static dashboard.
    pub static_dir: PathBuf,
    /// Optional YAML file with site profile overrides.
    pub profiles_path: Option<PathBuf>,
    /// When set, each run drops the rendered HTML (and a screenshot when the
    /// page session supports one) here.
    pub debug_dir: Option<PathBuf>,
    pub page_load_timeout_secs: u64,
    pub selector_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub fetch_max_retries: u32,
}

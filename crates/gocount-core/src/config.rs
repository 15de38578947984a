use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default search token.
pub const DEFAULT_TOKEN: &str = "Go";

/// HTTP client parameters for remote locators (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Overall transfer timeout in seconds (0 = no limit).
    pub timeout_secs: u64,
    /// Follow 3xx redirects.
    pub follow_redirects: bool,
    /// Maximum redirects followed when `follow_redirects` is set.
    pub max_redirects: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 60,
            follow_redirects: true,
            max_redirects: 10,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// `None` when the overall timeout is disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Global configuration loaded from `~/.config/gocount/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GocountConfig {
    /// Maximum number of jobs fetching/counting at once.
    pub max_concurrent_jobs: usize,
    /// Literal token counted in every source.
    pub token: String,
    /// Chunk size for reading local files.
    pub read_buffer_bytes: usize,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for GocountConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 5,
            token: DEFAULT_TOKEN.to_string(),
            read_buffer_bytes: 64 * 1024,
            http: HttpConfig::default(),
        }
    }
}

impl GocountConfig {
    /// Concurrency limit, never below 1.
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_jobs.max(1)
    }

    /// File read chunk size, never below 1.
    pub fn read_buffer(&self) -> usize {
        self.read_buffer_bytes.max(1)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gocount")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GocountConfig> {
    load_or_init_at(&config_path()?)
}

/// Like `load_or_init` but at an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<GocountConfig> {
    if !path.exists() {
        let default_cfg = GocountConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: GocountConfig = toml::from_str(&data)?;
    Ok(cfg)
}

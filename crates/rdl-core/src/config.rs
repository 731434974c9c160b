use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Network parameters for a single candidate-location fetch (`[fetch]` in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Connection-establishment timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Maximum stall between received bytes, in seconds.
    pub read_timeout_secs: u64,
    /// Name of the query parameter attached to every request.
    pub format_param: String,
    /// Value of the query parameter attached to every request.
    pub format_value: String,
    /// Redirect hops followed before giving up.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,
}

fn default_max_redirects() -> u32 {
    10
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
            format_param: "downloadformat".to_string(),
            format_value: "pdf".to_string(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl FetchConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

/// Input table column names (`[columns]` in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub identifier: String,
    pub primary: String,
    pub secondary: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            identifier: "BRnum".to_string(),
            primary: "Pdf_URL".to_string(),
            secondary: "Report Html Address".to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/rdl/config.toml`.
///
/// Relative paths are resolved against the working directory of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdlConfig {
    /// Input table (CSV) listing the records to download.
    pub input_path: PathBuf,
    /// Status ledger file; loaded on start when present, rewritten on every append.
    pub ledger_path: PathBuf,
    /// Directory receiving `<identifier>.<ext>` documents.
    pub output_dir: PathBuf,
    /// Only the first `record_limit` input rows are processed.
    pub record_limit: usize,
    /// Extension of stored documents (without the dot).
    pub document_extension: String,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub columns: ColumnConfig,
}

impl Default for RdlConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("GRI_2017_2020.csv"),
            ledger_path: PathBuf::from("report_status.csv"),
            output_dir: PathBuf::from("reports"),
            record_limit: 1000,
            document_extension: "pdf".to_string(),
            fetch: FetchConfig::default(),
            columns: ColumnConfig::default(),
        }
    }
}

impl RdlConfig {
    /// Returns a copy with every relative path joined onto `base`.
    pub fn resolved_against(&self, base: &Path) -> RdlConfig {
        let resolve = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base.join(p)
            }
        };
        RdlConfig {
            input_path: resolve(&self.input_path),
            ledger_path: resolve(&self.ledger_path),
            output_dir: resolve(&self.output_dir),
            ..self.clone()
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RdlConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Like `load_or_init` but at an explicit path (tests, alternate setups).
pub fn load_or_init_at(path: &Path) -> Result<RdlConfig> {
    if !path.exists() {
        let default_cfg = RdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: RdlConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

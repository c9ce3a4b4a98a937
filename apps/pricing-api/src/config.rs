//! # Configuration Loading
//!
//! Two layers of configuration:
//!
//! - [`ServerConfig`]: where to listen and where the pricing file lives,
//!   read from environment variables with defaults.
//! - [`load_pricing_config`]: the pricing tables themselves.
//!
//! ## Pricing Config Precedence
//! ```text
//! built-in defaults
//!        │
//!        ▼
//! pricing.toml  (MITRE_PRICING_CONFIG, or <config dir>/mitre/pricing.toml)
//!        │
//!        ▼
//! MITRE_TAX_RATE_BPS / MITRE_WASTE_ALERT_PERCENT / MITRE_MIN_CHOP_REMAINDER_FEET
//!        │
//!        ▼
//! validate (fail fast)
//! ```

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use mitre_core::{CoreError, PricingConfig};
use tracing::{debug, info};

/// Environment variable naming an explicit pricing file.
pub const PRICING_CONFIG_ENV: &str = "MITRE_PRICING_CONFIG";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port
    pub port: u16,

    /// Address to bind
    pub bind: IpAddr,

    /// Explicit pricing file; `None` means the platform config directory
    pub pricing_config_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(ServerConfig {
            port: env::var("PRICING_API_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PRICING_API_PORT".to_string()))?,

            bind: env::var("PRICING_API_BIND")
                .unwrap_or_else(|_| "0.0.0.0".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PRICING_API_BIND".to_string()))?,

            pricing_config_path: env::var(PRICING_CONFIG_ENV).ok().map(PathBuf::from),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Pricing config file not found: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error("Config reload task failed: {0}")]
    ReloadTask(String),
}

// =============================================================================
// Pricing Config
// =============================================================================

/// Returns the default pricing file path.
pub fn default_pricing_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "mitre", "pricing")
        .map(|dirs| dirs.config_dir().join("pricing.toml"))
}

/// Loads, overrides and validates the pricing configuration.
///
/// An explicit path must exist; the default path is optional.
pub fn load_pricing_config(explicit_path: Option<&Path>) -> Result<PricingConfig, ConfigError> {
    load_pricing_config_with(explicit_path, |key| env::var(key).ok())
}

/// [`load_pricing_config`] with an injectable environment lookup.
pub fn load_pricing_config_with<F>(
    explicit_path: Option<&Path>,
    lookup: F,
) -> Result<PricingConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match explicit_path {
        Some(path) if !path.exists() => return Err(ConfigError::MissingFile(path.to_path_buf())),
        Some(path) => read_file(path)?,
        None => match default_pricing_config_path().filter(|p| p.exists()) {
            Some(path) => read_file(&path)?,
            None => {
                info!("No pricing config file found, using built-in defaults");
                PricingConfig::default()
            }
        },
    };

    apply_env_overrides(&mut config, lookup)?;
    config.validate()?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<PricingConfig, ConfigError> {
    info!(?path, "Loading pricing config from file");
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_override<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key.to_string()))
}

fn apply_env_overrides<F>(config: &mut PricingConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup("MITRE_TAX_RATE_BPS") {
        config.tax_rate_bps = parse_override("MITRE_TAX_RATE_BPS", &raw)?;
        debug!(bps = config.tax_rate_bps, "Overriding tax rate from environment");
    }

    if let Some(raw) = lookup("MITRE_WASTE_ALERT_PERCENT") {
        config.procurement.waste_alert_percent = parse_override("MITRE_WASTE_ALERT_PERCENT", &raw)?;
        debug!(
            percent = config.procurement.waste_alert_percent,
            "Overriding waste alert threshold from environment"
        );
    }

    if let Some(raw) = lookup("MITRE_MIN_CHOP_REMAINDER_FEET") {
        config.procurement.min_chop_remainder_feet =
            parse_override("MITRE_MIN_CHOP_REMAINDER_FEET", &raw)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

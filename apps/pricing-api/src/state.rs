//! # Shared State
//!
//! The engine is immutable; reload builds a new one and swaps the `Arc`.
//!
//! ```text
//! request ──snapshot()──► Arc<PricingEngine> (clone, lock released)
//!                                │
//!                                ▼
//!                         compute without locks
//!
//! reload ──spawn_blocking(load + validate)──► ok?  ──yes──► write lock, swap Arc
//!                                             └──no───► keep current engine, return error
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mitre_core::{PricingConfig, PricingEngine};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::{load_pricing_config, ConfigError};

struct Loaded {
    engine: Arc<PricingEngine>,
    loaded_at: DateTime<Utc>,
}

/// Holder of the active pricing engine.
pub struct EngineHandle {
    current: RwLock<Loaded>,
    config_path: Option<PathBuf>,
}

impl EngineHandle {
    pub fn new(engine: PricingEngine, config_path: Option<PathBuf>) -> Self {
        EngineHandle {
            current: RwLock::new(Loaded {
                engine: Arc::new(engine),
                loaded_at: Utc::now(),
            }),
            config_path,
        }
    }

    /// Builds the initial engine from configuration.
    pub fn from_config(config: PricingConfig, config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self::new(config.into_engine()?, config_path))
    }

    /// Current engine; later reloads do not affect the returned snapshot.
    pub async fn snapshot(&self) -> Arc<PricingEngine> {
        Arc::clone(&self.current.read().await.engine)
    }

    /// Engine and its load time, read under one guard.
    pub async fn current(&self) -> (Arc<PricingEngine>, DateTime<Utc>) {
        let current = self.current.read().await;
        (Arc::clone(&current.engine), current.loaded_at)
    }

    /// Re-reads the pricing file and swaps the engine in.
    ///
    /// File access and validation run on the blocking pool.
    pub async fn reload(&self) -> Result<DateTime<Utc>, ConfigError> {
        let path = self.config_path.clone();
        let engine = tokio::task::spawn_blocking(move || {
            load_pricing_config(path.as_deref()).and_then(|config| Ok(config.into_engine()?))
        })
        .await
        .map_err(|e| ConfigError::ReloadTask(e.to_string()))
        .and_then(|loaded| loaded);

        let engine = match engine {
            Ok(engine) => engine,
            Err(e) => {
                warn!(error = %e, "Pricing config reload failed, keeping current tables");
                return Err(e);
            }
        };

        let loaded_at = Utc::now();
        let mut current = self.current.write().await;
        *current = Loaded {
            engine: Arc::new(engine),
            loaded_at,
        };
        info!(loaded_at = %loaded_at.to_rfc3339(), "Pricing config reloaded");
        Ok(loaded_at)
    }
}

/// Axum application state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<EngineHandle>,
}

impl AppState {
    pub fn new(handle: EngineHandle) -> Self {
        AppState {
            engine: Arc::new(handle),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_snapshot_survives_reload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"tax_rate_bps = 500\n").unwrap();

        let handle =
            EngineHandle::from_config(PricingConfig::default(), Some(file.path().to_path_buf()))
                .unwrap();
        let before = handle.snapshot().await;

        handle.reload().await.unwrap();
        let after = handle.snapshot().await;

        assert_eq!(before.tax_rate().bps(), 0);
        assert_eq!(after.tax_rate().bps(), 500);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_engine() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"tax_rate_bps = 500\n").unwrap();

        let handle = EngineHandle::from_config(
            PricingConfig::default(),
            Some(file.path().to_path_buf()),
        )
        .unwrap();
        let (_, loaded_at) = handle.current().await;

        std::fs::write(file.path(), "[labor]\nbase_fee = -3.0\n").unwrap();

        assert!(handle.reload().await.is_err());
        assert_eq!(handle.snapshot().await.tax_rate().bps(), 0);
        assert_eq!(handle.current().await.1, loaded_at);
    }

    #[tokio::test]
    async fn test_current_pairs_engine_with_its_load_time() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"tax_rate_bps = 650\n").unwrap();

        let handle =
            EngineHandle::from_config(PricingConfig::default(), Some(file.path().to_path_buf()))
                .unwrap();
        let (engine, _) = handle.current().await;
        assert_eq!(engine.tax_rate().bps(), 0);

        let reloaded_at = handle.reload().await.unwrap();
        let (engine, loaded_at) = handle.current().await;
        assert_eq!(engine.tax_rate().bps(), 650);
        assert_eq!(loaded_at, reloaded_at);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_reload_on_multi_thread_runtime() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"tax_rate_bps = 300\n").unwrap();

        let handle =
            EngineHandle::from_config(PricingConfig::default(), Some(file.path().to_path_buf()))
                .unwrap();
        handle.reload().await.unwrap();
        assert_eq!(handle.snapshot().await.tax_rate().bps(), 300);
    }
}

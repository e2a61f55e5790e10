//! Configuration file watcher for hot-reload support
//!
//! Layout edits are picked up while the typer runs. A reload that fails to
//! parse or validate is logged and dropped; the running layout stays.

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::AppConfig;

/// Wait for editors to finish writing before re-reading the file
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(100);

/// Watches the config file and yields each successfully reloaded config
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<AppConfig>,
}

impl ConfigWatcher {
    /// Load the config at `config_path` and start watching it
    ///
    /// # Returns
    /// The watcher plus the initial configuration
    pub async fn new(config_path: String) -> Result<(Self, AppConfig)> {
        let (tx, rx) = mpsc::channel(4);

        let initial = AppConfig::load(&config_path)
            .await
            .context("Failed to load initial config")?;

        // notify calls back on its own thread, outside the runtime
        let runtime = tokio::runtime::Handle::current();
        let reload_path = config_path.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) => {
                debug!("Config file changed: {:?}", event.paths);
                let path = reload_path.clone();
                let tx = tx.clone();

                runtime.spawn(async move {
                    tokio::time::sleep(RELOAD_DEBOUNCE).await;

                    match AppConfig::load(&path).await {
                        Ok(config) => {
                            info!("🔄 Layout configuration reloaded");
                            if let Err(e) = tx.send(config).await {
                                error!("Failed to forward reloaded config: {}", e);
                            }
                        }
                        Err(e) => warn!("Config reload rejected, keeping current layout: {:#}", e),
                    }
                });
            }
            Ok(_) => {}
            Err(e) => error!("Config watch error: {}", e),
        })?;

        watcher
            .watch(Path::new(&config_path), RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch config file: {}", config_path))?;

        info!("👀 Watching {} for changes", config_path);

        Ok((Self { _watcher: watcher, rx }, initial))
    }

    /// Wait for the next valid config
    ///
    /// Returns None once the watcher is gone.
    pub async fn next_config(&mut self) -> Option<AppConfig> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::SAMPLE;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reload_on_change() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("radial.yaml");
        fs::write(&config_path, SAMPLE)?;

        let (mut watcher, config) = ConfigWatcher::new(config_path.to_string_lossy().to_string()).await?;
        assert_eq!(config.layout.radius, 175.0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        fs::write(&config_path, SAMPLE.replace("radius: 175", "radius: 120"))?;

        let reloaded = tokio::time::timeout(Duration::from_secs(2), watcher.next_config())
            .await?
            .expect("watcher closed before delivering the reload");
        assert_eq!(reloaded.layout.radius, 120.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_initial_config_fails() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("radial.yaml");
        fs::write(&config_path, "layout: [")?;

        assert!(ConfigWatcher::new(config_path.to_string_lossy().to_string()).await.is_err());
        Ok(())
    }
}

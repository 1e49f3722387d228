use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Fraction of the remaining distance the follower covers per frame
    pub smoothing: f64,
    pub idle_ms: u64,
    pub trail_ms: u64,
    pub ripple_ms: u64,
    pub click_pulse_ms: u64,
    pub frame_ms: u64,
    pub trail_enabled: bool,
    pub glow: bool,
    pub corpus: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            smoothing: 0.15,
            idle_ms: 100,
            trail_ms: 1000,
            ripple_ms: 600,
            click_pulse_ms: 300,
            frame_ms: 16,
            trail_enabled: true,
            glow: false,
            corpus: "russian".to_string(),
        }
    }
}

impl Config {
    pub fn idle(&self) -> Duration {
        Duration::from_millis(self.idle_ms)
    }

    pub fn trail_lifetime(&self) -> Duration {
        Duration::from_millis(self.trail_ms)
    }

    pub fn ripple_lifetime(&self) -> Duration {
        Duration::from_millis(self.ripple_ms)
    }

    pub fn click_pulse(&self) -> Duration {
        Duration::from_millis(self.click_pulse_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "reptype") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("reptype_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => {
                    tracing::debug!(path = %self.path.display(), "loaded config");
                    cfg
                }
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), %err, "malformed config, using defaults");
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        tracing::info!(path = %self.path.display(), "saved config");
        Ok(())
    }
}

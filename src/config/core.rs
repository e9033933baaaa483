use crate::config::worldgen::WorldGenConfig;
use crate::utils::error::ConfigError;
use crate::world::block_id::BlockId;
use crate::world::blocks_data::is_registered;
use directories::ProjectDirs;
use glam::Vec3;
use log::{info, LevelFilter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub server_addr: String,
    pub connect_on_start: bool,
    pub connect_delay_ms: u64,
    /// Unset means the attempt waits for the OS to give up.
    pub connect_timeout_ms: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8080".to_string(),
            connect_on_start: true,
            connect_delay_ms: 1000,
            connect_timeout_ms: None,
        }
    }
}

impl NetworkConfig {
    pub fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub spawn: [f32; 3],
    pub default_block: BlockId,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: [0.0, 40.0, 0.0],
            default_block: BlockId::GRASS,
        }
    }
}

impl PlayerConfig {
    pub fn spawn_point(&self) -> Vec3 {
        Vec3::from(self.spawn)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Half-width, in blocks, of the square swept on redraw.
    pub render_distance: i32,
    /// Chunks generated around the spawn before the loop starts.
    pub preload_radius: i32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            render_distance: 50,
            preload_radius: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub log_level: String,
    pub network: NetworkConfig,
    pub player: PlayerConfig,
    pub render: RenderConfig,
    pub worldgen: WorldGenConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            network: NetworkConfig::default(),
            player: PlayerConfig::default(),
            render: RenderConfig::default(),
            worldgen: WorldGenConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let proj_dirs =
            ProjectDirs::from("com", "evander", "EvanderVoxel").ok_or(ConfigError::NoProjectDir)?;
        Ok(proj_dirs.config_dir().join("client.toml"))
    }

    /// Loads the config at `path`, writing the defaults there first if the
    /// file does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            info!("Wrote default config to {}", path.display());
            return Ok(config);
        }

        Self::load(path)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.server_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("network.server_addr is empty".into()));
        }
        if !is_registered(self.player.default_block) || self.player.default_block.is_air() {
            return Err(ConfigError::Invalid(format!(
                "player.default_block {} is not a placeable block",
                self.player.default_block
            )));
        }
        if self.render.render_distance < 0 || self.render.preload_radius < 0 {
            return Err(ConfigError::Invalid("render radii must not be negative".into()));
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("unknown log level {:?}", self.log_level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_creates_default_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/client.toml");

        let config = ClientConfig::load_or_create(&path).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(path.exists());

        let reloaded = ClientConfig::load_or_create(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(
            &path,
            r#"
            log_level = "debug"

            [network]
            server_addr = "10.0.0.2:9000"
            connect_timeout_ms = 2500
            "#,
        )
        .unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Debug);
        assert_eq!(config.network.server_addr, "10.0.0.2:9000");
        assert_eq!(config.network.connect_timeout(), Some(Duration::from_millis(2500)));
        assert!(config.network.connect_on_start);
        assert_eq!(config.worldgen, WorldGenConfig::default());
        assert_eq!(config.player.default_block, BlockId::GRASS);
    }

    #[test]
    fn test_rejects_bad_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("client.toml");

        std::fs::write(&path, "[player]\ndefault_block = 0\n").unwrap();
        assert!(matches!(ClientConfig::load(&path), Err(ConfigError::Invalid(_))));

        std::fs::write(&path, "log_level = \"chatty\"\n").unwrap();
        assert!(matches!(ClientConfig::load(&path), Err(ConfigError::Invalid(_))));

        std::fs::write(&path, "log_level = [").unwrap();
        assert!(matches!(ClientConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}

use color_eyre::eyre::Result;
use photolog_models::{FolderOrder, TableLayout};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Persistent configuration, read from `<config dir>/photolog/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub folder_order: FolderOrder,
    #[serde(default)]
    pub layout: TableLayout,
    #[serde(default)]
    pub operator: OperatorDefaults,
}

/// Values the operator usually types in every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorDefaults {
    pub processor: Option<String>,
    pub filler: Option<String>,
    pub location: Option<String>,
    pub unit: Option<String>,
    pub template: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from the default config location, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined, or the file
    /// exists but cannot be read or parsed.
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path).await
        } else {
            debug!("No config file at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Loads settings from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for `Settings`.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let settings: Self = toml::from_str(&content)?;
        info!("Settings loaded from {:?}", path);
        Ok(settings)
    }

    /// Writes settings to the default config location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined or written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(config_path, toml_string)?;

        info!("Settings saved to {:?}", config_path);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the platform has no config directory.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| color_eyre::eyre::eyre!("Could not find config directory"))?;
        Ok(config_dir.join("photolog").join("config.toml"))
    }
}

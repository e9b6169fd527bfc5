//! Browser configuration

use asset_fs::{AssetRoot, LogicalPath};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main browser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub project: ProjectConfig,
    pub browser: ViewConfig,
    pub keybindings: HashMap<String, Vec<String>>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            browser: ViewConfig::default(),
            keybindings: default_keybindings(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Directory on disk that holds the project's assets
    pub asset_directory: PathBuf,
    /// Logical prefix the asset directory is shown under
    pub logical_root: String,
    /// Engine asset file extension, with the dot
    pub asset_extension: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            asset_directory: PathBuf::from("Assets"),
            logical_root: "/Assets".to_string(),
            asset_extension: ".zasset".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub view_mode: ViewMode,
    pub left_column_width: f32,
    pub tile_thumbnail_width: f32,
    pub list_thumbnail_width: f32,
    /// Base name proposed for new folders
    pub new_folder_name: String,
    /// Search the whole subtree of the selected directory while filtering
    pub filter_recursively: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Tiles,
            left_column_width: 200.0,
            tile_thumbnail_width: 64.0,
            list_thumbnail_width: 32.0,
            new_folder_name: "NewFolder".to_string(),
            filter_recursively: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    #[serde(rename = "tiles")]
    Tiles,
    #[serde(rename = "list")]
    List,
}

impl BrowserConfig {
    /// Load configuration from the per-user config file
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::info!("Configuration loaded from {:?}", config_path);
            Ok(config)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Save configuration to the per-user config file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        tracing::info!("Configuration saved to {:?}", config_path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "AssetBrowser", "AssetBrowser")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }

    pub fn asset_root(&self) -> AssetRoot {
        AssetRoot::new(
            LogicalPath::new(&self.project.logical_root),
            self.project.asset_directory.clone(),
        )
    }

    pub fn thumbnail_width(&self, mode: ViewMode) -> f32 {
        match mode {
            ViewMode::Tiles => self.browser.tile_thumbnail_width,
            ViewMode::List => self.browser.list_thumbnail_width,
        }
    }
}

fn default_keybindings() -> HashMap<String, Vec<String>> {
    let mut kb = HashMap::new();

    kb.insert("browser.open".into(), vec!["Return".into()]);
    kb.insert("browser.rename".into(), vec!["F2".into()]);
    kb.insert("browser.delete".into(), vec!["Delete".into()]);
    kb.insert("browser.new_folder".into(), vec!["Ctrl+Shift+n".into()]);
    kb.insert("browser.clear_filters".into(), vec!["Escape".into()]);

    kb.insert("view.tiles".into(), vec!["Ctrl+1".into()]);
    kb.insert("view.list".into(), vec!["Ctrl+2".into()]);

    kb
}

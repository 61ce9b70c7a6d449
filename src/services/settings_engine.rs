// Settings engine for the browser shell.
// Loads, saves and updates ShellSettings stored as JSON in the platform config
// directory. Components receive the loaded values at construction time.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::types::errors::SettingsError;
use crate::types::settings::ShellSettings;

/// Environment variable overriding `backend.api_base_url`.
pub const API_URL_ENV: &str = "FOCUSBROWSER_API_URL";

const APP_DIR: &str = "focusbrowser";
const SETTINGS_FILE: &str = "settings.json";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<ShellSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &ShellSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &Path;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: PathBuf,
    settings: ShellSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// Without an override the file is `<config dir>/focusbrowser/settings.json`.
    pub fn new(path_override: Option<PathBuf>) -> Self {
        let config_path = path_override.unwrap_or_else(default_config_path);
        Self {
            config_path,
            settings: ShellSettings::default(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                debug!("backend URL overridden by {}", API_URL_ENV);
                self.settings.backend.api_base_url = url.trim().to_string();
            }
        }
    }
}

/// Platform config location for the settings file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(env::temp_dir)
        .join(APP_DIR)
        .join(SETTINGS_FILE)
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from disk, falling back to defaults when the file does
    /// not exist. A malformed file is an error.
    fn load(&mut self) -> Result<ShellSettings, SettingsError> {
        self.settings = if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path)
                .map_err(|e| SettingsError::Io(format!("Failed to read config file: {}", e)))?;
            serde_json::from_str(&content)
                .map_err(|e| SettingsError::Serialization(format!("Failed to parse config file: {}", e)))?
        } else {
            ShellSettings::default()
        };
        self.apply_env_overrides();
        info!("settings loaded from {}", self.config_path.display());
        Ok(self.settings.clone())
    }

    fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SettingsError::Io(format!("Failed to create config directory: {}", e)))?;
        }
        let json = serde_json::to_string_pretty(&self.settings)
            .map_err(|e| SettingsError::Serialization(format!("Failed to serialize settings: {}", e)))?;
        fs::write(&self.config_path, json)
            .map_err(|e| SettingsError::Io(format!("Failed to write config file: {}", e)))
    }

    fn get_settings(&self) -> &ShellSettings {
        &self.settings
    }

    /// Updates one setting by dot-separated path (e.g. `"backend.policy_timeout_ms"`)
    /// and saves immediately. The value is validated by deserializing the
    /// whole settings tree.
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        let mut parts: Vec<&str> = key.split('.').collect();
        if key.is_empty() || parts.iter().any(|p| p.is_empty()) {
            return Err(SettingsError::InvalidKey(format!("'{}'", key)));
        }
        let leaf = parts.pop().unwrap_or_default();

        let mut tree = serde_json::to_value(&self.settings)
            .map_err(|e| SettingsError::Serialization(e.to_string()))?;

        let mut node = &mut tree;
        for part in parts {
            node = node
                .get_mut(part)
                .ok_or_else(|| SettingsError::InvalidKey(key.to_string()))?;
        }
        match node.as_object_mut() {
            Some(map) if map.contains_key(leaf) => {
                map.insert(leaf.to_string(), value);
            }
            _ => return Err(SettingsError::InvalidKey(key.to_string())),
        }

        self.settings = serde_json::from_value(tree)
            .map_err(|e| SettingsError::InvalidValue(format!("{}: {}", key, e)))?;
        self.save()
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = ShellSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}

// Linkshelf Settings Engine
// Loads, saves and edits the engine settings (import limits, icon rewriting,
// retrieval defaults). Settings live in a JSON file at the platform config path.

use std::fs;
use std::path::Path;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::EngineSettings;

pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<EngineSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &EngineSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

pub struct SettingsEngine {
    config_path: String,
    settings: EngineSettings,
}

impl SettingsEngine {
    /// Uses `path_override` when given, `<config dir>/settings.json` otherwise.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => platform::get_config_dir()
                .join("settings.json")
                .to_string_lossy()
                .to_string(),
        };

        Self {
            config_path,
            settings: EngineSettings::default(),
        }
    }
}

/// Rejects settings the engine cannot run with.
pub fn validate(settings: &EngineSettings) -> Result<(), SettingsError> {
    if settings.import.max_concurrent_creates == 0 {
        return Err(SettingsError::InvalidValue(
            "import.max_concurrent_creates must be at least 1".to_string(),
        ));
    }
    if settings.import.timeout_secs == 0 {
        return Err(SettingsError::InvalidValue(
            "import.timeout_secs must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// The JSON slot of a `section.field` key inside serialized settings.
/// Every setting is a leaf two levels down; whole sections are not assignable.
fn field_slot<'a>(
    tree: &'a mut serde_json::Value,
    key: &str,
) -> Result<&'a mut serde_json::Value, SettingsError> {
    let unknown = || SettingsError::InvalidKey(format!("Key '{}' not found in settings", key));
    let (section, field) = key.split_once('.').ok_or_else(unknown)?;
    if section.is_empty() || field.contains('.') {
        return Err(unknown());
    }
    tree.get_mut(section)
        .and_then(|s| s.get_mut(field))
        .ok_or_else(unknown)
}

impl SettingsEngineTrait for SettingsEngine {
    /// Missing file yields defaults; a malformed or invalid one is an error.
    fn load(&mut self) -> Result<EngineSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.settings = EngineSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        let settings: EngineSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        validate(&settings)?;

        tracing::debug!(path = %self.config_path, "loaded settings");
        self.settings = settings;
        Ok(self.settings.clone())
    }

    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn get_settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Updates one setting by `section.field` key and saves.
    ///
    /// - `"import.max_concurrent_creates"`
    /// - `"icons.replacement_token"`
    /// - `"retrieval.sort_direction"`
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        let mut tree = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;
        *field_slot(&mut tree, key)? = value;

        let updated: EngineSettings = serde_json::from_value(tree).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;
        validate(&updated)?;

        tracing::info!(key, "setting updated");
        self.settings = updated;
        self.save()
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = EngineSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}

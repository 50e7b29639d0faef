//! Override source backed by the `[[properties]]` of the engine settings

use bizdate_core::overrides::MapOverrideSource;
use bizdate_core::{OverrideSource, Result};

use crate::settings::{Settings, SettingsLoader};

/// Reloadable view of the settings' properties
///
/// Values are snapshotted when loaded; `reload` reads the settings sources
/// again and swaps the snapshot, and the provider sees the new values on its
/// next read.
#[derive(Debug)]
pub struct SettingsOverrideSource {
    loader: SettingsLoader,
    values: MapOverrideSource,
}

impl SettingsOverrideSource {
    /// Snapshot the properties of already loaded `settings`
    pub fn new(loader: SettingsLoader, settings: &Settings) -> Self {
        let values = MapOverrideSource::new();
        values.reload(settings.property_map());
        Self { loader, values }
    }

    /// Load settings from `loader` and snapshot their properties
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the settings cannot be loaded.
    pub fn load(loader: SettingsLoader) -> Result<Self> {
        let settings = loader.load()?;
        Ok(Self::new(loader, &settings))
    }

    /// Re-read the settings sources and replace every value
    ///
    /// On failure the previous values stay in effect.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the settings cannot be loaded.
    pub fn reload(&self) -> Result<()> {
        let settings = self.loader.load()?;
        let properties = settings.property_map();
        tracing::debug!(properties = properties.len(), "override properties reloaded");
        self.values.reload(properties);
        Ok(())
    }
}

impl OverrideSource for SettingsOverrideSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key)
    }
}

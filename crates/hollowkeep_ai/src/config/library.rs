//! Registry archetypes (встроенные + RON data files)

use std::collections::HashMap;

use bevy::prelude::*;
use thiserror::Error;

use super::ArchetypeConfig;

/// Ошибки загрузки конфигурации
///
/// Только load-time: во время симуляции AI никогда не возвращает ошибок.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse archetype data: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("unknown archetype '{0}'")]
    UnknownArchetype(String),

    #[error("archetype '{name}' is invalid: {reason}")]
    Invalid { name: String, reason: String },
}

/// Registry archetypes по имени
#[derive(Resource, Debug, Clone, Default)]
pub struct ArchetypeLibrary {
    archetypes: HashMap<String, ArchetypeConfig>,
}

impl ArchetypeLibrary {
    /// Все встроенные presets
    pub fn builtin() -> Self {
        let mut library = Self::default();
        for config in ArchetypeConfig::builtin() {
            library.archetypes.insert(config.name.clone(), config);
        }
        library
    }

    /// Парсит RON список `[ (name: "...", ...), ... ]`
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let mut library = Self::default();
        library.merge_ron(source)?;
        Ok(library)
    }

    /// Добавляет/переопределяет archetypes из RON (по имени)
    pub fn merge_ron(&mut self, source: &str) -> Result<usize, ConfigError> {
        let configs: Vec<ArchetypeConfig> = ron::from_str(source)?;
        let count = configs.len();

        for config in configs {
            self.insert(config)?;
        }

        Ok(count)
    }

    pub fn insert(&mut self, config: ArchetypeConfig) -> Result<(), ConfigError> {
        config.validate().map_err(|reason| ConfigError::Invalid {
            name: config.name.clone(),
            reason,
        })?;
        if self.archetypes.contains_key(&config.name) {
            crate::log_warning(&format!("archetype '{}' overridden", config.name));
        }
        self.archetypes.insert(config.name.clone(), config);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&ArchetypeConfig, ConfigError> {
        self.archetypes
            .get(name)
            .ok_or_else(|| ConfigError::UnknownArchetype(name.to_string()))
    }

    /// Имена в отсортированном порядке (детерминизм для runner'а)
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.archetypes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}

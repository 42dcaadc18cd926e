//! Display names for AtlasLoot instance keys.
//!
//! The built-in table covers the Burning Crusade data set. Additional or
//! corrected names can be supplied through a TOML file like:
//! ```toml
//! [instances]
//! Karazhan = "Karazhan"
//! TheEye = "Tempest Keep: The Eye"
//! ```

use crate::error::{ItemSourceError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_INSTANCE_NAMES: [(&str, &str); 26] = [
    ("HellfireRamparts", "Hellfire Ramparts"),
    ("TheBloodFurnace", "The Blood Furnace"),
    ("TheShatteredHalls", "The Shattered Halls"),
    ("Mana-Tombs", "Mana-Tombs"),
    ("AuchenaiCrypts", "Auchenai Crypts"),
    ("SethekkHalls", "Sethekk Halls"),
    ("ShadowLabyrinth", "Shadow Labyrinth"),
    ("TheSlavePens", "The Slave Pens"),
    ("TheUnderbog", "The Underbog"),
    ("TheSteamvault", "The Steamvault"),
    ("OldHillsbradFoothills", "Old Hillsbrad Foothills"),
    ("TheBlackMorass", "The Black Morass"),
    ("TheArcatraz", "The Arcatraz"),
    ("TheBotanica", "The Botanica"),
    ("TheMechanar", "The Mechanar"),
    ("MagistersTerrace", "Magisters' Terrace"),
    ("Karazhan", "Karazhan"),
    ("ZulAman", "Zul'Aman"),
    ("WorldBossesBC", "World Bosses"),
    ("MagtheridonsLair", "Magtheridon's Lair"),
    ("GruulsLair", "Gruul's Lair"),
    ("SerpentshrineCavern", "Serpentshrine Cavern"),
    ("TempestKeep", "Tempest Keep"),
    ("HyjalSummit", "Hyjal Summit"),
    ("BlackTemple", "Black Temple"),
    ("SunwellPlateau", "Sunwell Plateau"),
];

/// Override file layout.
#[derive(Debug, Deserialize, Default)]
struct InstanceNamesFile {
    #[serde(default)]
    instances: HashMap<String, String>,
}

/// Lookup from internal instance key to display name.
#[derive(Debug, Clone)]
pub struct InstanceNameTable {
    names: HashMap<String, String>,
}

impl Default for InstanceNameTable {
    fn default() -> Self {
        Self {
            names: DEFAULT_INSTANCE_NAMES
                .iter()
                .map(|(key, name)| (key.to_string(), name.to_string()))
                .collect(),
        }
    }
}

impl InstanceNameTable {
    /// Table with no entries; every key resolves to itself.
    pub fn empty() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    /// Built-in table merged with overrides read from a TOML file.
    pub fn with_overrides_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ItemSourceError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read instance names from {:?}: {}", path, e),
            ))
        })?;

        let mut table = Self::default();
        table.merge_toml(&content)?;
        Ok(table)
    }

    /// Merge `key = "name"` pairs from the `[instances]` table of a TOML
    /// document. Existing keys are replaced.
    pub fn merge_toml(&mut self, content: &str) -> Result<usize> {
        let file: InstanceNamesFile = toml::from_str(content).map_err(|e| {
            ItemSourceError::Config(format!("Failed to parse instance names TOML: {}", e))
        })?;

        let count = file.instances.len();
        self.names.extend(file.instances);
        tracing::debug!("Merged {} instance name overrides", count);
        Ok(count)
    }

    /// Display name for `key`, or `key` itself when unknown.
    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        self.names.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

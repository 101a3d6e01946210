//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/blockfall/settings.toml (or platform equivalent)

use crate::board::{BOARD_COLS, BOARD_ROWS};
use crate::difficulty::Difficulty;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Smallest board that still fits a piece below the hidden rows
const MIN_BOARD_SIDE: usize = 4;
/// Largest board side; keeps the drawn width inside a terminal's u16 range
const MAX_BOARD_SIDE: usize = 64;

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub keys: KeyBindings,
    pub gameplay: GameplaySettings,
    pub board: BoardSettings,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub pause: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub new_game: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub versus: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub difficulty: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
    pub player_one: PlayerKeys,
    #[serde(deserialize_with = "deserialize_player_two")]
    pub player_two: PlayerKeys,
}

/// Movement keys for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerKeys {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub down: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeysVisitor;

    impl<'de> Visitor<'de> for KeysVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or array of strings")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut keys = Vec::new();
            while let Some(key) = seq.next_element::<String>()? {
                keys.push(key);
            }
            Ok(keys)
        }
    }

    deserializer.deserialize_any(KeysVisitor)
}

/// Player two's table, with missing actions taken from the WASD layout
fn deserialize_player_two<'de, D>(deserializer: D) -> Result<PlayerKeys, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let overrides = toml::Table::deserialize(deserializer)?;
    let mut merged = match toml::Value::try_from(PlayerKeys::wasd()).map_err(D::Error::custom)? {
        toml::Value::Table(table) => table,
        _ => return Err(D::Error::custom("player keys must serialize to a table")),
    };
    merged.extend(overrides);
    PlayerKeys::deserialize(toml::Value::Table(merged)).map_err(D::Error::custom)
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    if let [key] = keys {
        serializer.serialize_str(key)
    } else {
        let mut seq = serializer.serialize_seq(Some(keys.len()))?;
        for key in keys {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

/// Gameplay settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    pub difficulty: Difficulty,
    /// Start with a second local player
    pub versus: bool,
}

/// Board size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub rows: usize,
    pub cols: usize,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            pause: vec!["p".to_string(), "Space".to_string()],
            new_game: vec!["n".to_string()],
            versus: vec!["v".to_string()],
            difficulty: vec!["h".to_string()],
            quit: vec!["q".to_string(), "Esc".to_string()],
            player_one: PlayerKeys::arrows(),
            player_two: PlayerKeys::wasd(),
        }
    }
}

impl Default for PlayerKeys {
    fn default() -> Self {
        Self::arrows()
    }
}

impl PlayerKeys {
    pub fn arrows() -> Self {
        Self {
            left: vec!["Left".to_string()],
            right: vec!["Right".to_string()],
            down: vec!["Down".to_string()],
            rotate: vec!["Up".to_string()],
        }
    }

    pub fn wasd() -> Self {
        Self {
            left: vec!["a".to_string()],
            right: vec!["d".to_string()],
            down: vec!["s".to_string()],
            rotate: vec!["w".to_string()],
        }
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            rows: BOARD_ROWS,
            cols: BOARD_COLS,
        }
    }
}

impl BoardSettings {
    pub fn is_valid(&self) -> bool {
        let allowed = MIN_BOARD_SIDE..=MAX_BOARD_SIDE;
        allowed.contains(&self.rows) && allowed.contains(&self.cols)
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "blockfall", "blockfall")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from file, or fall back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory, using default settings");
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => {
                info!("Loaded settings from {}", path.display());
                Self::from_toml(&contents)
            }
            Err(e) => {
                info!("No settings at {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings, replacing anything unusable with defaults
    pub fn from_toml(contents: &str) -> Self {
        let mut settings: Settings = match toml::from_str(contents) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Invalid settings file, using defaults: {}", e);
                return Self::default();
            }
        };

        if !settings.board.is_valid() {
            warn!(
                "Board size {}x{} outside {}..={}, using {}x{}",
                settings.board.rows,
                settings.board.cols,
                MIN_BOARD_SIDE,
                MAX_BOARD_SIDE,
                BOARD_ROWS,
                BOARD_COLS
            );
            settings.board = BoardSettings::default();
        }
        settings
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), String> {
        let Some(dir) = Self::config_dir() else {
            return Err("Could not determine config directory".to_string());
        };

        let Some(path) = Self::settings_path() else {
            return Err("Could not determine settings path".to_string());
        };

        // Create directory if needed
        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config dir: {}", e))?;

        let contents = self.to_toml()?;

        fs::write(&path, contents).map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))
    }
}

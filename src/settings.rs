//! Player preferences
//!
//! Only the Minesweeper difficulty is persisted, as a raw string in LocalStorage.

use serde::{Deserialize, Serialize};

/// Minesweeper difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Parse the stored flag, which is always one of `as_str`'s values
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Board width in cells
    pub fn width(&self) -> u32 {
        match self {
            Difficulty::Easy => 30,
            Difficulty::Medium => 50,
            Difficulty::Hard => 75,
        }
    }

    /// Board height in cells
    pub fn height(&self) -> u32 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Medium => 30,
            Difficulty::Hard => 35,
        }
    }

    pub fn bomb_count(&self) -> u32 {
        match self {
            Difficulty::Easy => 75,
            Difficulty::Medium => 300,
            Difficulty::Hard => 650,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Minesweeper board preset
    pub difficulty: Difficulty,
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "difficulty";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(value)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(difficulty) = Difficulty::from_str(&value) {
                    log::info!("Loaded difficulty '{}' from LocalStorage", difficulty.as_str());
                    return Self { difficulty };
                }
                log::warn!("Unknown difficulty '{}', using default", value);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only). Returns whether the write went through.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> bool {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        match storage {
            Some(storage) => {
                Self::report_save(storage.set_item(Self::STORAGE_KEY, self.difficulty.as_str()))
            }
            None => {
                log::warn!("LocalStorage unavailable, settings not saved");
                false
            }
        }
    }

    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    fn report_save<E: std::fmt::Debug>(result: Result<(), E>) -> bool {
        match result {
            Ok(()) => {
                log::info!("Settings saved");
                true
            }
            Err(err) => {
                log::warn!("Failed to save settings: {:?}", err);
                false
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> bool {
        false
    }
}

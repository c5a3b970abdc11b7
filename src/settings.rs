use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::session::Difficulty;

pub mod form;

pub use form::{SaveStatus, SettingField, SettingsForm, SettingsTab};

/// File name used by export and the default import location
pub const EXPORT_FILE_NAME: &str = "speedtype-settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("settings are not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid settings file: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    // appearance
    pub theme: String,
    pub font_family: String,
    pub font_size: String,
    pub caret_style: String,
    pub caret_color: String,
    pub smooth_caret: bool,
    pub highlight_matching_brackets: bool,
    // behavior
    pub sound_effects: bool,
    pub sound_volume: u8,
    pub notifications: bool,
    pub auto_save_progress: bool,
    #[serde(rename = "showLiveWPM")]
    pub show_live_wpm: bool,
    pub show_live_accuracy: bool,
    // typing test
    pub keyboard_layout: String,
    pub default_difficulty: Difficulty,
    pub language: String,
    pub quick_restart: bool,
    /// hide live stats while typing
    pub confidence_mode: bool,
    /// no correctness colours while typing
    pub blind_mode: bool,
    // advanced
    pub countdown_time: u8,
    pub caps_lock_warning: bool,
    pub tab_moves_focus: bool,
    pub show_timer_progress: bool,
    pub blurred_opacity: u8,
    pub custom_background: String,
    pub custom_css: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            font_family: "monospace".to_string(),
            font_size: "medium".to_string(),
            caret_style: "line".to_string(),
            caret_color: "#CC2D2D".to_string(),
            smooth_caret: true,
            highlight_matching_brackets: true,
            sound_effects: true,
            sound_volume: 50,
            notifications: true,
            auto_save_progress: true,
            show_live_wpm: true,
            show_live_accuracy: true,
            keyboard_layout: "qwerty".to_string(),
            default_difficulty: Difficulty::Medium,
            language: "english".to_string(),
            quick_restart: true,
            confidence_mode: false,
            blind_mode: false,
            countdown_time: 3,
            caps_lock_warning: true,
            tab_moves_focus: false,
            show_timer_progress: true,
            blurred_opacity: 70,
            custom_background: String::new(),
            custom_css: String::new(),
        }
    }
}

impl Settings {
    pub fn theme(&self) -> &'static Theme {
        theme_by_id(&self.theme)
    }

    /// Tab+Enter restarts only when Tab is not used for focus movement
    pub fn quick_restart_enabled(&self) -> bool {
        self.quick_restart && !self.tab_moves_focus
    }

    pub fn shows_live_wpm(&self) -> bool {
        self.show_live_wpm && !self.confidence_mode
    }

    pub fn shows_live_accuracy(&self) -> bool {
        self.show_live_accuracy && !self.confidence_mode
    }

    /// Parse an imported document. It must be a JSON object carrying a `theme` key;
    /// missing keys take their default value.
    pub fn from_import(json: &str) -> Result<Self, SettingsError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let obj = value
            .as_object()
            .ok_or(SettingsError::Invalid("expected a json object"))?;
        if !obj.contains_key("theme") {
            return Err(SettingsError::Invalid("missing theme"));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_pretty_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub primary: &'static str,
    pub background: &'static str,
    pub card: &'static str,
    pub text: &'static str,
    pub border: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub colors: ThemeColors,
}

const fn theme(id: &'static str, name: &'static str, colors: [&'static str; 5]) -> Theme {
    let [primary, background, card, text, border] = colors;
    Theme {
        id,
        name,
        colors: ThemeColors {
            primary,
            background,
            card,
            text,
            border,
        },
    }
}

pub const THEMES: [Theme; 5] = [
    theme("dark", "Dark", ["#CC2D2D", "#0A0A0A", "#111111", "#FFFFFF", "#1A1A1A"]),
    theme("light", "Light", ["#CC2D2D", "#F5F5F5", "#FFFFFF", "#111111", "#E5E5E5"]),
    theme("midnight", "Midnight Blue", ["#3B82F6", "#0F172A", "#1E293B", "#F8FAFC", "#334155"]),
    theme("forest", "Forest", ["#22C55E", "#14241C", "#1C3026", "#E5F5EB", "#2E5741"]),
    theme("sunset", "Sunset", ["#F97316", "#1F1511", "#2C1E17", "#FEF3EE", "#4A3324"]),
];

/// Unknown ids fall back to the dark theme
pub fn theme_by_id(id: &str) -> &'static Theme {
    THEMES.iter().find(|t| t.id == id).unwrap_or(&THEMES[0])
}

/// `#RRGGBB` to its components
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// A selectable option: stored id and display name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub id: &'static str,
    pub name: &'static str,
}

const fn choice(id: &'static str, name: &'static str) -> Choice {
    Choice { id, name }
}

pub const KEYBOARD_LAYOUTS: [Choice; 5] = [
    choice("qwerty", "QWERTY"),
    choice("dvorak", "Dvorak"),
    choice("colemak", "Colemak"),
    choice("azerty", "AZERTY"),
    choice("workman", "Workman"),
];

pub const LANGUAGES: [Choice; 9] = [
    choice("english", "English"),
    choice("spanish", "Spanish"),
    choice("french", "French"),
    choice("german", "German"),
    choice("portuguese", "Portuguese"),
    choice("italian", "Italian"),
    choice("dutch", "Dutch"),
    choice("russian", "Russian"),
    choice("japanese", "Japanese"),
];

pub const FONT_FAMILIES: [Choice; 4] = [
    choice("system", "System Default"),
    choice("monospace", "Monospace"),
    choice("sans-serif", "Sans Serif"),
    choice("serif", "Serif"),
];

pub const FONT_SIZES: [Choice; 4] = [
    choice("small", "Small"),
    choice("medium", "Medium"),
    choice("large", "Large"),
    choice("x-large", "Extra Large"),
];

pub const CARET_STYLES: [Choice; 4] = [
    choice("line", "Line"),
    choice("block", "Block"),
    choice("underscore", "Underscore"),
    choice("outline", "Outline"),
];

pub const DIFFICULTIES: [Choice; 3] = [
    choice("easy", "Easy"),
    choice("medium", "Medium"),
    choice("hard", "Hard"),
];

pub const THEME_CHOICES: [Choice; 5] = [
    choice(THEMES[0].id, THEMES[0].name),
    choice(THEMES[1].id, THEMES[1].name),
    choice(THEMES[2].id, THEMES[2].name),
    choice(THEMES[3].id, THEMES[3].name),
    choice(THEMES[4].id, THEMES[4].name),
];

/// Display name for `id`, or the id itself when it is not in `choices`
pub fn choice_name<'a>(choices: &[Choice], id: &'a str) -> &'a str {
    choices
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name)
        .unwrap_or(id)
}

/// Neighbouring choice id, wrapping. Unknown ids snap to the first choice.
pub fn cycle_choice(choices: &[Choice], id: &str, forward: bool) -> &'static str {
    let ids: Vec<&'static str> = choices.iter().map(|c| c.id).collect();
    if ids.is_empty() {
        return "";
    }
    let current = ids.iter().copied().find(|c| *c == id).unwrap_or_default();
    crate::session::cycle(&ids, current, forward)
}

pub trait SettingsStore {
    fn load(&self) -> Settings;
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "speedtype") {
            pd.config_dir().join("settings.json")
        } else {
            PathBuf::from("speedtype_settings.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no settings have been saved yet
    pub fn try_load(&self) -> Result<Option<Settings>, SettingsError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

impl Default for FileSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Settings {
        match self.try_load() {
            Ok(Some(settings)) => {
                debug!(path = %self.path.display(), "loaded settings");
                settings
            }
            Ok(None) => Settings::default(),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "failed to load settings, using defaults");
                Settings::default()
            }
        }
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, settings.to_pretty_json()?)?;
        debug!(path = %self.path.display(), "saved settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_settings() {
        let dir = tempdir().unwrap();
        let store = FileSettingsStore::with_path(dir.path().join("settings.json"));
        let settings = Settings::default();
        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("settings.json");
        let store = FileSettingsStore::with_path(&path);
        let settings = Settings {
            theme: "forest".into(),
            blind_mode: true,
            sound_volume: 20,
            default_difficulty: Difficulty::Hard,
            ..Settings::default()
        };
        store.save(&settings).unwrap();
        assert!(path.exists());
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileSettingsStore::with_path(dir.path().join("nope.json"));
        assert_matches!(store.try_load(), Ok(None));
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let store = FileSettingsStore::with_path(&path);
        assert_matches!(store.try_load(), Err(SettingsError::Json(_)));
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn uses_camel_case_keys() {
        let json = Settings::default().to_pretty_json().unwrap();
        assert!(json.contains("\"showLiveWPM\": true"));
        assert!(json.contains("\"defaultDifficulty\": \"medium\""));
        assert!(json.contains("\"caretColor\": \"#CC2D2D\""));
        assert!(json.contains("\"blurredOpacity\": 70"));
    }

    #[test]
    fn import_requires_object_with_theme() {
        assert_matches!(
            Settings::from_import("[1, 2]"),
            Err(SettingsError::Invalid("expected a json object"))
        );
        assert_matches!(
            Settings::from_import(r#"{"fontSize": "large"}"#),
            Err(SettingsError::Invalid("missing theme"))
        );
        assert_matches!(Settings::from_import("nope"), Err(SettingsError::Json(_)));
    }

    #[test]
    fn import_fills_missing_keys() {
        let imported = Settings::from_import(r#"{"theme": "sunset", "blindMode": true}"#).unwrap();
        assert_eq!(imported.theme, "sunset");
        assert!(imported.blind_mode);
        assert_eq!(imported.sound_volume, 50);
    }

    #[test]
    fn theme_lookup_falls_back_to_dark() {
        assert_eq!(theme_by_id("midnight").name, "Midnight Blue");
        assert_eq!(theme_by_id("neon").id, "dark");
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#CC2D2D"), Some((0xCC, 0x2D, 0x2D)));
        assert_eq!(parse_hex_color("#0a0a0a"), Some((10, 10, 10)));
        assert_eq!(parse_hex_color("CC2D2D"), None);
        assert_eq!(parse_hex_color("#CC2D"), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
    }

    #[test]
    fn derived_flags() {
        let mut settings = Settings::default();
        assert!(settings.quick_restart_enabled());
        settings.tab_moves_focus = true;
        assert!(!settings.quick_restart_enabled());

        settings.confidence_mode = true;
        assert!(!settings.shows_live_wpm());
        assert!(!settings.shows_live_accuracy());
    }

    #[test]
    fn choice_helpers() {
        assert_eq!(choice_name(&FONT_SIZES, "x-large"), "Extra Large");
        assert_eq!(choice_name(&FONT_SIZES, "huge"), "huge");
        assert_eq!(cycle_choice(&KEYBOARD_LAYOUTS, "workman", true), "qwerty");
        assert_eq!(cycle_choice(&KEYBOARD_LAYOUTS, "qwerty", false), "workman");
        assert_eq!(cycle_choice(&LANGUAGES, "klingon", true), "english");
    }
}

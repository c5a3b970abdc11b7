//! Editable copy of the settings, with save/revert and import/export.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{
    choice_name, cycle_choice, Choice, Settings, SettingsError, SettingsStore,
    CARET_STYLES, DIFFICULTIES, EXPORT_FILE_NAME, FONT_FAMILIES, FONT_SIZES, KEYBOARD_LAYOUTS,
    LANGUAGES, THEME_CHOICES,
};
use crate::session::Difficulty;

/// Seconds a success status stays visible
pub const SUCCESS_STATUS_SECS: f64 = 2.0;
/// Seconds an error status stays visible
pub const ERROR_STATUS_SECS: f64 = 3.0;

pub const RESET_CONFIRM_PROMPT: &str =
    "Are you sure you want to reset all settings to default values?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Success,
    Error,
}

impl SaveStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SaveStatus::Idle => "Save Settings",
            SaveStatus::Saving => "Saving...",
            SaveStatus::Success => "Saved!",
            SaveStatus::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsTab {
    #[default]
    Appearance,
    Behavior,
    Typing,
    Advanced,
}

impl SettingsTab {
    pub const ALL: [SettingsTab; 4] = [
        SettingsTab::Appearance,
        SettingsTab::Behavior,
        SettingsTab::Typing,
        SettingsTab::Advanced,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingsTab::Appearance => "Appearance",
            SettingsTab::Behavior => "Behavior",
            SettingsTab::Typing => "Typing Test",
            SettingsTab::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Toggle,
    Choice(&'static [Choice]),
    Slider { min: u8, max: u8, step: u8 },
    Text,
    Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    Theme,
    CaretColor,
    CaretStyle,
    SmoothCaret,
    FontFamily,
    FontSize,
    HighlightMatchingBrackets,
    CustomBackground,
    CustomCss,
    SoundEffects,
    SoundVolume,
    Notifications,
    ShowLiveWpm,
    ShowLiveAccuracy,
    AutoSaveProgress,
    KeyboardLayout,
    DefaultDifficulty,
    Language,
    CountdownTime,
    QuickRestart,
    ConfidenceMode,
    BlindMode,
    ShowTimerProgress,
    CapsLockWarning,
    TabMovesFocus,
    BlurredOpacity,
    ExportSettings,
    ImportSettings,
    ResetToDefaults,
}

impl SettingField {
    /// Every field in display order
    pub const ALL: [SettingField; 29] = [
        SettingField::Theme,
        SettingField::CaretColor,
        SettingField::CaretStyle,
        SettingField::SmoothCaret,
        SettingField::FontFamily,
        SettingField::FontSize,
        SettingField::HighlightMatchingBrackets,
        SettingField::CustomBackground,
        SettingField::CustomCss,
        SettingField::SoundEffects,
        SettingField::SoundVolume,
        SettingField::Notifications,
        SettingField::ShowLiveWpm,
        SettingField::ShowLiveAccuracy,
        SettingField::AutoSaveProgress,
        SettingField::KeyboardLayout,
        SettingField::DefaultDifficulty,
        SettingField::Language,
        SettingField::CountdownTime,
        SettingField::QuickRestart,
        SettingField::ConfidenceMode,
        SettingField::BlindMode,
        SettingField::ShowTimerProgress,
        SettingField::CapsLockWarning,
        SettingField::TabMovesFocus,
        SettingField::BlurredOpacity,
        SettingField::ExportSettings,
        SettingField::ImportSettings,
        SettingField::ResetToDefaults,
    ];

    pub fn section(&self) -> &'static str {
        use SettingField::*;
        match self {
            Theme | CaretColor | CaretStyle | SmoothCaret => "Theme & Colors",
            FontFamily | FontSize | HighlightMatchingBrackets => "Text & Font",
            CustomBackground | CustomCss => "Custom Styling",
            SoundEffects | SoundVolume | Notifications => "Sound & Notifications",
            ShowLiveWpm | ShowLiveAccuracy | AutoSaveProgress => "Feedback & Progress",
            KeyboardLayout | DefaultDifficulty | Language | CountdownTime => "Test Configuration",
            QuickRestart | ConfidenceMode | BlindMode | ShowTimerProgress => "Test Experience",
            CapsLockWarning | TabMovesFocus | BlurredOpacity => "Interface Options",
            ExportSettings | ImportSettings | ResetToDefaults => "Data Management",
        }
    }

    pub fn tab(&self) -> SettingsTab {
        match self.section() {
            "Theme & Colors" | "Text & Font" | "Custom Styling" => SettingsTab::Appearance,
            "Sound & Notifications" | "Feedback & Progress" => SettingsTab::Behavior,
            "Test Configuration" | "Test Experience" => SettingsTab::Typing,
            _ => SettingsTab::Advanced,
        }
    }

    pub fn label(&self) -> &'static str {
        use SettingField::*;
        match self {
            Theme => "Theme",
            CaretColor => "Caret Color",
            CaretStyle => "Caret Style",
            SmoothCaret => "Smooth Caret Animation",
            FontFamily => "Font Family",
            FontSize => "Font Size",
            HighlightMatchingBrackets => "Highlight Matching Brackets",
            CustomBackground => "Custom Background URL",
            CustomCss => "Custom CSS",
            SoundEffects => "Sound Effects",
            SoundVolume => "Sound Volume",
            Notifications => "Notifications",
            ShowLiveWpm => "Show Live WPM",
            ShowLiveAccuracy => "Show Live Accuracy",
            AutoSaveProgress => "Auto-Save Progress",
            KeyboardLayout => "Keyboard Layout",
            DefaultDifficulty => "Default Difficulty",
            Language => "Language",
            CountdownTime => "Countdown Time",
            QuickRestart => "Quick Restart (Tab+Enter)",
            ConfidenceMode => "Confidence Mode",
            BlindMode => "Blind Mode",
            ShowTimerProgress => "Show Timer Progress",
            CapsLockWarning => "Caps Lock Warning",
            TabMovesFocus => "Tab Moves Focus",
            BlurredOpacity => "Blurred Opacity",
            ExportSettings => "Export Settings",
            ImportSettings => "Import Settings",
            ResetToDefaults => "Reset All Settings to Default",
        }
    }

    pub fn description(&self) -> Option<&'static str> {
        use SettingField::*;
        let text = match self {
            SmoothCaret => "Enable smooth transitions for the typing caret",
            HighlightMatchingBrackets => "Highlight matching brackets and parentheses while typing",
            CustomBackground => "Leave empty for default background",
            CustomCss => "Advanced: Add custom CSS to modify the appearance",
            SoundEffects => "Play sound effects during typing",
            Notifications => "Show notifications for test results and achievements",
            ShowLiveWpm => "Display real-time WPM during typing tests",
            ShowLiveAccuracy => "Display real-time accuracy during typing tests",
            AutoSaveProgress => "Automatically save your typing progress and statistics",
            CountdownTime => "Seconds to count down before starting a test (0 to disable)",
            QuickRestart => "Enable Tab+Enter keyboard shortcut to restart tests",
            ConfidenceMode => "Hide WPM and accuracy stats during the test",
            BlindMode => "Hide the text being typed for an extra challenge",
            ShowTimerProgress => "Display a progress bar for timed tests",
            CapsLockWarning => "Show a warning when Caps Lock is enabled",
            TabMovesFocus => "Allow Tab key to move focus between elements (disables Tab+Enter restart)",
            BlurredOpacity => "Control the opacity level when the typing area is blurred",
            _ => return None,
        };
        Some(text)
    }

    pub fn kind(&self) -> FieldKind {
        use SettingField::*;
        match self {
            Theme => FieldKind::Choice(&THEME_CHOICES),
            CaretStyle => FieldKind::Choice(&CARET_STYLES),
            FontFamily => FieldKind::Choice(&FONT_FAMILIES),
            FontSize => FieldKind::Choice(&FONT_SIZES),
            KeyboardLayout => FieldKind::Choice(&KEYBOARD_LAYOUTS),
            DefaultDifficulty => FieldKind::Choice(&DIFFICULTIES),
            Language => FieldKind::Choice(&LANGUAGES),
            SoundVolume | BlurredOpacity => FieldKind::Slider {
                min: 0,
                max: 100,
                step: 5,
            },
            CountdownTime => FieldKind::Slider {
                min: 0,
                max: 10,
                step: 1,
            },
            CaretColor | CustomBackground | CustomCss => FieldKind::Text,
            ExportSettings | ImportSettings | ResetToDefaults => FieldKind::Action,
            SmoothCaret | HighlightMatchingBrackets | SoundEffects | Notifications
            | ShowLiveWpm | ShowLiveAccuracy | AutoSaveProgress | QuickRestart
            | ConfidenceMode | BlindMode | ShowTimerProgress | CapsLockWarning
            | TabMovesFocus => FieldKind::Toggle,
        }
    }

    fn toggle_mut<'a>(&self, s: &'a mut Settings) -> Option<&'a mut bool> {
        use SettingField::*;
        Some(match self {
            SmoothCaret => &mut s.smooth_caret,
            HighlightMatchingBrackets => &mut s.highlight_matching_brackets,
            SoundEffects => &mut s.sound_effects,
            Notifications => &mut s.notifications,
            ShowLiveWpm => &mut s.show_live_wpm,
            ShowLiveAccuracy => &mut s.show_live_accuracy,
            AutoSaveProgress => &mut s.auto_save_progress,
            QuickRestart => &mut s.quick_restart,
            ConfidenceMode => &mut s.confidence_mode,
            BlindMode => &mut s.blind_mode,
            ShowTimerProgress => &mut s.show_timer_progress,
            CapsLockWarning => &mut s.caps_lock_warning,
            TabMovesFocus => &mut s.tab_moves_focus,
            _ => return None,
        })
    }

    fn number_mut<'a>(&self, s: &'a mut Settings) -> Option<&'a mut u8> {
        match self {
            SettingField::SoundVolume => Some(&mut s.sound_volume),
            SettingField::BlurredOpacity => Some(&mut s.blurred_opacity),
            SettingField::CountdownTime => Some(&mut s.countdown_time),
            _ => None,
        }
    }

    fn text_mut<'a>(&self, s: &'a mut Settings) -> Option<&'a mut String> {
        use SettingField::*;
        match self {
            Theme => Some(&mut s.theme),
            CaretColor => Some(&mut s.caret_color),
            CaretStyle => Some(&mut s.caret_style),
            FontFamily => Some(&mut s.font_family),
            FontSize => Some(&mut s.font_size),
            KeyboardLayout => Some(&mut s.keyboard_layout),
            Language => Some(&mut s.language),
            CustomBackground => Some(&mut s.custom_background),
            CustomCss => Some(&mut s.custom_css),
            _ => None,
        }
    }

    /// Current value formatted for display
    pub fn value_label(&self, s: &Settings) -> String {
        let mut s = s.clone();
        if let Some(on) = self.toggle_mut(&mut s) {
            return if *on { "On" } else { "Off" }.to_string();
        }
        if let Some(n) = self.number_mut(&mut s) {
            return match self {
                SettingField::CountdownTime => format!("{n}s"),
                _ => format!("{n}%"),
            };
        }
        if *self == SettingField::DefaultDifficulty {
            return s.default_difficulty.to_string();
        }
        match (self.kind(), self.text_mut(&mut s)) {
            (FieldKind::Choice(choices), Some(id)) => choice_name(choices, id).to_string(),
            (_, Some(text)) => text.clone(),
            _ => String::new(),
        }
    }
}

/// The fields visible on `tab`. The volume slider only shows while sound is on.
pub fn visible_fields(tab: SettingsTab, values: &Settings) -> Vec<SettingField> {
    SettingField::ALL
        .into_iter()
        .filter(|f| f.tab() == tab)
        .filter(|f| *f != SettingField::SoundVolume || values.sound_effects)
        .collect()
}

/// Saved settings plus the values being edited
pub struct SettingsForm {
    store: Box<dyn SettingsStore>,
    saved: Settings,
    pub values: Settings,
    pub tab: SettingsTab,
    /// index into the visible fields of the current tab
    pub selected: usize,
    status: SaveStatus,
    status_secs_left: f64,
    confirming_reset: bool,
    transfer_path: PathBuf,
}

impl SettingsForm {
    pub fn new(store: Box<dyn SettingsStore>) -> Self {
        let saved = store.load();
        Self {
            store,
            values: saved.clone(),
            saved,
            tab: SettingsTab::default(),
            selected: 0,
            status: SaveStatus::Idle,
            status_secs_left: 0.0,
            confirming_reset: false,
            transfer_path: PathBuf::from(EXPORT_FILE_NAME),
        }
    }

    /// Where export writes and import reads
    pub fn with_transfer_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.transfer_path = path.as_ref().to_path_buf();
        self
    }

    pub fn transfer_path(&self) -> &Path {
        &self.transfer_path
    }

    /// The last saved settings, which are the ones in effect
    pub fn saved(&self) -> &Settings {
        &self.saved
    }

    pub fn is_dirty(&self) -> bool {
        self.saved != self.values
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn is_confirming_reset(&self) -> bool {
        self.confirming_reset
    }

    pub fn visible_fields(&self) -> Vec<SettingField> {
        visible_fields(self.tab, &self.values)
    }

    pub fn selected_field(&self) -> Option<SettingField> {
        self.visible_fields().get(self.selected).copied()
    }

    pub fn select_tab(&mut self, tab: SettingsTab) {
        self.tab = tab;
        self.selected = 0;
    }

    pub fn next_tab(&mut self, forward: bool) {
        let tab = crate::session::cycle(&SettingsTab::ALL, self.tab, forward);
        self.select_tab(tab);
    }

    pub fn move_selection(&mut self, down: bool) {
        let count = self.visible_fields().len();
        if count == 0 {
            return;
        }
        self.selected = if down {
            (self.selected + 1) % count
        } else {
            (self.selected + count - 1) % count
        };
    }

    /// Step the selected field's value: toggles flip, choices cycle, sliders move by one step
    pub fn adjust(&mut self, forward: bool) {
        let Some(field) = self.selected_field() else {
            return;
        };
        match field.kind() {
            FieldKind::Toggle => {
                if let Some(on) = field.toggle_mut(&mut self.values) {
                    *on = !*on;
                }
            }
            FieldKind::Slider { min, max, step } => {
                if let Some(n) = field.number_mut(&mut self.values) {
                    *n = if forward {
                        n.saturating_add(step).min(max)
                    } else {
                        n.saturating_sub(step).max(min)
                    };
                }
            }
            FieldKind::Choice(choices) => {
                if field == SettingField::DefaultDifficulty {
                    let next = cycle_choice(choices, self.values.default_difficulty.id(), forward);
                    self.values.default_difficulty = Difficulty::from_id(next).unwrap_or_default();
                } else if let Some(id) = field.text_mut(&mut self.values) {
                    *id = cycle_choice(choices, id, forward).to_string();
                }
            }
            FieldKind::Text | FieldKind::Action => {}
        }
        self.clamp_selection();
    }

    /// Enter on the selected field. Actions run, other fields behave like `adjust`.
    pub fn activate(&mut self) {
        match self.selected_field() {
            Some(SettingField::ExportSettings) => {
                let _ = self.export();
            }
            Some(SettingField::ImportSettings) => {
                let _ = self.import();
            }
            Some(SettingField::ResetToDefaults) => self.request_reset(),
            Some(field) if field.kind() != FieldKind::Text => self.adjust(true),
            _ => {}
        }
    }

    /// Type into the selected text field
    pub fn push_char(&mut self, c: char) {
        if let Some(text) = self.selected_text_field() {
            text.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(text) = self.selected_text_field() {
            text.pop();
        }
    }

    fn selected_text_field(&mut self) -> Option<&mut String> {
        let field = self.selected_field()?;
        match field.kind() {
            FieldKind::Text => field.text_mut(&mut self.values),
            _ => None,
        }
    }

    pub fn editing_text(&self) -> bool {
        self.selected_field()
            .is_some_and(|f| f.kind() == FieldKind::Text)
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_fields().len();
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
    }

    fn set_status(&mut self, status: SaveStatus) {
        self.status = status;
        self.status_secs_left = match status {
            SaveStatus::Success => SUCCESS_STATUS_SECS,
            SaveStatus::Error => ERROR_STATUS_SECS,
            SaveStatus::Idle | SaveStatus::Saving => 0.0,
        };
    }

    /// Persist the form values and make them the settings in effect
    pub fn save(&mut self) -> Result<(), SettingsError> {
        if self.status == SaveStatus::Saving {
            return Ok(());
        }
        self.set_status(SaveStatus::Saving);
        match self.store.save(&self.values) {
            Ok(()) => {
                self.saved = self.values.clone();
                self.set_status(SaveStatus::Success);
                info!(theme = %self.saved.theme, "settings saved");
                Ok(())
            }
            Err(err) => {
                warn!(%err, "failed to save settings");
                self.set_status(SaveStatus::Error);
                Err(err)
            }
        }
    }

    /// Throw away unsaved edits
    pub fn revert(&mut self) {
        self.values = self.saved.clone();
        self.confirming_reset = false;
        self.clamp_selection();
    }

    pub fn request_reset(&mut self) {
        self.confirming_reset = true;
    }

    /// Answer the reset prompt. Defaults only land in the form; saving applies them.
    pub fn confirm_reset(&mut self, accept: bool) {
        if self.confirming_reset && accept {
            self.values = Settings::default();
            self.clamp_selection();
        }
        self.confirming_reset = false;
    }

    /// Write the saved settings as pretty JSON to the transfer path
    pub fn export(&mut self) -> Result<(), SettingsError> {
        let result = self.saved.to_pretty_json().and_then(|json| {
            fs::write(&self.transfer_path, json)?;
            Ok(())
        });
        match &result {
            Ok(()) => info!(path = %self.transfer_path.display(), "settings exported"),
            Err(err) => {
                warn!(%err, "failed to export settings");
                self.set_status(SaveStatus::Error);
            }
        }
        result
    }

    /// Load the transfer file into the form. Nothing is saved until `save`.
    pub fn import(&mut self) -> Result<(), SettingsError> {
        let path = self.transfer_path.clone();
        self.import_from(&path)
    }

    pub fn import_from(&mut self, path: &Path) -> Result<(), SettingsError> {
        let result = fs::read_to_string(path)
            .map_err(SettingsError::from)
            .and_then(|json| Settings::from_import(&json));
        match result {
            Ok(imported) => {
                self.values = imported;
                self.clamp_selection();
                self.set_status(SaveStatus::Success);
                info!(path = %path.display(), "settings imported");
                Ok(())
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to import settings");
                self.set_status(SaveStatus::Error);
                Err(err)
            }
        }
    }

    /// Count down a visible success or error status
    pub fn on_tick(&mut self, dt: f64) {
        if matches!(self.status, SaveStatus::Success | SaveStatus::Error) {
            self.status_secs_left -= dt;
            if self.status_secs_left <= 0.0 {
                self.set_status(SaveStatus::Idle);
            }
        }
    }
}

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Durations offered for time mode, in seconds
pub const DURATION_OPTIONS: [usize; 4] = [15, 30, 60, 120];

/// Word counts offered for words mode
pub const WORD_COUNT_OPTIONS: [usize; 4] = [10, 25, 50, 100];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum TestMode {
    Time,
    Words,
    Quote,
}

impl TestMode {
    pub const ALL: [TestMode; 3] = [TestMode::Time, TestMode::Words, TestMode::Quote];

    /// Name used on the results screen
    pub fn long_name(&self) -> &'static str {
        match self {
            TestMode::Time => "Time Mode",
            TestMode::Words => "Word Mode",
            TestMode::Quote => "Quote Mode",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Parse the lowercase id stored in the settings file
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.id().eq_ignore_ascii_case(id.trim()))
    }

    pub fn id(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    Waiting,
    Typing,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestConfig {
    pub mode: TestMode,
    pub difficulty: Difficulty,
    pub duration_secs: usize,
    pub word_count: usize,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            mode: TestMode::Time,
            difficulty: Difficulty::Medium,
            duration_secs: 30,
            word_count: 25,
        }
    }
}

impl TestConfig {
    /// Countdown length, only meaningful in time mode
    pub fn time_limit(&self) -> Option<f64> {
        match self.mode {
            TestMode::Time => Some(self.duration_secs as f64),
            _ => None,
        }
    }
}

/// Label shown on the duration selector
pub fn duration_label(secs: usize) -> String {
    if secs >= 120 && secs % 60 == 0 {
        format!("{}min", secs / 60)
    } else {
        format!("{secs}s")
    }
}

/// Step to the neighbouring entry of `options`, wrapping at either end.
/// Values not in the list snap to the first entry.
pub fn cycle<T: Copy + PartialEq>(options: &[T], current: T, forward: bool) -> T {
    match options.iter().position(|o| *o == current) {
        Some(idx) => {
            let len = options.len();
            let next = if forward {
                (idx + 1) % len
            } else {
                (idx + len - 1) % len
            };
            options[next]
        }
        None => options[0],
    }
}

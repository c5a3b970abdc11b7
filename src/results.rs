//! Final metrics for a finished typing test.
//!
//! Everything here is a pure function of the word attempts plus the keystroke
//! tally kept while typing, so a result can be recomputed at any time.

use std::time::SystemTime;

use crate::session::TestMode;
use crate::typing_test::WordAttempt;
use crate::util::{percent, steadiness};

/// One sample of the speed chart: words per minute after `t` seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WpmPoint {
    pub t: f64,
    pub wpm: f64,
}

impl WpmPoint {
    pub fn new(t: f64, wpm: f64) -> Self {
        Self { t, wpm }
    }
}

impl From<WpmPoint> for (f64, f64) {
    fn from(p: WpmPoint) -> Self {
        (p.t, p.wpm)
    }
}

/// Keystroke counters maintained while the test runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeystrokeTally {
    pub typed: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub mode: TestMode,
    pub wpm: f64,
    /// matched characters over expected characters of completed words
    pub accuracy: f64,
    /// correct keystrokes over all keystrokes
    pub keystroke_accuracy: f64,
    pub consistency: f64,
    pub duration_secs: f64,
    pub configured_secs: Option<f64>,
    pub error_count: usize,
    pub total_typed_chars: usize,
    pub correct_chars: usize,
    pub completed_words: usize,
    pub wpm_series: Vec<WpmPoint>,
}

impl SessionResult {
    pub fn compute(
        mode: TestMode,
        attempts: &[WordAttempt],
        tally: KeystrokeTally,
        started_at: SystemTime,
        ended_at: SystemTime,
        configured_secs: Option<f64>,
    ) -> Self {
        let duration_secs = secs_between(started_at, ended_at);
        let wpm_series = wpm_series(attempts, started_at);
        let per_word_wpm: Vec<f64> = attempts
            .iter()
            .filter_map(|a| a.elapsed())
            .map(|d| d.as_secs_f64())
            .filter(|secs| *secs > 0.0)
            .map(|secs| 60.0 / secs)
            .collect();

        Self {
            mode,
            wpm: words_per_minute(attempts.len(), duration_secs),
            accuracy: word_accuracy(attempts),
            keystroke_accuracy: keystroke_accuracy(tally),
            consistency: steadiness(&per_word_wpm),
            duration_secs,
            configured_secs,
            error_count: tally.errors,
            total_typed_chars: tally.typed,
            correct_chars: tally.typed.saturating_sub(tally.errors),
            completed_words: attempts.len(),
            wpm_series,
        }
    }

    /// "correct / total" character ratio shown under the accuracy
    pub fn char_ratio(&self) -> String {
        format!("{} / {}", self.correct_chars, self.total_typed_chars)
    }
}

/// Completed words per elapsed minute, rounded. Zero elapsed time yields zero.
pub fn words_per_minute(completed_words: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    (completed_words as f64 / (elapsed_secs / 60.0)).round()
}

pub fn word_accuracy(attempts: &[WordAttempt]) -> f64 {
    let matched = attempts.iter().map(WordAttempt::matched_chars).sum();
    let expected = attempts.iter().map(|a| a.expected.chars().count()).sum();
    percent(matched, expected)
}

pub fn keystroke_accuracy(tally: KeystrokeTally) -> f64 {
    percent(tally.typed.saturating_sub(tally.errors), tally.typed)
}

/// Running WPM after each completed word
pub fn wpm_series(attempts: &[WordAttempt], started_at: SystemTime) -> Vec<WpmPoint> {
    attempts
        .iter()
        .enumerate()
        .filter_map(|(idx, attempt)| {
            let t = secs_between(started_at, attempt.completed_at?);
            (t > 0.0).then(|| WpmPoint::new(t, (idx + 1) as f64 / (t / 60.0)))
        })
        .collect()
}

fn secs_between(start: SystemTime, end: SystemTime) -> f64 {
    end.duration_since(start).unwrap_or_default().as_secs_f64()
}

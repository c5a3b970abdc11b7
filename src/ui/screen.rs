use std::time::SystemTime;

use ratatui::{buffer::Buffer, layout::Rect};

use super::{leaderboard, palette::Palette, practice, settings};
use crate::app::{App, Page};

/// A page body: everything between the navigation bar and the footer
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Typing test, or its results once finished
pub struct PracticeScreen;

impl Screen for PracticeScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        practice::render(app, area, buf, SystemTime::now());
    }
}

pub struct LeaderboardScreen;

impl Screen for LeaderboardScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let palette = Palette::from_settings(app.settings.saved());
        leaderboard::render(&app.leaderboard, &palette, area, buf);
    }
}

pub struct SettingsScreen;

impl Screen for SettingsScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let palette = Palette::from_settings(app.settings.saved());
        settings::render(&app.settings, &palette, area, buf);
    }
}

/// Helper to construct the screen for the current page
pub fn current_screen(page: Page) -> Box<dyn Screen> {
    match page {
        Page::Practice => Box::new(PracticeScreen),
        Page::Leaderboard => Box::new(LeaderboardScreen),
        Page::Settings => Box::new(SettingsScreen),
    }
}

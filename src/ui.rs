pub mod charting;
pub mod leaderboard;
pub mod palette;
pub mod practice;
pub mod screen;
pub mod settings;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::app::{App, Page, APP_NAME};
use palette::Palette;

/// A rect `percent_x` wide and `height` tall, centered inside `area`
pub fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(area.height.saturating_sub(height) / 2),
                Constraint::Length(height),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x.min(100)) / 2),
                Constraint::Percentage(percent_x.min(100)),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(vertical[1])[1]
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = Palette::from_settings(self.settings.saved());
        buf.set_style(area, palette.base());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(3), // navigation
                    Constraint::Min(0),    // page body
                    Constraint::Length(1), // key hints
                ]
                .as_ref(),
            )
            .split(area);

        Paragraph::new(nav_line(self.page, &palette))
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(palette.border()),
            )
            .render(chunks[0], buf);

        screen::current_screen(self.page).render(self, chunks[1], buf);

        Paragraph::new(Span::styled(footer_hint(self.page), palette.dim()))
            .render(chunks[2], buf);
    }
}

fn nav_line<'a>(active: Page, palette: &Palette) -> Line<'a> {
    let mut spans = vec![
        Span::styled(format!(" ⌨ {APP_NAME} "), palette.accent()),
        Span::raw("   "),
    ];
    for (idx, page) in Page::ALL.iter().enumerate() {
        let style = if *page == active {
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(palette.muted)
        };
        spans.push(Span::styled(format!("F{} ", idx + 1), palette.dim()));
        spans.push(Span::styled(page.name(), style));
        spans.push(Span::raw("   "));
    }
    Line::from(spans)
}

fn footer_hint(page: Page) -> &'static str {
    match page {
        Page::Practice => " ↑/↓ option  ←/→ change  esc quit  ctrl+c quit",
        Page::Leaderboard => " esc back  ctrl+c quit",
        Page::Settings => " tab section  ↑/↓ select  ←/→ adjust  enter toggle  ctrl+s save  esc back",
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rand::{rngs::StdRng, SeedableRng};
    use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};

    use super::*;
    use crate::{
        session::{TestConfig, TestMode},
        settings::{Settings, SettingsError, SettingsForm, SettingsStore},
        texts::SampleSet,
    };

    struct DefaultStore;

    impl SettingsStore for DefaultStore {
        fn load(&self) -> Settings {
            Settings::default()
        }

        fn save(&self, _settings: &Settings) -> Result<(), SettingsError> {
            Ok(())
        }
    }

    fn create_test_app(prompt: &str, mode: TestMode) -> App {
        let config = TestConfig {
            mode,
            ..TestConfig::default()
        };
        App::with_parts(
            config,
            Some(prompt.to_string()),
            SettingsForm::new(Box::new(DefaultStore)),
            SampleSet::embedded().unwrap(),
            StdRng::seed_from_u64(7),
        )
    }

    fn rendered(app: &App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    fn press(app: &mut App, code: KeyCode, now: SystemTime) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), now);
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 20);
        let rect = centered_rect(50, 4, area);
        assert_eq!(rect, Rect::new(25, 8, 50, 4));

        let tall = centered_rect(50, 40, area);
        assert_eq!(tall.height, 20);
    }

    #[test]
    fn test_typing_view_shows_prompt_and_nav() {
        let app = create_test_app("hello world", TestMode::Words);
        let screen = rendered(&app, 100, 30);

        assert!(screen.contains("hello world"));
        assert!(screen.contains(APP_NAME));
        assert!(screen.contains("Leaderboard"));
        assert!(screen.contains("Ready"));
        assert!(screen.contains(practice::RESTART_HINT));
    }

    #[test]
    fn test_results_view() {
        let mut app = create_test_app("hi yo", TestMode::Words);
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        for (i, c) in "hi yo".chars().enumerate() {
            press(&mut app, KeyCode::Char(c), start + Duration::from_millis(200 * i as u64));
        }
        assert!(app.test.has_finished());

        let screen = rendered(&app, 100, 30);
        assert!(screen.contains("WPM"));
        assert!(screen.contains("Accuracy"));
        assert!(screen.contains("100%"));
        assert!(screen.contains("Word Mode"));
    }

    #[test]
    fn test_blur_overlay() {
        let mut app = create_test_app("hello world", TestMode::Words);
        app.test.is_focused = false;
        let screen = rendered(&app, 100, 30);
        assert!(screen.contains(practice::BLUR_MESSAGE));
    }

    #[test]
    fn test_leaderboard_view() {
        let mut app = create_test_app("hello", TestMode::Words);
        app.go_to(Page::Leaderboard);
        let screen = rendered(&app, 140, 30);

        assert!(screen.contains("Showing 1-7 of 20 entries"));
        assert!(screen.contains("Global"));
        assert!(screen.contains("Your Stats"));
    }

    #[test]
    fn test_challenges_modal() {
        let mut app = create_test_app("hello", TestMode::Words);
        app.go_to(Page::Leaderboard);
        press(&mut app, KeyCode::Char('v'), SystemTime::now());
        assert!(rendered(&app, 140, 40).contains("All Challenges"));
    }

    #[test]
    fn test_settings_view() {
        let mut app = create_test_app("hello", TestMode::Words);
        app.go_to(Page::Settings);
        let screen = rendered(&app, 140, 40);

        assert!(screen.contains("Customize your SpeedType experience"));
        assert!(screen.contains("Save Settings"));
        assert!(screen.contains("Theme & Colors"));
    }

    #[test]
    fn test_small_area_does_not_panic() {
        let app = create_test_app("hello", TestMode::Time);
        let _ = rendered(&app, 20, 5);
    }

    #[test]
    fn test_terminal_draw() {
        let app = create_test_app("hello world", TestMode::Time);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|f| f.render_widget(&app, f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("hello world"));
    }
}

use std::time::SystemTime;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

use crate::{
    leaderboard::{ChallengeFilter, Leaderboard, LeaderboardTab, SortField},
    runtime::AppEvent,
    session::{cycle, Difficulty, TestConfig, TestMode, DURATION_OPTIONS, WORD_COUNT_OPTIONS},
    settings::SettingsForm,
    texts::{split_words, SampleSet, TextError},
    typing_test::TypingTest,
};

pub const APP_NAME: &str = "SpeedType";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Practice,
    Leaderboard,
    Settings,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Practice, Page::Leaderboard, Page::Settings];

    pub fn name(&self) -> &'static str {
        match self {
            Page::Practice => "Practice",
            Page::Leaderboard => "Leaderboard",
            Page::Settings => "Settings",
        }
    }

    /// Terminal window title, e.g. `Practice | SpeedType`
    pub fn title(&self) -> String {
        format!("{} | {}", self.name(), APP_NAME)
    }
}

/// A row of the practice option bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionRow {
    Mode,
    /// duration in time mode, word count in words mode
    Length,
    Difficulty,
}

/// What the event loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App {
    pub page: Page,
    pub test: TypingTest,
    pub leaderboard: Leaderboard,
    pub settings: SettingsForm,
    pub option_row: OptionRow,
    samples: SampleSet,
    custom_prompt: Option<String>,
    rng: StdRng,
    tab_armed: bool,
}

impl App {
    pub fn new(
        config: TestConfig,
        custom_prompt: Option<String>,
        settings: SettingsForm,
    ) -> Result<Self, TextError> {
        Ok(Self::with_parts(
            config,
            custom_prompt,
            settings,
            SampleSet::embedded()?,
            StdRng::from_entropy(),
        ))
    }

    /// Build with explicit samples and rng, for deterministic prompts
    pub fn with_parts(
        config: TestConfig,
        custom_prompt: Option<String>,
        settings: SettingsForm,
        samples: SampleSet,
        mut rng: StdRng,
    ) -> Self {
        let words = next_words(&samples, &config, custom_prompt.as_deref(), &mut rng);
        Self {
            page: Page::Practice,
            test: TypingTest::new(config, words),
            leaderboard: Leaderboard::default(),
            settings,
            option_row: OptionRow::Mode,
            samples,
            custom_prompt,
            rng,
            tab_armed: false,
        }
    }

    pub fn title(&self) -> String {
        self.page.title()
    }

    pub fn config(&self) -> &TestConfig {
        &self.test.config
    }

    /// Whether Tab was pressed and the next Enter restarts
    pub fn is_tab_armed(&self) -> bool {
        self.tab_armed
    }

    /// Option bar and hints disappear while the user is actively typing
    pub fn options_visible_at(&self, now: SystemTime) -> bool {
        !self.test.is_typing_at(now)
    }

    /// Option rows shown for the current mode
    pub fn option_rows(&self) -> Vec<OptionRow> {
        match self.test.config.mode {
            TestMode::Quote => vec![OptionRow::Mode, OptionRow::Difficulty],
            TestMode::Time | TestMode::Words => {
                vec![OptionRow::Mode, OptionRow::Length, OptionRow::Difficulty]
            }
        }
    }

    /// Same settings, fresh text
    pub fn new_test(&mut self) {
        let words = next_words(
            &self.samples,
            &self.test.config,
            self.custom_prompt.as_deref(),
            &mut self.rng,
        );
        self.test.reset(words);
        self.tab_armed = false;
        debug!(mode = %self.test.config.mode, "new test");
    }

    /// Same settings, same text
    pub fn retry_test(&mut self) {
        let words = self.test.words.clone();
        self.test.reset(words);
        self.tab_armed = false;
    }

    pub fn set_config(&mut self, config: TestConfig) {
        if config != self.test.config {
            info!(
                mode = %config.mode,
                difficulty = %config.difficulty,
                duration = config.duration_secs,
                words = config.word_count,
                "test options changed"
            );
            self.test.config = config;
            self.new_test();
        }
    }

    pub fn go_to(&mut self, page: Page) {
        if self.page != page {
            debug!(page = page.name(), "navigate");
        }
        self.page = page;
        self.tab_armed = false;
    }

    pub fn handle_event(&mut self, event: AppEvent, now: SystemTime) -> Control {
        match event {
            AppEvent::Key(key) => self.handle_key(key, now),
            AppEvent::Focus(focused) => {
                self.test.is_focused = focused;
                Control::Continue
            }
            AppEvent::Tick => Control::Continue,
            AppEvent::Resize => Control::Continue,
        }
    }

    /// Advance timers by `dt` seconds
    pub fn on_tick(&mut self, dt: f64, now: SystemTime) {
        self.test.on_tick_at(dt, now);
        self.settings.on_tick(dt);
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: SystemTime) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }
        // a keystroke means the terminal has focus, even without focus reporting
        self.test.is_focused = true;

        match key.code {
            KeyCode::F(1) => {
                self.go_to(Page::Practice);
                return Control::Continue;
            }
            KeyCode::F(2) => {
                self.go_to(Page::Leaderboard);
                return Control::Continue;
            }
            KeyCode::F(3) => {
                self.go_to(Page::Settings);
                return Control::Continue;
            }
            _ => {}
        }

        match self.page {
            Page::Practice => self.practice_key(key, now),
            Page::Leaderboard => {
                self.leaderboard_key(key);
                Control::Continue
            }
            Page::Settings => {
                self.settings_key(key);
                Control::Continue
            }
        }
    }

    fn practice_key(&mut self, key: KeyEvent, now: SystemTime) -> Control {
        let quick_restart = self.settings.saved().quick_restart_enabled();
        let armed = std::mem::take(&mut self.tab_armed);

        let plain = !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Tab if quick_restart => self.tab_armed = true,
            KeyCode::Tab if self.options_visible_at(now) => self.move_option_row(true),
            KeyCode::BackTab if self.options_visible_at(now) => self.move_option_row(false),
            KeyCode::Enter if armed => self.new_test(),
            KeyCode::Up if self.options_visible_at(now) => self.move_option_row(false),
            KeyCode::Down if self.options_visible_at(now) => self.move_option_row(true),
            KeyCode::Left if self.options_visible_at(now) => self.change_option(false),
            KeyCode::Right if self.options_visible_at(now) => self.change_option(true),
            KeyCode::Backspace => self.test.backspace_at(now),
            KeyCode::Char(c) if plain && self.test.has_finished() => match c {
                'r' => self.retry_test(),
                'n' => self.new_test(),
                _ => {}
            },
            KeyCode::Char(c) if plain => self.test.write_at(c, now),
            _ => {}
        }
        Control::Continue
    }

    fn move_option_row(&mut self, forward: bool) {
        let rows = self.option_rows();
        let current = if rows.contains(&self.option_row) {
            self.option_row
        } else {
            rows[0]
        };
        self.option_row = cycle(&rows, current, forward);
    }

    fn change_option(&mut self, forward: bool) {
        let mut config = self.test.config.clone();
        match self.option_row {
            OptionRow::Mode => config.mode = cycle(&TestMode::ALL, config.mode, forward),
            OptionRow::Length => match config.mode {
                TestMode::Time => {
                    config.duration_secs = cycle(&DURATION_OPTIONS, config.duration_secs, forward)
                }
                TestMode::Words => {
                    config.word_count = cycle(&WORD_COUNT_OPTIONS, config.word_count, forward)
                }
                TestMode::Quote => {}
            },
            OptionRow::Difficulty => {
                config.difficulty = cycle(&Difficulty::ALL, config.difficulty, forward)
            }
        }
        self.set_config(config);
        if !self.option_rows().contains(&self.option_row) {
            self.option_row = OptionRow::Mode;
        }
    }

    fn leaderboard_key(&mut self, key: KeyEvent) {
        let challenges = &mut self.leaderboard.challenges;
        if challenges.is_open {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => challenges.close(),
                KeyCode::Char('a') => challenges.set_filter(ChallengeFilter::All),
                KeyCode::Char('e') => challenges.set_filter(ChallengeFilter::Only(Difficulty::Easy)),
                KeyCode::Char('m') => {
                    challenges.set_filter(ChallengeFilter::Only(Difficulty::Medium))
                }
                KeyCode::Char('h') => challenges.set_filter(ChallengeFilter::Only(Difficulty::Hard)),
                KeyCode::Left | KeyCode::Right => {
                    let forward = key.code == KeyCode::Right;
                    let next = cycle(&ChallengeFilter::ALL, challenges.filter, forward);
                    challenges.set_filter(next);
                }
                _ => {}
            }
            return;
        }

        let board = &mut self.leaderboard;
        match key.code {
            KeyCode::Esc => self.go_to(Page::Practice),
            KeyCode::Tab => board.select_tab(cycle(&LeaderboardTab::ALL, board.tab, true)),
            KeyCode::BackTab => board.select_tab(cycle(&LeaderboardTab::ALL, board.tab, false)),
            KeyCode::Left => board.prev_page(),
            KeyCode::Right => board.next_page(),
            KeyCode::Char(c @ '1'..='9') => {
                let page = c as usize - '0' as usize;
                if board.page_buttons().contains(&page) {
                    board.go_to_page(page);
                }
            }
            KeyCode::Char('w') => board.sort_by(SortField::Wpm),
            KeyCode::Char('a') => board.sort_by(SortField::Accuracy),
            KeyCode::Char('c') => board.sort_by(SortField::Consistency),
            KeyCode::Char('t') => board.sort_by(SortField::Tests),
            KeyCode::Char('d') => board.sort_by(SortField::Date),
            KeyCode::Char('v') => board.challenges.open(),
            _ => {}
        }
    }

    fn settings_key(&mut self, key: KeyEvent) {
        let form = &mut self.settings;
        if form.is_confirming_reset() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => form.confirm_reset(true),
                _ => form.confirm_reset(false),
            }
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Char('s') if ctrl => {
                // failures are logged and shown as the save status
                let _ = form.save();
            }
            KeyCode::Char('r') if ctrl => form.revert(),
            KeyCode::Esc => self.go_to(Page::Practice),
            KeyCode::Tab => form.next_tab(true),
            KeyCode::BackTab => form.next_tab(false),
            KeyCode::Up => form.move_selection(false),
            KeyCode::Down => form.move_selection(true),
            KeyCode::Left => form.adjust(false),
            KeyCode::Right => form.adjust(true),
            KeyCode::Enter => form.activate(),
            KeyCode::Backspace => form.pop_char(),
            KeyCode::Char(c) if !ctrl && !alt => form.push_char(c),
            _ => {}
        }
    }
}

fn next_words(
    samples: &SampleSet,
    config: &TestConfig,
    custom_prompt: Option<&str>,
    rng: &mut StdRng,
) -> Vec<String> {
    match custom_prompt {
        Some(prompt) => split_words(prompt),
        None => split_words(&samples.text_sample(config, rng)),
    }
}

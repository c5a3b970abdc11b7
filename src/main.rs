use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::{Instant, SystemTime},
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use speedtype::{
    app::{App, Control},
    app_dirs::AppDirs,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    session::{Difficulty, TestConfig, TestMode, DURATION_OPTIONS, WORD_COUNT_OPTIONS},
    settings::{FileSettingsStore, SettingsForm, SettingsStore},
};

/// typing speed practice in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Typing speed practice in the terminal: timed, word-count and quote tests with live feedback, a WPM chart of every run, a leaderboard and persistent settings."
)]
pub struct Cli {
    /// test mode to start in
    #[clap(short = 'm', long, value_enum, default_value_t = TestMode::Time)]
    mode: TestMode,

    /// text difficulty; defaults to the one saved in settings
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// seconds per test in time mode (15, 30, 60 or 120)
    #[clap(short = 's', long, default_value_t = 30, value_parser = parse_duration)]
    duration: usize,

    /// words per test in words mode (10, 25, 50 or 100)
    #[clap(short = 'w', long, default_value_t = 25, value_parser = parse_word_count)]
    words: usize,

    /// custom prompt to use instead of the built-in texts
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// settings file to load and save
    #[clap(long)]
    settings: Option<PathBuf>,

    /// where to write the log (RUST_LOG sets the level)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

fn parse_option(value: &str, options: &[usize]) -> Result<usize, String> {
    let parsed: usize = value.parse().map_err(|_| format!("`{value}` is not a number"))?;
    if options.contains(&parsed) {
        Ok(parsed)
    } else {
        Err(format!("expected one of {options:?}"))
    }
}

fn parse_duration(value: &str) -> Result<usize, String> {
    parse_option(value, &DURATION_OPTIONS)
}

fn parse_word_count(value: &str) -> Result<usize, String> {
    parse_option(value, &WORD_COUNT_OPTIONS)
}

impl Cli {
    fn test_config(&self, default_difficulty: Difficulty) -> TestConfig {
        TestConfig {
            mode: self.mode,
            difficulty: self.difficulty.unwrap_or(default_difficulty),
            duration_secs: self.duration,
            word_count: self.words,
        }
    }
}

/// Logs go to a file since the terminal belongs to the UI
fn init_logging(path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let Some(path) = path.or_else(AppDirs::log_path) else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Err(err) = init_logging(cli.log_file.clone()) {
        eprintln!("logging disabled: {err}");
    }

    let store: Box<dyn SettingsStore> = match &cli.settings {
        Some(path) => Box::new(FileSettingsStore::with_path(path)),
        None => Box::new(FileSettingsStore::new()),
    };
    let settings = SettingsForm::new(store);
    let config = cli.test_config(settings.saved().default_difficulty);
    let mut app = App::new(config, cli.prompt.clone(), settings)?;
    info!(mode = %app.config().mode, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableFocusChange,
        SetTitle(app.title())
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &outcome {
        warn!(%err, "terminal loop failed");
    }
    outcome
}

fn start_tui<B: Backend + io::Write>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let mut title = app.title();

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let event = runner.step();
        let now = SystemTime::now();
        if let Some(elapsed) = runner.due_tick(Instant::now()) {
            app.on_tick(elapsed.as_secs_f64(), now);
        }
        let was_started = app.test.has_started();
        if app.handle_event(event, now) == Control::Quit {
            info!("quit");
            return Ok(());
        }
        if !was_started && app.test.has_started() {
            // the countdown runs from the first keystroke
            runner.restart_tick(Instant::now());
        }

        if app.title() != title {
            title = app.title();
            execute!(terminal.backend_mut(), SetTitle(&title))?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ratatui::backend::TestBackend;
    use speedtype::settings::Settings;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["speedtype"]);

        assert_eq!(cli.mode, TestMode::Time);
        assert_eq!(cli.difficulty, None);
        assert_eq!(cli.duration, 30);
        assert_eq!(cli.words, 25);
        assert_eq!(cli.prompt, None);
        assert_eq!(cli.settings, None);
    }

    #[test]
    fn test_cli_mode_and_difficulty() {
        let cli = Cli::parse_from(["speedtype", "-m", "words", "-d", "hard"]);
        assert_eq!(cli.mode, TestMode::Words);
        assert_eq!(cli.difficulty, Some(Difficulty::Hard));

        let cli = Cli::parse_from(["speedtype", "--mode", "quote"]);
        assert_eq!(cli.mode, TestMode::Quote);
    }

    #[test]
    fn test_cli_duration_and_words() {
        let cli = Cli::parse_from(["speedtype", "-s", "60", "--words", "100"]);
        assert_eq!(cli.duration, 60);
        assert_eq!(cli.words, 100);

        assert!(Cli::try_parse_from(["speedtype", "-s", "45"]).is_err());
        assert!(Cli::try_parse_from(["speedtype", "-w", "many"]).is_err());
    }

    #[test]
    fn test_cli_custom_prompt() {
        let cli = Cli::parse_from(["speedtype", "-p", "hello world"]);
        assert_eq!(cli.prompt, Some("hello world".to_string()));

        let cli = Cli::parse_from(["speedtype", "--prompt", "custom text"]);
        assert_eq!(cli.prompt, Some("custom text".to_string()));
    }

    #[test]
    fn test_cli_paths() {
        let cli = Cli::parse_from([
            "speedtype",
            "--settings",
            "/tmp/s.json",
            "--log-file",
            "/tmp/speedtype.log",
        ]);
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/speedtype.log")));
    }

    #[test]
    fn test_saved_difficulty_applies_unless_overridden() {
        let cli = Cli::parse_from(["speedtype"]);
        assert_eq!(cli.test_config(Difficulty::Easy).difficulty, Difficulty::Easy);

        let cli = Cli::parse_from(["speedtype", "-d", "hard"]);
        assert_eq!(cli.test_config(Difficulty::Easy).difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_app_renders_with_test_backend() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::with_path(dir.path().join("settings.json"));
        assert_eq!(store.load(), Settings::default());

        let cli = Cli::parse_from(["speedtype", "-p", "hello world"]);
        let settings = SettingsForm::new(Box::new(store));
        let config = cli.test_config(settings.saved().default_difficulty);
        let app = App::new(config, cli.prompt.clone(), settings).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| f.render_widget(&app, f.area())).unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(rendered.contains("hello world"));
    }
}

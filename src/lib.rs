// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod leaderboard;
pub mod results;
pub mod runtime;
pub mod session;
pub mod settings;
pub mod texts;
pub mod ui;
pub mod util;

pub use app::{App, Control, Page};

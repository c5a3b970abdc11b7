use std::time::SystemTime;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::{rngs::StdRng, SeedableRng};

use speedtype::{
    app::{App, Page},
    leaderboard::{ChallengeFilter, SortDirection, SortField, NO_CHALLENGES_MESSAGE},
    session::{Difficulty, TestConfig},
    settings::{FileSettingsStore, SettingsForm},
    texts::SampleSet,
};

fn app(dir: &tempfile::TempDir) -> App {
    let store = FileSettingsStore::with_path(dir.path().join("settings.json"));
    let mut app = App::with_parts(
        TestConfig::default(),
        None,
        SettingsForm::new(Box::new(store)),
        SampleSet::embedded().unwrap(),
        StdRng::seed_from_u64(3),
    );
    app.handle_key(
        KeyEvent::new(KeyCode::F(2), KeyModifiers::NONE),
        SystemTime::now(),
    );
    app
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), SystemTime::now());
}

#[test]
fn ranks_by_wpm_descending_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);
    assert_eq!(app.page, Page::Leaderboard);

    let rows = app.leaderboard.visible();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0].rank, 1);
    assert!(rows.windows(2).all(|w| w[0].entry.wpm >= w[1].entry.wpm));
    assert_eq!(app.leaderboard.footer(), "Showing 1-7 of 20 entries");
}

#[test]
fn sort_keys_toggle_direction_and_keep_page() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&dir);

    press(&mut app, KeyCode::Right);
    assert_eq!(app.leaderboard.current_page, 2);

    press(&mut app, KeyCode::Char('a'));
    assert_eq!(app.leaderboard.sort_field, SortField::Accuracy);
    assert_eq!(app.leaderboard.sort_direction, SortDirection::Desc);
    assert_eq!(app.leaderboard.current_page, 2);
    assert_eq!(app.leaderboard.visible()[0].rank, 8);

    press(&mut app, KeyCode::Char('a'));
    assert_eq!(app.leaderboard.sort_direction, SortDirection::Asc);
    let rows = app.leaderboard.visible();
    assert!(rows
        .windows(2)
        .all(|w| w[0].entry.accuracy <= w[1].entry.accuracy));
}

#[test]
fn paging_stops_at_the_ends() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&dir);

    press(&mut app, KeyCode::Left);
    assert_eq!(app.leaderboard.current_page, 1);

    press(&mut app, KeyCode::Char('3'));
    assert_eq!(app.leaderboard.current_page, 3);
    assert_eq!(app.leaderboard.footer(), "Showing 15-20 of 20 entries");

    press(&mut app, KeyCode::Right);
    assert_eq!(app.leaderboard.current_page, 3);
    assert!(!app.leaderboard.has_next());
}

#[test]
fn challenge_list_filters_by_difficulty() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&dir);

    press(&mut app, KeyCode::Char('v'));
    assert!(app.leaderboard.challenges.is_open);

    press(&mut app, KeyCode::Char('h'));
    let board = &app.leaderboard.challenges;
    assert_eq!(board.filter, ChallengeFilter::Only(Difficulty::Hard));
    assert!(board
        .filtered()
        .iter()
        .all(|c| c.difficulty == Difficulty::Hard));
    assert!(!NO_CHALLENGES_MESSAGE.is_empty());

    press(&mut app, KeyCode::Esc);
    assert!(!app.leaderboard.challenges.is_open);
    assert_eq!(app.leaderboard.challenges.filter, ChallengeFilter::All);
    // esc inside the modal does not leave the page
    assert_eq!(app.page, Page::Leaderboard);

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.page, Page::Practice);
}

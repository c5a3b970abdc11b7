//! Static leaderboard with local sorting, pagination and a challenge list.

use std::cmp::Ordering;

use chrono::NaiveDate;
use itertools::Itertools;

use crate::session::Difficulty;

pub const ENTRIES_PER_PAGE: usize = 7;

/// Number of page buttons shown at once
pub const PAGE_WINDOW: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub id: u32,
    pub username: &'static str,
    pub wpm: u32,
    pub accuracy: f64,
    pub tests: u32,
    /// `YYYY-MM-DD`
    pub date: &'static str,
    pub consistency: u32,
}

const fn entry(
    id: u32,
    username: &'static str,
    wpm: u32,
    accuracy: f64,
    tests: u32,
    date: &'static str,
    consistency: u32,
) -> LeaderboardEntry {
    LeaderboardEntry {
        id,
        username,
        wpm,
        accuracy,
        tests,
        date,
        consistency,
    }
}

pub const ENTRIES: [LeaderboardEntry; 20] = [
    entry(1, "speedDemon", 120, 98.5, 145, "2023-10-12", 96),
    entry(2, "typeMaster", 115, 99.2, 87, "2023-10-15", 94),
    entry(3, "keyboardNinja", 110, 97.8, 93, "2023-10-11", 91),
    entry(4, "swiftFingers", 105, 96.5, 112, "2023-10-18", 88),
    entry(5, "wordSmith", 100, 98.0, 76, "2023-10-09", 92),
    entry(6, "typeHero", 98, 95.7, 65, "2023-10-17", 85),
    entry(7, "keyMaster", 95, 97.3, 88, "2023-10-08", 89),
    entry(8, "typeWizard", 92, 96.8, 54, "2023-10-14", 87),
    entry(9, "fastKeys", 90, 94.9, 43, "2023-10-16", 83),
    entry(10, "typeStar", 88, 95.2, 39, "2023-10-13", 86),
    entry(11, "quickTyper", 103, 97.1, 67, "2023-10-20", 90),
    entry(12, "keyboardKing", 112, 96.9, 102, "2023-10-19", 93),
    entry(13, "typeQueen", 109, 98.3, 78, "2023-10-21", 95),
    entry(14, "speedy", 97, 95.0, 56, "2023-10-10", 84),
    entry(15, "rapidFingers", 101, 96.2, 63, "2023-10-22", 87),
    entry(16, "keystrokeKing", 106, 97.5, 81, "2023-10-07", 91),
    entry(17, "typeTitan", 118, 98.7, 95, "2023-10-23", 97),
    entry(18, "keyCrusher", 107, 96.3, 72, "2023-10-24", 88),
    entry(19, "keyCommander", 104, 97.0, 59, "2023-10-25", 89),
    entry(20, "speedyKeys", 99, 95.8, 48, "2023-10-26", 86),
];

impl LeaderboardEntry {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date, "%Y-%m-%d").ok()
    }

    /// `Oct 12, 2023`; unparseable dates are shown as stored
    pub fn display_date(&self) -> String {
        self.parsed_date()
            .map(|d| d.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| self.date.to_string())
    }

    pub fn initial(&self) -> char {
        self.username
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }

    pub fn consistency_band(&self) -> ConsistencyBand {
        match self.consistency {
            95.. => ConsistencyBand::Excellent,
            90..=94 => ConsistencyBand::Great,
            85..=89 => ConsistencyBand::Fair,
            _ => ConsistencyBand::Poor,
        }
    }
}

/// Colour band of the consistency bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyBand {
    Excellent,
    Great,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaderboardTab {
    #[default]
    Global,
    Friends,
    Weekly,
}

impl LeaderboardTab {
    pub const ALL: [LeaderboardTab; 3] = [
        LeaderboardTab::Global,
        LeaderboardTab::Friends,
        LeaderboardTab::Weekly,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            LeaderboardTab::Global => "Global Rankings",
            LeaderboardTab::Friends => "Friends",
            LeaderboardTab::Weekly => "Weekly Challenge",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Wpm,
    Accuracy,
    Consistency,
    Tests,
    Date,
}

impl SortField {
    /// Column order of the table
    pub const ALL: [SortField; 5] = [
        SortField::Wpm,
        SortField::Accuracy,
        SortField::Consistency,
        SortField::Tests,
        SortField::Date,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            SortField::Wpm => "WPM",
            SortField::Accuracy => "Accuracy",
            SortField::Consistency => "Consistency",
            SortField::Tests => "Tests",
            SortField::Date => "Last Test",
        }
    }

    fn compare(&self, a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
        match self {
            SortField::Wpm => a.wpm.cmp(&b.wpm),
            SortField::Accuracy => a.accuracy.total_cmp(&b.accuracy),
            SortField::Consistency => a.consistency.cmp(&b.consistency),
            SortField::Tests => a.tests.cmp(&b.tests),
            SortField::Date => a.parsed_date().cmp(&b.parsed_date()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

/// Medal shown next to the top three ranks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

pub fn medal_for_rank(rank: usize) -> Option<Medal> {
    match rank {
        1 => Some(Medal::Gold),
        2 => Some(Medal::Silver),
        3 => Some(Medal::Bronze),
        _ => None,
    }
}

/// A table row with its rank on the board
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry<'a> {
    pub rank: usize,
    pub entry: &'a LeaderboardEntry,
}

impl RankedEntry<'_> {
    pub fn medal(&self) -> Option<Medal> {
        medal_for_rank(self.rank)
    }
}

/// Sort `entries` by `field`. Ties keep their input order.
pub fn sort_entries(
    entries: &[LeaderboardEntry],
    field: SortField,
    direction: SortDirection,
) -> Vec<&LeaderboardEntry> {
    entries
        .iter()
        .sorted_by(|a, b| match direction {
            SortDirection::Asc => field.compare(a, b),
            SortDirection::Desc => field.compare(b, a),
        })
        .collect()
}

pub fn total_pages(entries: usize, per_page: usize) -> usize {
    entries.div_ceil(per_page.max(1))
}

/// Inclusive range of page buttons around `current`, clamped to `1..=total`
pub fn page_window(current: usize, total: usize, window: usize) -> (usize, usize) {
    if total == 0 || window == 0 {
        return (1, 0);
    }
    let mut start = current.saturating_sub(window / 2).max(1);
    let end = (start + window - 1).min(total);
    if (end + 1).saturating_sub(start) < window {
        start = (end + 1).saturating_sub(window).max(1);
    }
    (start, end)
}

/// Leaderboard page state: active tab, sort order and current page
#[derive(Debug, Clone)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    pub tab: LeaderboardTab,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    /// 1-based
    pub current_page: usize,
    pub per_page: usize,
    pub challenges: ChallengeBoard,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new(ENTRIES.to_vec())
    }
}

impl Leaderboard {
    pub fn new(entries: Vec<LeaderboardEntry>) -> Self {
        Self {
            entries,
            tab: LeaderboardTab::default(),
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            current_page: 1,
            per_page: ENTRIES_PER_PAGE,
            challenges: ChallengeBoard::default(),
        }
    }

    pub fn select_tab(&mut self, tab: LeaderboardTab) {
        self.tab = tab;
    }

    /// Clicking the active column flips its direction, a new column starts descending
    pub fn sort_by(&mut self, field: SortField) {
        if field == self.sort_field {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Desc;
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.entries.len(), self.per_page)
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.current_page + 1);
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.current_page.saturating_sub(1));
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn page_buttons(&self) -> Vec<usize> {
        let (start, end) = page_window(self.current_page, self.total_pages(), PAGE_WINDOW);
        (start..=end).collect()
    }

    fn first_index(&self) -> usize {
        (self.current_page - 1) * self.per_page
    }

    /// Rows of the current page, ranked by their position in the sorted board
    pub fn visible(&self) -> Vec<RankedEntry<'_>> {
        let first = self.first_index();
        sort_entries(&self.entries, self.sort_field, self.sort_direction)
            .into_iter()
            .skip(first)
            .take(self.per_page)
            .enumerate()
            .map(|(idx, entry)| RankedEntry {
                rank: first + idx + 1,
                entry,
            })
            .collect()
    }

    /// `Showing a-b of n entries`
    pub fn footer(&self) -> String {
        let total = self.entries.len();
        let first = self.first_index();
        let last = (first + self.per_page).min(total);
        format!("Showing {}-{} of {} entries", first + 1, last, total)
    }

    /// Sort marker for a column header, if it is the active one
    pub fn sort_indicator(&self, field: SortField) -> Option<&'static str> {
        (field == self.sort_field).then(|| self.sort_direction.arrow())
    }
}

/// Personal summary panel. There is no account, so every figure stays at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PersonalStats {
    pub wpm: u32,
    pub accuracy: u32,
    pub consistency: u32,
    pub tests: u32,
}

impl PersonalStats {
    pub fn tiles(&self) -> [(String, &'static str); 4] {
        [
            (self.wpm.to_string(), "WPM"),
            (format!("{}%", self.accuracy), "Accuracy"),
            (format!("{}%", self.consistency), "Consistency"),
            (self.tests.to_string(), "Tests"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Challenge {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
    pub progress: u32,
    pub max_attempts: u32,
    pub attempts: u32,
    pub reward: &'static str,
}

impl Challenge {
    pub fn attempts_label(&self) -> String {
        format!("{}/{} attempts", self.attempts, self.max_attempts)
    }
}

const fn challenge(
    id: u32,
    title: &'static str,
    description: &'static str,
    difficulty: Difficulty,
    max_attempts: u32,
    reward: &'static str,
) -> Challenge {
    Challenge {
        id,
        title,
        description,
        difficulty,
        progress: 0,
        max_attempts,
        attempts: 0,
        reward,
    }
}

pub const CHALLENGES: [Challenge; 8] = [
    challenge(1, "Speed Demon", "Reach 100 WPM with 95% accuracy", Difficulty::Hard, 3, "150 XP"),
    challenge(2, "Perfect Run", "Complete a test with 100% accuracy", Difficulty::Medium, 3, "100 XP"),
    challenge(3, "Consistency King", "Achieve 98% consistency on a test", Difficulty::Medium, 5, "120 XP"),
    challenge(4, "Marathon Typer", "Complete 10 typing tests in a single day", Difficulty::Easy, 1, "80 XP"),
    challenge(5, "Night Owl", "Complete a test between 12 AM and 4 AM", Difficulty::Easy, 1, "50 XP"),
    challenge(6, "Lightning Fingers", "Type at 120 WPM for at least 30 seconds", Difficulty::Hard, 5, "200 XP"),
    challenge(7, "Blind Typing", "Complete a test in blind mode with 90% accuracy", Difficulty::Hard, 3, "180 XP"),
    challenge(8, "Quote Master", "Complete 5 quote mode tests", Difficulty::Medium, 1, "100 XP"),
];

/// Number of challenges previewed in the weekly panel
pub const FEATURED_CHALLENGES: usize = 2;

pub const NO_CHALLENGES_MESSAGE: &str = "No challenges found for the selected filter.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChallengeFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl ChallengeFilter {
    pub const ALL: [ChallengeFilter; 4] = [
        ChallengeFilter::All,
        ChallengeFilter::Only(Difficulty::Easy),
        ChallengeFilter::Only(Difficulty::Medium),
        ChallengeFilter::Only(Difficulty::Hard),
    ];

    pub fn label(&self) -> String {
        match self {
            ChallengeFilter::All => "All".to_string(),
            ChallengeFilter::Only(d) => d.to_string(),
        }
    }

    pub fn matches(&self, challenge: &Challenge) -> bool {
        match self {
            ChallengeFilter::All => true,
            ChallengeFilter::Only(d) => challenge.difficulty == *d,
        }
    }
}

/// The challenge list and its open/filter state
#[derive(Debug, Clone)]
pub struct ChallengeBoard {
    challenges: Vec<Challenge>,
    pub filter: ChallengeFilter,
    pub is_open: bool,
}

impl Default for ChallengeBoard {
    fn default() -> Self {
        Self::new(CHALLENGES.to_vec())
    }
}

impl ChallengeBoard {
    pub fn new(challenges: Vec<Challenge>) -> Self {
        Self {
            challenges,
            filter: ChallengeFilter::All,
            is_open: false,
        }
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Closing resets the filter to `All`
    pub fn close(&mut self) {
        self.is_open = false;
        self.filter = ChallengeFilter::All;
    }

    pub fn set_filter(&mut self, filter: ChallengeFilter) {
        self.filter = filter;
    }

    pub fn filtered(&self) -> Vec<&Challenge> {
        self.challenges
            .iter()
            .filter(|c| self.filter.matches(c))
            .collect()
    }

    pub fn featured(&self) -> &[Challenge] {
        let n = FEATURED_CHALLENGES.min(self.challenges.len());
        &self.challenges[..n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usernames(board: &Leaderboard) -> Vec<&'static str> {
        board.visible().iter().map(|r| r.entry.username).collect()
    }

    #[test]
    fn test_default_sort_is_wpm_desc() {
        let board = Leaderboard::default();
        assert_eq!(board.sort_field, SortField::Wpm);
        assert_eq!(board.sort_direction, SortDirection::Desc);
        assert_eq!(
            usernames(&board),
            vec![
                "speedDemon",
                "typeTitan",
                "typeMaster",
                "keyboardKing",
                "keyboardNinja",
                "typeQueen",
                "keyCrusher"
            ]
        );
    }

    #[test]
    fn test_sort_toggle_and_new_field() {
        let mut board = Leaderboard::default();
        board.sort_by(SortField::Wpm);
        assert_eq!(board.sort_direction, SortDirection::Asc);
        assert_eq!(usernames(&board)[0], "typeStar");

        board.sort_by(SortField::Tests);
        assert_eq!(board.sort_field, SortField::Tests);
        assert_eq!(board.sort_direction, SortDirection::Desc);
        assert_eq!(usernames(&board)[0], "speedDemon");
        assert_eq!(board.sort_indicator(SortField::Tests), Some("▼"));
        assert_eq!(board.sort_indicator(SortField::Wpm), None);
    }

    #[test]
    fn test_sort_by_date_and_accuracy() {
        let by_date = sort_entries(&ENTRIES, SortField::Date, SortDirection::Asc);
        assert_eq!(by_date[0].username, "keystrokeKing");
        assert_eq!(by_date[19].username, "speedyKeys");

        let by_accuracy = sort_entries(&ENTRIES, SortField::Accuracy, SortDirection::Desc);
        assert_eq!(by_accuracy[0].username, "typeMaster");
        assert_eq!(by_accuracy[19].username, "fastKeys");
    }

    #[test]
    fn test_pagination() {
        let mut board = Leaderboard::default();
        assert_eq!(board.total_pages(), 3);
        assert_eq!(board.footer(), "Showing 1-7 of 20 entries");
        assert!(!board.has_prev());

        board.prev_page();
        assert_eq!(board.current_page, 1);

        board.go_to_page(3);
        assert_eq!(board.visible().len(), 6);
        assert_eq!(board.footer(), "Showing 15-20 of 20 entries");
        assert!(!board.has_next());

        board.next_page();
        assert_eq!(board.current_page, 3);
        assert_eq!(board.visible()[0].rank, 15);
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 3, 3), (1, 3));
        assert_eq!(page_window(2, 3, 3), (1, 3));
        assert_eq!(page_window(3, 3, 3), (1, 3));
        assert_eq!(page_window(5, 10, 3), (4, 6));
        assert_eq!(page_window(10, 10, 3), (8, 10));
        assert_eq!(page_window(1, 2, 3), (1, 2));
        assert_eq!(page_window(1, 1, 3), (1, 1));
    }

    #[test]
    fn test_medals() {
        let board = Leaderboard::default();
        let rows = board.visible();
        assert_eq!(rows[0].medal(), Some(Medal::Gold));
        assert_eq!(rows[1].medal(), Some(Medal::Silver));
        assert_eq!(rows[2].medal(), Some(Medal::Bronze));
        assert_eq!(rows[3].medal(), None);
    }

    #[test]
    fn test_display_date() {
        assert_eq!(ENTRIES[0].display_date(), "Oct 12, 2023");
        assert_eq!(ENTRIES[15].display_date(), "Oct 7, 2023");

        let odd = entry(99, "x", 1, 1.0, 1, "yesterday", 1);
        assert_eq!(odd.display_date(), "yesterday");
    }

    #[test]
    fn test_consistency_band() {
        assert_eq!(ENTRIES[16].consistency_band(), ConsistencyBand::Excellent);
        assert_eq!(ENTRIES[1].consistency_band(), ConsistencyBand::Great);
        assert_eq!(ENTRIES[5].consistency_band(), ConsistencyBand::Fair);
        assert_eq!(ENTRIES[8].consistency_band(), ConsistencyBand::Poor);
    }

    #[test]
    fn test_challenge_filter() {
        let mut board = ChallengeBoard::default();
        assert_eq!(board.filtered().len(), 8);

        board.set_filter(ChallengeFilter::Only(Difficulty::Easy));
        let titles: Vec<_> = board.filtered().iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["Marathon Typer", "Night Owl"]);

        board.set_filter(ChallengeFilter::Only(Difficulty::Hard));
        assert_eq!(board.filtered().len(), 3);
        assert_eq!(ChallengeFilter::Only(Difficulty::Hard).label(), "Hard");
    }

    #[test]
    fn test_empty_challenge_filter() {
        let mut board = ChallengeBoard::new(vec![CHALLENGES[0].clone()]);
        board.set_filter(ChallengeFilter::Only(Difficulty::Easy));
        assert!(board.filtered().is_empty());
    }

    #[test]
    fn test_featured_challenges() {
        let board = ChallengeBoard::default();
        let featured = board.featured();
        assert_eq!(featured.len(), 2);
        assert_eq!(featured[0].attempts_label(), "0/3 attempts");
    }

    #[test]
    fn test_personal_stats_are_zero() {
        let tiles = PersonalStats::default().tiles();
        assert_eq!(tiles[0], ("0".to_string(), "WPM"));
        assert_eq!(tiles[1], ("0%".to_string(), "Accuracy"));
    }
}

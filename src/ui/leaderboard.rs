use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Widget, Wrap},
};

use super::{centered_rect, palette::Palette};
use crate::{
    leaderboard::{
        Challenge, ChallengeBoard, ChallengeFilter, ConsistencyBand, Leaderboard, LeaderboardTab,
        Medal, PersonalStats, SortField, NO_CHALLENGES_MESSAGE,
    },
    session::Difficulty,
};

const BAR_WIDTH: usize = 10;

pub fn render(board: &Leaderboard, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Min(60), Constraint::Length(34)].as_ref())
        .split(area);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1), // tabs
                Constraint::Length(1),
                Constraint::Min(5), // table
                Constraint::Length(1), // footer
                Constraint::Length(1), // legend
            ]
            .as_ref(),
        )
        .split(columns[0]);

    Paragraph::new(tab_line(board.tab, palette)).render(main[0], buf);
    ranking_table(board, palette).render(main[2], buf);
    Paragraph::new(pagination_line(board, palette)).render(main[3], buf);
    Paragraph::new(Span::styled(
        "sort: (w)pm (a)ccuracy (c)onsistency (t)ests (d)ate   pages: ←/→ 1-9   tab: switch board   (v)iew challenges",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(main[4], buf);

    render_side_panel(board, palette, columns[1], buf);

    if board.challenges.is_open {
        render_challenges(&board.challenges, palette, area, buf);
    }
}

fn tab_line<'a>(active: LeaderboardTab, palette: &Palette) -> Line<'a> {
    let spans = LeaderboardTab::ALL
        .iter()
        .flat_map(|tab| {
            let style = if *tab == active {
                Style::default()
                    .fg(palette.background)
                    .bg(palette.primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.muted)
            };
            [Span::styled(format!(" {} ", tab.title()), style), Span::raw("  ")]
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

fn medal_style(medal: Option<Medal>) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match medal {
        Some(Medal::Gold) => bold.fg(Color::Black).bg(Color::Yellow),
        Some(Medal::Silver) => bold.fg(Color::Black).bg(Color::Gray),
        Some(Medal::Bronze) => bold.fg(Color::Black).bg(Color::Rgb(0xD9, 0x77, 0x06)),
        None => Style::default().fg(Color::Gray),
    }
}

fn band_color(band: ConsistencyBand) -> Color {
    match band {
        ConsistencyBand::Excellent => Color::Green,
        ConsistencyBand::Great => Color::LightGreen,
        ConsistencyBand::Fair => Color::Yellow,
        ConsistencyBand::Poor => Color::Red,
    }
}

/// `███████░░░ 70%`
pub fn consistency_bar(consistency: u32) -> String {
    let filled = (consistency.min(100) as usize * BAR_WIDTH + 50) / 100;
    format!(
        "{}{} {}%",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        consistency
    )
}

fn ranking_table<'a>(board: &'a Leaderboard, palette: &Palette) -> Table<'a> {
    let mut header_cells = vec![Cell::from("Rank"), Cell::from("User")];
    header_cells.extend(SortField::ALL.iter().map(|field| {
        let text = match board.sort_indicator(*field) {
            Some(arrow) => format!("{} {arrow}", field.header()),
            None => field.header().to_string(),
        };
        Cell::from(text)
    }));
    let header = Row::new(header_cells).style(palette.accent()).bottom_margin(1);

    let rows = board.visible().into_iter().map(|ranked| {
        let entry = ranked.entry;
        Row::new(vec![
            Cell::from(format!(" {:>2} ", ranked.rank)).style(medal_style(ranked.medal())),
            Cell::from(Line::from(vec![
                Span::styled(format!("{} ", entry.initial()), palette.accent()),
                Span::raw(entry.username),
            ])),
            Cell::from(entry.wpm.to_string()).style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from(format!("{:.1}%", entry.accuracy)),
            Cell::from(consistency_bar(entry.consistency))
                .style(Style::default().fg(band_color(entry.consistency_band()))),
            Cell::from(entry.tests.to_string()),
            Cell::from(entry.display_date()),
        ])
        .style(Style::default().fg(palette.text))
    });

    Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(16),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(17),
            Constraint::Length(7),
            Constraint::Length(13),
        ],
    )
    .header(header)
    .column_spacing(1)
}

fn pagination_line<'a>(board: &Leaderboard, palette: &Palette) -> Line<'a> {
    let mut spans = vec![Span::styled(format!("{}   ", board.footer()), palette.dim())];

    let arrow = |enabled: bool, symbol: &'static str| {
        Span::styled(
            symbol,
            if enabled {
                Style::default().fg(palette.text)
            } else {
                palette.dim()
            },
        )
    };

    spans.push(arrow(board.has_prev(), " ‹ "));
    for page in board.page_buttons() {
        let style = if page == board.current_page {
            Style::default()
                .fg(palette.background)
                .bg(palette.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.muted)
        };
        spans.push(Span::styled(format!(" {page} "), style));
    }
    spans.push(arrow(board.has_next(), " › "));
    Line::from(spans)
}

fn render_side_panel(board: &Leaderboard, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)].as_ref())
        .split(area);

    let stats = PersonalStats::default();
    let tiles: Vec<Span> = stats
        .tiles()
        .into_iter()
        .map(|(value, label)| Span::styled(format!("{value} {label}  "), Style::default().fg(palette.text)))
        .collect();
    Paragraph::new(vec![Line::from(tiles[..2].to_vec()), Line::from(tiles[2..].to_vec())])
        .block(
            Block::default()
                .title(" Your Stats ")
                .borders(Borders::ALL)
                .border_style(palette.border()),
        )
        .render(parts[0], buf);

    let mut lines = Vec::new();
    for challenge in board.challenges.featured() {
        lines.extend(challenge_lines(challenge, palette));
        lines.push(Line::default());
    }
    lines.push(Line::from(Span::styled("(v) View All Challenges", palette.accent())));
    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Weekly Challenge ")
                .borders(Borders::ALL)
                .border_style(palette.border()),
        )
        .render(parts[1], buf);
}

fn difficulty_style(difficulty: Difficulty) -> Style {
    let color = match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    };
    Style::default().fg(Color::Black).bg(color)
}

fn challenge_lines<'a>(challenge: &Challenge, palette: &Palette) -> Vec<Line<'a>> {
    vec![
        Line::from(vec![
            Span::styled(challenge.title.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(format!(" {} ", challenge.difficulty), difficulty_style(challenge.difficulty)),
            Span::styled(format!("  {}", challenge.reward), palette.accent()),
        ]),
        Line::from(Span::styled(challenge.description.to_string(), palette.dim())),
        Line::from(Span::styled(challenge.attempts_label(), palette.dim())),
    ]
}

fn render_challenges(board: &ChallengeBoard, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(70, area.height.saturating_sub(4), area);
    Clear.render(popup, buf);

    let mut lines = vec![filter_line(board.filter, palette), Line::default()];
    let challenges = board.filtered();
    if challenges.is_empty() {
        lines.push(Line::from(Span::styled(NO_CHALLENGES_MESSAGE, palette.dim())));
    }
    for challenge in challenges {
        lines.extend(challenge_lines(challenge, palette));
        lines.push(Line::default());
    }

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .title(" All Challenges  (a)ll (e)asy (m)edium (h)ard  esc: close ")
                .borders(Borders::ALL)
                .border_style(palette.border()),
        )
        .render(popup, buf);
}

fn filter_line<'a>(active: ChallengeFilter, palette: &Palette) -> Line<'a> {
    let spans = ChallengeFilter::ALL
        .iter()
        .flat_map(|filter| {
            let style = match (filter == &active, filter) {
                (true, ChallengeFilter::Only(d)) => difficulty_style(*d),
                (true, ChallengeFilter::All) => Style::default().fg(palette.background).bg(palette.primary),
                (false, _) => Style::default().fg(palette.muted),
            };
            [Span::styled(format!(" {} ", filter.label()), style), Span::raw(" ")]
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistency_bar() {
        assert_eq!(consistency_bar(96), "██████████ 96%");
        assert_eq!(consistency_bar(83), "████████░░ 83%");
        assert_eq!(consistency_bar(0), "░░░░░░░░░░ 0%");
    }
}

use std::time::SystemTime;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, LineGauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::{centered_rect, charting, palette::Palette};
use crate::{
    app::{App, OptionRow},
    results::SessionResult,
    session::{duration_label, Difficulty, TestMode, TestStatus, DURATION_OPTIONS, WORD_COUNT_OPTIONS},
    settings::Settings,
    typing_test::{CharMark, TypingTest},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

pub const BLUR_MESSAGE: &str = "Click here or press any key to continue";
pub const RESTART_HINT: &str = "Tab + Enter to restart";

pub fn render(app: &App, area: Rect, buf: &mut Buffer, now: SystemTime) {
    let settings = app.settings.saved();
    let palette = Palette::from_settings(settings);

    match app.test.result() {
        Some(result) if app.test.has_finished() => render_results(result, &palette, area, buf),
        _ => render_typing(app, settings, &palette, area, buf, now),
    }
}

fn render_typing(
    app: &App,
    settings: &Settings,
    palette: &Palette,
    area: Rect,
    buf: &mut Buffer,
    now: SystemTime,
) {
    let test = &app.test;
    let show_options = app.options_visible_at(now);
    let option_lines = if show_options {
        app.option_rows().len() as u16 + 1
    } else {
        0
    };

    let text_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let prompt_lines = ((test.prompt().width() as f64 / text_width as f64).ceil() as u16).max(1) + 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(option_lines),
                Constraint::Min(0),
                Constraint::Length(1), // live stats
                Constraint::Length(1), // timer progress
                Constraint::Length(prompt_lines),
                Constraint::Min(0),
                Constraint::Length(1), // hint
            ]
            .as_ref(),
        )
        .split(area);

    if show_options {
        Paragraph::new(option_bar(app, palette)).render(chunks[0], buf);
    }

    Paragraph::new(live_stats(test, settings, palette, now))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    if let (true, Some(limit), Some(left)) = (
        settings.show_timer_progress,
        test.config.time_limit(),
        test.seconds_remaining,
    ) {
        if test.status == TestStatus::Typing && limit > 0.0 {
            LineGauge::default()
                .filled_style(Style::default().fg(palette.primary))
                .unfilled_style(palette.dim())
                .label("")
                .ratio((left / limit).clamp(0.0, 1.0))
                .render(chunks[3], buf);
        }
    }

    let mut prompt_style = Style::default();
    if !test.is_focused {
        prompt_style = prompt_style.add_modifier(Modifier::DIM);
    }
    Paragraph::new(Line::from(prompt_spans(test, settings, palette)))
        .style(prompt_style)
        .alignment(if prompt_lines <= 2 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[4], buf);

    if show_options {
        Paragraph::new(Span::styled(RESTART_HINT, palette.dim()))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }

    if !test.is_focused {
        let overlay = centered_rect(50, 3, chunks[4].union(chunks[2]));
        Clear.render(overlay, buf);
        Paragraph::new(Span::styled(BLUR_MESSAGE, palette.accent()))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(palette.border()),
            )
            .render(overlay, buf);
    }
}

fn option_bar<'a>(app: &App, palette: &Palette) -> Vec<Line<'a>> {
    let config = app.config();
    app.option_rows()
        .into_iter()
        .map(|row| {
            let (label, values, selected): (&str, Vec<String>, usize) = match row {
                OptionRow::Mode => (
                    "Mode",
                    TestMode::ALL.iter().map(|m| m.to_string()).collect(),
                    position(&TestMode::ALL, config.mode),
                ),
                OptionRow::Length if config.mode == TestMode::Time => (
                    "Duration",
                    DURATION_OPTIONS.iter().map(|d| duration_label(*d)).collect(),
                    position(&DURATION_OPTIONS, config.duration_secs),
                ),
                OptionRow::Length => (
                    "Words",
                    WORD_COUNT_OPTIONS.iter().map(|w| w.to_string()).collect(),
                    position(&WORD_COUNT_OPTIONS, config.word_count),
                ),
                OptionRow::Difficulty => (
                    "Difficulty",
                    Difficulty::ALL.iter().map(|d| d.to_string()).collect(),
                    position(&Difficulty::ALL, config.difficulty),
                ),
            };

            let focused = row == app.option_row;
            let label_style = if focused {
                palette.accent()
            } else {
                palette.dim()
            };
            let mut spans = vec![Span::styled(format!("{label:>10}  "), label_style)];
            for (idx, value) in values.into_iter().enumerate() {
                let style = if idx == selected {
                    Style::default()
                        .fg(palette.background)
                        .bg(palette.primary)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(palette.muted)
                };
                spans.push(Span::styled(format!(" {value} "), style));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        })
        .collect()
}

fn position<T: PartialEq>(options: &[T], value: T) -> usize {
    options.iter().position(|o| *o == value).unwrap_or(usize::MAX)
}

fn live_stats<'a>(test: &TypingTest, settings: &Settings, palette: &Palette, now: SystemTime) -> Line<'a> {
    let mut spans = vec![Span::styled(test.progress().to_string(), palette.accent())];
    if test.has_started() {
        if settings.shows_live_wpm() {
            spans.push(Span::styled(
                format!("   {} wpm", test.live_wpm_at(now)),
                Style::default().fg(palette.text),
            ));
        }
        if settings.shows_live_accuracy() {
            spans.push(Span::styled(
                format!("   {}% acc", test.live_accuracy()),
                Style::default().fg(palette.text),
            ));
        }
    }
    Line::from(spans)
}

/// Coloured spans for the whole prompt. Blind mode drops correctness colours.
pub fn prompt_spans<'a>(test: &TypingTest, settings: &Settings, palette: &Palette) -> Vec<Span<'a>> {
    let correct = Style::default().fg(palette.correct).add_modifier(Modifier::BOLD);
    let incorrect = Style::default().fg(palette.incorrect).add_modifier(Modifier::BOLD);
    let typed = Style::default().fg(palette.text).add_modifier(Modifier::BOLD);
    let pending = palette.dim().add_modifier(Modifier::BOLD);
    let caret = palette.caret(&settings.caret_style);
    let (correct, incorrect) = if settings.blind_mode {
        (typed, typed)
    } else {
        (correct, incorrect)
    };

    let mut spans = Vec::new();
    for idx in 0..test.words.len() {
        if idx > 0 {
            // past the end of the current word, the caret sits on the separator
            let on_separator = idx == test.current_word + 1
                && test.input.chars().count() >= test.words[test.current_word].chars().count()
                && !test.has_finished();
            spans.push(Span::styled(" ", if on_separator { caret } else { pending }));
        }

        for mark in test.marks_for_word(idx) {
            let span = match mark {
                CharMark::Correct(c) => Span::styled(c.to_string(), correct),
                CharMark::Incorrect { typed, .. } => Span::styled(
                    match typed {
                        ' ' => "·".to_owned(),
                        c => c.to_string(),
                    },
                    incorrect,
                ),
                CharMark::Extra(c) => {
                    Span::styled(c.to_string(), incorrect.add_modifier(Modifier::DIM))
                }
                CharMark::Missing(c) => Span::styled(
                    c.to_string(),
                    incorrect.add_modifier(Modifier::DIM | Modifier::CROSSED_OUT),
                ),
                CharMark::Cursor(c) => Span::styled(c.to_string(), caret),
                CharMark::Pending(c) => Span::styled(c.to_string(), pending),
            };
            spans.push(span);
        }
    }
    spans
}

fn render_results(result: &SessionResult, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(3), // headline stats
                Constraint::Length(1), // secondary stats
                Constraint::Length(1), // padding
                Constraint::Min(1),    // chart
                Constraint::Length(1), // legend
            ]
            .as_ref(),
        )
        .split(area);

    let headline = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3].as_ref())
        .split(chunks[0]);

    let tile = |value: String, label: &'static str, style: Style| {
        Paragraph::new(vec![
            Line::from(Span::styled(value, style)),
            Line::from(Span::styled(label, palette.dim())),
        ])
        .alignment(Alignment::Center)
    };

    tile(result.wpm.to_string(), "WPM", palette.accent()).render(headline[0], buf);
    tile(
        format!("{}%", result.accuracy),
        "Accuracy",
        bold.fg(palette.accuracy(result.accuracy)),
    )
    .render(headline[1], buf);
    tile(
        result.char_ratio(),
        "characters",
        bold.fg(palette.text),
    )
    .render(headline[2], buf);

    Paragraph::new(Span::styled(
        format!(
            "{}   {:.1}s   {} errors   {}% consistency   {}% keystroke acc",
            result.mode.long_name(),
            result.duration_secs,
            result.error_count,
            result.consistency,
            result.keystroke_accuracy,
        ),
        palette.dim(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let points: Vec<(f64, f64)> = result.wpm_series.iter().map(|p| (*p).into()).collect();
    results_chart(result, &points, palette).render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "(r)etry / (n)ext test / tab + enter / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[4], buf);
}

fn results_chart<'a>(
    result: &SessionResult,
    points: &'a [(f64, f64)],
    palette: &Palette,
) -> Chart<'a> {
    let (x_max, y_max) = charting::compute_chart_params(&result.wpm_series, result.configured_secs);
    let label_secs = result.configured_secs.unwrap_or(result.duration_secs).round() as usize;

    let dataset = Dataset::default()
        .name("wpm")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(palette.primary))
        .data(points);

    Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .style(palette.dim())
                .bounds([0.0, x_max])
                .labels(charting::chart_labels(result.mode, label_secs)),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .style(palette.dim())
                .bounds([0.0, y_max])
                .labels(vec![
                    "0".to_string(),
                    charting::format_label(y_max / 2.0),
                    charting::format_label(y_max),
                ]),
        )
}

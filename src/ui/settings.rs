use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use super::{
    centered_rect,
    palette::{hex_color, Palette},
};
use crate::settings::{
    form::{FieldKind, RESET_CONFIRM_PROMPT},
    theme_by_id, SaveStatus, SettingField, SettingsForm, SettingsTab,
};

pub fn render(form: &SettingsForm, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(3)
        .vertical_margin(1)
        .constraints(
            [
                Constraint::Length(2), // header
                Constraint::Length(2), // tabs
                Constraint::Min(3),    // fields
                Constraint::Length(1), // transfer path
                Constraint::Length(1), // actions
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(vec![
        Line::from(Span::styled("Settings", palette.accent())),
        Line::from(Span::styled(
            "Customize your SpeedType experience",
            palette.dim(),
        )),
    ])
    .render(chunks[0], buf);

    Paragraph::new(tab_line(form.tab, palette)).render(chunks[1], buf);

    let lines = field_lines(form, palette);
    // keep the selected row on screen
    let selected_line = selected_line_index(form);
    let height = chunks[2].height as usize;
    let scroll = selected_line.saturating_sub(height.saturating_sub(2));
    Paragraph::new(lines)
        .scroll((scroll as u16, 0))
        .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        format!(
            "export/import file: {}",
            form.transfer_path().display()
        ),
        palette.dim(),
    ))
    .render(chunks[3], buf);

    Paragraph::new(action_line(form, palette))
        .alignment(Alignment::Right)
        .render(chunks[4], buf);

    if form.is_confirming_reset() {
        let popup = centered_rect(60, 5, area);
        Clear.render(popup, buf);
        Paragraph::new(vec![
            Line::from(RESET_CONFIRM_PROMPT),
            Line::from(Span::styled("(y/n)", palette.accent())),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Reset to Defaults ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.warning)),
        )
        .render(popup, buf);
    }
}

fn tab_line<'a>(active: SettingsTab, palette: &Palette) -> Line<'a> {
    let mut spans = Vec::new();
    for tab in SettingsTab::ALL {
        let style = if tab == active {
            Style::default()
                .fg(palette.background)
                .bg(palette.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.muted)
        };
        spans.push(Span::styled(format!(" {} ", tab.label()), style));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

/// One heading line per section, then one line per field
fn field_lines<'a>(form: &SettingsForm, palette: &Palette) -> Vec<Line<'a>> {
    let selected = form.selected_field();
    let mut lines = Vec::new();

    for (section, fields) in &form
        .visible_fields()
        .into_iter()
        .chunk_by(|field| field.section())
    {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            section.to_string(),
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));
        for field in fields {
            lines.push(field_line(form, field, Some(field) == selected, palette));
        }
    }
    lines
}

fn selected_line_index(form: &SettingsForm) -> usize {
    let fields = form.visible_fields();
    let mut line = 0;
    let mut section = None;
    for (idx, field) in fields.iter().enumerate() {
        if section != Some(field.section()) {
            line += if section.is_some() { 2 } else { 1 };
            section = Some(field.section());
        }
        if idx == form.selected {
            return line;
        }
        line += 1;
    }
    line
}

fn field_line<'a>(
    form: &SettingsForm,
    field: SettingField,
    is_selected: bool,
    palette: &Palette,
) -> Line<'a> {
    let marker = if is_selected { "› " } else { "  " };
    let label_style = if is_selected {
        palette.accent()
    } else {
        Style::default().fg(palette.text)
    };

    let mut spans = vec![
        Span::styled(marker, palette.accent()),
        Span::styled(format!("{:<26}", field.label()), label_style),
    ];

    let value = field.value_label(&form.values);
    match field.kind() {
        FieldKind::Action => {
            let style = if field == SettingField::ResetToDefaults {
                Style::default().fg(palette.incorrect)
            } else {
                Style::default().fg(palette.primary)
            };
            spans.push(Span::styled(
                format!("[ {} ]", field.label()),
                style.add_modifier(Modifier::BOLD),
            ));
        }
        FieldKind::Toggle => {
            let style = if value == "On" {
                Style::default().fg(palette.background).bg(palette.primary)
            } else {
                Style::default().fg(palette.muted)
            };
            spans.push(Span::styled(format!(" {value} "), style));
        }
        FieldKind::Slider { min, max, .. } => {
            spans.push(Span::styled(
                format!("◂ {value} ▸"),
                Style::default().fg(palette.text),
            ));
            spans.push(Span::styled(format!("  ({min}-{max})"), palette.dim()));
        }
        FieldKind::Choice(_) => {
            spans.push(Span::styled(
                format!("◂ {value} ▸"),
                Style::default().fg(palette.text),
            ));
            if field == SettingField::Theme {
                spans.push(Span::raw("  "));
                spans.extend(theme_swatches(&form.values.theme));
            }
        }
        FieldKind::Text => {
            let shown = if value.is_empty() {
                "(empty)".to_string()
            } else {
                value
            };
            let mut style = Style::default().fg(palette.text);
            if is_selected {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            spans.push(Span::styled(shown, style));
            if field == SettingField::CaretColor {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    "  ",
                    Style::default().bg(hex_color(&form.values.caret_color)),
                ));
            }
        }
    }

    if let Some(description) = field.description() {
        spans.push(Span::styled(format!("   {description}"), palette.dim()));
    }
    Line::from(spans)
}

fn theme_swatches<'a>(theme_id: &str) -> Vec<Span<'a>> {
    let colors = theme_by_id(theme_id).colors;
    [
        colors.primary,
        colors.background,
        colors.card,
        colors.text,
        colors.border,
    ]
    .into_iter()
    .map(|hex| Span::styled("  ", Style::default().bg(hex_color(hex))))
    .collect()
}

fn action_line<'a>(form: &SettingsForm, palette: &Palette) -> Line<'a> {
    let status = form.status();
    let save_style = match status {
        SaveStatus::Idle | SaveStatus::Saving => {
            Style::default().fg(palette.background).bg(palette.primary)
        }
        SaveStatus::Success => Style::default().fg(Color::Black).bg(palette.correct),
        SaveStatus::Error => Style::default().fg(Color::White).bg(palette.incorrect),
    }
    .add_modifier(Modifier::BOLD);

    let reset_style = if form.is_dirty() {
        Style::default().fg(palette.text)
    } else {
        palette.dim()
    };

    Line::from(vec![
        Span::styled("ctrl+r Reset Changes", reset_style),
        Span::raw("   "),
        Span::styled(format!(" ctrl+s {} ", status.label()), save_style),
    ])
}

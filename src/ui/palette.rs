use ratatui::style::{Color, Modifier, Style};

use crate::settings::{parse_hex_color, Settings, Theme};

/// Terminal colours derived from the active theme and caret settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub background: Color,
    pub card: Color,
    pub text: Color,
    pub border: Color,
    pub caret: Color,
    pub muted: Color,
    pub correct: Color,
    pub incorrect: Color,
    pub warning: Color,
}

pub fn hex_color(hex: &str) -> Color {
    parse_hex_color(hex)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::Reset)
}

impl Palette {
    pub fn from_theme(theme: &Theme) -> Self {
        let primary = hex_color(theme.colors.primary);
        Self {
            primary,
            background: hex_color(theme.colors.background),
            card: hex_color(theme.colors.card),
            text: hex_color(theme.colors.text),
            border: hex_color(theme.colors.border),
            caret: primary,
            muted: Color::Gray,
            correct: Color::Green,
            incorrect: Color::Red,
            warning: Color::Yellow,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut palette = Self::from_theme(settings.theme());
        if let Some((r, g, b)) = parse_hex_color(&settings.caret_color) {
            palette.caret = Color::Rgb(r, g, b);
        }
        palette
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::DIM)
    }

    pub fn accent(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style of the next character to type
    pub fn caret(&self, caret_style: &str) -> Style {
        let base = Style::default().add_modifier(Modifier::BOLD);
        match caret_style {
            "block" => base.fg(self.background).bg(self.caret),
            "underscore" => base.fg(self.text).add_modifier(Modifier::UNDERLINED),
            "outline" => base.fg(self.caret).add_modifier(Modifier::REVERSED | Modifier::DIM),
            _ => base.fg(self.caret).add_modifier(Modifier::UNDERLINED),
        }
    }

    /// Green above 95, yellow above 85, red otherwise
    pub fn accuracy(&self, accuracy: f64) -> Color {
        if accuracy > 95.0 {
            self.correct
        } else if accuracy > 85.0 {
            self.warning
        } else {
            self.incorrect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::theme_by_id;

    #[test]
    fn theme_colors_become_rgb() {
        let palette = Palette::from_theme(theme_by_id("midnight"));
        assert_eq!(palette.primary, Color::Rgb(0x3B, 0x82, 0xF6));
        assert_eq!(palette.background, Color::Rgb(0x0F, 0x17, 0x2A));
    }

    #[test]
    fn caret_color_overrides_primary() {
        let settings = Settings {
            caret_color: "#00FF00".into(),
            ..Settings::default()
        };
        assert_eq!(Palette::from_settings(&settings).caret, Color::Rgb(0, 255, 0));

        let bad = Settings {
            caret_color: "green".into(),
            ..Settings::default()
        };
        let palette = Palette::from_settings(&bad);
        assert_eq!(palette.caret, palette.primary);
    }

    #[test]
    fn accuracy_bands() {
        let palette = Palette::from_theme(theme_by_id("dark"));
        assert_eq!(palette.accuracy(96.0), Color::Green);
        assert_eq!(palette.accuracy(95.0), Color::Yellow);
        assert_eq!(palette.accuracy(86.0), Color::Yellow);
        assert_eq!(palette.accuracy(85.0), Color::Red);
    }
}

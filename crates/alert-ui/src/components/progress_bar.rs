use crate::themes::Theme;
use alert_core::formatting::{format_count, percentage};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// Configuration controlling visual appearance of a share bar.
pub struct ProgressBarConfig {
    /// Width in terminal columns of the bar portion (excluding label).
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for ProgressBarConfig {
    fn default() -> Self {
        Self {
            width: 40,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

// ── ShareBar ─────────────────────────────────────────────────────────────────

/// Horizontal bar showing `value` as a share of `whole`.
///
/// Used for each region's combined updates against the largest region, and
/// for each status tier against the row total.
pub struct ShareBar<'a> {
    pub value: i64,
    pub whole: i64,
    pub theme: &'a Theme,
    /// Fill style; defaults to the theme's bar fill.
    pub style: Style,
    pub config: ProgressBarConfig,
}

impl<'a> ShareBar<'a> {
    pub fn new(value: i64, whole: i64, theme: &'a Theme) -> Self {
        Self {
            value,
            whole,
            theme,
            style: theme.bar_fill,
            config: ProgressBarConfig::default(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.config.width = width;
        self
    }

    /// Share in `[0.0, 100.0]` with one decimal. Non-positive wholes or
    /// values give `0.0`.
    pub fn percentage(&self) -> f64 {
        if self.whole <= 0 || self.value <= 0 {
            return 0.0;
        }
        percentage(self.value as f64, self.whole as f64, 1).min(100.0)
    }

    pub fn to_line(&self) -> Line<'a> {
        let percentage = self.percentage();
        let filled = ((percentage / 100.0) * self.config.width as f64) as u16;
        let empty = self.config.width.saturating_sub(filled);

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        let label = format!(" {:.1}% ({})", percentage, format_count(self.value));

        Line::from(vec![
            Span::styled(filled_str, self.style),
            Span::styled(empty_str, self.theme.bar_empty),
            Span::styled(label, self.theme.bar_label),
        ])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

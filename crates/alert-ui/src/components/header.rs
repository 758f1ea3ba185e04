use crate::themes::Theme;
use alert_core::formatting::format_count;
use ratatui::text::{Line, Span};

/// Decorative sparkle string placed either side of the application title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

/// Dashboard header rendering four lines:
///
/// 1. Application title with sparkle decorations.
/// 2. A 60-column `=` separator.
/// 3. Dataset name and row count in `[ file | N rows ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Display name of the loaded dataset.
    pub dataset: &'a str,
    /// Number of rows in the loaded table.
    pub rows: usize,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(dataset: &'a str, rows: usize, theme: &'a Theme) -> Self {
        Self {
            dataset,
            rows,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(" ALERTINDIA UPDATE MONITOR ", self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.dataset, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(
                    format!("{} rows", format_count(self.rows as i64)),
                    self.theme.value,
                ),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

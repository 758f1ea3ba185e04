use crate::themes::Theme;
use alert_core::formatting::format_count;
use alert_core::models::{Status, StatusTally};
use ratatui::text::{Line, Span};

// ── StatusIndicator ──────────────────────────────────────────────────────────

/// A status tier as a coloured emoji plus its name.
///
/// | Status   | Emoji |
/// |----------|-------|
/// | critical | 🔴    |
/// | warning  | 🟡    |
/// | stable   | 🟢    |
pub struct StatusIndicator<'a> {
    pub status: Status,
    pub theme: &'a Theme,
}

impl<'a> StatusIndicator<'a> {
    pub fn new(status: Status, theme: &'a Theme) -> Self {
        Self { status, theme }
    }

    pub fn emoji(&self) -> &'static str {
        match self.status {
            Status::Critical => "🔴",
            Status::Warning => "🟡",
            Status::Stable => "🟢",
        }
    }

    /// Format: `"🔴 critical"`
    pub fn to_span(&self) -> Span<'a> {
        Span::styled(
            format!("{} {}", self.emoji(), self.status),
            self.theme.status_style(self.status),
        )
    }
}

// ── TallyIndicator ───────────────────────────────────────────────────────────

/// One summary line for a [`StatusTally`].
pub struct TallyIndicator<'a> {
    pub tally: StatusTally,
    pub theme: &'a Theme,
}

impl<'a> TallyIndicator<'a> {
    pub fn new(tally: StatusTally, theme: &'a Theme) -> Self {
        Self { tally, theme }
    }

    /// Format: `"Rows: 1,204  🔴 12  🟡 40  🟢 1,152"`
    pub fn to_line(&self) -> Line<'a> {
        let mut spans = vec![
            Span::styled("Rows: ", self.theme.label),
            Span::styled(format_count(self.tally.total as i64), self.theme.value),
        ];
        for status in [Status::Critical, Status::Warning, Status::Stable] {
            let indicator = StatusIndicator::new(status, self.theme);
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("{} {}", indicator.emoji(), format_count(self.tally.count(status) as i64)),
                self.theme.status_style(status),
            ));
        }
        Line::from(spans)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Tabular views for the dashboard: region ranking, row preview and change
//! alerts.
//!
//! Each renders a bordered [`ratatui::widgets::Table`] into the given area.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use alert_core::formatting::{format_change, format_count};
use alert_core::models::{ChangeAlert, PreviewRow, RegionUpdates};

use crate::components::StatusIndicator;
use crate::themes::Theme;

/// Column width reserved for region names.
pub const REGION_COLUMN_WIDTH: u16 = 28;

/// Shorten `text` to at most `max_width` display columns, marking the cut
/// with `…`.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn region_cell(region: &str) -> Cell<'static> {
    Cell::from(truncate_to_width(region, REGION_COLUMN_WIDTH as usize))
}

fn bordered<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(format!(" {} ", title))
}

fn header_row<'a>(titles: &[&'a str], theme: &Theme) -> Row<'a> {
    Row::new(
        titles
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header))
            .collect::<Vec<_>>(),
    )
    .height(1)
}

// ── Regions ───────────────────────────────────────────────────────────────────

/// Regions with their combined updates, `selected` highlighted.
pub fn render_regions_table(
    frame: &mut Frame,
    area: Rect,
    regions: &[RegionUpdates],
    selected: Option<usize>,
    theme: &Theme,
) {
    let rows: Vec<Row> = regions
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Row::new(vec![
                Cell::from(format!("{:>3}", i + 1)),
                region_cell(&r.region),
                Cell::from(format_count(r.total_updates)),
            ])
            .style(theme.row_style(i))
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(REGION_COLUMN_WIDTH),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(header_row(&["#", "Region", "Total Updates"], theme))
        .block(bordered("Regions", theme))
        .row_highlight_style(theme.table_selected)
        .style(theme.text);

    let mut state = TableState::default().with_selected(selected);
    frame.render_stateful_widget(table, area, &mut state);
}

// ── Preview ───────────────────────────────────────────────────────────────────

/// The first rows of the dataset with each row's status.
pub fn render_preview_table(frame: &mut Frame, area: Rect, rows: &[PreviewRow], theme: &Theme) {
    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Row::new(vec![
                region_cell(&p.row.region),
                Cell::from(format_count(p.row.young_bracket_count)),
                Cell::from(format_count(p.row.older_bracket_count)),
                Cell::from(Line::from(StatusIndicator::new(p.status, theme).to_span())),
            ])
            .style(theme.row_style(i))
        })
        .collect();

    let widths = [
        Constraint::Length(REGION_COLUMN_WIDTH),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(14),
    ];

    let table = Table::new(data_rows, widths)
        .header(header_row(&["Region", "Age 5-17", "Age 17+", "Status"], theme))
        .block(bordered("Preview", theme))
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Alerts ────────────────────────────────────────────────────────────────────

/// Per-region change between the last two observations.
pub fn render_alerts_table(
    frame: &mut Frame,
    area: Rect,
    alerts: &[ChangeAlert],
    theme: &Theme,
) {
    let data_rows: Vec<Row> = alerts
        .iter()
        .enumerate()
        .map(|(i, a)| {
            Row::new(vec![
                region_cell(&a.region),
                Cell::from(format_change(a.change)).style(theme.status_style(a.status)),
                Cell::from(Line::from(StatusIndicator::new(a.status, theme).to_span())),
            ])
            .style(theme.row_style(i))
        })
        .collect();

    let widths = [
        Constraint::Length(REGION_COLUMN_WIDTH),
        Constraint::Length(12),
        Constraint::Length(14),
    ];

    let table = Table::new(data_rows, widths)
        .header(header_row(&["Region", "Change", "Status"], theme))
        .block(bordered("Change Alerts", theme))
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Placeholder for an empty dataset.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No rows in dataset", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Check the file passed with --data.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(bordered("AlertIndia", theme)),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

//! Application state and event loop for the AlertIndia dashboard.
//!
//! [`App`] owns the theme, the active page and a snapshot of the engine's
//! query results. Key handling is a pure state transition so it can be
//! tested without a terminal.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};

use alert_core::error::{AlertError, Result};
use alert_core::formatting::format_count;
use alert_core::models::{ChangeAlert, PreviewRow, RegionUpdates, Status, StatusTally};
use alert_data::engine::DEFAULT_PREVIEW_LIMIT;
use alert_data::AggregationEngine;

use crate::components::{Header, ShareBar, StatusIndicator, TallyIndicator};
use crate::table_view;
use crate::themes::Theme;

// ── Page ──────────────────────────────────────────────────────────────────────

/// Which page the dashboard is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Status tallies and overall shares.
    Home,
    /// Regions by name with a per-region summary.
    Dashboard,
    /// Change alerts and the row preview.
    Alerts,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Home, Page::Dashboard, Page::Alerts];

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Dashboard => "Dashboard",
            Page::Alerts => "Alerts",
        }
    }

    fn index(self) -> usize {
        match self {
            Page::Home => 0,
            Page::Dashboard => 1,
            Page::Alerts => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ── TerminalGuard ─────────────────────────────────────────────────────────────

/// Raw mode and the alternate screen, undone on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter<W: Write>(mut out: W) -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(out, EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard.
pub struct App {
    pub theme: Theme,
    pub page: Page,
    /// Index into `regions` of the highlighted region.
    pub selected: usize,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    engine: AggregationEngine,
    dataset: String,
    regions: Vec<RegionUpdates>,
    preview: Vec<PreviewRow>,
    alerts: Vec<ChangeAlert>,
    stats: StatusTally,
}

impl App {
    pub fn new(engine: AggregationEngine, theme_name: &str) -> Self {
        let dataset = engine
            .table()
            .source()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "in-memory".to_string());

        let regions: Vec<RegionUpdates> = engine
            .regions()
            .iter()
            .filter_map(|name| engine.region_summary(name))
            .map(|s| RegionUpdates {
                region: s.region,
                total_updates: s.total_updates,
            })
            .collect();
        let preview = engine.preview(DEFAULT_PREVIEW_LIMIT);
        let alerts = engine.change_alerts();
        let stats = engine.stats();

        Self {
            theme: Theme::from_name(theme_name),
            page: Page::Home,
            selected: 0,
            should_quit: false,
            engine,
            dataset,
            regions,
            preview,
            alerts,
            stats,
        }
    }

    pub fn regions(&self) -> &[RegionUpdates] {
        &self.regions
    }

    pub fn selected_region(&self) -> Option<&RegionUpdates> {
        self.regions.get(self.selected)
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one key press to the application state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('1') | KeyCode::Char('h') => self.page = Page::Home,
            KeyCode::Char('2') | KeyCode::Char('d') => self.page = Page::Dashboard,
            KeyCode::Char('3') | KeyCode::Char('a') => self.page = Page::Alerts,
            KeyCode::Tab => self.page = self.page.next(),
            KeyCode::BackTab => self.page = self.page.previous(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.regions.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.regions.len().saturating_sub(1),
            _ => {}
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until `q`, `Esc` or `Ctrl+C`.
    ///
    /// The terminal is restored even when setup, drawing or reading input
    /// fails.
    pub fn run(mut self) -> Result<()> {
        self.run_terminal()
            .map_err(|e| AlertError::Terminal(e.to_string()))
    }

    fn run_terminal(&mut self) -> io::Result<()> {
        let _guard = TerminalGuard::enter(io::stdout())?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        self.event_loop(&mut terminal)
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let tick_rate = Duration::from_millis(250);
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }
        Ok(())
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

        let header = Header::new(&self.dataset, self.engine.table().len(), &self.theme);
        frame.render_widget(Paragraph::new(header.to_lines()), chunks[0]);

        let tabs = Tabs::new(Page::ALL.iter().map(|p| p.title()))
            .select(self.page.index())
            .style(self.theme.tab_inactive)
            .highlight_style(self.theme.tab_active);
        frame.render_widget(tabs, chunks[1]);

        if self.engine.table().is_empty() {
            table_view::render_no_data(frame, chunks[2], &self.theme);
        } else {
            match self.page {
                Page::Home => self.render_home(frame, chunks[2]),
                Page::Dashboard => self.render_dashboard(frame, chunks[2]),
                Page::Alerts => self.render_alerts(frame, chunks[2]),
            }
        }

        let footer = Line::from(Span::styled(
            "1 Home  2 Dashboard  3 Alerts  Tab next  ↑↓ select  q quit",
            self.theme.dim,
        ));
        frame.render_widget(Paragraph::new(footer), chunks[3]);
    }

    fn render_home(&self, frame: &mut Frame, area: Rect) {
        let tally = TallyIndicator::new(self.stats, &self.theme);
        let total = self.stats.total as i64;

        let mut lines = vec![tally.to_line(), Line::from("")];
        for status in [Status::Critical, Status::Warning, Status::Stable] {
            let mut spans = vec![
                StatusIndicator::new(status, &self.theme).to_span(),
                Span::raw(" "),
            ];
            spans.extend(
                ShareBar::new(self.stats.count(status) as i64, total, &self.theme)
                    .with_style(self.theme.status_style(status))
                    .to_line()
                    .spans,
            );
            lines.push(Line::from(spans));
        }

        let critical_alerts = self
            .alerts
            .iter()
            .filter(|a| a.status == Status::Critical)
            .count();
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Regions: ", self.theme.label),
            Span::styled(format_count(self.regions.len() as i64), self.theme.value),
            Span::styled("  Change alerts: ", self.theme.label),
            Span::styled(format_count(self.alerts.len() as i64), self.theme.value),
            Span::styled("  Critical: ", self.theme.label),
            Span::styled(format_count(critical_alerts as i64), self.theme.critical),
        ]));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.table_border)
            .title(" Overview ");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_dashboard(&self, frame: &mut Frame, area: Rect) {
        let columns =
            Layout::horizontal([Constraint::Length(50), Constraint::Min(30)]).split(area);

        table_view::render_regions_table(
            frame,
            columns[0],
            &self.regions,
            self.selected_region().map(|_| self.selected),
            &self.theme,
        );

        let summary = self
            .selected_region()
            .and_then(|r| self.engine.region_summary(&r.region));
        let leader = self
            .regions
            .iter()
            .map(|r| r.total_updates)
            .max()
            .unwrap_or(0);

        let lines = match summary {
            Some(s) => vec![
                Line::from(Span::styled(s.region.clone(), self.theme.bold)),
                Line::from(""),
                self.field("Observations", format_count(s.observations as i64)),
                self.field("Age 5-17", format_count(s.young_sum)),
                self.field("Age 17+", format_count(s.older_sum)),
                self.field("Total updates", format_count(s.total_updates)),
                Line::from(""),
                Line::from(Span::styled("Share of leading region", self.theme.label)),
                ShareBar::new(s.total_updates, leader, &self.theme)
                    .with_width(24)
                    .to_line(),
            ],
            None => vec![Line::from(Span::styled("No region selected", self.theme.dim))],
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.table_border)
            .title(" Region ");
        frame.render_widget(Paragraph::new(lines).block(block), columns[1]);
    }

    fn render_alerts(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        table_view::render_alerts_table(frame, rows[0], &self.alerts, &self.theme);
        table_view::render_preview_table(frame, rows[1], &self.preview, &self.theme);
    }

    fn field(&self, label: &str, value: String) -> Line<'_> {
        Line::from(vec![
            Span::styled(format!("{:<15}", label), self.theme.label),
            Span::styled(value, self.theme.value),
        ])
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

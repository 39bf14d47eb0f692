//! Reusable widgets for the TUI application
//!
//! Custom UI components: the tracked-account list, the per-account
//! submission table, popups, and full-screen message states.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::api::Submission;
use crate::stats;

/// Color scheme for the TUI
pub struct ColorScheme {
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub text: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            primary: Color::Blue,
            secondary: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            text: Color::White,
            border: Color::Gray,
        }
    }
}

/// One row of the account list: username plus today count
pub struct AccountEntry<'a> {
    pub username: &'a str,
    pub today_count: usize,
    pub cached: bool,
}

/// Tracked account list with per-account today counts
pub struct AccountList<'a> {
    accounts: &'a [AccountEntry<'a>],
    colors: &'a ColorScheme,
}

impl<'a> AccountList<'a> {
    pub fn new(accounts: &'a [AccountEntry<'a>], colors: &'a ColorScheme) -> Self {
        Self { accounts, colors }
    }

    /// Render the account list widget
    pub fn render(&self, frame: &mut Frame, area: Rect, state: &mut ListState) {
        let items: Vec<ListItem> = self
            .accounts
            .iter()
            .map(|account| {
                let count_color = if account.today_count > 0 {
                    self.colors.success
                } else {
                    self.colors.secondary
                };

                let count_text = if account.cached {
                    format!(" {} today", account.today_count)
                } else {
                    " pending".to_string()
                };

                let content = Line::from(vec![
                    Span::styled(account.username, Style::default().fg(self.colors.text)),
                    Span::styled(count_text, Style::default().fg(count_color)),
                ]);

                ListItem::new(content)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Accounts")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.colors.border)),
            )
            .highlight_style(
                Style::default()
                    .bg(self.colors.primary)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, state);
    }
}

/// Submission table for the selected account
pub struct SubmissionTable<'a> {
    username: &'a str,
    submissions: &'a [Submission],
    colors: &'a ColorScheme,
}

impl<'a> SubmissionTable<'a> {
    pub fn new(username: &'a str, submissions: &'a [Submission], colors: &'a ColorScheme) -> Self {
        Self {
            username,
            submissions,
            colors,
        }
    }

    /// Render the submission table widget
    pub fn render(&self, frame: &mut Frame, area: Rect, state: &mut TableState) {
        let title = format!(
            "{} — {} submissions today",
            self.username,
            stats::today_count(self.submissions)
        );

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.border));

        if self.submissions.is_empty() {
            let paragraph = Paragraph::new(Text::from("No submissions found."))
                .block(block)
                .style(Style::default().fg(self.colors.secondary))
                .alignment(Alignment::Center);

            frame.render_widget(paragraph, area);
            return;
        }

        let header = Row::new(vec!["Problem", "Link", "Language", "Time (+05:30)"])
            .style(
                Style::default()
                    .fg(self.colors.primary)
                    .add_modifier(Modifier::BOLD),
            )
            .bottom_margin(1);

        let rows: Vec<Row> = self
            .submissions
            .iter()
            .map(|sub| {
                Row::new(vec![
                    Cell::from(sub.title.clone()),
                    Cell::from(sub.problem_url()).style(Style::default().fg(self.colors.secondary)),
                    Cell::from(sub.language.clone()),
                    Cell::from(stats::display_time(&sub.time)),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(30),
                Constraint::Percentage(35),
                Constraint::Percentage(12),
                Constraint::Percentage(23),
            ],
        )
        .header(header)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

        frame.render_stateful_widget(table, area, state);
    }
}

/// Status bar widget showing current status
pub struct StatusBar<'a> {
    left_text: &'a str,
    right_text: &'a str,
    colors: &'a ColorScheme,
}

impl<'a> StatusBar<'a> {
    pub fn new(left_text: &'a str, right_text: &'a str, colors: &'a ColorScheme) -> Self {
        Self {
            left_text,
            right_text,
            colors,
        }
    }

    /// Render the status bar widget
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        let left = Paragraph::new(Text::from(self.left_text))
            .style(Style::default().fg(self.colors.text))
            .alignment(Alignment::Left);
        frame.render_widget(left, chunks[0]);

        let right = Paragraph::new(Text::from(self.right_text))
            .style(Style::default().fg(self.colors.secondary))
            .alignment(Alignment::Right);
        frame.render_widget(right, chunks[1]);
    }
}

/// Input popup for adding a username
pub struct InputDialog<'a> {
    buffer: &'a str,
    colors: &'a ColorScheme,
}

impl<'a> InputDialog<'a> {
    pub fn new(buffer: &'a str, colors: &'a ColorScheme) -> Self {
        Self { buffer, colors }
    }

    /// Render the input dialog
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 14, area);

        frame.render_widget(Clear, popup_area);

        let text = Text::from(vec![
            Line::from(format!("> {}_", self.buffer)),
            Line::from(""),
            Line::from(Span::styled(
                "Enter to add, Esc to cancel",
                Style::default().fg(self.colors.secondary),
            )),
        ]);

        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .title("Add username")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.colors.primary)),
            )
            .style(Style::default().fg(self.colors.text));

        frame.render_widget(paragraph, popup_area);
    }
}

/// Help dialog widget
pub struct HelpDialog<'a> {
    colors: &'a ColorScheme,
}

impl<'a> HelpDialog<'a> {
    pub fn new(colors: &'a ColorScheme) -> Self {
        Self { colors }
    }

    /// Render the help dialog
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 60, area);

        frame.render_widget(Clear, popup_area);

        let help_text = Text::from(vec![
            Line::from(vec![Span::styled(
                "Keyboard Shortcuts",
                Style::default()
                    .fg(self.colors.primary)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from("  ↑/k        Previous account"),
            Line::from("  ↓/j        Next account"),
            Line::from("  a          Add username"),
            Line::from("  r          Re-sync uncached accounts"),
            Line::from(""),
            Line::from("  ?/F1       Show this help"),
            Line::from("  q/Ctrl+C   Quit"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Press Esc to close",
                Style::default().fg(self.colors.secondary),
            )]),
        ]);

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title("Help")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.colors.border)),
            )
            .style(Style::default().fg(self.colors.text))
            .alignment(Alignment::Left);

        frame.render_widget(paragraph, popup_area);
    }
}

/// Full-screen message state (initial loading, batch error takeover)
pub struct MessageScreen<'a> {
    message: &'a str,
    color: Color,
}

impl<'a> MessageScreen<'a> {
    pub fn new(message: &'a str, color: Color) -> Self {
        Self { message, color }
    }

    /// Render the message centered in the whole area
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(Text::from(self.message))
            .style(Style::default().fg(self.color))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(45),
                Constraint::Min(3),
                Constraint::Percentage(45),
            ])
            .split(area);

        frame.render_widget(paragraph, vertical[1]);
    }
}

/// Helper to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_scheme_default() {
        let colors = ColorScheme::default();
        assert_eq!(colors.primary, Color::Blue);
        assert_eq!(colors.success, Color::Green);
        assert_eq!(colors.error, Color::Red);
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(60, 70, area);

        // Should be roughly centered
        assert!(centered.x > 0 && centered.x < area.width);
        assert!(centered.y > 0 && centered.y < area.height);
        assert!(centered.width > 0 && centered.width < area.width);
        assert!(centered.height > 0 && centered.height < area.height);
    }
}

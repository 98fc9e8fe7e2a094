//! Layout components (header, status bar)

use super::components::BUTTON_HEIGHT;
use crate::app::App;
use crate::notify::NotificationKind;
use crate::state::SubmissionPhase;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;

/// How long a notification stays in the status bar
const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

const HINTS: &str = "Tab/↓:next  ⇧Tab/↑:prev  ←/→:choose  Space:same as  ^S:save  Esc:quit";

/// Split the screen into header, form, button row and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Header
            Constraint::Min(0),                // Form
            Constraint::Length(BUTTON_HEIGHT), // Save button
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2], chunks[3])
}

pub fn draw_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(Span::styled(
        " Distributor Application Form ",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(header, area);
}

/// Draw the status bar: latest notification, then submission state, then
/// key hints
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    if app.submission.is_submitting() {
        let style = Style::default().fg(Color::Yellow);
        spans.push(Span::styled(" Saving... ", style));
    }

    if let Some(notification) = app.notifications.current(NOTIFICATION_TTL) {
        let color = match notification.kind {
            NotificationKind::Success => Color::Green,
            NotificationKind::Error => Color::Red,
        };
        spans.push(Span::styled(
            format!(" {} ", notification.message),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw("|"));
    }

    let succeeded = app.submission.last_outcome() == Some(SubmissionPhase::Success);
    if let Some(receipt) = app.submission.last_receipt().filter(|_| succeeded) {
        let reference = receipt.reference.simple().to_string();
        spans.push(Span::styled(
            format!(" ref {} ", &reference[..8]),
            Style::default().fg(Color::Green),
        ));
        spans.push(Span::raw("|"));
    }

    let hint_style = Style::default().fg(Color::Gray);
    spans.push(Span::styled(format!(" {HINTS}"), hint_style));

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);
}

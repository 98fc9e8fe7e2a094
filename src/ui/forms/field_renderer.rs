//! Field rendering utilities for forms

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Display state of one field
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldState {
    pub is_active: bool,
    pub is_disabled: bool,
    pub is_select: bool,
}

/// Label/value line for a field, followed by an error line when present
pub fn field_lines(
    label: &str,
    value: &str,
    placeholder: &str,
    state: FieldState,
    error: Option<&str>,
) -> Vec<Line<'static>> {
    let label_style = if state.is_active {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let value_style = if state.is_disabled {
        Style::default().fg(Color::DarkGray)
    } else if state.is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![
        Span::styled(if state.is_active { " ▸ " } else { "   " }, label_style),
        Span::styled(format!("{label:<22}"), label_style),
    ];

    if value.is_empty() {
        spans.push(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(value.to_string(), value_style));
    }

    if state.is_active && !state.is_disabled {
        if state.is_select {
            spans.push(Span::styled("  ◂ ▸", Style::default().fg(Color::Cyan)));
        } else {
            spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
        }
    }

    let mut lines = vec![Line::from(spans)];
    if let Some(message) = error {
        lines.push(Line::from(Span::styled(
            format!("{:25}{message}", ""),
            Style::default().fg(Color::Red),
        )));
    }
    lines
}

/// "Same as" checkbox line
pub fn checkbox_line(label: &str, checked: bool, is_active: bool) -> Line<'static> {
    let style = if is_active {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mark = if checked { "[x]" } else { "[ ]" };
    Line::from(vec![
        Span::styled(if is_active { " ▸ " } else { "   " }, style),
        Span::styled(format!("{mark} {label}"), style),
    ])
}

/// Bold section heading
pub fn section_heading(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

//! Distributor application form rendering

use super::field_renderer::{checkbox_line, field_lines, section_heading, FieldState};
use crate::app::{App, Focus};
use crate::state::{AddressField, AddressKind, ContactField, FieldRef, SubmissionPhase};
use crate::ui::components::render_button;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn placeholder(field: AddressField) -> String {
    match field {
        AddressField::State => "Select State".to_string(),
        AddressField::District => "Select District".to_string(),
        AddressField::Address2 => "Enter Address 2".to_string(),
        other => format!("Enter {}", other.label()),
    }
}

/// Draw contact details and the three address sections, scrolled so the
/// focused field stays visible
pub fn draw_application_form(frame: &mut Frame, area: Rect, app: &App) {
    let errors = app.visible_errors().unwrap_or_default();
    let message = |field: FieldRef| errors.message_for(field);

    let mut lines: Vec<Line> = Vec::new();
    let mut focus_line = 0usize;

    lines.push(section_heading("Contact Details"));
    for field in ContactField::ALL {
        let focus = Focus::Contact(field);
        if app.focus == focus {
            focus_line = lines.len();
        }
        lines.extend(field_lines(
            field.label(),
            app.session.contact_details().get(field),
            &format!("Enter {}", field.label()),
            FieldState {
                is_active: app.focus == focus,
                ..Default::default()
            },
            message(FieldRef::Contact(field)),
        ));
    }

    for kind in AddressKind::ALL {
        let section = app.session.section(kind);
        lines.push(Line::default());

        if let Some(label) = section.same_as_label() {
            let focus = Focus::SameAs(kind);
            if app.focus == focus {
                focus_line = lines.len();
            }
            let checked = section.is_linked();
            lines.push(checkbox_line(&label, checked, app.focus == focus));
        }

        lines.push(section_heading(kind.title()));
        for field in AddressField::ALL {
            let focus = Focus::Address(kind, field);
            if app.focus == focus {
                focus_line = lines.len();
            }
            lines.extend(field_lines(
                field.label(),
                section.value().get(field),
                &placeholder(field),
                FieldState {
                    is_active: app.focus == focus,
                    is_disabled: app.is_disabled(focus),
                    is_select: field.is_select(),
                },
                message(FieldRef::Address(kind, field)),
            ));
        }
    }

    let visible = area.height.saturating_sub(2) as usize;
    let scroll = focus_line.saturating_sub(visible / 2) as u16;

    let block = Block::default()
        .title(" Application ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
}

pub fn draw_save_button(frame: &mut Frame, area: Rect, app: &App) {
    let label = match app.submission.phase() {
        SubmissionPhase::Submitting => "Saving...",
        _ => "Save",
    };
    render_button(
        frame,
        area,
        label,
        app.focus == Focus::Save,
        !app.is_disabled(Focus::Save),
    );
}

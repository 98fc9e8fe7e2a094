//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;

use crate::app::App;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, form_area, button_area, status_area) = layout::create_layout(frame.area());

    layout::draw_header(frame, header_area);
    forms::draw_application_form(frame, form_area, app);
    forms::draw_save_button(frame, button_area, app);
    layout::draw_status_bar(frame, status_area, app);
}

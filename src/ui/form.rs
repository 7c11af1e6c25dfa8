//! Rendering for the create/edit dialog.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::form::FormField;
use crate::app::{AppState, ModalState};

pub fn render_form_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    let ModalState::UserForm { form } = state else {
        return;
    };

    let width = 56u16.min(area.width.saturating_sub(4)).max(44);
    let height = 20u16.min(area.height.saturating_sub(4)).max(12);
    let rect = crate::ui::components::centered_rect(width, height, area);

    let mut lines: Vec<Line> = Vec::new();
    for field in FormField::ALL {
        let marker = if field == form.focus { "▶ " } else { "  " };
        let value = form.field_value(field).to_string();
        let shown = if field.is_choice() {
            format!("◂ {} ▸", value)
        } else if field == form.focus {
            format!("{}▏", value)
        } else {
            value
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{}{:<12}", marker, field.label())),
            Span::styled(shown, Style::default().fg(app.theme.text)),
        ]));
        if let Some(msg) = form.errors.for_field(field) {
            lines.push(Line::from(Span::styled(
                format!("    {}", msg),
                Style::default().fg(app.theme.error_fg),
            )));
        }
    }
    lines.push(Line::raw(""));
    if form.submitting {
        lines.push(Line::from(Span::styled(
            "Saving…",
            Style::default().fg(app.theme.muted).add_modifier(Modifier::ITALIC),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Enter: save   Esc: cancel   Space: change role/status",
            Style::default().fg(app.theme.muted),
        )));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(form.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

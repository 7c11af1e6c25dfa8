pub mod components;
pub mod form;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)].as_ref())
        .split(root[1]);

    let prompt = match app.input_mode {
        InputMode::Search => format!("  Search: {}▏", app.search_query),
        InputMode::Normal | InputMode::Modal => {
            if app.search_query.is_empty() {
                String::new()
            } else {
                format!("  Search: {}", app.search_query)
            }
        }
    };
    let loading = if app.loading { "  loading…" } else { "" };
    let p = Paragraph::new(format!(
        "userdir-manager{prompt}{loading}  showing {} of {}  — /: search; f: filter; s: sort; n: new; m: load more; ?: help; q: quit",
        app.users.len(),
        app.users_all.len(),
    ))
    .block(
        Block::default()
            .title("userdir-manager")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    users::render_users_table(f, body[0], app);
    users::render_user_details(f, body[1], app);

    components::render_status_bar(f, root[2], app);

    if app.modal.is_some() {
        render_modal(f, f.area(), app);
    }
}

fn render_modal(f: &mut Frame, area: Rect, app: &mut AppState) {
    if let Some(state) = app.modal.clone() {
        match &state {
            ModalState::Actions { .. } | ModalState::DeleteConfirm { .. } => {
                users::render_user_modal(f, area, app, &state);
            }
            ModalState::UserForm { .. } => {
                form::render_form_modal(f, area, app, &state);
            }
            ModalState::FilterMenu { .. } => {
                components::render_filter_modal(f, area, app, &state);
            }
            ModalState::SortMenu { .. } => {
                components::render_sort_modal(f, area, app, &state);
            }
            ModalState::Help => {
                components::render_help_modal(f, area, app);
            }
        }
    }
}

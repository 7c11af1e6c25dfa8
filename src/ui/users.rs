use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};

use crate::api::{Role, Status};
use crate::app::{AppState, ModalState};

fn role_color(app: &AppState, role: Role) -> ratatui::style::Color {
    match role {
        Role::Admin => app.theme.role_admin,
        Role::Manager => app.theme.role_manager,
        Role::User => app.theme.role_user,
    }
}

fn status_color(app: &AppState, status: Status) -> ratatui::style::Color {
    match status {
        Status::Active => app.theme.status_active,
        Status::Inactive => app.theme.status_inactive,
    }
}

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let start = (app.selected_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(app.users.len());
    let slice = &app.users[start..end];

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let absolute_index = start + i;
        let base = if absolute_index == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.id.to_string()),
            Cell::from(u.display_name()),
            Cell::from(u.email.clone()),
            Cell::from(u.department.clone()),
            Cell::from(u.role.as_str()).style(base.fg(role_color(app, u.role))),
            Cell::from(u.status.as_str()).style(base.fg(status_color(app, u.status))),
        ])
        .style(base)
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(24),
        Constraint::Percentage(32),
        Constraint::Percentage(24),
        Constraint::Length(8),
        Constraint::Length(9),
    ];

    let header = Row::new(vec!["ID", "NAME", "EMAIL", "DEPARTMENT", "ROLE", "STATUS"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let title = format!(
        "Users — sort: {} {}",
        app.sort_field.label().to_lowercase(),
        app.sort_direction.arrow()
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.selected_user() {
        Some(u) => {
            let added = chrono::DateTime::from_timestamp_millis(u.created_at)
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_default();
            format!(
                "Name: {}\nEmail: {}\nDepartment: {}\nRole: {}\nStatus: {}\nId: {}\nAdded: {}",
                u.display_name(),
                u.email,
                u.department,
                u.role.as_str(),
                u.status.as_str(),
                u.id,
                added,
            )
        }
        None => "No user selected".to_string(),
    };
    let p = Paragraph::new(text).style(Style::default().fg(app.theme.text)).block(
        Block::default()
            .title("Details")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

pub fn render_user_modal(f: &mut Frame, area: Rect, app: &mut AppState, state: &ModalState) {
    match state {
        ModalState::Actions { selected } => {
            let rect = crate::ui::components::centered_rect(30, 7, area);
            let options = ["Edit", "Delete"];
            let mut text = String::new();
            for (idx, label) in options.iter().enumerate() {
                if idx == *selected {
                    text.push_str(&format!("▶ {}\n", label));
                } else {
                    text.push_str(&format!("  {}\n", label));
                }
            }
            let p = Paragraph::new(text).block(
                Block::default()
                    .title("Actions")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
            f.render_widget(Clear, rect);
            f.render_widget(p, rect);
        }
        ModalState::DeleteConfirm { selected } => {
            let rect = crate::ui::components::centered_rect(50, 7, area);
            let (name, id) = match app.selected_user() {
                Some(u) => (u.display_name(), u.id),
                None => (String::new(), 0),
            };
            let yes = if *selected == 0 { "[Yes]" } else { " Yes " };
            let no = if *selected == 1 { "[No]" } else { " No  " };
            let body = format!("Delete user '{name}' (id {id})?\n\n  {}    {}", yes, no);
            let p = Paragraph::new(body).block(
                Block::default()
                    .title("Confirm delete")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
            f.render_widget(Clear, rect);
            f.render_widget(p, rect);
        }
        _ => {}
    }
}

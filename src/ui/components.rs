//! Shared UI components (status bar, modal helpers).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{AppState, InputMode, ModalState, SortField, FILTER_OPTIONS};

/// Render the bottom status bar: mode, counts, paging state, active filter
/// chips, and the current error message if one is surfaced.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let mut chips = Vec::new();
    if let Some(role) = app.role_filter {
        chips.push(format!("role:{}", role.as_str()));
    }
    if let Some(status) = app.status_filter {
        chips.push(format!("status:{}", status.as_str()));
    }
    let chips_str = if chips.is_empty() {
        String::new()
    } else {
        format!("  filters:[{}]", chips.join(","))
    };
    let more = if app.has_more { "  more available (m)" } else { "" };
    let left = format!(
        "mode: {mode}  users:{}/{}  page:{}{}{}",
        app.users.len(),
        app.users_all.len(),
        app.page,
        more,
        chips_str,
    );

    let mut spans = vec![Span::raw(left)];
    if let Some(err) = &app.error {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} (x to dismiss)", err),
            Style::default().fg(app.theme.error_fg).add_modifier(Modifier::BOLD),
        ));
    }
    let p = Paragraph::new(Line::from(spans)).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the role/status filter menu.
pub fn render_filter_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::FilterMenu { selected } = state {
        let width = 36u16.min(area.width.saturating_sub(4)).max(28);
        let height = (FILTER_OPTIONS.len() as u16 + 2).min(area.height.saturating_sub(4));
        let rect = centered_rect(width, height, area);
        let mut text = String::new();
        for (idx, label) in FILTER_OPTIONS.iter().enumerate() {
            let marker = if idx == *selected { "▶" } else { " " };
            let active = match idx {
                0 => app.role_filter.is_none(),
                1 => app.role_filter == Some(crate::api::Role::Admin),
                2 => app.role_filter == Some(crate::api::Role::Manager),
                3 => app.role_filter == Some(crate::api::Role::User),
                4 => app.status_filter.is_none(),
                5 => app.status_filter == Some(crate::api::Status::Active),
                6 => app.status_filter == Some(crate::api::Status::Inactive),
                _ => false,
            };
            let dot = if active { "●" } else { "○" };
            text.push_str(&format!("{} {} {}\n", marker, dot, label));
        }
        let p = Paragraph::new(text).block(
            Block::default()
                .title("Filter users")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render the sort column menu. Choosing the active column again flips the
/// direction.
pub fn render_sort_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::SortMenu { selected } = state {
        let width = 34u16.min(area.width.saturating_sub(4)).max(26);
        let height = (SortField::ALL.len() as u16 + 2).min(area.height.saturating_sub(4));
        let rect = centered_rect(width, height, area);
        let mut text = String::new();
        for (idx, field) in SortField::ALL.iter().enumerate() {
            let marker = if idx == *selected { "▶" } else { " " };
            let arrow = if *field == app.sort_field {
                app.sort_direction.arrow()
            } else {
                " "
            };
            text.push_str(&format!("{} {} {}\n", marker, arrow, field.label()));
        }
        let p = Paragraph::new(text).block(
            Block::default()
                .title("Sort by")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render the help modal with usage information and key tips.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 66u16.min(area.width.saturating_sub(4)).max(50);
    let height = 18u16.min(area.height.saturating_sub(4)).max(12);
    let rect = centered_rect(width, height, area);

    let key = |k: &str| Span::styled(k.to_string(), Style::default().add_modifier(Modifier::ITALIC));
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled("Help", Style::default().add_modifier(Modifier::BOLD))),
        Line::raw(""),
        Line::from(vec![Span::raw("Navigation: "), key("Arrow keys / h j k l")]),
        Line::from(vec![
            Span::raw("Search: "),
            key("/"),
            Span::raw(" to start; the list narrows as you type; Enter keeps, Esc clears"),
        ]),
        Line::from(vec![Span::raw("Filter by role/status: "), key("f")]),
        Line::from(vec![
            Span::raw("Sort: "),
            key("s"),
            Span::raw("; choosing the active column flips the direction"),
        ]),
        Line::raw(""),
        Line::from(vec![Span::raw("Create user: "), key("n")]),
        Line::from(vec![Span::raw("Edit selection: "), key("e"), Span::raw(" or "), key("Enter")]),
        Line::from(vec![Span::raw("Delete selection: "), key("Delete")]),
        Line::from(vec![Span::raw("Load more records: "), key("m")]),
        Line::from(vec![Span::raw("Reload from page 1: "), key("r")]),
        Line::from(vec![Span::raw("Dismiss error: "), key("x")]),
        Line::raw(""),
        Line::from(vec![Span::raw("Quit: "), key("q"), Span::raw("   Close help: "), key("Esc / Enter")]),
    ];
    lines.push(Line::raw(""));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

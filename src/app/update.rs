//! Event loop and key handling.
//!
//! One iteration per tick: fold in any request completions that arrived,
//! draw, then handle at most one key event. The 100 ms poll doubles as the
//! redraw interval while requests are in flight.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;

use crate::api::UserDraft;
use crate::app::form::FormState;
use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState, Settings, SortField, FILTER_OPTIONS};
use crate::app::sync;
use crate::ui;
use crate::view;

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: Settings,
) -> Result<()> {
    let mut app = AppState::new(settings);

    loop {
        sync::drain_events(&mut app);

        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.input_mode {
                        InputMode::Normal => {
                            if !handle_normal_key(&mut app, &key) {
                                break;
                            }
                        }
                        InputMode::Search => handle_search_key(&mut app, key.code),
                        InputMode::Modal => handle_modal_key(&mut app, key.code),
                    }
                }
            }
        }
    }

    Ok(())
}

/// Handle a key in Normal mode. Returns false when the app should exit.
fn handle_normal_key(app: &mut AppState, key: &crossterm::event::KeyEvent) -> bool {
    let Some(action) = app.keymap.resolve(key) else {
        return true;
    };
    match action {
        KeyAction::Quit => return false,
        KeyAction::StartSearch => {
            app.search_query.clear();
            view::apply_view(app);
            app.input_mode = InputMode::Search;
        }
        KeyAction::OpenFilterMenu => {
            app.modal = Some(ModalState::FilterMenu { selected: 0 });
            app.input_mode = InputMode::Modal;
        }
        KeyAction::OpenSortMenu => {
            let selected = SortField::ALL
                .iter()
                .position(|f| *f == app.sort_field)
                .unwrap_or(0);
            app.modal = Some(ModalState::SortMenu { selected });
            app.input_mode = InputMode::Modal;
        }
        KeyAction::NewUser => {
            app.modal = Some(ModalState::UserForm { form: FormState::create() });
            app.input_mode = InputMode::Modal;
        }
        KeyAction::EditSelection => {
            if let Some(form) = app.selected_user().map(FormState::edit) {
                app.modal = Some(ModalState::UserForm { form });
                app.input_mode = InputMode::Modal;
            }
        }
        KeyAction::DeleteSelection => {
            if app.selected_user().is_some() {
                app.modal = Some(ModalState::DeleteConfirm { selected: 1 });
                app.input_mode = InputMode::Modal;
            }
        }
        KeyAction::LoadMore => sync::request_next_page(app),
        KeyAction::Reload => sync::request_page(app, 1),
        KeyAction::DismissError => app.dismiss_error(),
        KeyAction::OpenHelp => {
            app.modal = Some(ModalState::Help);
            app.input_mode = InputMode::Modal;
        }
        KeyAction::EnterAction => {
            if app.selected_user().is_some() {
                app.modal = Some(ModalState::Actions { selected: 0 });
                app.input_mode = InputMode::Modal;
            }
        }
        KeyAction::MoveUp => {
            if app.selected_index > 0 {
                app.selected_index -= 1;
            }
        }
        KeyAction::MoveDown => {
            if app.selected_index + 1 < app.users.len() {
                app.selected_index += 1;
            }
        }
        KeyAction::MoveLeftPage | KeyAction::PageUp => {
            let rpp = app.rows_per_page.max(1);
            app.selected_index = app.selected_index.saturating_sub(rpp);
        }
        KeyAction::MoveRightPage | KeyAction::PageDown => {
            let rpp = app.rows_per_page.max(1);
            let new_idx = app.selected_index.saturating_add(rpp);
            app.selected_index = new_idx.min(app.users.len().saturating_sub(1));
        }
        KeyAction::Ignore => {}
    }
    true
}

/// Search mode edits the term in place; the list narrows on every keystroke.
/// Enter keeps the term and returns to Normal, Esc discards it.
fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_query.clear();
            view::apply_view(app);
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            view::apply_view(app);
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            view::apply_view(app);
        }
        _ => {}
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::Actions { selected }) => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Up | KeyCode::Char('k') => {
                if *selected > 0 {
                    *selected -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if *selected < 1 {
                    *selected += 1;
                }
            }
            KeyCode::Enter => match *selected {
                0 => {
                    if let Some(user) = app.users.get(app.selected_index) {
                        app.modal = Some(ModalState::UserForm { form: FormState::edit(user) });
                    } else {
                        close_modal(app);
                    }
                }
                1 => {
                    if app.users.get(app.selected_index).is_some() {
                        app.modal = Some(ModalState::DeleteConfirm { selected: 1 });
                    } else {
                        close_modal(app);
                    }
                }
                _ => {}
            },
            _ => {}
        },
        Some(ModalState::UserForm { form }) => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Up => form.focus_prev(),
            KeyCode::Down | KeyCode::Tab => form.focus_next(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Left | KeyCode::Right => {
                if form.focus.is_choice() {
                    form.cycle_choice();
                }
            }
            KeyCode::Enter => {
                // Validation runs before anything is sent; an invalid draft
                // never leaves the dialog.
                if !form.submitting && form.validate() {
                    form.submitting = true;
                    let draft: UserDraft = form.draft.clone();
                    let editing = form.editing;
                    match editing {
                        None => sync::request_create(app, draft),
                        Some(id) => sync::request_update(app, id, draft),
                    }
                }
            }
            KeyCode::Char(c) => {
                if form.focus.is_choice() {
                    if c == ' ' {
                        form.cycle_choice();
                    }
                } else {
                    form.input(c);
                }
            }
            _ => {}
        },
        Some(ModalState::FilterMenu { selected }) => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Up | KeyCode::Char('k') => {
                if *selected > 0 {
                    *selected -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if *selected + 1 < FILTER_OPTIONS.len() {
                    *selected += 1;
                }
            }
            KeyCode::Enter => {
                let choice = *selected;
                apply_filter_option(app, choice);
                view::apply_view(app);
                close_modal(app);
            }
            _ => {}
        },
        Some(ModalState::SortMenu { selected }) => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Up | KeyCode::Char('k') => {
                if *selected > 0 {
                    *selected -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if *selected + 1 < SortField::ALL.len() {
                    *selected += 1;
                }
            }
            KeyCode::Enter => {
                let field = SortField::ALL[*selected];
                app.toggle_sort(field);
                view::apply_view(app);
                close_modal(app);
            }
            _ => {}
        },
        Some(ModalState::DeleteConfirm { selected }) => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Left | KeyCode::Right => {
                *selected = if *selected == 0 { 1 } else { 0 };
            }
            KeyCode::Enter => {
                let confirmed = *selected == 0;
                let id = app.users.get(app.selected_index).map(|u| u.id);
                if confirmed {
                    if let Some(id) = id {
                        // Fire and forget: the record disappears once the
                        // service confirms the deletion.
                        sync::request_delete(app, id);
                    }
                }
                close_modal(app);
            }
            _ => {}
        },
        Some(ModalState::Help) => match code {
            KeyCode::Esc | KeyCode::Enter => close_modal(app),
            _ => {}
        },
        None => {}
    }
}

/// Map a filter menu row to its effect on the role/status filters.
fn apply_filter_option(app: &mut AppState, selected: usize) {
    use crate::api::{Role, Status};
    match selected {
        0 => app.role_filter = None,
        1 => app.role_filter = Some(Role::Admin),
        2 => app.role_filter = Some(Role::Manager),
        3 => app.role_filter = Some(Role::User),
        4 => app.status_filter = None,
        5 => app.status_filter = Some(Status::Active),
        6 => app.status_filter = Some(Status::Inactive),
        _ => {}
    }
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}

//! Reconciliation between the local collection and the remote directory.
//!
//! Requests are issued fire-and-forget on worker threads; completions come
//! back over the app channel and are folded into the state here, on the UI
//! thread, in whatever order they arrive. There is no cancellation, no retry,
//! and no ordering guarantee between outstanding requests: two completions
//! that race apply last-write-wins. A failed operation leaves the collection
//! exactly as it was and only records a message in the single error slot.

use tracing::{debug, warn};

use crate::api::{self, ApiEvent, User, UserDraft};
use crate::app::{AppState, InputMode, ModalState};
use crate::view;

/// Request the given page of the collection. Page 1 replaces the local copy
/// once it arrives; later pages append to it.
pub fn request_page(app: &mut AppState, page: u32) {
    app.loading = true;
    api::spawn_fetch_page(&app.client, &app.api_tx, page, app.settings.page_size);
}

/// Request the page after the last one loaded. Offered only while the end of
/// the data has not been seen and no load is already in flight.
pub fn request_next_page(app: &mut AppState) {
    if app.has_more && !app.loading {
        let next = app.page + 1;
        request_page(app, next);
    }
}

pub fn request_create(app: &mut AppState, draft: UserDraft) {
    api::spawn_create_user(&app.client, &app.api_tx, draft);
}

pub fn request_update(app: &mut AppState, id: u64, draft: UserDraft) {
    api::spawn_update_user(&app.client, &app.api_tx, id, draft);
}

pub fn request_delete(app: &mut AppState, id: u64) {
    api::spawn_delete_user(&app.client, &app.api_tx, id);
}

/// Drain every completion that has arrived since the last tick.
pub fn drain_events(app: &mut AppState) {
    while let Ok(event) = app.api_rx.try_recv() {
        apply_event(app, event);
    }
}

/// Fold one completion into the application state and recompute the view.
pub fn apply_event(app: &mut AppState, event: ApiEvent) {
    match event {
        ApiEvent::PageLoaded { page, result } => {
            app.loading = false;
            match result {
                Ok(batch) => {
                    let full_page = batch.len() == app.settings.page_size;
                    let stamp = app.stamp_observation();
                    let batch: Vec<User> = batch
                        .into_iter()
                        .map(|mut u| {
                            u.created_at = stamp;
                            u
                        })
                        .collect();
                    debug!(page, count = batch.len(), "page loaded");
                    if page <= 1 {
                        app.users_all = batch;
                    } else {
                        app.users_all.extend(batch);
                    }
                    app.page = page;
                    app.has_more = full_page;
                }
                // Pages already loaded stay visible; retrying is just
                // requesting the same page again.
                Err(e) => fail(app, e.to_string()),
            }
        }
        ApiEvent::Created { draft, result } => match result {
            Ok(id) => {
                let id = ensure_unique_id(app, id);
                let stamp = app.stamp_observation();
                debug!(id, "user created");
                app.users_all.insert(0, User::from_draft(id, &draft, stamp));
                close_form(app);
            }
            Err(e) => fail(app, e.to_string()),
        },
        ApiEvent::Updated { id, draft, result } => match result {
            Ok(()) => {
                if let Some(user) = app.users_all.iter_mut().find(|u| u.id == id) {
                    debug!(id, "user updated");
                    user.first_name = draft.first_name;
                    user.last_name = draft.last_name;
                    user.email = draft.email;
                    user.department = draft.department;
                    user.role = draft.role;
                    user.status = draft.status;
                    // id and created_at identify the record and stay put
                }
                close_form(app);
            }
            Err(e) => fail(app, e.to_string()),
        },
        ApiEvent::Deleted { id, result } => match result {
            Ok(()) => {
                debug!(id, "user deleted");
                app.users_all.retain(|u| u.id != id);
            }
            Err(e) => fail(app, e.to_string()),
        },
    }
    view::apply_view(app);
}

/// Record a failure in the single error slot. An open form stays open so the
/// user can retry or cancel; its in-flight marker is released.
fn fail(app: &mut AppState, message: String) {
    warn!(%message, "operation failed");
    app.error = Some(message);
    if let Some(ModalState::UserForm { form }) = &mut app.modal {
        form.submitting = false;
    }
}

/// Close the create/edit dialog after its operation was confirmed.
fn close_form(app: &mut AppState) {
    if matches!(app.modal, Some(ModalState::UserForm { .. })) {
        app.modal = None;
        app.input_mode = InputMode::Normal;
    }
}

/// The mock backend echoes the same id for every create; fall back to one
/// past the highest local id so the collection never holds duplicate ids.
fn ensure_unique_id(app: &AppState, id: u64) -> u64 {
    if app.users_all.iter().any(|u| u.id == id) {
        let next = app.users_all.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        warn!(id, next, "server assigned an id already in use");
        next
    } else {
        id
    }
}

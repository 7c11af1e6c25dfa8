//! Derivation of the visible user list.
//!
//! The rendered sequence is a pure function of the local collection and the
//! current controls, recomputed in full on any change: recency baseline,
//! search, role filter, status filter, then the user-selected column sort.
//! Both sorts go through `Vec::sort_by`, which is stable, so records with
//! equal keys keep their relative order from the previous step.

use std::cmp::Ordering;

use crate::api::User;
use crate::app::{AppState, SortDirection, SortField};

pub fn apply_view(app: &mut AppState) {
    let mut rows = app.users_all.clone();

    // Newest observations first; ties keep insertion order.
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let query = app.search_query.to_lowercase();
    if !query.is_empty() {
        rows.retain(|u| {
            u.first_name.to_lowercase().contains(&query)
                || u.last_name.to_lowercase().contains(&query)
                || u.email.to_lowercase().contains(&query)
                || u.department.to_lowercase().contains(&query)
        });
    }
    if let Some(role) = app.role_filter {
        rows.retain(|u| u.role == role);
    }
    if let Some(status) = app.status_filter {
        rows.retain(|u| u.status == status);
    }

    let field = app.sort_field;
    let direction = app.sort_direction;
    rows.sort_by(|a, b| {
        let ord = compare_field(a, b, field);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });

    app.users = rows;
    app.selected_index = app.selected_index.min(app.users.len().saturating_sub(1));
}

fn compare_field(a: &User, b: &User, field: SortField) -> Ordering {
    match field {
        SortField::FirstName => a.first_name.cmp(&b.first_name),
        SortField::LastName => a.last_name.cmp(&b.last_name),
        SortField::Email => a.email.cmp(&b.email),
        SortField::Department => a.department.cmp(&b.department),
        SortField::Role => a.role.as_str().cmp(b.role.as_str()),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Role, Status};
    use crate::app::Settings;

    fn mk_user(id: u64, last: &str, role: Role, status: Status, created_at: i64) -> User {
        User {
            id,
            first_name: format!("F{}", id),
            last_name: last.to_string(),
            email: format!("{}@corp.example", last.to_lowercase()),
            department: "Engineering".to_string(),
            avatar: String::new(),
            role,
            status,
            created_at,
        }
    }

    fn mk_app(users: Vec<User>) -> AppState {
        let mut app = AppState::detached(Settings::default());
        app.users_all = users;
        app
    }

    #[test]
    fn default_sort_is_last_name_ascending() {
        let mut app = mk_app(vec![
            mk_user(1, "Zed", Role::User, Status::Active, 1),
            mk_user(2, "Ann", Role::Admin, Status::Active, 2),
        ]);
        apply_view(&mut app);

        let names: Vec<&str> = app.users.iter().map(|u| u.last_name.as_str()).collect();
        assert_eq!(names, ["Ann", "Zed"]);
    }

    #[test]
    fn role_filter_narrows_and_all_is_identity() {
        let mut app = mk_app(vec![
            mk_user(1, "Zed", Role::User, Status::Active, 1),
            mk_user(2, "Ann", Role::Admin, Status::Active, 2),
        ]);
        app.role_filter = Some(Role::Admin);
        apply_view(&mut app);
        assert_eq!(app.users.len(), 1);
        assert_eq!(app.users[0].last_name, "Ann");

        app.role_filter = None;
        apply_view(&mut app);
        assert_eq!(app.users.len(), 2);
    }

    #[test]
    fn status_filter_all_is_identity() {
        let mut app = mk_app(vec![
            mk_user(1, "Zed", Role::User, Status::Inactive, 1),
            mk_user(2, "Ann", Role::User, Status::Active, 2),
        ]);
        app.status_filter = None;
        apply_view(&mut app);
        assert_eq!(app.users.len(), 2);

        app.status_filter = Some(Status::Inactive);
        apply_view(&mut app);
        assert_eq!(app.users.len(), 1);
        assert_eq!(app.users[0].last_name, "Zed");
    }

    #[test]
    fn search_is_case_insensitive_substring_over_four_fields() {
        let mut app = mk_app(vec![
            mk_user(1, "Graham", Role::User, Status::Active, 1),
            mk_user(2, "Howell", Role::User, Status::Active, 2),
        ]);
        app.users_all[0].department = "Engineering".to_string();
        app.users_all[1].department = "Sales".to_string();

        app.search_query = "eng".to_string();
        apply_view(&mut app);
        assert_eq!(app.users.len(), 1);
        assert_eq!(app.users[0].last_name, "Graham");

        app.search_query = "HOWELL".to_string();
        apply_view(&mut app);
        assert_eq!(app.users.len(), 1);
        assert_eq!(app.users[0].last_name, "Howell");

        app.search_query = "@corp.example".to_string();
        apply_view(&mut app);
        assert_eq!(app.users.len(), 2);

        app.search_query.clear();
        apply_view(&mut app);
        assert_eq!(app.users.len(), 2);
    }

    #[test]
    fn sort_toggle_flips_then_restores() {
        let mut app = mk_app(vec![
            mk_user(1, "Ann", Role::User, Status::Active, 1),
            mk_user(2, "Zed", Role::User, Status::Active, 2),
        ]);

        // Default state already sorts by last name ascending; choosing the
        // same column flips to descending, choosing it again flips back.
        app.toggle_sort(SortField::LastName);
        apply_view(&mut app);
        let names: Vec<&str> = app.users.iter().map(|u| u.last_name.as_str()).collect();
        assert_eq!(names, ["Zed", "Ann"]);

        app.toggle_sort(SortField::LastName);
        apply_view(&mut app);
        let names: Vec<&str> = app.users.iter().map(|u| u.last_name.as_str()).collect();
        assert_eq!(names, ["Ann", "Zed"]);
    }

    #[test]
    fn choosing_a_new_column_resets_to_ascending() {
        let mut app = mk_app(vec![]);
        app.toggle_sort(SortField::LastName);
        assert_eq!(app.sort_direction, SortDirection::Descending);

        app.toggle_sort(SortField::Email);
        assert_eq!(app.sort_field, SortField::Email);
        assert_eq!(app.sort_direction, SortDirection::Ascending);
    }

    #[test]
    fn equal_sort_keys_keep_recency_order() {
        // Same last name: the record observed later must come first because
        // the baseline recency order survives the stable column sort.
        let mut app = mk_app(vec![
            mk_user(1, "Lee", Role::User, Status::Active, 100),
            mk_user(2, "Lee", Role::User, Status::Active, 300),
            mk_user(3, "Lee", Role::User, Status::Active, 200),
        ]);
        apply_view(&mut app);

        let ids: Vec<u64> = app.users.iter().map(|u| u.id).collect();
        assert_eq!(ids, [2, 3, 1]);
    }

    #[test]
    fn recomputation_with_unchanged_inputs_is_idempotent() {
        let mut app = mk_app(vec![
            mk_user(1, "Zed", Role::Admin, Status::Active, 5),
            mk_user(2, "Ann", Role::User, Status::Inactive, 9),
            mk_user(3, "Kim", Role::Manager, Status::Active, 1),
        ]);
        app.search_query = "corp".to_string();
        apply_view(&mut app);
        let first = app.users.clone();
        apply_view(&mut app);
        assert_eq!(app.users, first);
    }

    #[test]
    fn created_at_sorts_numerically() {
        let mut app = mk_app(vec![
            mk_user(1, "A", Role::User, Status::Active, 900),
            mk_user(2, "B", Role::User, Status::Active, 1_000),
            mk_user(3, "C", Role::User, Status::Active, 80),
        ]);
        app.sort_field = SortField::CreatedAt;
        apply_view(&mut app);
        let stamps: Vec<i64> = app.users.iter().map(|u| u.created_at).collect();
        assert_eq!(stamps, [80, 900, 1_000]);
    }

    #[test]
    fn selection_is_clamped_after_filtering() {
        let mut app = mk_app(vec![
            mk_user(1, "Ann", Role::User, Status::Active, 1),
            mk_user(2, "Bea", Role::User, Status::Active, 2),
            mk_user(3, "Cal", Role::Admin, Status::Active, 3),
        ]);
        app.selected_index = 2;
        app.role_filter = Some(Role::User);
        apply_view(&mut app);
        assert_eq!(app.users.len(), 2);
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn combined_filters_and_sort_compose() {
        let mut app = mk_app(vec![
            mk_user(1, "Zed", Role::User, Status::Active, 1),
            mk_user(2, "Ann", Role::Admin, Status::Active, 2),
            mk_user(3, "Bea", Role::Admin, Status::Inactive, 3),
        ]);
        app.role_filter = Some(Role::Admin);
        app.status_filter = Some(Status::Active);
        apply_view(&mut app);
        assert_eq!(app.users.len(), 1);
        assert_eq!(app.users[0].last_name, "Ann");
    }
}

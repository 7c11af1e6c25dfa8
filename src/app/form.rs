//! Create/edit dialog state and validation.
//!
//! The form holds a [`UserDraft`] while the dialog is open. Validation runs
//! before any request is issued; its messages are field-scoped and live here,
//! separate from the app-level error slot, and an invalid draft never reaches
//! the network.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::{Role, User, UserDraft};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Fields of the user form, in focus order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    FirstName,
    LastName,
    Email,
    Department,
    Role,
    Status,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::Email,
        FormField::Department,
        FormField::Role,
        FormField::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::FirstName => "First name",
            FormField::LastName => "Last name",
            FormField::Email => "Email",
            FormField::Department => "Department",
            FormField::Role => "Role",
            FormField::Status => "Status",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// Enum fields cycle with Space/arrows instead of taking characters.
    pub fn is_choice(self) -> bool {
        matches!(self, FormField::Role | FormField::Status)
    }
}

/// Per-field validation messages; all `None` when the draft is acceptable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormErrors {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.department.is_none()
    }

    pub fn for_field(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::FirstName => self.first_name.as_deref(),
            FormField::LastName => self.last_name.as_deref(),
            FormField::Email => self.email.as_deref(),
            FormField::Department => self.department.as_deref(),
            FormField::Role | FormField::Status => None,
        }
    }
}

/// Mutable state of the open create/edit dialog. Discarded on cancel and on
/// a confirmed submit.
#[derive(Clone, Debug)]
pub struct FormState {
    /// `Some(id)` when editing an existing record.
    pub editing: Option<u64>,
    pub draft: UserDraft,
    pub errors: FormErrors,
    pub focus: FormField,
    /// Set once the draft has been handed to the client; cleared again if the
    /// request fails so the user can retry or cancel.
    pub submitting: bool,
}

impl FormState {
    pub fn create() -> Self {
        Self {
            editing: None,
            draft: UserDraft::default(),
            errors: FormErrors::default(),
            focus: FormField::FirstName,
            submitting: false,
        }
    }

    pub fn edit(user: &User) -> Self {
        Self {
            editing: Some(user.id),
            draft: UserDraft::from_user(user),
            errors: FormErrors::default(),
            focus: FormField::FirstName,
            submitting: false,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing.is_some() { "Edit user" } else { "Add user" }
    }

    pub fn focus_next(&mut self) {
        let next = (self.focus.index() + 1) % FormField::ALL.len();
        self.focus = FormField::ALL[next];
    }

    pub fn focus_prev(&mut self) {
        let len = FormField::ALL.len();
        let prev = (self.focus.index() + len - 1) % len;
        self.focus = FormField::ALL[prev];
    }

    /// Append a character to the focused text field.
    pub fn input(&mut self, c: char) {
        match self.focus {
            FormField::FirstName => self.draft.first_name.push(c),
            FormField::LastName => self.draft.last_name.push(c),
            FormField::Email => self.draft.email.push(c),
            FormField::Department => self.draft.department.push(c),
            FormField::Role | FormField::Status => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::FirstName => {
                self.draft.first_name.pop();
            }
            FormField::LastName => {
                self.draft.last_name.pop();
            }
            FormField::Email => {
                self.draft.email.pop();
            }
            FormField::Department => {
                self.draft.department.pop();
            }
            FormField::Role | FormField::Status => {}
        }
    }

    /// Advance the focused choice field to its next value.
    pub fn cycle_choice(&mut self) {
        match self.focus {
            FormField::Role => {
                let pos = Role::ALL
                    .iter()
                    .position(|r| *r == self.draft.role)
                    .unwrap_or(0);
                self.draft.role = Role::ALL[(pos + 1) % Role::ALL.len()];
            }
            FormField::Status => self.draft.status = self.draft.status.toggled(),
            _ => {}
        }
    }

    pub fn field_value(&self, field: FormField) -> &str {
        match field {
            FormField::FirstName => &self.draft.first_name,
            FormField::LastName => &self.draft.last_name,
            FormField::Email => &self.draft.email,
            FormField::Department => &self.draft.department,
            FormField::Role => self.draft.role.as_str(),
            FormField::Status => self.draft.status.as_str(),
        }
    }

    /// Check required fields and the email shape, recording per-field
    /// messages. Returns true when the draft may be submitted.
    pub fn validate(&mut self) -> bool {
        let mut errors = FormErrors::default();
        if self.draft.first_name.trim().is_empty() {
            errors.first_name = Some("First name is required".to_string());
        }
        if self.draft.last_name.trim().is_empty() {
            errors.last_name = Some("Last name is required".to_string());
        }
        if self.draft.email.trim().is_empty() {
            errors.email = Some("Email is required".to_string());
        } else if !EMAIL_RE.is_match(&self.draft.email) {
            errors.email = Some("Invalid email format".to_string());
        }
        if self.draft.department.trim().is_empty() {
            errors.department = Some("Department is required".to_string());
        }
        let ok = errors.is_empty();
        self.errors = errors;
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Status;

    fn filled_form() -> FormState {
        let mut form = FormState::create();
        form.draft.first_name = "Ann".into();
        form.draft.last_name = "Lee".into();
        form.draft.email = "ann@lee.dev".into();
        form.draft.department = "Engineering".into();
        form
    }

    #[test]
    fn empty_draft_reports_every_required_field() {
        let mut form = FormState::create();
        assert!(!form.validate());
        assert_eq!(form.errors.first_name.as_deref(), Some("First name is required"));
        assert_eq!(form.errors.last_name.as_deref(), Some("Last name is required"));
        assert_eq!(form.errors.email.as_deref(), Some("Email is required"));
        assert_eq!(form.errors.department.as_deref(), Some("Department is required"));
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut form = filled_form();
        form.draft.email = "not-an-email".into();
        assert!(!form.validate());
        assert_eq!(form.errors.email.as_deref(), Some("Invalid email format"));

        form.draft.email = "a b@c.io".into();
        assert!(!form.validate());
        assert_eq!(form.errors.email.as_deref(), Some("Invalid email format"));

        form.draft.email = "missing-tld@domain".into();
        assert!(!form.validate());
    }

    #[test]
    fn complete_draft_validates_and_clears_old_errors() {
        let mut form = FormState::create();
        assert!(!form.validate());
        form.draft = filled_form().draft;
        assert!(form.validate());
        assert!(form.errors.is_empty());
    }

    #[test]
    fn create_form_defaults_to_active_user() {
        let form = FormState::create();
        assert_eq!(form.draft.role, Role::User);
        assert_eq!(form.draft.status, Status::Active);
        assert!(form.editing.is_none());
        assert_eq!(form.title(), "Add user");
    }

    #[test]
    fn edit_form_prefills_from_record() {
        let draft = UserDraft {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "ann@lee.dev".into(),
            department: "Engineering".into(),
            role: Role::Admin,
            status: Status::Inactive,
        };
        let user = User::from_draft(7, &draft, 0);
        let form = FormState::edit(&user);
        assert_eq!(form.editing, Some(7));
        assert_eq!(form.draft, draft);
        assert_eq!(form.title(), "Edit user");
    }

    #[test]
    fn choice_fields_cycle_and_ignore_text_input() {
        let mut form = FormState::create();
        form.focus = FormField::Role;
        form.input('x');
        assert_eq!(form.draft.first_name, "");
        assert_eq!(form.draft.role, Role::User);
        form.cycle_choice();
        assert_eq!(form.draft.role, Role::Admin);
        form.cycle_choice();
        assert_eq!(form.draft.role, Role::Manager);
        form.cycle_choice();
        assert_eq!(form.draft.role, Role::User);

        form.focus = FormField::Status;
        form.cycle_choice();
        assert_eq!(form.draft.status, Status::Inactive);
    }

    #[test]
    fn focus_wraps_in_both_directions() {
        let mut form = FormState::create();
        form.focus_prev();
        assert_eq!(form.focus, FormField::Status);
        form.focus_next();
        assert_eq!(form.focus, FormField::FirstName);
    }
}

//! Remote directory layer: record types, wire mapping, and the HTTP client.
//!
//! The directory service exposes a REST-ish collection of users. This module
//! wraps its four endpoints, maps the raw wire records into the local
//! [`User`] shape, and runs every request on its own worker thread so the UI
//! loop never blocks. Completions come back as [`ApiEvent`]s over a channel
//! and are applied by `app::sync`.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, Result};

/// Access level of a directory user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Admin, Role::Manager];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::User => "user",
        }
    }
}

/// Whether a directory user may currently sign in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Status::Active => Status::Inactive,
            Status::Inactive => Status::Active,
        }
    }
}

/// A user record as held in the local collection.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    /// The remote resource has no avatar field; kept empty until one exists.
    pub avatar: String,
    pub role: Role,
    pub status: Status,
    /// Millisecond timestamp assigned when the record was first observed
    /// locally. Drives the default recency ordering of the list.
    pub created_at: i64,
}

impl User {
    /// Build a record from a submitted draft and the id the server assigned.
    pub fn from_draft(id: u64, draft: &UserDraft, created_at: i64) -> Self {
        Self {
            id,
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            email: draft.email.clone(),
            department: draft.department.clone(),
            avatar: String::new(),
            role: draft.role,
            status: draft.status,
            created_at,
        }
    }

    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// Editable subset of a user record, held by the create/edit form while the
/// dialog is open and discarded on cancel or successful submit.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub role: Role,
    pub status: Status,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            department: String::new(),
            role: Role::User,
            status: Status::Active,
        }
    }
}

impl UserDraft {
    /// Prefill a draft from an existing record, for the edit dialog.
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            department: user.department.clone(),
            role: user.role,
            status: user.status,
        }
    }
}

/// Raw record shape returned by `GET /users`.
#[derive(Debug, Deserialize)]
struct RawUser {
    id: u64,
    name: String,
    email: String,
    company: RawCompany,
}

#[derive(Debug, Deserialize)]
struct RawCompany {
    name: String,
}

/// The only field we need from a `POST /users` response.
#[derive(Debug, Deserialize)]
struct CreatedUser {
    id: u64,
}

impl RawUser {
    /// Map a raw record into the local shape. The display name splits at the
    /// first space into first/last name (no space means no last name), the
    /// department comes from the company, and role/status have no remote
    /// counterpart so every fetched record starts as an active user.
    fn into_user(self) -> User {
        let (first_name, last_name) = match self.name.split_once(' ') {
            Some((first, rest)) => (first.to_string(), rest.to_string()),
            None => (self.name, String::new()),
        };
        User {
            id: self.id,
            first_name,
            last_name,
            email: self.email,
            department: self.company.name,
            avatar: String::new(),
            role: Role::User,
            status: Status::Active,
            created_at: 0,
        }
    }
}

/// Blocking HTTP client for the directory endpoints.
///
/// Cheap to clone; every spawned request gets its own handle.
#[derive(Clone, Debug)]
pub struct DirectoryClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl DirectoryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url.trim_end_matches('/'))
    }

    /// Fetch one page of the collection.
    ///
    /// The mock service the default configuration targets uses `_page` and
    /// `_limit` as its pagination parameters.
    pub fn fetch_page(&self, page: u32, limit: usize) -> Result<Vec<User>> {
        let url = format!("{}?_page={}&_limit={}", self.users_url(), page, limit);
        debug!(%url, "fetching users page");
        let resp = self
            .http
            .get(&url)
            .send()
            .map_err(|e| ApiError::Fetch(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ApiError::Fetch(format!("server returned {}", resp.status())));
        }
        let raw: Vec<RawUser> = resp.json().map_err(|e| ApiError::Fetch(e.to_string()))?;
        Ok(raw.into_iter().map(RawUser::into_user).collect())
    }

    /// Submit a draft as a new user; returns the id the server assigned.
    pub fn create_user(&self, draft: &UserDraft) -> Result<u64> {
        let resp = self
            .http
            .post(self.users_url())
            .json(draft)
            .send()
            .map_err(|e| ApiError::Create(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ApiError::Create(format!("server returned {}", resp.status())));
        }
        let created: CreatedUser = resp.json().map_err(|e| ApiError::Create(e.to_string()))?;
        Ok(created.id)
    }

    /// Replace the fields of an existing user. The response body is ignored
    /// beyond its status.
    pub fn update_user(&self, id: u64, draft: &UserDraft) -> Result<()> {
        let url = format!("{}/{}", self.users_url(), id);
        let resp = self
            .http
            .put(&url)
            .json(draft)
            .send()
            .map_err(|e| ApiError::Update(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ApiError::Update(format!("server returned {}", resp.status())));
        }
        Ok(())
    }

    pub fn delete_user(&self, id: u64) -> Result<()> {
        let url = format!("{}/{}", self.users_url(), id);
        let resp = self
            .http
            .delete(&url)
            .send()
            .map_err(|e| ApiError::Delete(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ApiError::Delete(format!("server returned {}", resp.status())));
        }
        Ok(())
    }
}

/// Completion of one remote operation, delivered to the UI loop over the
/// app channel. Completions of concurrently outstanding requests arrive in
/// whatever order the service answers them.
#[derive(Debug)]
pub enum ApiEvent {
    PageLoaded { page: u32, result: Result<Vec<User>> },
    Created { draft: UserDraft, result: Result<u64> },
    Updated { id: u64, draft: UserDraft, result: Result<()> },
    Deleted { id: u64, result: Result<()> },
}

/// Fetch a page on a worker thread and report the completion.
pub fn spawn_fetch_page(client: &DirectoryClient, tx: &Sender<ApiEvent>, page: u32, limit: usize) {
    let client = client.clone();
    let tx = tx.clone();
    thread::spawn(move || {
        let result = client.fetch_page(page, limit);
        let _ = tx.send(ApiEvent::PageLoaded { page, result });
    });
}

/// Create a user on a worker thread and report the completion.
pub fn spawn_create_user(client: &DirectoryClient, tx: &Sender<ApiEvent>, draft: UserDraft) {
    let client = client.clone();
    let tx = tx.clone();
    thread::spawn(move || {
        let result = client.create_user(&draft);
        let _ = tx.send(ApiEvent::Created { draft, result });
    });
}

/// Update a user on a worker thread and report the completion.
pub fn spawn_update_user(client: &DirectoryClient, tx: &Sender<ApiEvent>, id: u64, draft: UserDraft) {
    let client = client.clone();
    let tx = tx.clone();
    thread::spawn(move || {
        let result = client.update_user(id, &draft);
        let _ = tx.send(ApiEvent::Updated { id, draft, result });
    });
}

/// Delete a user on a worker thread and report the completion.
pub fn spawn_delete_user(client: &DirectoryClient, tx: &Sender<ApiEvent>, id: u64) {
    let client = client.clone();
    let tx = tx.clone();
    thread::spawn(move || {
        let result = client.delete_user(id);
        let _ = tx.send(ApiEvent::Deleted { id, result });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_user_maps_name_and_company() {
        let raw: RawUser = serde_json::from_str(
            r#"{
                "id": 1,
                "name": "Leanne Graham",
                "email": "leanne@april.biz",
                "company": {"name": "Romaguera-Crona"}
            }"#,
        )
        .unwrap();
        let user = raw.into_user();
        assert_eq!(user.id, 1);
        assert_eq!(user.first_name, "Leanne");
        assert_eq!(user.last_name, "Graham");
        assert_eq!(user.email, "leanne@april.biz");
        assert_eq!(user.department, "Romaguera-Crona");
        assert_eq!(user.avatar, "");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.status, Status::Active);
    }

    #[test]
    fn raw_user_name_without_space_has_empty_last_name() {
        let raw: RawUser = serde_json::from_str(
            r#"{"id": 2, "name": "Cher", "email": "c@x.io", "company": {"name": "Solo"}}"#,
        )
        .unwrap();
        let user = raw.into_user();
        assert_eq!(user.first_name, "Cher");
        assert_eq!(user.last_name, "");
    }

    #[test]
    fn raw_user_name_splits_at_first_space_only() {
        let raw: RawUser = serde_json::from_str(
            r#"{"id": 3, "name": "Mrs. Dennis Schulist", "email": "d@s.org", "company": {"name": "HR"}}"#,
        )
        .unwrap();
        let user = raw.into_user();
        assert_eq!(user.first_name, "Mrs.");
        assert_eq!(user.last_name, "Dennis Schulist");
    }

    #[test]
    fn raw_user_missing_company_fails_to_decode() {
        let res: std::result::Result<RawUser, _> =
            serde_json::from_str(r#"{"id": 4, "name": "No Company", "email": "n@c.io"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn draft_serializes_with_camel_case_and_lowercase_enums() {
        let draft = UserDraft {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "ann@lee.dev".into(),
            department: "Engineering".into(),
            role: Role::Admin,
            status: Status::Inactive,
        };
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["firstName"], "Ann");
        assert_eq!(body["lastName"], "Lee");
        assert_eq!(body["role"], "admin");
        assert_eq!(body["status"], "inactive");
    }

    #[test]
    fn user_from_draft_keeps_all_fields() {
        let draft = UserDraft {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "ann@lee.dev".into(),
            department: "Engineering".into(),
            role: Role::Manager,
            status: Status::Active,
        };
        let user = User::from_draft(42, &draft, 1_700_000_000_000);
        assert_eq!(user.id, 42);
        assert_eq!(user.display_name(), "Ann Lee");
        assert_eq!(user.role, Role::Manager);
        assert_eq!(user.created_at, 1_700_000_000_000);
    }
}

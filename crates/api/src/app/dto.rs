use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shelfmate_auth::Role;
use shelfmate_core::{DomainError, DomainResult, IntBounds, LengthBounds, Location, Validator};
use shelfmate_infra::store::{BookDraft, BookFilter, BookPatch, TodoDraft};

use crate::app::extract::RequestSchema;

// -------------------------
// Auth / accounts
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "subject")]
    pub username: String,
    pub password: String,
}

impl RequestSchema for LoginRequest {
    const FIELDS: &'static [&'static str] = &["username", "subject", "password"];

    fn validate(input: &Map<String, Value>) -> DomainResult<()> {
        let has = |key: &str| input.get(key).is_some_and(|v| !v.is_null());
        match (has("username"), has("subject")) {
            (false, false) => return Err(DomainError::parameter_missing("username")),
            (true, true) => return Err(DomainError::unpermitted(["subject"])),
            _ => {}
        }
        if !has("password") {
            return Err(DomainError::parameter_missing("password"));
        }
        let mut v = Validator::new(Location::Body, input);
        v.string("username", false, LengthBounds::any());
        v.string("subject", false, LengthBounds::any());
        v.string("password", true, LengthBounds::any());
        v.finish()
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    /// Always one of [`Role::KNOWN`] once `validate` has passed.
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::USER
}

impl RequestSchema for RegisterRequest {
    const FIELDS: &'static [&'static str] = &[
        "email",
        "username",
        "first_name",
        "last_name",
        "password",
        "role",
    ];

    fn validate(input: &Map<String, Value>) -> DomainResult<()> {
        let mut v = Validator::new(Location::Body, input);
        if let Some(email) = v.string("email", true, LengthBounds::at_least(3)) {
            if !looks_like_email(email) {
                v.reject("email", "value is not a valid email address");
            }
        }
        v.string("username", true, LengthBounds::at_least(1));
        v.string("first_name", true, LengthBounds::at_least(1));
        v.string("last_name", true, LengthBounds::at_least(1));
        v.string("password", true, LengthBounds::at_least(6));
        if let Some(role) = v.string("role", false, LengthBounds::any()) {
            if Role::known(role).is_none() {
                v.reject("role", "Input should be 'user' or 'admin'");
            }
        }
        v.finish()
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub password: String,
    pub new_password: String,
}

impl RequestSchema for ChangePasswordRequest {
    const FIELDS: &'static [&'static str] = &["password", "new_password"];

    fn validate(input: &Map<String, Value>) -> DomainResult<()> {
        let mut v = Validator::new(Location::Body, input);
        v.string("password", true, LengthBounds::any());
        v.string("new_password", true, LengthBounds::at_least(6));
        v.finish()
    }
}

// -------------------------
// Todos
// -------------------------

#[derive(Debug, Deserialize)]
pub struct TodoRequest {
    pub title: String,
    pub description: String,
    pub priority: i64,
    pub complete: bool,
}

impl RequestSchema for TodoRequest {
    const FIELDS: &'static [&'static str] = &["title", "description", "priority", "complete"];

    fn validate(input: &Map<String, Value>) -> DomainResult<()> {
        let mut v = Validator::new(Location::Body, input);
        v.string("title", true, LengthBounds::at_least(3));
        v.string("description", true, LengthBounds::between(3, 100));
        v.integer("priority", true, IntBounds::exclusive(0, 6));
        v.boolean("complete", true);
        v.finish()
    }
}

impl From<TodoRequest> for TodoDraft {
    fn from(req: TodoRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            priority: req.priority,
            complete: req.complete,
        }
    }
}

// -------------------------
// Books
// -------------------------

#[derive(Debug, Deserialize)]
pub struct BookCreate {
    pub title: String,
    pub author: String,
    pub category: String,
}

impl RequestSchema for BookCreate {
    const FIELDS: &'static [&'static str] = &["title", "author", "category"];

    fn validate(input: &Map<String, Value>) -> DomainResult<()> {
        let mut v = Validator::new(Location::Body, input);
        v.string("title", true, LengthBounds::any());
        v.string("author", true, LengthBounds::any());
        v.string("category", true, LengthBounds::any());
        v.finish()
    }
}

impl From<BookCreate> for BookDraft {
    fn from(req: BookCreate) -> Self {
        Self {
            title: req.title,
            author: req.author,
            category: req.category,
        }
    }
}

/// Partial book update; absent or null fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
}

impl RequestSchema for BookUpdate {
    const FIELDS: &'static [&'static str] = &["title", "author", "category"];

    fn validate(input: &Map<String, Value>) -> DomainResult<()> {
        let mut v = Validator::new(Location::Body, input);
        v.string("title", false, LengthBounds::any());
        v.string("author", false, LengthBounds::any());
        v.string("category", false, LengthBounds::any());
        v.finish()
    }
}

impl From<BookUpdate> for BookPatch {
    fn from(req: BookUpdate) -> Self {
        Self {
            title: req.title,
            author: req.author,
            category: req.category,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BookQuery {
    pub category: Option<String>,
    pub author: Option<String>,
}

impl From<BookQuery> for BookFilter {
    fn from(q: BookQuery) -> Self {
        // `?category=` with an empty value filters nothing.
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());
        Self {
            category: non_empty(q.category),
            author: non_empty(q.author),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn login_without_username_is_parameter_missing() {
        let err = LoginRequest::validate(&object(json!({ "password": "x" }))).unwrap_err();
        assert_eq!(err, DomainError::parameter_missing("username"));
    }

    #[test]
    fn login_accepts_subject_alias() {
        let input = object(json!({ "subject": "alice", "password": "pw" }));
        LoginRequest::validate(&input).unwrap();
        let req: LoginRequest = serde_json::from_value(Value::Object(input)).unwrap();
        assert_eq!(req.username, "alice");
    }

    #[test]
    fn login_with_both_username_and_subject_is_unpermitted() {
        let err = LoginRequest::validate(&object(json!({
            "username": "alice",
            "subject": "alice",
            "password": "pw",
        })))
        .unwrap_err();
        assert_eq!(err, DomainError::unpermitted(["subject"]));
    }

    #[test]
    fn register_role_defaults_to_user() {
        let req: RegisterRequest = serde_json::from_value(json!({
            "email": "alice@example.com",
            "username": "alice",
            "first_name": "Alice",
            "last_name": "Liddell",
            "password": "secret123",
        }))
        .unwrap();
        assert_eq!(req.role, Role::USER);
    }

    #[test]
    fn todo_reports_missing_title_and_bad_priority_together() {
        let err = TodoRequest::validate(&object(json!({
            "description": "buy milk",
            "priority": 9,
            "complete": false,
        })))
        .unwrap_err();
        let DomainError::ValidationFailed(fields) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("title"), Some(&["Field required".to_string()][..]));
        assert_eq!(
            fields.get("priority"),
            Some(&["Input should be less than 6".to_string()][..])
        );
    }

    #[test]
    fn register_rejects_unknown_roles_and_short_passwords() {
        let err = RegisterRequest::validate(&object(json!({
            "email": "alice@example.com",
            "username": "alice",
            "first_name": "Alice",
            "last_name": "Liddell",
            "password": "123",
            "role": "superuser",
        })))
        .unwrap_err();
        let DomainError::ValidationFailed(fields) = err else {
            panic!("expected validation failure");
        };
        assert!(fields.get("role").is_some());
        assert!(fields.get("password").is_some());
    }

    #[test]
    fn register_rejects_bad_email() {
        let err = RegisterRequest::validate(&object(json!({
            "email": "not-an-email",
            "username": "alice",
            "first_name": "Alice",
            "last_name": "Liddell",
            "password": "secret123",
        })))
        .unwrap_err();
        let DomainError::ValidationFailed(fields) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(fields.fields().collect::<Vec<_>>(), vec!["email"]);
    }

    #[test]
    fn empty_query_values_do_not_filter() {
        let filter: BookFilter = BookQuery {
            category: Some(String::new()),
            author: Some("Author Two".into()),
        }
        .into();
        assert_eq!(filter.category, None);
        assert_eq!(filter.author.as_deref(), Some("Author Two"));
    }
}

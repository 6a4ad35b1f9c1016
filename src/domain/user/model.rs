//! User domain model

use chrono::{DateTime, Utc};

use crate::domain::role::Role;

/// A registered user of the platform.
///
/// `password` is an opaque credential string at this level; hashing is the
/// concern of the REST boundary. `authorities` is populated only by
/// `load_user_by_username` — regular lookups leave it empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub authorities: Vec<Role>,
}

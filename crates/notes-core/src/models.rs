//! Account and note records.
//!
//! Wire names follow the public API (camelCase). The account's stored form
//! carries the password hash; [`AccountView`] is the representation handed
//! back to clients and never includes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Stable identifier, generated at signup. Never reused.
    pub user_id: Uuid,
    /// Unique human-chosen name, trimmed at signup. Immutable.
    pub name: String,
    /// Opaque bcrypt digest. Clients only ever see [`AccountView`].
    pub password_hash: String,
    pub date_added: DateTime<Utc>,
    /// Ids of the notes this account owns, in creation order.
    pub notes: Vec<Uuid>,
}

impl Account {
    pub fn new(name: impl Into<String>, password_hash: String) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            name: name.into(),
            password_hash,
            date_added: Utc::now(),
            notes: Vec::new(),
        }
    }
}

/// Client-facing account representation. No password hash, by construction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub name: String,
    pub user_id: Uuid,
    pub date_added: DateTime<Utc>,
    pub notes: Vec<Uuid>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            name: account.name.clone(),
            user_id: account.user_id,
            date_added: account.date_added,
            notes: account.notes.clone(),
        }
    }
}

/// A single note. Owned by exactly one account, linked at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub note_id: Uuid,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Note {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            note_id: Uuid::new_v4(),
            title: title.into(),
            text: text.into(),
            created_at: now,
            modified_at: now,
        }
    }

    /// Refresh the modified timestamp. The update operation calls this after
    /// applying field changes; nothing happens implicitly on save.
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

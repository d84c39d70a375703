//! Persistent record store for accounts and notes.
//!
//! JSON files under the data directory, loaded once at startup and rewritten
//! in full after each mutation. Record-level atomicity comes from the
//! per-store locks; there are no cross-record transactions, so a
//! create-then-link pair is two separate writes.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use notes_core::{Account, Note};

/// Keyed record store for accounts and notes.
pub struct Storage {
    data_path: PathBuf,
    accounts: RwLock<AccountStore>,
    notes: RwLock<NoteStore>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct AccountStore {
    /// Maps user id -> account record
    accounts: HashMap<Uuid, Account>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct NoteStore {
    /// Maps note id -> note record
    notes: HashMap<Uuid, Note>,
}

impl Storage {
    /// Open the store, creating the data directory if needed.
    pub fn new(data_path: &str) -> Result<Self> {
        let data_path = PathBuf::from(data_path);
        std::fs::create_dir_all(&data_path)
            .with_context(|| format!("Failed to create data directory: {:?}", data_path))?;

        let storage = Self {
            data_path,
            accounts: RwLock::new(AccountStore::default()),
            notes: RwLock::new(NoteStore::default()),
        };

        storage.load_accounts()?;
        storage.load_notes()?;

        Ok(storage)
    }

    // --- Accounts ---

    /// Persist a freshly created account.
    pub fn create_account(&self, account: Account) -> Result<()> {
        {
            let mut store = self.accounts.write().unwrap();
            store.accounts.insert(account.user_id, account);
        }
        self.save_accounts()
    }

    /// Exact, case-sensitive name lookup.
    pub fn account_by_name(&self, name: &str) -> Option<Account> {
        let store = self.accounts.read().unwrap();
        store.accounts.values().find(|a| a.name == name).cloned()
    }

    /// Lookup by stable identifier.
    pub fn account_by_id(&self, user_id: Uuid) -> Option<Account> {
        let store = self.accounts.read().unwrap();
        store.accounts.get(&user_id).cloned()
    }

    /// Whether a name is already registered (case-sensitive exact match).
    pub fn name_exists(&self, name: &str) -> bool {
        let store = self.accounts.read().unwrap();
        store.accounts.values().any(|a| a.name == name)
    }

    // --- Notes ---

    /// Persist a new note record. Linking it to its owner is a separate step.
    pub fn insert_note(&self, note: Note) -> Result<()> {
        {
            let mut store = self.notes.write().unwrap();
            store.notes.insert(note.note_id, note);
        }
        self.save_notes()
    }

    /// Lookup a note record by id.
    pub fn note(&self, note_id: Uuid) -> Option<Note> {
        let store = self.notes.read().unwrap();
        store.notes.get(&note_id).cloned()
    }

    /// Replace a note record with its updated form.
    pub fn update_note(&self, note: Note) -> Result<()> {
        {
            let mut store = self.notes.write().unwrap();
            store.notes.insert(note.note_id, note);
        }
        self.save_notes()
    }

    /// Append a note id to an account's owned list.
    pub fn link_note(&self, user_id: Uuid, note_id: Uuid) -> Result<()> {
        {
            let mut store = self.accounts.write().unwrap();
            let account = store
                .accounts
                .get_mut(&user_id)
                .with_context(|| format!("No account for user {}", user_id))?;
            account.notes.push(note_id);
        }
        self.save_accounts()
    }

    /// Remove a note id from an account's owned list.
    ///
    /// The note record itself stays in place; the link is the unit of
    /// ownership. Returns false if the account did not hold the link.
    pub fn unlink_note(&self, user_id: Uuid, note_id: Uuid) -> Result<bool> {
        let removed = {
            let mut store = self.accounts.write().unwrap();
            let account = store
                .accounts
                .get_mut(&user_id)
                .with_context(|| format!("No account for user {}", user_id))?;
            let before = account.notes.len();
            account.notes.retain(|id| *id != note_id);
            account.notes.len() != before
        };
        if removed {
            self.save_accounts()?;
        }
        Ok(removed)
    }

    /// Resolve an account's note ids to records, in link order.
    pub fn notes_for(&self, account: &Account) -> Vec<Note> {
        let store = self.notes.read().unwrap();
        account
            .notes
            .iter()
            .filter_map(|id| store.notes.get(id).cloned())
            .collect()
    }

    // --- Persistence ---

    fn accounts_path(&self) -> PathBuf {
        self.data_path.join("accounts.json")
    }

    fn notes_path(&self) -> PathBuf {
        self.data_path.join("notes.json")
    }

    fn load_accounts(&self) -> Result<()> {
        let path = self.accounts_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let store: AccountStore = serde_json::from_str(&content)?;
            *self.accounts.write().unwrap() = store;
            tracing::info!(
                "Loaded {} accounts",
                self.accounts.read().unwrap().accounts.len()
            );
        }
        Ok(())
    }

    fn save_accounts(&self) -> Result<()> {
        let store = self.accounts.read().unwrap();
        let content = serde_json::to_string_pretty(&*store)?;
        std::fs::write(self.accounts_path(), content)?;
        Ok(())
    }

    fn load_notes(&self) -> Result<()> {
        let path = self.notes_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let store: NoteStore = serde_json::from_str(&content)?;
            *self.notes.write().unwrap() = store;
            tracing::info!("Loaded {} notes", self.notes.read().unwrap().notes.len());
        }
        Ok(())
    }

    fn save_notes(&self) -> Result<()> {
        let store = self.notes.read().unwrap();
        let content = serde_json::to_string_pretty(&*store)?;
        std::fs::write(self.notes_path(), content)?;
        Ok(())
    }
}

//! In-memory persistent store: one table per entity, plus evidence files.
//!
//! Every multi-entity operation goes through [`Store::transaction`], which works on a
//! snapshot and only replaces the live data when the closure returns `Ok`.

use crate::models::{
    Dispute, DisputeId, Evidence, EvidenceUpload, GlobalRanking, Match, Ranking, Score,
    TennisError, Tournament, User,
};
use std::collections::HashMap;
use uuid::Uuid;

/// A row type stored in a [`Table`].
pub trait Entity: Clone {
    /// Human-readable name used in "not found" messages.
    const NAME: &'static str;

    fn id(&self) -> Uuid;
}

macro_rules! entity {
    ($ty:ty, $name:literal) => {
        impl Entity for $ty {
            const NAME: &'static str = $name;

            fn id(&self) -> Uuid {
                self.id
            }
        }
    };
}

entity!(User, "User");
entity!(Tournament, "Tournament");
entity!(Match, "Match");
entity!(Score, "Score");
entity!(Dispute, "Dispute");
entity!(Evidence, "Evidence");
entity!(Ranking, "Ranking");
entity!(GlobalRanking, "Global ranking");

/// Rows of one entity type, kept in insertion order.
#[derive(Clone, Debug)]
pub struct Table<T> {
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: Entity> Table<T> {
    /// Add a new row and return a copy of it.
    pub fn insert(&mut self, row: T) -> T {
        self.rows.push(row.clone());
        row
    }

    /// Row by id, or NotFound.
    pub fn get(&self, id: Uuid) -> Result<&T, TennisError> {
        self.find(id)
            .ok_or_else(|| TennisError::not_found(format!("{} not found.", T::NAME)))
    }

    pub fn get_mut(&mut self, id: Uuid) -> Result<&mut T, TennisError> {
        self.rows
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| TennisError::not_found(format!("{} not found.", T::NAME)))
    }

    pub fn find(&self, id: Uuid) -> Option<&T> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.find(id).is_some()
    }

    /// Rows matching `pred`, in insertion order.
    pub fn filter<F>(&self, pred: F) -> Vec<&T>
    where
        F: Fn(&T) -> bool,
    {
        self.rows.iter().filter(|r| pred(r)).collect()
    }

    /// First row matching `pred`.
    pub fn first<F>(&self, pred: F) -> Option<&T>
    where
        F: Fn(&T) -> bool,
    {
        self.rows.iter().find(|r| pred(r))
    }

    pub fn any<F>(&self, pred: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        self.rows.iter().any(pred)
    }

    /// Upsert: replace the row with the same id, or append it.
    pub fn save(&mut self, row: T) {
        match self.rows.iter_mut().find(|r| r.id() == row.id()) {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
    }

    /// Remove a row by id, or NotFound.
    pub fn delete(&mut self, id: Uuid) -> Result<T, TennisError> {
        let idx = self
            .rows
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| TennisError::not_found(format!("{} not found.", T::NAME)))?;
        Ok(self.rows.remove(idx))
    }

    /// Keep only rows matching `pred`.
    pub fn retain<F>(&mut self, pred: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.rows.retain(pred);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.rows.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// All persisted state of the application.
#[derive(Clone, Debug, Default)]
pub struct Store {
    pub users: Table<User>,
    pub tournaments: Table<Tournament>,
    pub matches: Table<Match>,
    pub scores: Table<Score>,
    pub disputes: Table<Dispute>,
    pub evidence: Table<Evidence>,
    pub rankings: Table<Ranking>,
    pub global_rankings: Table<GlobalRanking>,
    /// Evidence file contents by storage reference.
    files: HashMap<String, Vec<u8>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` as one all-or-nothing unit of work.
    ///
    /// `f` mutates a copy of the store; the copy replaces the live data only on `Ok`.
    pub fn transaction<T, F>(&mut self, f: F) -> Result<T, TennisError>
    where
        F: FnOnce(&mut Store) -> Result<T, TennisError>,
    {
        let mut work = self.clone();
        let out = f(&mut work)?;
        *self = work;
        Ok(out)
    }

    /// Store an evidence file and return its stable reference
    /// (`evidence/<dispute id>/<random name>.<original extension>`).
    pub fn put_evidence_file(&mut self, dispute_id: DisputeId, upload: EvidenceUpload) -> String {
        let name = Uuid::new_v4().simple().to_string();
        let reference = match std::path::Path::new(&upload.filename)
            .extension()
            .and_then(|e| e.to_str())
        {
            Some(ext) => format!("evidence/{}/{}.{}", dispute_id, name, ext),
            None => format!("evidence/{}/{}", dispute_id, name),
        };
        self.files.insert(reference.clone(), upload.bytes);
        reference
    }

    /// Contents of a stored evidence file.
    pub fn evidence_file(&self, reference: &str) -> Option<&[u8]> {
        self.files.get(reference).map(Vec::as_slice)
    }

    /// Remove stored evidence files (used when a tournament is deleted).
    pub fn remove_evidence_file(&mut self, reference: &str) {
        self.files.remove(reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn get_missing_row_is_not_found() {
        let store = Store::new();
        let err = store.users.get(Uuid::new_v4()).unwrap_err();
        assert_eq!(err, TennisError::not_found("User not found."));
    }

    #[test]
    fn save_replaces_existing_row_in_place() {
        let mut store = Store::new();
        let first = store.users.insert(User::new("a", "a@example.com", Role::Player));
        store.users.insert(User::new("b", "b@example.com", Role::Player));

        let mut changed = first.clone();
        changed.bio = "left-handed".to_string();
        store.users.save(changed);

        assert_eq!(store.users.len(), 2);
        let names: Vec<_> = store.users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(store.users.get(first.id).unwrap().bio, "left-handed");
    }

    #[test]
    fn failed_transaction_leaves_store_untouched() {
        let mut store = Store::new();
        let result: Result<(), TennisError> = store.transaction(|tx| {
            tx.users.insert(User::new("a", "a@example.com", Role::Player));
            Err(TennisError::validation("nope"))
        });
        assert!(result.is_err());
        assert!(store.users.is_empty());
    }

    #[test]
    fn committed_transaction_is_visible() {
        let mut store = Store::new();
        let user = store
            .transaction(|tx| Ok(tx.users.insert(User::new("a", "a@example.com", Role::Player))))
            .unwrap();
        assert!(store.users.contains(user.id));
    }

    #[test]
    fn evidence_reference_keeps_extension() {
        let mut store = Store::new();
        let dispute = Uuid::new_v4();
        let upload = EvidenceUpload {
            filename: "photo.jpg".to_string(),
            bytes: vec![1, 2, 3],
        };
        let reference = store.put_evidence_file(dispute, upload);
        assert!(reference.starts_with(&format!("evidence/{}/", dispute)));
        assert!(reference.ends_with(".jpg"));
        assert_eq!(store.evidence_file(&reference), Some(&[1u8, 2, 3][..]));
    }
}

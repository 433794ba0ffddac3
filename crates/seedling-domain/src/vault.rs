//! In-memory note collection
//!
//! Implements both collaborator traits over a fixed set of notes. Used by tests
//! and by the command-line front end, which loads a JSON export from the host.

use crate::links::{link_basename, normalize_link_path};
use crate::traits::{LinkResolver, NoteSource};
use crate::{Note, NoteId};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Errors from the in-memory vault
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    /// No note with this identifier
    #[error("Note not found: {0}")]
    NotFound(String),
}

/// A fixed set of notes kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct InMemoryVault {
    notes: Vec<Note>,
    by_id: HashMap<NoteId, usize>,
    by_path: HashMap<String, usize>,
    by_basename: HashMap<String, usize>,
}

impl InMemoryVault {
    /// Create a vault from notes; later duplicates of an id replace earlier ones
    pub fn new(notes: impl IntoIterator<Item = Note>) -> Self {
        let mut vault = Self::default();
        for note in notes {
            vault.insert(note);
        }
        vault
    }

    /// Insert or replace a note
    pub fn insert(&mut self, note: Note) {
        if let Some(&idx) = self.by_id.get(&note.id) {
            self.notes[idx] = note;
            return;
        }

        let idx = self.notes.len();
        let normalized = normalize_link_path(note.id.as_str());
        self.by_basename
            .entry(link_basename(&normalized).to_string())
            .or_insert(idx);
        self.by_path.entry(normalized).or_insert(idx);
        self.by_id.insert(note.id.clone(), idx);
        self.notes.push(note);
    }

    /// All notes in insertion order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Look up a note synchronously
    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.by_id.get(id).map(|&idx| &self.notes[idx])
    }

    /// Number of notes
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether the vault is empty
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Rebuild every note's backlink list from resolved outgoing links
    pub fn compute_backlinks(&mut self) {
        let mut incoming: Vec<Vec<NoteId>> = vec![Vec::new(); self.notes.len()];
        for note in &self.notes {
            for link in &note.links {
                if let Some(target) = self.resolve(link, &note.id) {
                    if let Some(&idx) = self.by_id.get(&target) {
                        if target != note.id && !incoming[idx].contains(&note.id) {
                            incoming[idx].push(note.id.clone());
                        }
                    }
                }
            }
        }
        for (note, backlinks) in self.notes.iter_mut().zip(incoming) {
            note.backlinks = backlinks;
        }
    }
}

#[async_trait]
impl NoteSource for InMemoryVault {
    type Error = VaultError;

    async fn read_note(&self, id: &NoteId) -> Result<Note, Self::Error> {
        self.get(id)
            .cloned()
            .ok_or_else(|| VaultError::NotFound(id.to_string()))
    }
}

impl LinkResolver for InMemoryVault {
    fn resolve(&self, link: &str, _from: &NoteId) -> Option<NoteId> {
        let normalized = normalize_link_path(link);
        if normalized.is_empty() {
            return None;
        }
        self.by_path
            .get(&normalized)
            .or_else(|| self.by_basename.get(link_basename(&normalized)))
            .map(|&idx| self.notes[idx].id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault() -> InMemoryVault {
        InMemoryVault::new(vec![
            Note::new("seeds/Morning Light.md", "a").with_links(["Kitchen#table"]),
            Note::new("seeds/Kitchen.md", "b").with_links(["[[Morning Light|light]]"]),
            Note::new("archive/old.md", "c").with_links(["missing"]),
        ])
    }

    #[test]
    fn test_resolve_by_path_and_basename() {
        let vault = vault();
        let from = NoteId::new("x");
        assert_eq!(
            vault.resolve("seeds/kitchen.md", &from),
            Some(NoteId::new("seeds/Kitchen.md"))
        );
        assert_eq!(
            vault.resolve("Morning Light#Heading", &from),
            Some(NoteId::new("seeds/Morning Light.md"))
        );
        assert_eq!(vault.resolve("nowhere", &from), None);
        assert_eq!(vault.resolve("   ", &from), None);
    }

    #[test]
    fn test_compute_backlinks() {
        let mut vault = vault();
        vault.compute_backlinks();

        let morning = vault.get(&NoteId::new("seeds/Morning Light.md")).unwrap();
        assert_eq!(morning.backlinks, vec![NoteId::new("seeds/Kitchen.md")]);
        let old = vault.get(&NoteId::new("archive/old.md")).unwrap();
        assert!(old.backlinks.is_empty());
    }

    #[tokio::test]
    async fn test_read_missing_note() {
        let vault = vault();
        let result = vault.read_note(&NoteId::new("nope.md")).await;
        assert_eq!(result, Err(VaultError::NotFound("nope.md".to_string())));
    }
}

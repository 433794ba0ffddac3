//! Trait definitions for host collaborators
//!
//! These traits define the boundary between the engine and the application that
//! owns the notes. The engine never touches the file system itself.

use crate::{Note, NoteId};
use async_trait::async_trait;

/// Reads notes (content, tags, backlinks, timestamps) by identifier
///
/// Implemented by the host application
#[async_trait]
pub trait NoteSource: Send + Sync {
    /// Error type for read operations
    type Error: std::fmt::Display + Send;

    /// Read one note
    async fn read_note(&self, id: &NoteId) -> Result<Note, Self::Error>;
}

/// Maps a raw link reference to a concrete note
///
/// Implemented by the host application
pub trait LinkResolver: Send + Sync {
    /// Resolve `link` as written in note `from`; `None` if the link is broken
    fn resolve(&self, link: &str, from: &NoteId) -> Option<NoteId>;
}

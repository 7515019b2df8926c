//! Error types for songbook editing
//!
//! Every fallible operation in the crate returns [`Result`]. Most variants are
//! fatal to the call that produced them; [`SongbookError::UnsupportedMerge`] is
//! the one soft rejection, reported with the document left untouched.

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, SongbookError>;

/// Everything that can go wrong while loading, editing or saving a songbook
#[derive(Debug, Error)]
pub enum SongbookError {
    /// Two blocks of one song resolve to the same non-empty name
    #[error("multiple blocks named {0:?}")]
    DuplicateName(String),

    /// A reference block points at a name that no block carries
    #[error("block {block:?} references {target:?}, which is not a block of this song")]
    UnresolvedReference { block: String, target: String },

    /// Following references from a block leads back to it
    #[error("reference cycle through block {0:?}")]
    ReferenceCycle(String),

    /// A block, line or segment anchor is not part of its collection
    #[error("{0} not found")]
    NotFound(String),

    /// A contents-only edit was aimed at a reference or placeholder block
    #[error("block {name:?} is not a {expected} block")]
    WrongKind { name: String, expected: &'static str },

    /// Chord merging only works on two single-segment lines
    #[error(
        "cannot merge chords: lines have {chord_segments} and {lyric_segments} segments, \
         merging is only implemented for single-segment lines"
    )]
    UnsupportedMerge {
        chord_segments: usize,
        lyric_segments: usize,
    },

    /// The songbook lists the same author twice
    #[error("duplicate author {0:?}")]
    DuplicateAuthor(String),

    /// A song credits an author the songbook does not know
    #[error("song {song:?} credits unknown author {author:?}")]
    UnknownAuthor { song: String, author: String },

    /// JSON encoding or decoding failed
    #[error("invalid songbook JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl SongbookError {
    /// Whether the document is guaranteed untouched and the caller may retry
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SongbookError::UnsupportedMerge { .. })
    }
}

//! Raw songbook data - the serialization boundary
//!
//! These types mirror the on-disk songbook format one to one. They are what
//! schema validation hands over on load and what gets written back on save;
//! the editable model in [`crate::model`] and [`crate::song`] is built from
//! them and projected back into them.
//!
//! ```text
//! Songbook := { authors: [ {name} ], songs: [ Song ] }
//! Song     := { name, authors: [text], blocks: [ Block ] }
//! Block    := { name, ref } | { name, lines: [ Line ] }
//! Line     := { key?, segments: [ Segment ] }
//! Segment  := { key?, lyrics?, chord? }
//! ```

use crate::Key;
use serde::{Deserialize, Serialize};

/// Key under which the songbook sits in a stored document
pub const ROOT_KEY: &str = "universal-songbook-format:songbook";

/// A whole stored document: the songbook wrapped under [`ROOT_KEY`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(rename = "universal-songbook-format:songbook")]
    pub songbook: RawSongbook,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSongbook {
    #[serde(default)]
    pub authors: Vec<RawAuthor>,
    #[serde(default)]
    pub songs: Vec<RawSong>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAuthor {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSong {
    /// Song title
    pub name: String,
    /// Author names, each resolving to a songbook author
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
}

/// A stored block. Anything carrying `ref` is a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawBlock {
    Reference(RawReference),
    Contents(RawContents),
}

impl RawBlock {
    pub fn name(&self) -> &str {
        match self {
            RawBlock::Reference(r) => &r.name,
            RawBlock::Contents(c) => &c.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReference {
    pub name: String,
    #[serde(rename = "ref")]
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContents {
    pub name: String,
    pub lines: Vec<RawLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Key>,
    pub segments: Vec<RawSegment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Key>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chord: Option<String>,
}

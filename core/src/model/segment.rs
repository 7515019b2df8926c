//! Segment: the smallest unit of song text
//!
//! A segment pairs an optional chord label with an optional lyric fragment.
//! The chord sits above the first character of the lyric when rendered.

use crate::raw::RawSegment;
use crate::Key;

/// An optional chord over an optional lyric fragment
///
/// Freshly created segments have no key; [`Line::cleanup`](super::Line::cleanup)
/// assigns one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    pub key: Option<Key>,
    pub lyrics: Option<String>,
    pub chord: Option<String>,
}

impl Segment {
    /// A lyrics-only segment
    pub fn lyrics(text: impl Into<String>) -> Self {
        Self {
            lyrics: Some(text.into()),
            ..Self::default()
        }
    }

    /// A segment holding both a chord and its lyric
    pub fn with_chord(chord: impl Into<String>, lyrics: impl Into<String>) -> Self {
        Self {
            key: None,
            lyrics: Some(lyrics.into()),
            chord: Some(chord.into()),
        }
    }

    /// Build a segment from aligned slices, treating empty slices as absent
    pub(crate) fn aligned(chord: String, lyrics: String) -> Self {
        Self {
            key: None,
            lyrics: (!lyrics.is_empty()).then_some(lyrics),
            chord: (!chord.is_empty()).then_some(chord),
        }
    }

    /// True when the segment carries neither chord nor lyrics
    pub fn is_blank(&self) -> bool {
        self.lyrics.is_none() && self.chord.is_none()
    }

    pub fn from_raw(raw: RawSegment) -> Self {
        Self {
            key: raw.key,
            lyrics: raw.lyrics,
            chord: raw.chord,
        }
    }

    pub fn to_raw(&self) -> RawSegment {
        RawSegment {
            key: self.key,
            lyrics: self.lyrics.clone(),
            chord: self.chord.clone(),
        }
    }
}

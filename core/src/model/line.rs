//! Line: an ordered run of segments
//!
//! Lines own the uniqueness of their segment keys. Keys are assigned by
//! linear probing: a missing key starts at 0, and a key already taken by an
//! earlier segment is bumped upward until it is free. Explicit keys that do
//! not collide are never touched, so stored keys stay stable across saves.

use super::segment::Segment;
use crate::error::{Result, SongbookError};
use crate::raw::RawLine;
use crate::Key;
use std::collections::HashSet;

/// Make every key in `keys` unique, in order, by probing upward
///
/// Shared by segment keys within a line and line keys within a block. A probe
/// that runs past `Key::MAX` falls back to the smallest free key.
pub(crate) fn assign_unique_keys<'a>(keys: impl IntoIterator<Item = &'a mut Option<Key>>) {
    let mut seen = HashSet::new();
    for slot in keys {
        let mut key = slot.unwrap_or(0);
        while seen.contains(&key) {
            tracing::trace!(key, "key already taken, probing upward");
            key = match key.checked_add(1) {
                Some(next) => next,
                None => lowest_free(&seen),
            };
        }
        seen.insert(key);
        *slot = Some(key);
    }
}

fn lowest_free(seen: &HashSet<Key>) -> Key {
    (0..=Key::MAX).find(|k| !seen.contains(k)).unwrap_or(0)
}

/// Summary of what a line holds, derived on demand
///
/// Editors use it to decide which actions make sense for a line; chord
/// merging requires single-segment lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLayout {
    pub segments: usize,
    pub has_lyrics: bool,
    pub has_chords: bool,
}

impl LineLayout {
    /// A single segment of plain text: a candidate for chord merging
    pub fn is_lyrics_only(&self) -> bool {
        self.segments == 1 && !self.has_chords
    }

    pub fn is_single_segment(&self) -> bool {
        self.segments == 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub key: Option<Key>,
    pub segments: Vec<Segment>,
}

impl Line {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { key: None, segments }
    }

    /// A line holding one lyrics segment with the given text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![Segment::lyrics(text)])
    }

    pub fn layout(&self) -> LineLayout {
        LineLayout {
            segments: self.segments.len(),
            has_lyrics: self.segments.iter().any(|s| s.lyrics.is_some()),
            has_chords: self.segments.iter().any(|s| s.chord.is_some()),
        }
    }

    /// The lyric text of a single-segment line, `None` for any other shape
    pub fn sole_text(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [only] => Some(only.lyrics.as_deref().unwrap_or("")),
            _ => None,
        }
    }

    /// Like [`sole_text`](Self::sole_text), but only while the segment holds
    /// no chord text; an empty chord slot still counts as plain
    pub fn plain_text(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [only] if only.chord.as_deref().map_or(true, str::is_empty) => {
                Some(only.lyrics.as_deref().unwrap_or(""))
            }
            _ => None,
        }
    }

    /// Concatenated lyrics of all segments
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|s| s.lyrics.as_deref())
            .collect()
    }

    /// Insert a blank segment before position `at` (`at == len` appends)
    pub fn insert_segment(&mut self, at: usize) -> Result<()> {
        if at > self.segments.len() {
            return Err(SongbookError::NotFound(format!("segment position {}", at)));
        }
        self.segments.insert(at, Segment::default());
        Ok(())
    }

    pub fn remove_segment(&mut self, at: usize) -> Result<Segment> {
        if at >= self.segments.len() {
            return Err(SongbookError::NotFound(format!("segment {}", at)));
        }
        Ok(self.segments.remove(at))
    }

    /// Give every segment an (empty) chord slot so chords can be typed in
    pub fn add_chords(&mut self) {
        for segment in &mut self.segments {
            segment.chord.get_or_insert_with(String::new);
        }
    }

    /// Assign unique non-negative keys to all segments
    pub fn cleanup(&mut self) {
        assign_unique_keys(self.segments.iter_mut().map(|s| &mut s.key));
    }

    pub fn from_raw(raw: RawLine) -> Self {
        Self {
            key: raw.key,
            segments: raw.segments.into_iter().map(Segment::from_raw).collect(),
        }
    }

    pub fn to_raw(&self) -> RawLine {
        RawLine {
            key: self.key,
            segments: self.segments.iter().map(Segment::to_raw).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn keyed(keys: &[Option<Key>]) -> Line {
        Line::new(
            keys.iter()
                .map(|&key| Segment {
                    key,
                    ..Segment::lyrics("x")
                })
                .collect(),
        )
    }

    fn keys(line: &Line) -> Vec<Option<Key>> {
        line.segments.iter().map(|s| s.key).collect()
    }

    #[test]
    fn test_missing_keys_probe_from_zero() {
        let mut line = keyed(&[None, None, None]);
        line.cleanup();
        assert_eq!(keys(&line), vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_explicit_keys_preserved() {
        let mut line = keyed(&[Some(5), None, Some(0), Some(5)]);
        line.cleanup();
        // 5 kept, None -> 0, explicit 0 collides -> 1, second 5 -> 6
        assert_eq!(keys(&line), vec![Some(5), Some(0), Some(1), Some(6)]);
    }

    #[test]
    fn test_probe_past_max_key_wraps_to_lowest_free() {
        let mut line = keyed(&[Some(Key::MAX), Some(Key::MAX)]);
        line.cleanup();
        assert_eq!(keys(&line), vec![Some(Key::MAX), Some(0)]);

        let mut line = keyed(&[Some(0), Some(Key::MAX), Some(Key::MAX), Some(Key::MAX)]);
        line.cleanup();
        assert_eq!(
            keys(&line),
            vec![Some(0), Some(Key::MAX), Some(1), Some(2)]
        );

        // Stable on a second pass
        let once = line.clone();
        line.cleanup();
        assert_eq!(line, once);
    }

    #[test]
    fn test_plain_text() {
        let mut line = Line::from_text("la");
        assert_eq!(line.plain_text(), Some("la"));

        line.add_chords();
        assert_eq!(line.plain_text(), Some("la"));

        line.segments[0].chord = Some("G".to_string());
        assert_eq!(line.plain_text(), None);
        assert_eq!(line.sole_text(), Some("la"));
    }

    #[test]
    fn test_layout() {
        let mut line = Line::from_text("Hello");
        assert!(line.layout().is_lyrics_only());

        line.add_chords();
        let layout = line.layout();
        assert!(layout.has_chords);
        assert!(layout.is_single_segment());
        assert!(!layout.is_lyrics_only());
        assert_eq!(line.segments[0].chord.as_deref(), Some(""));
    }

    #[test]
    fn test_sole_text() {
        assert_eq!(Line::from_text("la la").sole_text(), Some("la la"));
        assert_eq!(Line::new(vec![Segment::default()]).sole_text(), Some(""));
        assert_eq!(Line::new(vec![]).sole_text(), None);

        let two = Line::new(vec![Segment::lyrics("a"), Segment::lyrics("b")]);
        assert_eq!(two.sole_text(), None);
        assert_eq!(two.text(), "ab");
    }

    #[test]
    fn test_segment_editing() {
        let mut line = Line::from_text("tail");
        line.insert_segment(0).unwrap();
        line.insert_segment(2).unwrap();
        assert_eq!(line.segments.len(), 3);
        assert!(line.segments[0].is_blank());
        assert!(line.insert_segment(4).is_err());

        let removed = line.remove_segment(1).unwrap();
        assert_eq!(removed.lyrics.as_deref(), Some("tail"));
        assert!(matches!(
            line.remove_segment(2),
            Err(SongbookError::NotFound(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_cleanup_yields_unique_keys(raw in prop::collection::vec(prop::option::of(0u32..8), 0..24)) {
            let mut line = keyed(&raw);
            line.cleanup();

            let assigned: Vec<Key> = line.segments.iter().map(|s| s.key.unwrap()).collect();
            let unique: HashSet<Key> = assigned.iter().copied().collect();
            prop_assert_eq!(unique.len(), assigned.len());

            // An explicit key is kept whenever no earlier segment ended up on it
            for (i, original) in raw.iter().enumerate() {
                if let Some(k) = original {
                    if !assigned[..i].contains(k) {
                        prop_assert_eq!(assigned[i], *k);
                    }
                }
            }
        }

        #[test]
        fn prop_cleanup_is_idempotent(raw in prop::collection::vec(prop::option::of(0u32..8), 0..24)) {
            let mut line = keyed(&raw);
            line.cleanup();
            let once = line.clone();
            line.cleanup();
            prop_assert_eq!(line, once);
        }
    }
}

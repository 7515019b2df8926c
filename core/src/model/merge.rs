//! Chord-lyric alignment
//!
//! Users type chords as a plain line of text above the lyric line, placing
//! each chord over the character it belongs to. [`align`] turns such a pair
//! of column-aligned strings into segments.
//!
//! Segment boundaries come from the chord line alone. Chord tokens are
//! separated by at least one space, lyrics may contain spaces anywhere, so a
//! boundary is every place where a space is followed by a non-blank column in
//! the chord line. Both strings are cut at the column just past that space.
//!
//! # Example
//!
//! ```rust
//! use songbook_core::model::{align, Segment};
//!
//! let segments = align("C G", "Ab Cd");
//! assert_eq!(
//!     segments,
//!     vec![Segment::with_chord("C ", "Ab"), Segment::with_chord("G", " Cd")]
//! );
//! ```

use super::segment::Segment;

#[cfg(feature = "graphemes")]
use unicode_segmentation::UnicodeSegmentation;

/// Split text into display columns (grapheme clusters)
#[cfg(feature = "graphemes")]
fn columns(text: &str) -> Vec<&str> {
    text.graphemes(true).collect()
}

/// Split text into display columns (fallback without unicode-segmentation)
#[cfg(not(feature = "graphemes"))]
fn columns(text: &str) -> Vec<&str> {
    text.char_indices()
        .map(|(i, c)| &text[i..i + c.len_utf8()])
        .collect()
}

/// Offset of the space that starts the next chord token
fn next_boundary(chords: &[&str]) -> Option<usize> {
    chords
        .windows(2)
        .position(|pair| pair[0] == " " && !pair[1].chars().all(char::is_whitespace))
}

/// Pair each chord token with the lyric text under it
///
/// Empty slices become absent segment fields. The trailing segment is emitted
/// when either remainder is non-empty, and always when it would be the only
/// one, so the result is never empty. Keys are left unassigned.
pub fn align(chords: &str, lyrics: &str) -> Vec<Segment> {
    let chords = columns(chords);
    let lyrics = columns(lyrics);

    let mut segments = Vec::new();
    let (mut c, mut l) = (0, 0);

    while let Some(m) = next_boundary(&chords[c..]) {
        let take = m + 1;
        let lyric_end = (l + take).min(lyrics.len());

        segments.push(Segment::aligned(
            chords[c..c + take].concat(),
            lyrics[l..lyric_end].concat(),
        ));

        c += take;
        l = lyric_end;
    }

    let chord_rest = chords[c..].concat();
    let lyric_rest = lyrics[l..].concat();
    if !chord_rest.is_empty() || !lyric_rest.is_empty() || segments.is_empty() {
        segments.push(Segment::aligned(chord_rest, lyric_rest));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(segments: &[Segment]) -> Vec<(Option<&str>, Option<&str>)> {
        segments
            .iter()
            .map(|s| (s.chord.as_deref(), s.lyrics.as_deref()))
            .collect()
    }

    #[test]
    fn test_single_boundary() {
        let segments = align("C G", "Ab Cd");
        assert_eq!(
            pairs(&segments),
            vec![(Some("C "), Some("Ab")), (Some("G"), Some(" Cd"))]
        );
    }

    #[test]
    fn test_wide_gap() {
        let segments = align("C  G", "Hi there");
        assert_eq!(
            pairs(&segments),
            vec![(Some("C  "), Some("Hi ")), (Some("G"), Some("there"))]
        );

        let segments = align("C       G", "Hello world today");
        assert_eq!(
            pairs(&segments),
            vec![(Some("C       "), Some("Hello wo")), (Some("G"), Some("rld today"))]
        );
    }

    #[test]
    fn test_empty_chord_line() {
        let segments = align("", "Hello world");
        assert_eq!(pairs(&segments), vec![(None, Some("Hello world"))]);
        assert!(segments.iter().all(|s| s.key.is_none()));
    }

    #[test]
    fn test_both_empty_yields_one_blank_segment() {
        let segments = align("", "");
        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_blank());
    }

    #[test]
    fn test_lyrics_shorter_than_chords() {
        let segments = align("Am   F   C", "Hi");
        assert_eq!(
            pairs(&segments),
            vec![
                (Some("Am   "), Some("Hi")),
                (Some("F   "), None),
                (Some("C"), None),
            ]
        );
    }

    #[test]
    fn test_chords_shorter_than_lyrics() {
        let segments = align("D", "Shorter chord line");
        assert_eq!(pairs(&segments), vec![(Some("D"), Some("Shorter chord line"))]);
    }

    #[test]
    fn test_leading_spaces() {
        let segments = align("  G", "Hello");
        assert_eq!(
            pairs(&segments),
            vec![(Some("  "), Some("He")), (Some("G"), Some("llo"))]
        );
    }

    #[test]
    fn test_trailing_spaces_are_not_boundaries() {
        let segments = align("C   ", "Hello there");
        assert_eq!(pairs(&segments), vec![(Some("C   "), Some("Hello there"))]);
    }

    #[test]
    fn test_non_ascii_lyrics() {
        let segments = align("D  A", "Čau ty");
        assert_eq!(
            pairs(&segments),
            vec![(Some("D  "), Some("Čau")), (Some("A"), Some(" ty"))]
        );
    }

    #[test]
    #[cfg(feature = "graphemes")]
    fn test_combining_marks_count_as_one_column() {
        // "e" + combining acute is a single column
        let segments = align("C G", "e\u{301}a bc");
        assert_eq!(
            pairs(&segments),
            vec![(Some("C "), Some("e\u{301}a")), (Some("G"), Some(" bc"))]
        );
    }
}

//! Songbook: songs and the authors they credit
//!
//! The songbook owns the author list; songs share authors through `Rc`, so an
//! author credited on many songs exists once. This is also where stored
//! documents come in and go out: [`Songbook::from_json`] expects data that
//! has already passed schema validation, and [`Songbook::to_json`] cleans up
//! every song before anything is written.

use crate::error::{Result, SongbookError};
use crate::raw::{RawAuthor, RawDocument, RawSongbook};
use crate::song::Song;
use std::collections::HashMap;
use std::rc::Rc;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Author {
    name: String,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn to_raw(&self) -> RawAuthor {
        RawAuthor {
            name: self.name.clone(),
        }
    }
}

/// Lowercase, decompose and drop combining marks, so "Bratříčku" folds to
/// "bratricku"
fn fold(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Substring match on folded text; `keyword` must already be folded
fn matches_keyword(text: &str, keyword: &str) -> bool {
    fold(text).contains(keyword)
}

#[derive(Debug, Default)]
pub struct Songbook {
    authors: Vec<Rc<Author>>,
    author_index: HashMap<String, Rc<Author>>,
    songs: Vec<Song>,
}

impl Songbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a songbook from validated raw data
    ///
    /// Fails on duplicate authors, songs crediting unknown authors, and
    /// songs with duplicate block names.
    pub fn from_raw(raw: RawSongbook) -> Result<Self> {
        let mut book = Songbook::new();
        for author in raw.authors {
            book.add_author(author.name)?;
        }

        for raw_song in raw.songs {
            let song = Song::from_raw(raw_song, |name| book.author(name))?;
            book.songs.push(song);
        }

        tracing::debug!(
            authors = book.authors.len(),
            songs = book.songs.len(),
            "songbook loaded"
        );
        Ok(book)
    }

    /// Raw form of the songbook; run [`cleanup`](Self::cleanup) first
    pub fn to_raw(&self) -> RawSongbook {
        RawSongbook {
            authors: self.authors.iter().map(|a| a.to_raw()).collect(),
            songs: self.songs.iter().map(Song::to_raw).collect(),
        }
    }

    /// Parse a stored document (the songbook wrapped under its root key)
    pub fn from_json(json: &str) -> Result<Self> {
        let document: RawDocument = serde_json::from_str(json).map_err(|err| {
            tracing::warn!(%err, "rejected songbook document");
            err
        })?;
        Self::from_raw(document.songbook)
    }

    /// Clean up every song and encode the document as pretty-printed JSON
    pub fn to_json(&mut self) -> Result<String> {
        self.cleanup()?;
        let document = RawDocument {
            songbook: self.to_raw(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Run cleanup on every song, stopping at the first failure
    pub fn cleanup(&mut self) -> Result<()> {
        for song in &mut self.songs {
            song.cleanup().map_err(|err| {
                tracing::warn!(song = song.title(), %err, "song cleanup failed");
                err
            })?;
        }
        Ok(())
    }

    pub fn authors(&self) -> &[Rc<Author>] {
        &self.authors
    }

    pub fn author(&self, name: &str) -> Option<Rc<Author>> {
        self.author_index.get(name).cloned()
    }

    pub fn add_author(&mut self, name: impl Into<String>) -> Result<Rc<Author>> {
        let name = name.into();
        if self.author_index.contains_key(&name) {
            return Err(SongbookError::DuplicateAuthor(name));
        }
        let author = Rc::new(Author::new(name.clone()));
        self.author_index.insert(name, Rc::clone(&author));
        self.authors.push(Rc::clone(&author));
        Ok(author)
    }

    /// Append a new, empty song credited to existing authors
    pub fn add_song(&mut self, title: impl Into<String>, authors: &[&str]) -> Result<&mut Song> {
        let title = title.into();
        let credited = authors
            .iter()
            .map(|&name| {
                self.author(name).ok_or_else(|| SongbookError::UnknownAuthor {
                    song: title.clone(),
                    author: name.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.songs.push(Song::new(title, credited));
        let last = self.songs.len() - 1;
        Ok(&mut self.songs[last])
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn song(&self, at: usize) -> Option<&Song> {
        self.songs.get(at)
    }

    pub fn song_mut(&mut self, at: usize) -> Option<&mut Song> {
        self.songs.get_mut(at)
    }

    /// Songs whose title or any author name contains `keyword`, ignoring
    /// case and diacritics
    pub fn search<'a>(&'a self, keyword: &str) -> impl Iterator<Item = (usize, &'a Song)> + 'a {
        let keyword = fold(keyword);
        self.songs.iter().enumerate().filter(move |(_, song)| {
            matches_keyword(song.title(), &keyword)
                || song
                    .authors()
                    .iter()
                    .any(|a| matches_keyword(a.name(), &keyword))
        })
    }
}

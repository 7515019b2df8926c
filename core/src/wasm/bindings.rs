//! JavaScript bindings for the songbook core types

use crate::error::SongbookError;
use crate::model::BlockId;
use crate::song::Song;
use crate::songbook::Songbook;
use wasm_bindgen::prelude::*;

fn to_js(err: SongbookError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// JavaScript-friendly wrapper for Songbook
#[wasm_bindgen]
pub struct WasmSongbook {
    inner: Songbook,
}

impl WasmSongbook {
    fn song_mut(&mut self, song: usize) -> Result<&mut Song, JsValue> {
        self.inner
            .song_mut(song)
            .ok_or_else(|| JsValue::from_str(&format!("song {} not found", song)))
    }

    fn block_id(song: &Song, block: &str) -> Result<BlockId, JsValue> {
        song.block_named(block)
            .map(|b| b.id())
            .ok_or_else(|| JsValue::from_str(&format!("block {:?} not found", block)))
    }
}

#[wasm_bindgen]
impl WasmSongbook {
    /// Create an empty songbook
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: Songbook::new(),
        }
    }

    /// Load a stored songbook document
    #[wasm_bindgen(js_name = fromJSON)]
    pub fn from_json(json: &str) -> Result<WasmSongbook, JsValue> {
        Songbook::from_json(json)
            .map(|inner| Self { inner })
            .map_err(to_js)
    }

    /// Clean up all songs and export the document as a JSON string
    #[wasm_bindgen(js_name = toJSON)]
    pub fn to_json(&mut self) -> Result<String, JsValue> {
        self.inner.to_json().map_err(to_js)
    }

    /// Get song count
    #[wasm_bindgen(js_name = songCount)]
    pub fn song_count(&self) -> usize {
        self.inner.songs().len()
    }

    #[wasm_bindgen(js_name = songTitle)]
    pub fn song_title(&self, song: usize) -> Option<String> {
        self.inner.song(song).map(|s| s.title().to_string())
    }

    /// Comma-separated author list of a song
    #[wasm_bindgen(js_name = songAuthors)]
    pub fn song_authors(&self, song: usize) -> Option<String> {
        self.inner.song(song).map(Song::display_authors)
    }

    /// Indices of songs matching a search keyword
    #[wasm_bindgen(js_name = search)]
    pub fn search(&self, keyword: &str) -> Vec<usize> {
        self.inner.search(keyword).map(|(i, _)| i).collect()
    }

    /// Referenceable block names of a song, in picker order
    #[wasm_bindgen(js_name = blockNames)]
    pub fn block_names(&self, song: usize) -> Vec<String> {
        self.inner
            .song(song)
            .map(|s| s.index().ordered_names().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Split a block before the given line
    #[wasm_bindgen(js_name = splitBlock)]
    pub fn split_block(&mut self, song: usize, block: &str, before: usize) -> Result<(), JsValue> {
        let song = self.song_mut(song)?;
        let id = Self::block_id(song, block)?;
        song.split(id, before).map(|_| ()).map_err(to_js)
    }

    /// Merge a chord line into the lyric line below it
    #[wasm_bindgen(js_name = mergeChords)]
    pub fn merge_chords(&mut self, song: usize, block: &str, chord_line: usize) -> Result<(), JsValue> {
        let song = self.song_mut(song)?;
        let id = Self::block_id(song, block)?;
        song.merge_chords(id, chord_line).map(|_| ()).map_err(to_js)
    }

    /// Clean up every song without exporting
    #[wasm_bindgen(js_name = cleanup)]
    pub fn cleanup(&mut self) -> Result<(), JsValue> {
        self.inner.cleanup().map_err(to_js)
    }
}

impl Default for WasmSongbook {
    fn default() -> Self {
        Self::new()
    }
}

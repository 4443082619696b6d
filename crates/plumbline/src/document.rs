//! Document: an ordered collection of pages, loadable from a JSON page dump.
//!
//! A page dump is the output of an external parser:
//!
//! ```json
//! {"pages": [{"width": 612, "height": 792, "chars": [], "lines": [], "rects": [], "curves": []}]}
//! ```
//!
//! Loading dumps requires the `serde` feature.

#[cfg(feature = "serde")]
use std::path::Path;

#[cfg(feature = "serde")]
use plumbline_core::{Char, Curve, Line, Rect};
use plumbline_core::{SearchMatch, SearchOptions, Table, TableSettings, TableText, TextOptions};
#[cfg(feature = "serde")]
use tracing::debug;

use crate::error::DocumentError;
use crate::page::{Page, PageData};

#[cfg(feature = "serde")]
#[derive(Debug, serde::Deserialize)]
struct PageDump {
    pages: Vec<PageRecord>,
}

#[cfg(feature = "serde")]
#[derive(Debug, serde::Deserialize)]
struct PageRecord {
    width: f64,
    height: f64,
    #[serde(default)]
    chars: Vec<Char>,
    #[serde(default)]
    lines: Vec<Line>,
    #[serde(default)]
    rects: Vec<Rect>,
    #[serde(default)]
    curves: Vec<Curve>,
}

/// A document made of already-parsed pages.
#[derive(Debug, Default)]
pub struct Document {
    pages: Vec<Page>,
}

impl Document {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    /// Parse a page dump from a JSON string.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let dump: PageDump = serde_json::from_str(json)?;
        Ok(Self::from_dump(dump))
    }

    /// Parse a page dump from any reader.
    #[cfg(feature = "serde")]
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, DocumentError> {
        let dump: PageDump = serde_json::from_reader(reader)?;
        Ok(Self::from_dump(dump))
    }

    /// Read and parse a page dump file.
    #[cfg(feature = "serde")]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let doc = Self::from_json(&json)?;
        debug!(path = %path.display(), pages = doc.page_count(), "opened page dump");
        Ok(doc)
    }

    #[cfg(feature = "serde")]
    fn from_dump(dump: PageDump) -> Self {
        let pages = dump
            .pages
            .into_iter()
            .enumerate()
            .map(|(i, p)| Page::with_geometry(i, p.width, p.height, p.chars, p.lines, p.rects, p.curves))
            .collect();
        Self { pages }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by 0-based index.
    pub fn page(&self, index: usize) -> Result<&Page, DocumentError> {
        self.pages.get(index).ok_or(DocumentError::PageOutOfRange {
            index,
            count: self.pages.len(),
        })
    }

    /// Tables of every page, one list per page.
    pub fn find_tables(&self, settings: &TableSettings) -> Result<Vec<Vec<Table>>, DocumentError> {
        self.pages
            .iter()
            .map(|p| p.find_tables(settings).map_err(DocumentError::from))
            .collect()
    }

    /// Cell text of every table, one list per page.
    pub fn extract_tables(
        &self,
        settings: &TableSettings,
    ) -> Result<Vec<Vec<TableText>>, DocumentError> {
        self.pages
            .iter()
            .map(|p| p.extract_tables(settings).map_err(DocumentError::from))
            .collect()
    }

    /// Like [`Document::extract_tables`], processing pages on the rayon pool.
    ///
    /// Results are in page order.
    #[cfg(feature = "parallel")]
    pub fn extract_tables_parallel(
        &self,
        settings: &TableSettings,
    ) -> Result<Vec<Vec<TableText>>, DocumentError> {
        use rayon::prelude::*;

        self.pages
            .par_iter()
            .map(|p| p.extract_tables(settings).map_err(DocumentError::from))
            .collect()
    }

    /// Search every page, pairing each match with its 0-based page index.
    pub fn search_all(
        &self,
        pattern: &str,
        options: &SearchOptions,
        text_options: &TextOptions,
    ) -> Result<Vec<(usize, SearchMatch)>, DocumentError> {
        let mut out = Vec::new();
        for page in &self.pages {
            let matches = page.search(pattern, options, text_options)?;
            out.extend(matches.into_iter().map(|m| (page.page_number(), m)));
        }
        Ok(out)
    }
}

//! Text search with position: find patterns in reconstructed text and map
//! matches back to the characters and bounding boxes behind them.

use regex::Regex;

use crate::error::{PlumbError, Result};
use crate::geometry::BBox;
use crate::layout::{TextMap, TextOptions};
use crate::text::Char;

/// Options controlling text search behavior.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SearchOptions {
    /// Whether to interpret the pattern as a regex (default: `true`).
    /// When `false`, the pattern is treated as a literal string.
    pub regex: bool,
    /// Whether the search is case-sensitive (default: `true`).
    pub case_sensitive: bool,
    /// Whether matches carry their capture groups.
    pub return_groups: bool,
    /// Whether matches carry copies of their characters.
    pub return_chars: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            regex: true,
            case_sensitive: true,
            return_groups: true,
            return_chars: true,
        }
    }
}

/// A single text search match with its bounding box and position information.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchMatch {
    /// The matched text.
    pub text: String,
    /// Capture groups after the whole match; `None` for groups that did not participate.
    pub groups: Vec<Option<String>>,
    /// Union bounding box of all constituent characters.
    pub bbox: BBox,
    /// Indices into the searched char slice, in text order.
    pub char_indices: Vec<usize>,
    pub chars: Vec<Char>,
}

fn compile(pattern: &str, options: &SearchOptions) -> Result<Regex> {
    let body = if options.regex {
        pattern.to_string()
    } else {
        regex::escape(pattern)
    };
    let full = if options.case_sensitive {
        body
    } else {
        format!("(?i){body}")
    };
    Regex::new(&full)
        .map_err(|e| PlumbError::config(format!("invalid search pattern '{pattern}': {e}")))
}

impl TextMap<'_> {
    /// Find every non-overlapping match of `pattern` in this map's text.
    ///
    /// Matches made only of inserted spaces and newlines are skipped, as are
    /// empty matches.
    pub fn search(&self, pattern: &str, options: &SearchOptions) -> Result<Vec<SearchMatch>> {
        let re = compile(pattern, options)?;
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let mut text = String::with_capacity(self.entries().len());
        // owner[byte] = index into entries
        let mut owner: Vec<usize> = Vec::with_capacity(self.entries().len());
        for (i, (c, _)) in self.entries().iter().enumerate() {
            text.push(*c);
            owner.resize(text.len(), i);
        }

        let source = self.source();
        let mut results = Vec::new();
        for caps in re.captures_iter(&text) {
            let Some(m) = caps.get(0) else { continue };
            if m.is_empty() {
                continue;
            }
            let (first, last) = (owner[m.start()], owner[m.end() - 1]);

            let mut char_indices: Vec<usize> = Vec::new();
            for (_, idx) in &self.entries()[first..=last] {
                if let Some(idx) = *idx {
                    if char_indices.last() != Some(&idx) {
                        char_indices.push(idx);
                    }
                }
            }
            let Some(bbox) = char_indices
                .iter()
                .map(|&i| source[i].bbox)
                .reduce(|a, b| a.union(&b))
            else {
                continue;
            };

            let groups = if options.return_groups {
                caps.iter()
                    .skip(1)
                    .map(|g| g.map(|g| g.as_str().to_string()))
                    .collect()
            } else {
                Vec::new()
            };
            let chars = if options.return_chars {
                char_indices.iter().map(|&i| source[i].clone()).collect()
            } else {
                Vec::new()
            };
            results.push(SearchMatch {
                text: m.as_str().to_string(),
                groups,
                bbox,
                char_indices,
                chars,
            });
        }
        Ok(results)
    }
}

/// Search `chars` after reconstructing their text per `text_options`.
pub fn search_chars(
    chars: &[Char],
    pattern: &str,
    options: &SearchOptions,
    text_options: &TextOptions,
) -> Result<Vec<SearchMatch>> {
    let map = if text_options.layout {
        TextMap::layout(chars, text_options)
    } else {
        TextMap::simple(chars, text_options)
    };
    map.search(pattern, options)
}

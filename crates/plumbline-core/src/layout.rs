//! Text reconstruction from characters.
//!
//! Two modes are supported. Simple mode clusters characters into lines and
//! inserts single spaces at gaps. Layout mode places words on a character grid
//! approximating their position on the page. Both produce a [`TextMap`] that
//! remembers which source character produced each output character.

use std::collections::HashMap;

use tracing::debug;

use crate::clustering::cluster_objects;
use crate::text::Char;
use crate::words::{Word, WordExtractor, WordOptions, expand_ligatures};

/// Options for text extraction, matching pdfplumber defaults.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TextOptions {
    /// If true, approximate the page layout with spaces and blank lines.
    pub layout: bool,
    pub x_tolerance: f64,
    pub y_tolerance: f64,
    /// Points per output character column in layout mode.
    pub x_density: f64,
    /// Points per output line in layout mode.
    pub y_density: f64,
    /// Horizontal origin subtracted before placing words (a cropped page's `x0`).
    pub x_shift: f64,
    /// Vertical origin subtracted before placing lines (a cropped page's `top`).
    pub y_shift: f64,
    /// Pad every line to this width (in points) in layout mode.
    pub layout_width: Option<f64>,
    /// Pad the output to this height (in points) in layout mode.
    pub layout_height: Option<f64>,
    pub keep_blank_chars: bool,
    pub expand_ligatures: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            layout: false,
            x_tolerance: 3.0,
            y_tolerance: 3.0,
            x_density: 7.25,
            y_density: 13.0,
            x_shift: 0.0,
            y_shift: 0.0,
            layout_width: None,
            layout_height: None,
            keep_blank_chars: false,
            expand_ligatures: true,
        }
    }
}

impl TextOptions {
    /// Word extraction options implied by these text options.
    pub fn word_options(&self) -> WordOptions {
        WordOptions {
            x_tolerance: self.x_tolerance,
            y_tolerance: self.y_tolerance,
            keep_blank_chars: self.keep_blank_chars,
            expand_ligatures: self.expand_ligatures,
            ..WordOptions::default()
        }
    }
}

/// Output text paired with the index of the source character behind each
/// output character. Inserted spaces and newlines carry `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMap<'a> {
    source: &'a [Char],
    entries: Vec<(char, Option<usize>)>,
}

impl<'a> TextMap<'a> {
    /// Simple mode: lines by doctop, one space wherever the gap exceeds `x_tolerance`.
    pub fn simple(chars: &'a [Char], options: &TextOptions) -> Self {
        let indices: Vec<usize> = (0..chars.len()).collect();
        let lines = cluster_objects(&indices, |&i| chars[i].doctop, options.y_tolerance, false);

        let mut entries = Vec::with_capacity(chars.len() + lines.len());
        for (n, mut line) in lines.into_iter().enumerate() {
            if n > 0 {
                entries.push(('\n', None));
            }
            line.sort_by(|&a, &b| chars[a].bbox.x0.total_cmp(&chars[b].bbox.x0));
            let mut last_x1: Option<f64> = None;
            for idx in line {
                let ch = &chars[idx];
                if last_x1.is_some_and(|x1| ch.bbox.x0 > x1 + options.x_tolerance) {
                    entries.push((' ', None));
                }
                last_x1 = Some(ch.bbox.x1);
                entries.extend(ch.text.chars().map(|c| (c, Some(idx))));
            }
        }
        Self {
            source: chars,
            entries,
        }
    }

    /// Layout mode: words placed on a grid of `x_density` by `y_density` points.
    pub fn layout(chars: &'a [Char], options: &TextOptions) -> Self {
        let words = WordExtractor::extract(chars, &options.word_options());
        Self::from_words(chars, &words, options)
    }

    /// Lay out `words` previously extracted from `chars`.
    pub fn from_words(chars: &'a [Char], words: &[Word], options: &TextOptions) -> Self {
        let mut map = Self {
            source: chars,
            entries: Vec::new(),
        };
        let Some(first) = words.iter().min_by(|a, b| a.doctop.total_cmp(&b.doctop)) else {
            return map;
        };

        let mut lookup = SourceLookup::new(chars);
        let width_chars = options
            .layout_width
            .map_or(0, |w| grid_units(w, options.x_density).max(0) as usize);
        let height_chars = options
            .layout_height
            .map_or(0, |h| grid_units(h, options.y_density).max(0));
        let page_doctop = first.doctop - first.bbox.top;

        let mut sorted: Vec<&Word> = words.iter().collect();
        sorted.sort_by(|a, b| a.doctop.total_cmp(&b.doctop));
        let lines = cluster_objects(&sorted, |w| w.doctop, options.y_tolerance, false);

        let mut newlines: i64 = 0;
        for (n, mut line) in lines.into_iter().enumerate() {
            let y_units = grid_units(line[0].doctop - (page_doctop + options.y_shift), options.y_density);
            let prepend = (y_units - newlines).max(i64::from(n > 0));
            for _ in 0..prepend {
                if map.entries.last().is_none_or(|(c, _)| *c == '\n') {
                    map.pad(width_chars);
                }
                map.entries.push(('\n', None));
            }
            newlines += prepend;

            line.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
            let mut line_len: i64 = 0;
            for word in line {
                let x_units = grid_units(word.bbox.x0 - options.x_shift, options.x_density);
                let spaces = (x_units - line_len).max(line_len.min(1));
                map.pad(spaces.max(0) as usize);
                line_len += spaces;
                for ch in &word.chars {
                    let idx = lookup.take(ch);
                    let text = if options.expand_ligatures {
                        expand_ligatures(&ch.text)
                    } else {
                        ch.text.clone()
                    };
                    for c in text.chars() {
                        map.entries.push((c, idx));
                        line_len += 1;
                    }
                }
            }
            if options.layout_width.is_some() {
                map.pad((width_chars as i64 - line_len).max(0) as usize);
            }
        }

        if options.layout_height.is_some() {
            for i in 0..(height_chars - (newlines + 1)).max(0) {
                if i > 0 {
                    map.pad(width_chars);
                }
                map.entries.push(('\n', None));
            }
            if map.entries.last() == Some(&('\n', None)) {
                map.entries.pop();
            }
        }
        debug!(words = words.len(), len = map.entries.len(), "laid out text");
        map
    }

    fn pad(&mut self, n: usize) {
        self.entries.extend(std::iter::repeat_n((' ', None), n));
    }

    /// The characters this map was built from.
    pub fn source(&self) -> &'a [Char] {
        self.source
    }

    /// Output characters with their source indices.
    pub fn entries(&self) -> &[(char, Option<usize>)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_string(&self) -> String {
        self.entries.iter().map(|(c, _)| *c).collect()
    }
}

/// Number of grid cells covering `distance`, rounding halves to even.
fn grid_units(distance: f64, density: f64) -> i64 {
    if density <= 0.0 {
        return 0;
    }
    (distance / density).round_ties_even() as i64
}

/// Resolves extracted word characters back to indices into the source slice.
struct SourceLookup {
    slots: HashMap<(String, [u64; 4]), Vec<usize>>,
}

impl SourceLookup {
    fn new(chars: &[Char]) -> Self {
        let mut slots: HashMap<_, Vec<usize>> = HashMap::new();
        for (idx, ch) in chars.iter().enumerate().rev() {
            slots.entry(Self::key(ch)).or_default().push(idx);
        }
        Self { slots }
    }

    fn key(ch: &Char) -> (String, [u64; 4]) {
        let b = ch.bbox;
        (
            ch.text.clone(),
            [b.x0.to_bits(), b.top.to_bits(), b.x1.to_bits(), b.bottom.to_bits()],
        )
    }

    fn take(&mut self, ch: &Char) -> Option<usize> {
        self.slots.get_mut(&Self::key(ch)).and_then(Vec::pop)
    }
}

/// Simple-mode text: lines joined with `\n`, words separated by single spaces.
pub fn extract_text_simple(chars: &[Char], x_tolerance: f64, y_tolerance: f64) -> String {
    let options = TextOptions {
        x_tolerance,
        y_tolerance,
        ..TextOptions::default()
    };
    TextMap::simple(chars, &options).as_string()
}

/// Text in the mode selected by `options.layout`.
pub fn extract_text(chars: &[Char], options: &TextOptions) -> String {
    if options.layout {
        TextMap::layout(chars, options).as_string()
    } else {
        TextMap::simple(chars, options).as_string()
    }
}

//! Word extraction: grouping characters into words.
//!
//! Characters are partitioned by orientation (and optional extra attributes),
//! clustered into lines, ordered along the reading axis, and then split into
//! words on blanks, on punctuation, or when a character falls outside the
//! word's extent plus tolerance.

use tracing::debug;

use crate::clustering::cluster_objects;
use crate::geometry::BBox;
use crate::text::{Char, TextDirection};

/// Options for word extraction, matching pdfplumber defaults.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct WordOptions {
    /// Maximum gap along x between characters of one word (cross-line distance for rotated text).
    pub x_tolerance: f64,
    /// Maximum gap along y between characters of one word (reading-axis gap for rotated text).
    pub y_tolerance: f64,
    /// If true, include blank/space characters in words instead of splitting on them.
    pub keep_blank_chars: bool,
    /// If true, keep input order instead of clustering characters into lines.
    pub use_text_flow: bool,
    /// Reading direction of upright characters (`Ltr` or `Rtl`).
    pub horizontal_direction: TextDirection,
    /// Reading direction of rotated characters (`Ttb` or `Btt`).
    pub vertical_direction: TextDirection,
    /// Character attributes that must match for characters to share a word
    /// (see [`Char::attr`]).
    pub extra_attrs: Vec<String>,
    /// Characters that always form a word of their own.
    pub split_at_punctuation: String,
    /// If true, expand Latin ligatures (U+FB00 to U+FB06) to their letters.
    pub expand_ligatures: bool,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
            keep_blank_chars: false,
            use_text_flow: false,
            horizontal_direction: TextDirection::Ltr,
            vertical_direction: TextDirection::Ttb,
            extra_attrs: Vec::new(),
            split_at_punctuation: String::new(),
            expand_ligatures: true,
        }
    }
}

/// A word extracted from a page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Word {
    /// The text content of this word.
    pub text: String,
    /// Bounding box encompassing all constituent characters.
    pub bbox: BBox,
    /// Minimum doctop of the constituent characters.
    pub doctop: f64,
    pub upright: bool,
    /// Reading direction the characters were ordered in.
    pub direction: TextDirection,
    /// Values of the requested extra attributes, in option order.
    pub extra: Vec<(String, String)>,
    /// The characters that make up this word.
    pub chars: Vec<Char>,
}

impl Word {
    /// `+1` when the word reads along its axis, `-1` when against it.
    pub fn direction_sign(&self) -> i8 {
        self.direction.sign()
    }
}

/// Extracts words from a sequence of characters based on spatial proximity.
pub struct WordExtractor;

impl WordExtractor {
    /// Extract words from `chars` using `options`.
    pub fn extract(chars: &[Char], options: &WordOptions) -> Vec<Word> {
        let mut words = Vec::new();
        for group in partition(chars, &options.extra_attrs) {
            let upright = group[0].upright;
            let direction = if upright {
                options.horizontal_direction
            } else {
                options.vertical_direction
            };

            if options.use_text_flow {
                words.extend(Self::split_line(&group, direction, options));
                continue;
            }

            let lines = if upright {
                cluster_objects(&group, |c| c.doctop, options.y_tolerance, false)
            } else {
                cluster_objects(&group, |c| c.bbox.x0, options.x_tolerance, false)
            };
            for mut line in lines {
                line.sort_by(|a, b| reading_key(a, direction).total_cmp(&reading_key(b, direction)));
                words.extend(Self::split_line(&line, direction, options));
            }
        }
        debug!(chars = chars.len(), words = words.len(), "extracted words");
        words
    }

    fn split_line(chars: &[Char], direction: TextDirection, options: &WordOptions) -> Vec<Word> {
        let mut words = Vec::new();
        let mut current: Vec<Char> = Vec::new();
        let mut extent: Option<BBox> = None;

        for ch in chars {
            if !options.keep_blank_chars && ch.is_blank() {
                flush(&mut current, &mut extent, &mut words, direction, options);
                continue;
            }
            if !ch.text.is_empty() && options.split_at_punctuation.contains(ch.text.as_str()) {
                flush(&mut current, &mut extent, &mut words, direction, options);
                words.push(make_word(std::slice::from_ref(ch), direction, options));
                continue;
            }
            if let Some(bbox) = extent {
                if begins_new_word(&bbox, ch, direction, options) {
                    flush(&mut current, &mut extent, &mut words, direction, options);
                }
            }
            extent = Some(extent.map_or(ch.bbox, |b| b.union(&ch.bbox)));
            current.push(ch.clone());
        }
        flush(&mut current, &mut extent, &mut words, direction, options);
        words
    }
}

/// Split chars into consecutive runs sharing orientation and extra attributes.
///
/// Runs follow input order, so a font change mid-line yields separate runs
/// in reading order rather than one group per distinct key.
fn partition(chars: &[Char], extra_attrs: &[String]) -> Vec<Vec<Char>> {
    let mut groups: Vec<Vec<Char>> = Vec::new();
    let mut last_key: Option<(bool, Vec<Option<String>>)> = None;
    for ch in chars {
        let key = (
            ch.upright,
            extra_attrs.iter().map(|a| ch.attr(a)).collect::<Vec<_>>(),
        );
        match groups.last_mut() {
            Some(group) if last_key.as_ref() == Some(&key) => group.push(ch.clone()),
            _ => {
                groups.push(vec![ch.clone()]);
                last_key = Some(key);
            }
        }
    }
    groups
}

fn reading_key(ch: &Char, direction: TextDirection) -> f64 {
    match direction {
        TextDirection::Ltr => ch.bbox.x0,
        TextDirection::Rtl => -ch.bbox.x1,
        TextDirection::Ttb => ch.bbox.top,
        TextDirection::Btt => -ch.bbox.bottom,
    }
}

/// Whether `ch` lies outside `word` along the reading axis (past the tolerance)
/// or outside the word's cross-axis extent widened by the tolerance.
fn begins_new_word(word: &BBox, ch: &Char, direction: TextDirection, options: &WordOptions) -> bool {
    let c = &ch.bbox;
    let (a, b, cur, along_tol) = match direction {
        TextDirection::Ltr => (word.x0, word.x1, c.x0, options.x_tolerance),
        TextDirection::Rtl => (-word.x1, -word.x0, -c.x1, options.x_tolerance),
        TextDirection::Ttb => (word.top, word.bottom, c.top, options.y_tolerance),
        TextDirection::Btt => (-word.bottom, -word.top, -c.bottom, options.y_tolerance),
    };
    let off_axis = if direction.is_horizontal() {
        c.top > word.bottom + options.y_tolerance || c.bottom < word.top - options.y_tolerance
    } else {
        c.x0 > word.x1 + options.x_tolerance || c.x1 < word.x0 - options.x_tolerance
    };
    cur < a || cur > b + along_tol || off_axis
}

fn flush(
    current: &mut Vec<Char>,
    extent: &mut Option<BBox>,
    words: &mut Vec<Word>,
    direction: TextDirection,
    options: &WordOptions,
) {
    if !current.is_empty() {
        words.push(make_word(current, direction, options));
        current.clear();
    }
    *extent = None;
}

fn make_word(chars: &[Char], direction: TextDirection, options: &WordOptions) -> Word {
    let raw: String = chars.iter().map(|c| c.text.as_str()).collect();
    let text = if options.expand_ligatures {
        expand_ligatures(&raw)
    } else {
        raw
    };
    let first = &chars[0];
    let bbox = chars
        .iter()
        .skip(1)
        .fold(first.bbox, |acc, c| acc.union(&c.bbox));
    let doctop = chars.iter().map(|c| c.doctop).fold(f64::INFINITY, f64::min);
    let extra = options
        .extra_attrs
        .iter()
        .map(|name| (name.clone(), first.attr(name).unwrap_or_default()))
        .collect();
    Word {
        text,
        bbox,
        doctop,
        upright: first.upright,
        direction,
        extra,
        chars: chars.to_vec(),
    }
}

/// Expand Latin ligatures (U+FB00 to U+FB06) to their multi-character equivalents.
pub fn expand_ligatures(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{FB00}' => result.push_str("ff"),
            '\u{FB01}' => result.push_str("fi"),
            '\u{FB02}' => result.push_str("fl"),
            '\u{FB03}' => result.push_str("ffi"),
            '\u{FB04}' => result.push_str("ffl"),
            '\u{FB05}' | '\u{FB06}' => result.push_str("st"),
            _ => result.push(ch),
        }
    }
    result
}

//! Table detection settings and their validation.
//!
//! [`TableSettings`] is the caller-facing option bag. Axis-specific tolerances
//! are optional and fall back to the unscoped value. [`TableSettings::resolve`]
//! validates everything up front and produces an immutable
//! [`ResolvedTableSettings`] consumed by the table finder.

use std::fmt;
use std::str::FromStr;

use crate::edges::Edge;
use crate::error::{PlumbError, Result};
use crate::geometry::{BBox, Point};
use crate::layout::TextOptions;
use crate::words::WordOptions;

/// Where the edges for one axis come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Strategy {
    /// Visible lines, rect borders and curve segments.
    #[default]
    Lines,
    /// Only edges that came from line objects.
    LinesStrict,
    /// Edges inferred from word alignment.
    Text,
    /// Only caller-supplied explicit lines.
    Explicit,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Lines => "lines",
            Strategy::LinesStrict => "lines_strict",
            Strategy::Text => "text",
            Strategy::Explicit => "explicit",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = PlumbError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lines" => Ok(Strategy::Lines),
            "lines_strict" => Ok(Strategy::LinesStrict),
            "text" => Ok(Strategy::Text),
            "explicit" => Ok(Strategy::Explicit),
            other => Err(PlumbError::config(format!(
                "unknown strategy '{other}'; expected one of lines, lines_strict, text, explicit"
            ))),
        }
    }
}

/// A caller-supplied line for one axis.
///
/// A bare coordinate spans the whole page; edge-like values contribute only
/// their edges of the matching orientation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum ExplicitLine {
    Coord(f64),
    Edge(Edge),
    Rect(BBox),
    Curve(Vec<Point>),
}

impl From<f64> for ExplicitLine {
    fn from(v: f64) -> Self {
        ExplicitLine::Coord(v)
    }
}

/// Configuration for table detection, matching pdfplumber's option names and defaults.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TableSettings {
    pub vertical_strategy: Strategy,
    pub horizontal_strategy: Strategy,
    pub explicit_vertical_lines: Vec<ExplicitLine>,
    pub explicit_horizontal_lines: Vec<ExplicitLine>,
    pub snap_tolerance: f64,
    pub snap_x_tolerance: Option<f64>,
    pub snap_y_tolerance: Option<f64>,
    pub join_tolerance: f64,
    pub join_x_tolerance: Option<f64>,
    pub join_y_tolerance: Option<f64>,
    /// Minimum length of a merged edge.
    pub edge_min_length: f64,
    /// Minimum length of a raw edge before merging.
    pub edge_min_length_prefilter: f64,
    /// Minimum number of words sharing a vertical alignment (text strategy).
    pub min_words_vertical: usize,
    /// Minimum number of words sharing a horizontal alignment (text strategy).
    pub min_words_horizontal: usize,
    pub intersection_tolerance: f64,
    pub intersection_x_tolerance: Option<f64>,
    pub intersection_y_tolerance: Option<f64>,
    pub text_tolerance: f64,
    pub text_x_tolerance: Option<f64>,
    pub text_y_tolerance: Option<f64>,
    pub text_keep_blank_chars: bool,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            vertical_strategy: Strategy::Lines,
            horizontal_strategy: Strategy::Lines,
            explicit_vertical_lines: Vec::new(),
            explicit_horizontal_lines: Vec::new(),
            snap_tolerance: 3.0,
            snap_x_tolerance: None,
            snap_y_tolerance: None,
            join_tolerance: 3.0,
            join_x_tolerance: None,
            join_y_tolerance: None,
            edge_min_length: 3.0,
            edge_min_length_prefilter: 1.0,
            min_words_vertical: 3,
            min_words_horizontal: 1,
            intersection_tolerance: 3.0,
            intersection_x_tolerance: None,
            intersection_y_tolerance: None,
            text_tolerance: 3.0,
            text_x_tolerance: None,
            text_y_tolerance: None,
            text_keep_blank_chars: false,
        }
    }
}

/// Validated settings with every axis-specific value filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTableSettings {
    pub vertical_strategy: Strategy,
    pub horizontal_strategy: Strategy,
    pub explicit_vertical_lines: Vec<ExplicitLine>,
    pub explicit_horizontal_lines: Vec<ExplicitLine>,
    pub snap_x_tolerance: f64,
    pub snap_y_tolerance: f64,
    pub join_x_tolerance: f64,
    pub join_y_tolerance: f64,
    pub edge_min_length: f64,
    pub edge_min_length_prefilter: f64,
    pub min_words_vertical: usize,
    pub min_words_horizontal: usize,
    pub intersection_x_tolerance: f64,
    pub intersection_y_tolerance: f64,
    /// Word extraction options used by the text strategy.
    pub text_options: WordOptions,
}

impl TableSettings {
    /// Settings using the same strategy on both axes.
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self {
            vertical_strategy: strategy,
            horizontal_strategy: strategy,
            ..Self::default()
        }
    }

    /// Set one option from its textual form, as given on a command line or in a config file.
    ///
    /// Explicit lines are comma-separated coordinates. Unknown keys and
    /// unparsable values fail with [`PlumbError::ConfigurationError`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "vertical_strategy" => self.vertical_strategy = value.parse()?,
            "horizontal_strategy" => self.horizontal_strategy = value.parse()?,
            "explicit_vertical_lines" => self.explicit_vertical_lines = parse_coords(key, value)?,
            "explicit_horizontal_lines" => {
                self.explicit_horizontal_lines = parse_coords(key, value)?
            }
            "snap_tolerance" => self.snap_tolerance = parse_num(key, value)?,
            "snap_x_tolerance" => self.snap_x_tolerance = Some(parse_num(key, value)?),
            "snap_y_tolerance" => self.snap_y_tolerance = Some(parse_num(key, value)?),
            "join_tolerance" => self.join_tolerance = parse_num(key, value)?,
            "join_x_tolerance" => self.join_x_tolerance = Some(parse_num(key, value)?),
            "join_y_tolerance" => self.join_y_tolerance = Some(parse_num(key, value)?),
            "edge_min_length" => self.edge_min_length = parse_num(key, value)?,
            "edge_min_length_prefilter" => self.edge_min_length_prefilter = parse_num(key, value)?,
            "min_words_vertical" => self.min_words_vertical = parse_num(key, value)?,
            "min_words_horizontal" => self.min_words_horizontal = parse_num(key, value)?,
            "intersection_tolerance" => self.intersection_tolerance = parse_num(key, value)?,
            "intersection_x_tolerance" => {
                self.intersection_x_tolerance = Some(parse_num(key, value)?)
            }
            "intersection_y_tolerance" => {
                self.intersection_y_tolerance = Some(parse_num(key, value)?)
            }
            "text_tolerance" => self.text_tolerance = parse_num(key, value)?,
            "text_x_tolerance" => self.text_x_tolerance = Some(parse_num(key, value)?),
            "text_y_tolerance" => self.text_y_tolerance = Some(parse_num(key, value)?),
            "text_keep_blank_chars" => self.text_keep_blank_chars = parse_num(key, value)?,
            other => {
                return Err(PlumbError::config(format!("unknown table setting '{other}'")));
            }
        }
        Ok(())
    }

    /// Validate the settings and fill in axis-specific fallbacks.
    pub fn resolve(&self) -> Result<ResolvedTableSettings> {
        let tolerances = [
            ("snap_tolerance", Some(self.snap_tolerance)),
            ("snap_x_tolerance", self.snap_x_tolerance),
            ("snap_y_tolerance", self.snap_y_tolerance),
            ("join_tolerance", Some(self.join_tolerance)),
            ("join_x_tolerance", self.join_x_tolerance),
            ("join_y_tolerance", self.join_y_tolerance),
            ("edge_min_length", Some(self.edge_min_length)),
            (
                "edge_min_length_prefilter",
                Some(self.edge_min_length_prefilter),
            ),
            ("intersection_tolerance", Some(self.intersection_tolerance)),
            ("intersection_x_tolerance", self.intersection_x_tolerance),
            ("intersection_y_tolerance", self.intersection_y_tolerance),
            ("text_tolerance", Some(self.text_tolerance)),
            ("text_x_tolerance", self.text_x_tolerance),
            ("text_y_tolerance", self.text_y_tolerance),
        ];
        for (name, value) in tolerances {
            if let Some(v) = value {
                check_tolerance(name, v)?;
            }
        }

        for (axis, strategy, lines) in [
            (
                "vertical",
                self.vertical_strategy,
                &self.explicit_vertical_lines,
            ),
            (
                "horizontal",
                self.horizontal_strategy,
                &self.explicit_horizontal_lines,
            ),
        ] {
            if strategy == Strategy::Explicit && lines.len() < 2 {
                return Err(PlumbError::config(format!(
                    "{axis}_strategy is 'explicit' but explicit_{axis}_lines has {} entries; at least 2 are required",
                    lines.len()
                )));
            }
            let bad = lines.iter().find_map(|line| match line {
                ExplicitLine::Coord(v) if !v.is_finite() => Some(*v),
                _ => None,
            });
            if let Some(v) = bad {
                return Err(PlumbError::config(format!(
                    "explicit_{axis}_lines contains non-finite coordinate {v}"
                )));
            }
        }

        let text_x = self.text_x_tolerance.unwrap_or(self.text_tolerance);
        let text_y = self.text_y_tolerance.unwrap_or(self.text_tolerance);

        Ok(ResolvedTableSettings {
            vertical_strategy: self.vertical_strategy,
            horizontal_strategy: self.horizontal_strategy,
            explicit_vertical_lines: self.explicit_vertical_lines.clone(),
            explicit_horizontal_lines: self.explicit_horizontal_lines.clone(),
            snap_x_tolerance: self.snap_x_tolerance.unwrap_or(self.snap_tolerance),
            snap_y_tolerance: self.snap_y_tolerance.unwrap_or(self.snap_tolerance),
            join_x_tolerance: self.join_x_tolerance.unwrap_or(self.join_tolerance),
            join_y_tolerance: self.join_y_tolerance.unwrap_or(self.join_tolerance),
            edge_min_length: self.edge_min_length,
            edge_min_length_prefilter: self.edge_min_length_prefilter,
            min_words_vertical: self.min_words_vertical,
            min_words_horizontal: self.min_words_horizontal,
            intersection_x_tolerance: self
                .intersection_x_tolerance
                .unwrap_or(self.intersection_tolerance),
            intersection_y_tolerance: self
                .intersection_y_tolerance
                .unwrap_or(self.intersection_tolerance),
            text_options: WordOptions {
                x_tolerance: text_x,
                y_tolerance: text_y,
                keep_blank_chars: self.text_keep_blank_chars,
                ..WordOptions::default()
            },
        })
    }
}

impl ResolvedTableSettings {
    /// Text options for reading cell contents, sharing the text tolerances.
    pub fn cell_text_options(&self) -> TextOptions {
        TextOptions {
            x_tolerance: self.text_options.x_tolerance,
            y_tolerance: self.text_options.y_tolerance,
            keep_blank_chars: self.text_options.keep_blank_chars,
            ..TextOptions::default()
        }
    }
}

fn check_tolerance(name: &str, value: f64) -> Result<()> {
    if value.is_nan() || value < 0.0 || value.is_infinite() {
        return Err(PlumbError::config(format!(
            "{name} must be a finite number >= 0, got {value}"
        )));
    }
    Ok(())
}

fn parse_num<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| PlumbError::config(format!("invalid value '{value}' for {key}")))
}

fn parse_coords(key: &str, value: &str) -> Result<Vec<ExplicitLine>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_num::<f64>(key, s).map(ExplicitLine::Coord))
        .collect()
}

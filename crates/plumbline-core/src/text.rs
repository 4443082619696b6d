use crate::geometry::{BBox, HasBBox, Point};
use crate::shapes::Color;

/// A single character from a page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Char {
    /// The text content of this character (a single grapheme).
    pub text: String,
    /// Bounding box in top-left origin coordinates.
    pub bbox: BBox,
    /// Font name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub fontname: String,
    /// Font size in points.
    #[cfg_attr(feature = "serde", serde(default))]
    pub size: f64,
    /// Distance from the top of the first page (accumulates across pages).
    pub doctop: f64,
    /// Whether the character is upright (not rotated).
    #[cfg_attr(feature = "serde", serde(default = "default_upright"))]
    pub upright: bool,
    /// Baseline origin of the glyph.
    #[cfg_attr(feature = "serde", serde(default))]
    pub origin: Point,
    /// Stroking (outline) color, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stroking_color: Option<Color>,
    /// Non-stroking (fill) color, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub non_stroking_color: Option<Color>,
}

#[cfg(feature = "serde")]
fn default_upright() -> bool {
    true
}

impl Char {
    /// Create an upright character on the first page with its baseline at `bbox.bottom`.
    pub fn new(text: impl Into<String>, bbox: BBox, fontname: impl Into<String>, size: f64) -> Self {
        Self {
            text: text.into(),
            bbox,
            fontname: fontname.into(),
            size,
            doctop: bbox.top,
            upright: true,
            origin: Point::new(bbox.x0, bbox.bottom),
            stroking_color: None,
            non_stroking_color: None,
        }
    }

    /// Whether the text is non-empty and consists only of whitespace.
    pub fn is_blank(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_whitespace)
    }

    /// Look up a named attribute for word grouping (`fontname`, `size`, `upright`,
    /// `stroking_color`, `non_stroking_color`). Unknown names yield `None`.
    pub fn attr(&self, name: &str) -> Option<String> {
        match name {
            "fontname" => Some(self.fontname.clone()),
            "size" => Some(format!("{}", self.size)),
            "upright" => Some(self.upright.to_string()),
            "stroking_color" => Some(format!("{:?}", self.stroking_color)),
            "non_stroking_color" => Some(format!("{:?}", self.non_stroking_color)),
            _ => None,
        }
    }
}

impl HasBBox for Char {
    fn bbox(&self) -> BBox {
        self.bbox
    }

    fn with_bbox(&self, bbox: BBox) -> Self {
        Self {
            doctop: self.doctop + (bbox.top - self.bbox.top),
            bbox,
            ..self.clone()
        }
    }
}

/// Text flow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TextDirection {
    /// Left-to-right (default for Latin).
    #[default]
    Ltr,
    /// Right-to-left (Arabic, Hebrew).
    Rtl,
    /// Top-to-bottom.
    Ttb,
    /// Bottom-to-top.
    Btt,
}

impl TextDirection {
    /// `+1` when reading order ascends along the axis, `-1` otherwise.
    pub fn sign(&self) -> i8 {
        match self {
            TextDirection::Ltr | TextDirection::Ttb => 1,
            TextDirection::Rtl | TextDirection::Btt => -1,
        }
    }

    /// Whether characters advance along the x axis.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, TextDirection::Ltr | TextDirection::Rtl)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
            TextDirection::Ttb => "ttb",
            TextDirection::Btt => "btt",
        }
    }
}

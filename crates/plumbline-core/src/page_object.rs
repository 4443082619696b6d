//! PageObject enum over the primitive kinds a page is made of.
//!
//! [`PageObject`] lets geometry code (cropping, filtering) treat characters,
//! lines, rectangles and curves uniformly through [`HasBBox`].

use crate::geometry::{BBox, HasBBox};
use crate::shapes::{Curve, Line, Rect};
use crate::text::Char;

/// A tagged union over the primitives supplied by the page parser.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "object_type", rename_all = "snake_case")
)]
pub enum PageObject {
    Char(Char),
    Line(Line),
    Rect(Rect),
    Curve(Curve),
}

impl PageObject {
    /// Lowercase kind name (`char`, `line`, `rect`, `curve`).
    pub fn kind(&self) -> &'static str {
        match self {
            PageObject::Char(_) => "char",
            PageObject::Line(_) => "line",
            PageObject::Rect(_) => "rect",
            PageObject::Curve(_) => "curve",
        }
    }

    pub fn as_char(&self) -> Option<&Char> {
        match self {
            PageObject::Char(c) => Some(c),
            _ => None,
        }
    }
}

impl HasBBox for PageObject {
    fn bbox(&self) -> BBox {
        match self {
            PageObject::Char(c) => c.bbox(),
            PageObject::Line(l) => l.bbox(),
            PageObject::Rect(r) => r.bbox(),
            PageObject::Curve(c) => c.bbox(),
        }
    }

    fn with_bbox(&self, bbox: BBox) -> Self {
        match self {
            PageObject::Char(c) => PageObject::Char(c.with_bbox(bbox)),
            PageObject::Line(l) => PageObject::Line(l.with_bbox(bbox)),
            PageObject::Rect(r) => PageObject::Rect(r.with_bbox(bbox)),
            PageObject::Curve(c) => PageObject::Curve(c.with_bbox(bbox)),
        }
    }
}

impl From<Char> for PageObject {
    fn from(c: Char) -> Self {
        PageObject::Char(c)
    }
}

impl From<Line> for PageObject {
    fn from(l: Line) -> Self {
        PageObject::Line(l)
    }
}

impl From<Rect> for PageObject {
    fn from(r: Rect) -> Self {
        PageObject::Rect(r)
    }
}

impl From<Curve> for PageObject {
    fn from(c: Curve) -> Self {
        PageObject::Curve(c)
    }
}

//! Geometry kernel: points, bounding boxes, orientation, and spatial filters.
//!
//! All coordinates use a top-left origin: `top`/`bottom` grow downward.

use std::fmt;
use std::str::FromStr;

use crate::error::{PlumbError, Result};

/// A 2D point in top-left origin coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box with top-left origin coordinate system.
///
/// Coordinates follow pdfplumber convention:
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Area of the bounding box.
    ///
    /// Fails with [`PlumbError::InvalidGeometry`] when the box is inverted.
    pub fn area(&self) -> Result<f64> {
        self.check_ordered()?;
        Ok(self.width() * self.height())
    }

    /// Horizontal and vertical midpoint.
    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Maximal shared sub-rectangle of two boxes.
    ///
    /// A zero-width (or zero-height) overlap still counts as long as the other
    /// dimension is positive, so a vertical rule touching a box is kept.
    pub fn overlap(&self, other: &BBox) -> Option<BBox> {
        let x0 = self.x0.max(other.x0);
        let top = self.top.max(other.top);
        let x1 = self.x1.min(other.x1);
        let bottom = self.bottom.min(other.bottom);

        let o_width = x1 - x0;
        let o_height = bottom - top;
        if o_width >= 0.0 && o_height >= 0.0 && (o_width + o_height) > 0.0 {
            Some(BBox::new(x0, top, x1, bottom))
        } else {
            None
        }
    }

    /// Whether `other` lies entirely inside this box (borders inclusive).
    pub fn contains(&self, other: &BBox) -> bool {
        other.x0 >= self.x0
            && other.top >= self.top
            && other.x1 <= self.x1
            && other.bottom <= self.bottom
    }

    /// Whether the point lies inside this box (borders inclusive).
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x0 && p.x <= self.x1 && p.y >= self.top && p.y <= self.bottom
    }

    /// Fails unless `x0 <= x1` and `top <= bottom`.
    pub fn check_ordered(&self) -> Result<()> {
        if self.x0 > self.x1 || self.top > self.bottom || self.has_nan() {
            return Err(PlumbError::geometry(format!(
                "bounding box ({}, {}, {}, {}) is inverted",
                self.x0, self.top, self.x1, self.bottom
            )));
        }
        Ok(())
    }

    /// Fails unless the box is ordered and has a strictly positive area.
    pub fn check_non_degenerate(&self) -> Result<()> {
        self.check_ordered()?;
        if self.width() <= 0.0 || self.height() <= 0.0 {
            return Err(PlumbError::geometry(format!(
                "bounding box ({}, {}, {}, {}) has zero area",
                self.x0, self.top, self.x1, self.bottom
            )));
        }
        Ok(())
    }

    fn has_nan(&self) -> bool {
        self.x0.is_nan() || self.top.is_nan() || self.x1.is_nan() || self.bottom.is_nan()
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}, {:.2}, {:.2})",
            self.x0, self.top, self.x1, self.bottom
        )
    }
}

/// Axis of an edge or of a move operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Single-letter form used by pdfplumber (`h` / `v`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Horizontal => "h",
            Orientation::Vertical => "v",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = PlumbError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "h" | "horizontal" => Ok(Orientation::Horizontal),
            "v" | "vertical" => Ok(Orientation::Vertical),
            other => Err(PlumbError::InvalidArgument(format!(
                "orientation must be 'h' or 'v', got '{other}'"
            ))),
        }
    }
}

/// Objects that occupy a bounding box on the page.
///
/// `with_bbox` returns a new value; implementors rewrite every position-derived
/// field (e.g. a char's `doctop`) so the copy stays self-consistent.
pub trait HasBBox {
    fn bbox(&self) -> BBox;

    fn with_bbox(&self, bbox: BBox) -> Self
    where
        Self: Sized;
}

impl HasBBox for BBox {
    fn bbox(&self) -> BBox {
        *self
    }

    fn with_bbox(&self, bbox: BBox) -> Self {
        bbox
    }
}

/// Union bounding box of a collection of objects, or `None` when empty.
pub fn objects_to_bbox<'a, T, I>(objects: I) -> Option<BBox>
where
    T: HasBBox + 'a,
    I: IntoIterator<Item = &'a T>,
{
    objects
        .into_iter()
        .map(HasBBox::bbox)
        .reduce(|a, b| a.union(&b))
}

/// Clip every object overlapping `bbox` to the shared region.
///
/// Objects without overlap are dropped. Fails when `bbox` is inverted or has
/// zero area.
pub fn crop_to_bbox<T: HasBBox>(objects: &[T], bbox: &BBox) -> Result<Vec<T>> {
    bbox.check_non_degenerate()?;
    Ok(objects
        .iter()
        .filter_map(|obj| obj.bbox().overlap(bbox).map(|o| obj.with_bbox(o)))
        .collect())
}

/// Keep only objects entirely inside `bbox`.
pub fn within_bbox<T: HasBBox + Clone>(objects: &[T], bbox: &BBox) -> Vec<T> {
    objects
        .iter()
        .filter(|obj| bbox.contains(&obj.bbox()))
        .cloned()
        .collect()
}

/// Keep only objects that do not overlap `bbox` at all.
pub fn outside_bbox<T: HasBBox + Clone>(objects: &[T], bbox: &BBox) -> Vec<T> {
    objects
        .iter()
        .filter(|obj| obj.bbox().overlap(bbox).is_none())
        .cloned()
        .collect()
}

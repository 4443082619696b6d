//! Painted primitives supplied by the page parser: lines, rects and curves.
//!
//! Coordinates use the top-left origin system.

use crate::geometry::{BBox, HasBBox, Point};

/// A paint color in its source color space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Color {
    Gray(f64),
    Rgb(f64, f64, f64),
    Cmyk(f64, f64, f64, f64),
    /// Components of a color space this crate does not interpret.
    Other(Vec<f64>),
}

/// A straight stroked segment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
    /// Stroke width.
    #[cfg_attr(feature = "serde", serde(default))]
    pub linewidth: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stroke_color: Option<Color>,
}

impl Line {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
            linewidth: 1.0,
            stroke_color: None,
        }
    }
}

/// An axis-aligned rectangle, stroked and/or filled.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub linewidth: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stroke: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fill: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stroke_color: Option<Color>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fill_color: Option<Color>,
}

impl Rect {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
            linewidth: 1.0,
            stroke: true,
            fill: false,
            stroke_color: None,
            fill_color: None,
        }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// A polyline or bezier path, flattened to its ordered points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Curve {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
    /// Ordered points in top-left origin coordinates.
    pub pts: Vec<Point>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub linewidth: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stroke: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fill: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stroke_color: Option<Color>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fill_color: Option<Color>,
}

impl Curve {
    /// Build a stroked curve whose bbox is the extent of `pts`.
    pub fn from_points(pts: Vec<Point>) -> Self {
        let (x0, top, x1, bottom) = pts.iter().fold(
            (
                f64::INFINITY,
                f64::INFINITY,
                f64::NEG_INFINITY,
                f64::NEG_INFINITY,
            ),
            |(x0, top, x1, bottom), p| (x0.min(p.x), top.min(p.y), x1.max(p.x), bottom.max(p.y)),
        );
        Self {
            x0,
            top,
            x1,
            bottom,
            pts,
            linewidth: 1.0,
            stroke: true,
            fill: false,
            stroke_color: None,
            fill_color: None,
        }
    }
}

macro_rules! impl_flat_bbox {
    ($($ty:ty),*) => {
        $(
            impl HasBBox for $ty {
                fn bbox(&self) -> BBox {
                    BBox::new(self.x0, self.top, self.x1, self.bottom)
                }

                fn with_bbox(&self, bbox: BBox) -> Self {
                    Self {
                        x0: bbox.x0,
                        top: bbox.top,
                        x1: bbox.x1,
                        bottom: bbox.bottom,
                        ..self.clone()
                    }
                }
            }
        )*
    };
}

impl_flat_bbox!(Line, Rect, Curve);

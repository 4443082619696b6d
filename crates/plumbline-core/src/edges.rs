//! Edge derivation from geometric primitives, and edge merging.
//!
//! Edges are line segments derived from Lines, Rects, and Curves for use in
//! table detection. Merging snaps near-aligned edges onto a shared coordinate,
//! then joins collinear runs into maximal edges.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use tracing::trace;

use crate::clustering::cluster_objects;
use crate::geometry::{BBox, HasBBox, Orientation};
use crate::shapes::{Curve, Line, Rect};

/// Source of an edge, tracking which primitive it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum EdgeSource {
    /// Derived directly from a Line object.
    Line,
    /// Top edge of a Rect.
    RectTop,
    /// Bottom edge of a Rect.
    RectBottom,
    /// Left edge of a Rect.
    RectLeft,
    /// Right edge of a Rect.
    RectRight,
    /// One segment of a Curve.
    Curve,
    /// Inferred from word alignment (text strategy).
    Text,
    /// Supplied by the caller as an explicit line.
    Explicit,
}

/// A line segment edge for table detection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// Left x coordinate.
    pub x0: f64,
    /// Top y coordinate (distance from top of page).
    pub top: f64,
    /// Right x coordinate.
    pub x1: f64,
    /// Bottom y coordinate (distance from top of page).
    pub bottom: f64,
    /// `None` for curve segments that are not axis-aligned; such edges never
    /// take part in intersections.
    pub orientation: Option<Orientation>,
    /// Where this edge was derived from.
    pub source: EdgeSource,
}

impl Edge {
    /// A horizontal edge at `y` spanning `x0..x1`.
    pub fn horizontal(x0: f64, y: f64, x1: f64, source: EdgeSource) -> Self {
        Self {
            x0,
            top: y,
            x1,
            bottom: y,
            orientation: Some(Orientation::Horizontal),
            source,
        }
    }

    /// A vertical edge at `x` spanning `top..bottom`.
    pub fn vertical(x: f64, top: f64, bottom: f64, source: EdgeSource) -> Self {
        Self {
            x0: x,
            top,
            x1: x,
            bottom,
            orientation: Some(Orientation::Vertical),
            source,
        }
    }

    /// Length along the edge's own axis.
    pub fn length(&self) -> f64 {
        match self.orientation {
            Some(Orientation::Horizontal) => self.x1 - self.x0,
            Some(Orientation::Vertical) => self.bottom - self.top,
            None => (self.x1 - self.x0).hypot(self.bottom - self.top),
        }
    }

    fn is(&self, orientation: Orientation) -> bool {
        self.orientation == Some(orientation)
    }
}

impl HasBBox for Edge {
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

/// Derive an Edge from a Line: horizontal iff `top == bottom`, vertical otherwise.
pub fn edge_from_line(line: &Line) -> Edge {
    let orientation = if line.top == line.bottom {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    };
    Edge {
        x0: line.x0,
        top: line.top,
        x1: line.x1,
        bottom: line.bottom,
        orientation: Some(orientation),
        source: EdgeSource::Line,
    }
}

/// Derive 4 Edges from a Rect (top, bottom, left, right).
pub fn edges_from_rect(rect: &Rect) -> Vec<Edge> {
    vec![
        Edge::horizontal(rect.x0, rect.top, rect.x1, EdgeSource::RectTop),
        Edge::horizontal(rect.x0, rect.bottom, rect.x1, EdgeSource::RectBottom),
        Edge::vertical(rect.x0, rect.top, rect.bottom, EdgeSource::RectLeft),
        Edge::vertical(rect.x1, rect.top, rect.bottom, EdgeSource::RectRight),
    ]
}

/// Derive one edge per consecutive point pair of a Curve.
///
/// Segments are classified only when exactly axis-aligned.
pub fn edges_from_curve(curve: &Curve) -> Vec<Edge> {
    curve
        .pts
        .windows(2)
        .map(|pair| {
            let (p0, p1) = (pair[0], pair[1]);
            let orientation = if p0.y == p1.y {
                Some(Orientation::Horizontal)
            } else if p0.x == p1.x {
                Some(Orientation::Vertical)
            } else {
                None
            };
            Edge {
                x0: p0.x.min(p1.x),
                top: p0.y.min(p1.y),
                x1: p0.x.max(p1.x),
                bottom: p0.y.max(p1.y),
                orientation,
                source: EdgeSource::Curve,
            }
        })
        .collect()
}

/// Derive all edges from collections of lines, rects, and curves.
pub fn derive_edges(lines: &[Line], rects: &[Rect], curves: &[Curve]) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(lines.len() + rects.len() * 4);
    edges.extend(lines.iter().map(edge_from_line));
    for rect in rects {
        edges.extend(edges_from_rect(rect));
    }
    for curve in curves {
        edges.extend(edges_from_curve(curve));
    }
    edges
}

/// Return a copy of `edge` shifted by `value` along `axis`.
pub fn move_edge(edge: &Edge, axis: Orientation, value: f64) -> Edge {
    match axis {
        Orientation::Horizontal => Edge {
            x0: edge.x0 + value,
            x1: edge.x1 + value,
            ..edge.clone()
        },
        Orientation::Vertical => Edge {
            top: edge.top + value,
            bottom: edge.bottom + value,
            ..edge.clone()
        },
    }
}

/// Keep edges matching `orientation` and `source` (when given) whose length is at least `min_length`.
pub fn filter_edges(
    edges: &[Edge],
    orientation: Option<Orientation>,
    source: Option<EdgeSource>,
    min_length: f64,
) -> Vec<Edge> {
    edges
        .iter()
        .filter(|e| orientation.is_none_or(|o| e.is(o)))
        .filter(|e| source.is_none_or(|s| e.source == s))
        .filter(|e| e.length() >= min_length)
        .cloned()
        .collect()
}

/// Snap nearby parallel edges onto their cluster's mean coordinate.
///
/// Vertical edges cluster by `x0` within `snap_x_tolerance`; horizontal edges by
/// `top` within `snap_y_tolerance`. Output holds the vertical edges first, then
/// the horizontal ones, then unclassified edges unchanged.
pub fn snap_edges(edges: Vec<Edge>, snap_x_tolerance: f64, snap_y_tolerance: f64) -> Vec<Edge> {
    let mut verticals = Vec::new();
    let mut horizontals = Vec::new();
    let mut others = Vec::new();
    for edge in edges {
        match edge.orientation {
            Some(Orientation::Vertical) => verticals.push(edge),
            Some(Orientation::Horizontal) => horizontals.push(edge),
            None => others.push(edge),
        }
    }

    let mut result = snap_group(&verticals, snap_x_tolerance, Orientation::Vertical);
    result.extend(snap_group(&horizontals, snap_y_tolerance, Orientation::Horizontal));
    result.extend(others);
    result
}

fn snap_group(edges: &[Edge], tolerance: f64, orientation: Orientation) -> Vec<Edge> {
    let (key, axis) = match orientation {
        Orientation::Vertical => (edge_x0 as fn(&Edge) -> f64, Orientation::Horizontal),
        Orientation::Horizontal => (edge_top as fn(&Edge) -> f64, Orientation::Vertical),
    };

    let mut snapped = Vec::with_capacity(edges.len());
    for cluster in cluster_objects(edges, key, tolerance, false) {
        let mean = cluster.iter().map(key).sum::<f64>() / cluster.len() as f64;
        snapped.extend(cluster.iter().map(|e| move_edge(e, axis, mean - key(e))));
    }
    snapped
}

fn edge_x0(e: &Edge) -> f64 {
    e.x0
}

fn edge_x1(e: &Edge) -> f64 {
    e.x1
}

fn edge_top(e: &Edge) -> f64 {
    e.top
}

fn edge_bottom(e: &Edge) -> f64 {
    e.bottom
}

/// Join collinear edges that share an exact coordinate.
///
/// Edges are sorted by their start along `orientation`; each edge either
/// extends the previous joined run (when it starts within `tolerance` of the
/// run's end) or starts a new run.
pub fn join_edge_group(edges: &[Edge], orientation: Orientation, tolerance: f64) -> Vec<Edge> {
    let (start, end) = match orientation {
        Orientation::Horizontal => (edge_x0 as fn(&Edge) -> f64, edge_x1 as fn(&Edge) -> f64),
        Orientation::Vertical => (edge_top as fn(&Edge) -> f64, edge_bottom as fn(&Edge) -> f64),
    };

    let mut sorted: Vec<&Edge> = edges.iter().collect();
    sorted.sort_by(|a, b| start(a).total_cmp(&start(b)));

    let mut joined: Vec<Edge> = Vec::with_capacity(sorted.len());
    for edge in sorted {
        match joined.last_mut() {
            Some(last) if start(edge) <= end(last) + tolerance => {
                if end(edge) > end(last) {
                    match orientation {
                        Orientation::Horizontal => last.x1 = edge.x1,
                        Orientation::Vertical => last.bottom = edge.bottom,
                    }
                }
            }
            _ => joined.push(edge.clone()),
        }
    }
    joined
}

/// Snap, then join, a set of edges.
///
/// Snapping is skipped when both snap tolerances are zero. Joining runs per
/// exact `(orientation, coordinate)` group, horizontal groups first, each in
/// ascending coordinate order. Unclassified edges are dropped.
pub fn merge_edges(
    edges: Vec<Edge>,
    snap_x_tolerance: f64,
    snap_y_tolerance: f64,
    join_x_tolerance: f64,
    join_y_tolerance: f64,
) -> Vec<Edge> {
    let input_len = edges.len();
    let edges = if snap_x_tolerance > 0.0 || snap_y_tolerance > 0.0 {
        snap_edges(edges, snap_x_tolerance, snap_y_tolerance)
    } else {
        edges
    };

    let mut groups: BTreeMap<(Orientation, OrderedFloat<f64>), Vec<Edge>> = BTreeMap::new();
    for edge in edges {
        let key = match edge.orientation {
            Some(Orientation::Horizontal) => (Orientation::Horizontal, OrderedFloat(edge.top)),
            Some(Orientation::Vertical) => (Orientation::Vertical, OrderedFloat(edge.x0)),
            None => continue,
        };
        groups.entry(key).or_default().push(edge);
    }

    let mut merged = Vec::new();
    for ((orientation, _), group) in groups {
        let tolerance = match orientation {
            Orientation::Horizontal => join_x_tolerance,
            Orientation::Vertical => join_y_tolerance,
        };
        merged.extend(join_edge_group(&group, orientation, tolerance));
    }
    trace!(input = input_len, merged = merged.len(), "merged edges");
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn make_h_edge(x0: f64, y: f64, x1: f64) -> Edge {
        Edge::horizontal(x0, y, x1, EdgeSource::Line)
    }

    fn make_v_edge(x: f64, top: f64, bottom: f64) -> Edge {
        Edge::vertical(x, top, bottom, EdgeSource::Line)
    }

    fn assert_approx(a: f64, b: f64) {
        assert!(
            (a - b).abs() < 1e-6,
            "expected {b}, got {a}, diff={}",
            (a - b).abs()
        );
    }

    #[test]
    fn test_edge_from_horizontal_line() {
        let edge = edge_from_line(&Line::new(10.0, 50.0, 200.0, 50.0));
        assert_eq!(edge.orientation, Some(Orientation::Horizontal));
        assert_eq!(edge.source, EdgeSource::Line);
        assert_eq!(edge.length(), 190.0);
    }

    #[test]
    fn test_edge_from_sloped_line_is_vertical() {
        let edge = edge_from_line(&Line::new(10.0, 50.0, 12.0, 80.0));
        assert_eq!(edge.orientation, Some(Orientation::Vertical));
    }

    #[test]
    fn test_edges_from_rect() {
        let edges = edges_from_rect(&Rect::new(10.0, 20.0, 110.0, 70.0));
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[0], make_h_edge(10.0, 20.0, 110.0).with_source(EdgeSource::RectTop));
        assert_eq!(edges[1].top, 70.0);
        assert_eq!(edges[2].x0, 10.0);
        assert_eq!(edges[3].x0, 110.0);
        assert_eq!(edges[3].source, EdgeSource::RectRight);
    }

    #[test]
    fn test_edges_from_curve_segments() {
        let curve = Curve::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(50.0, 30.0),
            Point::new(80.0, 60.0),
        ]);
        let edges = edges_from_curve(&curve);
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[0].orientation, Some(Orientation::Horizontal));
        assert_eq!(edges[1].orientation, Some(Orientation::Vertical));
        assert_eq!(edges[2].orientation, None);
        assert_eq!(edges[2].bbox(), BBox::new(50.0, 30.0, 80.0, 60.0));
    }

    #[test]
    fn test_derive_edges_counts() {
        let edges = derive_edges(
            &[Line::new(0.0, 0.0, 10.0, 0.0)],
            &[Rect::new(0.0, 0.0, 10.0, 10.0)],
            &[Curve::from_points(vec![Point::new(0.0, 0.0), Point::new(0.0, 5.0)])],
        );
        assert_eq!(edges.len(), 6);
    }

    #[test]
    fn test_move_edge() {
        let e = make_v_edge(10.0, 0.0, 50.0);
        let moved = move_edge(&e, Orientation::Horizontal, 2.5);
        assert_eq!(moved.x0, 12.5);
        assert_eq!(moved.x1, 12.5);
        assert_eq!(moved.top, 0.0);
        let moved = move_edge(&e, Orientation::Vertical, -5.0);
        assert_eq!(moved.top, -5.0);
        assert_eq!(moved.bottom, 45.0);
    }

    #[test]
    fn test_filter_edges() {
        let edges = vec![
            make_h_edge(0.0, 0.0, 100.0),
            make_h_edge(0.0, 10.0, 2.0),
            make_v_edge(0.0, 0.0, 50.0),
            make_v_edge(5.0, 0.0, 50.0).with_source(EdgeSource::RectLeft),
        ];
        assert_eq!(filter_edges(&edges, None, None, 3.0).len(), 3);
        assert_eq!(
            filter_edges(&edges, Some(Orientation::Vertical), None, 0.0).len(),
            2
        );
        assert_eq!(
            filter_edges(&edges, Some(Orientation::Vertical), Some(EdgeSource::Line), 0.0).len(),
            1
        );
    }

    #[test]
    fn test_snap_edges_to_mean() {
        let edges = vec![
            make_v_edge(10.0, 0.0, 50.0),
            make_v_edge(12.0, 0.0, 50.0),
            make_v_edge(100.0, 0.0, 50.0),
            make_h_edge(0.0, 20.0, 100.0),
            make_h_edge(0.0, 21.0, 100.0),
        ];
        let snapped = snap_edges(edges, 3.0, 3.0);
        assert_eq!(snapped.len(), 5);
        assert_approx(snapped[0].x0, 11.0);
        assert_approx(snapped[0].x1, 11.0);
        assert_approx(snapped[1].x0, 11.0);
        assert_approx(snapped[2].x0, 100.0);
        assert_approx(snapped[3].top, 20.5);
        assert_approx(snapped[4].bottom, 20.5);
    }

    #[test]
    fn test_snap_edges_chains_within_tolerance() {
        let edges = vec![
            make_h_edge(0.0, 0.0, 10.0),
            make_h_edge(0.0, 2.0, 10.0),
            make_h_edge(0.0, 4.0, 10.0),
        ];
        let snapped = snap_edges(edges, 3.0, 3.0);
        for e in &snapped {
            assert_approx(e.top, 2.0);
        }
    }

    #[test]
    fn test_join_edge_group_horizontal() {
        let edges = vec![
            make_h_edge(20.0, 5.0, 30.0),
            make_h_edge(0.0, 5.0, 10.0),
            make_h_edge(12.0, 5.0, 18.0),
            make_h_edge(50.0, 5.0, 60.0),
        ];
        let joined = join_edge_group(&edges, Orientation::Horizontal, 3.0);
        assert_eq!(joined.len(), 2);
        assert_eq!((joined[0].x0, joined[0].x1), (0.0, 30.0));
        assert_eq!((joined[1].x0, joined[1].x1), (50.0, 60.0));
    }

    #[test]
    fn test_join_edge_group_contained_edge() {
        let edges = vec![make_v_edge(5.0, 0.0, 100.0), make_v_edge(5.0, 10.0, 20.0)];
        let joined = join_edge_group(&edges, Orientation::Vertical, 0.0);
        assert_eq!(joined.len(), 1);
        assert_eq!((joined[0].top, joined[0].bottom), (0.0, 100.0));
    }

    #[test]
    fn test_merge_edges_snaps_then_joins() {
        let edges = vec![
            make_h_edge(0.0, 10.0, 50.0),
            make_h_edge(51.0, 11.0, 100.0),
            make_v_edge(0.0, 0.0, 40.0),
        ];
        let merged = merge_edges(edges, 3.0, 3.0, 3.0, 3.0);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].orientation, Some(Orientation::Horizontal));
        assert_approx(merged[0].top, 10.5);
        assert_eq!((merged[0].x0, merged[0].x1), (0.0, 100.0));
        assert_eq!(merged[1].orientation, Some(Orientation::Vertical));
    }

    #[test]
    fn test_merge_edges_is_idempotent() {
        let edges = vec![
            make_h_edge(0.0, 10.0, 50.0),
            make_h_edge(52.0, 11.5, 100.0),
            make_h_edge(0.0, 60.0, 100.0),
            make_v_edge(0.0, 10.0, 30.0),
            make_v_edge(1.0, 31.0, 60.0),
            make_v_edge(100.0, 10.0, 60.0),
        ];
        let once = merge_edges(edges, 3.0, 3.0, 3.0, 3.0);
        let twice = merge_edges(once.clone(), 3.0, 3.0, 3.0, 3.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_edges_drops_unclassified() {
        let mut diagonal = make_h_edge(0.0, 0.0, 10.0);
        diagonal.orientation = None;
        let merged = merge_edges(vec![diagonal], 3.0, 3.0, 3.0, 3.0);
        assert!(merged.is_empty());
    }

    impl Edge {
        fn with_source(mut self, source: EdgeSource) -> Self {
            self.source = source;
            self
        }
    }
}

//! Table detection pipeline.
//!
//! Edges are gathered per axis according to the configured strategy, merged,
//! intersected into vertices, turned into minimal cells, and finally grouped
//! into tables by shared corners.

use std::collections::{BTreeMap, HashMap};

use ordered_float::OrderedFloat;
use tracing::{debug, debug_span, trace};

use crate::clustering::cluster_objects;
use crate::edges::{
    Edge, EdgeSource, edges_from_curve, edges_from_rect, filter_edges, merge_edges,
};
use crate::error::Result;
use crate::geometry::{BBox, Orientation, objects_to_bbox};
use crate::layout::{TextOptions, extract_text};
use crate::settings::{ExplicitLine, ResolvedTableSettings, Strategy, TableSettings};
use crate::shapes::{Curve, Rect};
use crate::text::Char;
use crate::words::{Word, WordExtractor};

/// The edges meeting at one vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Intersection {
    pub v: Vec<Edge>,
    pub h: Vec<Edge>,
}

/// Vertices keyed by `(x, top)`, iterated in ascending `(x, y)` order.
pub type IntersectionMap = BTreeMap<(OrderedFloat<f64>, OrderedFloat<f64>), Intersection>;

/// Find every vertex where a vertical edge meets a horizontal one.
///
/// The vertex sits at the vertical's x and the horizontal's y. Edges without
/// an orientation are ignored.
pub fn edges_to_intersections(edges: &[Edge], x_tolerance: f64, y_tolerance: f64) -> IntersectionMap {
    let mut verticals = filter_edges(edges, Some(Orientation::Vertical), None, f64::NEG_INFINITY);
    let mut horizontals =
        filter_edges(edges, Some(Orientation::Horizontal), None, f64::NEG_INFINITY);
    verticals.sort_by(|a, b| a.x0.total_cmp(&b.x0).then(a.top.total_cmp(&b.top)));
    horizontals.sort_by(|a, b| a.top.total_cmp(&b.top).then(a.x0.total_cmp(&b.x0)));

    let mut map = IntersectionMap::new();
    for v in &verticals {
        for h in &horizontals {
            if v.top <= h.top + y_tolerance
                && v.bottom >= h.top - y_tolerance
                && v.x0 >= h.x0 - x_tolerance
                && v.x0 <= h.x1 + x_tolerance
            {
                let vertex = map.entry((OrderedFloat(v.x0), OrderedFloat(h.top))).or_default();
                vertex.v.push(v.clone());
                vertex.h.push(h.clone());
            }
        }
    }
    map
}

type EdgeKey = [u64; 4];

fn edge_key(e: &Edge) -> EdgeKey {
    [e.x0.to_bits(), e.top.to_bits(), e.x1.to_bits(), e.bottom.to_bits()]
}

type Vertex = (OrderedFloat<f64>, OrderedFloat<f64>);

/// Whether two vertices on a common axis share an identical edge.
fn connects(map: &IntersectionMap, a: Vertex, b: Vertex) -> bool {
    let (Some(ia), Some(ib)) = (map.get(&a), map.get(&b)) else {
        return false;
    };
    let (ea, eb) = if a.0 == b.0 {
        (&ia.v, &ib.v)
    } else if a.1 == b.1 {
        (&ia.h, &ib.h)
    } else {
        return false;
    };
    ea.iter().any(|x| eb.iter().any(|y| edge_key(x) == edge_key(y)))
}

/// Build the smallest cell anchored at each vertex.
///
/// For a top-left vertex, candidates below (same x) are tried in ascending y
/// and, for each, candidates to the right (same y) in ascending x. The first
/// pair whose bottom-right corner is a vertex connected to both wins.
pub fn intersections_to_cells(map: &IntersectionMap) -> Vec<BBox> {
    let points: Vec<Vertex> = map.keys().copied().collect();
    let mut cells = Vec::new();

    for (i, &pt) in points.iter().enumerate() {
        let rest = &points[i + 1..];
        let below: Vec<Vertex> = rest.iter().copied().filter(|p| p.0 == pt.0).collect();
        let right: Vec<Vertex> = rest.iter().copied().filter(|p| p.1 == pt.1).collect();

        'search: for &b in &below {
            if !connects(map, pt, b) {
                continue;
            }
            for &r in &right {
                if !connects(map, pt, r) {
                    continue;
                }
                let corner = (r.0, b.1);
                if map.contains_key(&corner) && connects(map, corner, r) && connects(map, corner, b) {
                    cells.push(BBox::new(pt.0.0, pt.1.0, corner.0.0, corner.1.0));
                    break 'search;
                }
            }
        }
    }
    cells
}

/// Group cells sharing at least one corner into tables.
///
/// Groups are ordered by their topmost, then leftmost, cell corner; cells in
/// a group keep their input order. Single-cell groups are dropped.
pub fn cells_to_tables(cells: &[BBox]) -> Vec<Vec<BBox>> {
    let mut parent: Vec<usize> = (0..cells.len()).collect();
    let mut corner_owner: HashMap<(OrderedFloat<f64>, OrderedFloat<f64>), usize> = HashMap::new();

    for (idx, cell) in cells.iter().enumerate() {
        for corner in [
            (cell.x0, cell.top),
            (cell.x0, cell.bottom),
            (cell.x1, cell.top),
            (cell.x1, cell.bottom),
        ] {
            let key = (OrderedFloat(corner.0), OrderedFloat(corner.1));
            match corner_owner.get(&key) {
                Some(&other) => union(&mut parent, idx, other),
                None => {
                    corner_owner.insert(key, idx);
                }
            }
        }
    }

    let mut groups: BTreeMap<usize, Vec<BBox>> = BTreeMap::new();
    for (idx, cell) in cells.iter().enumerate() {
        let root = find(&mut parent, idx);
        groups.entry(root).or_default().push(*cell);
    }

    let mut tables: Vec<Vec<BBox>> = groups.into_values().filter(|g| g.len() > 1).collect();
    tables.sort_by(|a, b| top_left(a).cmp(&top_left(b)));
    tables
}

fn top_left(cells: &[BBox]) -> (OrderedFloat<f64>, OrderedFloat<f64>) {
    cells
        .iter()
        .map(|c| (OrderedFloat(c.top), OrderedFloat(c.x0)))
        .min()
        .unwrap_or_default()
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let (ra, rb) = (find(parent, a), find(parent, b));
    if ra != rb {
        parent[ra.max(rb)] = ra.min(rb);
    }
}

/// A row or column of a table, aligned against the table's grid. Gaps are `None`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellGroup {
    pub cells: Vec<Option<BBox>>,
}

impl CellGroup {
    /// Union of the group's cells, or `None` if it holds only gaps.
    pub fn bbox(&self) -> Option<BBox> {
        objects_to_bbox(self.cells.iter().flatten())
    }
}

/// Cell text of one table, row by row. `None` marks a gap in the grid.
pub type TableText = Vec<Vec<Option<String>>>;

/// A detected table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    pub cells: Vec<BBox>,
}

impl Table {
    pub fn new(cells: Vec<BBox>) -> Self {
        Self { cells }
    }

    /// Union of all cells.
    pub fn bbox(&self) -> Option<BBox> {
        objects_to_bbox(&self.cells)
    }

    /// Rows top to bottom, each aligned against the table's distinct `x0` values.
    pub fn rows(&self) -> Vec<CellGroup> {
        self.groups(Orientation::Horizontal)
    }

    /// Columns left to right, each aligned against the table's distinct `top` values.
    pub fn columns(&self) -> Vec<CellGroup> {
        self.groups(Orientation::Vertical)
    }

    fn groups(&self, along: Orientation) -> Vec<CellGroup> {
        // `axis` indexes a cell within a group, `anti` picks the group.
        let (axis, anti) = match along {
            Orientation::Horizontal => (cell_x0 as fn(&BBox) -> f64, cell_top as fn(&BBox) -> f64),
            Orientation::Vertical => (cell_top as fn(&BBox) -> f64, cell_x0 as fn(&BBox) -> f64),
        };

        let mut sorted = self.cells.clone();
        sorted.sort_by(|a, b| anti(a).total_cmp(&anti(b)).then(axis(a).total_cmp(&axis(b))));

        let mut grid: Vec<f64> = self.cells.iter().map(axis).collect();
        grid.sort_by(f64::total_cmp);
        grid.dedup();

        let mut groups = Vec::new();
        let mut start = 0;
        while start < sorted.len() {
            let key = anti(&sorted[start]);
            let end = sorted[start..]
                .iter()
                .position(|c| anti(c) != key)
                .map_or(sorted.len(), |n| start + n);
            let members = &sorted[start..end];
            let cells = grid
                .iter()
                .map(|&x| members.iter().rev().find(|c| axis(c) == x).copied())
                .collect();
            groups.push(CellGroup { cells });
            start = end;
        }
        groups
    }

    /// Text of every cell, row by row.
    ///
    /// A character belongs to a cell when its midpoint lies inside the cell,
    /// with the right and bottom bounds exclusive. Gaps give `None`; cells
    /// without characters give an empty string.
    pub fn extract(&self, chars: &[Char], options: &TextOptions) -> TableText {
        let mut out = Vec::new();
        for row in self.rows() {
            let row_chars: Vec<Char> = match row.bbox() {
                Some(bbox) => chars.iter().filter(|c| midpoint_in(c, &bbox)).cloned().collect(),
                None => Vec::new(),
            };
            let texts = row
                .cells
                .iter()
                .map(|cell| {
                    cell.map(|cell| {
                        let cell_chars: Vec<Char> = row_chars
                            .iter()
                            .filter(|c| midpoint_in(c, &cell))
                            .cloned()
                            .collect();
                        if cell_chars.is_empty() {
                            return String::new();
                        }
                        let options = TextOptions {
                            x_shift: cell.x0,
                            y_shift: cell.top,
                            ..options.clone()
                        };
                        extract_text(&cell_chars, &options).trim().to_string()
                    })
                })
                .collect();
            out.push(texts);
        }
        out
    }
}

fn cell_x0(c: &BBox) -> f64 {
    c.x0
}

fn cell_top(c: &BBox) -> f64 {
    c.top
}

fn midpoint_in(ch: &Char, bbox: &BBox) -> bool {
    let h_mid = (ch.bbox.x0 + ch.bbox.x1) / 2.0;
    let v_mid = (ch.bbox.top + ch.bbox.bottom) / 2.0;
    h_mid >= bbox.x0 && h_mid < bbox.x1 && v_mid >= bbox.top && v_mid < bbox.bottom
}

/// Pick the table with the most cells, then the topmost, then the leftmost.
pub fn best_table(tables: &[Table]) -> Option<&Table> {
    tables.iter().min_by(|a, b| {
        let (ba, bb) = (a.bbox().unwrap_or_default(), b.bbox().unwrap_or_default());
        b.cells
            .len()
            .cmp(&a.cells.len())
            .then(ba.top.total_cmp(&bb.top))
            .then(ba.x0.total_cmp(&bb.x0))
    })
}

/// Horizontal edges along the top and bottom of every row of at least `threshold` words.
///
/// Rows are words clustered by `top` within 1pt. Every edge spans the
/// combined width of all qualifying rows.
pub fn words_to_edges_h(words: &[Word], threshold: usize) -> Vec<Edge> {
    let refs: Vec<&Word> = words.iter().collect();
    let rows: Vec<BBox> = cluster_objects(&refs, |w| w.bbox.top, 1.0, false)
        .into_iter()
        .filter(|row| row.len() >= threshold)
        .filter_map(|row| row.iter().map(|w| w.bbox).reduce(|a, b| a.union(&b)))
        .collect();
    let Some(span) = rows.iter().copied().reduce(|a, b| a.union(&b)) else {
        return Vec::new();
    };

    rows.iter()
        .flat_map(|r| {
            [
                Edge::horizontal(span.x0, r.top, span.x1, EdgeSource::Text),
                Edge::horizontal(span.x0, r.bottom, span.x1, EdgeSource::Text),
            ]
        })
        .collect()
}

/// Vertical edges at the left of every column of at least `threshold` aligned words,
/// plus one closing edge at the right of the rightmost column.
///
/// Columns are words sharing a left edge, right edge or center within 1pt.
/// Larger alignments win; an alignment overlapping one already kept is dropped.
pub fn words_to_edges_v(words: &[Word], threshold: usize) -> Vec<Edge> {
    let refs: Vec<&Word> = words.iter().collect();
    let mut clusters = cluster_objects(&refs, |w| w.bbox.x0, 1.0, false);
    clusters.extend(cluster_objects(&refs, |w| w.bbox.x1, 1.0, false));
    clusters.extend(cluster_objects(&refs, |w| (w.bbox.x0 + w.bbox.x1) / 2.0, 1.0, false));
    clusters.sort_by_key(|c| std::cmp::Reverse(c.len()));

    let mut columns: Vec<BBox> = Vec::new();
    for cluster in clusters.iter().filter(|c| c.len() >= threshold) {
        let Some(bbox) = cluster.iter().map(|w| w.bbox).reduce(|a, b| a.union(&b)) else {
            continue;
        };
        if columns.iter().all(|c| c.overlap(&bbox).is_none()) {
            columns.push(bbox);
        }
    }
    let Some(span) = columns.iter().copied().reduce(|a, b| a.union(&b)) else {
        return Vec::new();
    };
    columns.sort_by(|a, b| a.x0.total_cmp(&b.x0));

    let mut edges: Vec<Edge> = columns
        .iter()
        .map(|c| Edge::vertical(c.x0, span.top, span.bottom, EdgeSource::Text))
        .collect();
    edges.push(Edge::vertical(span.x1, span.top, span.bottom, EdgeSource::Text));
    edges
}

/// Turn explicit lines into edges of `orientation`.
///
/// Coordinates span `page_bbox`; edge-like values keep only their edges of
/// the matching orientation.
pub fn explicit_lines_to_edges(lines: &[ExplicitLine], orientation: Orientation, page_bbox: &BBox) -> Vec<Edge> {
    let mut edges = Vec::new();
    for line in lines {
        match line {
            ExplicitLine::Coord(v) => edges.push(match orientation {
                Orientation::Vertical => {
                    Edge::vertical(*v, page_bbox.top, page_bbox.bottom, EdgeSource::Explicit)
                }
                Orientation::Horizontal => {
                    Edge::horizontal(page_bbox.x0, *v, page_bbox.x1, EdgeSource::Explicit)
                }
            }),
            ExplicitLine::Edge(e) => edges.push(e.clone()),
            ExplicitLine::Rect(b) => {
                edges.extend(edges_from_rect(&Rect::new(b.x0, b.top, b.x1, b.bottom)))
            }
            ExplicitLine::Curve(pts) => {
                edges.extend(edges_from_curve(&Curve::from_points(pts.clone())))
            }
        }
    }
    edges
        .into_iter()
        .filter(|e| e.orientation == Some(orientation))
        .map(|e| Edge {
            source: EdgeSource::Explicit,
            ..e
        })
        .collect()
}

/// Runs table detection over one page's characters and edges.
///
/// Construction validates the settings and gathers the merged edge set; the
/// rest of the pipeline runs on demand.
#[derive(Debug, Clone)]
pub struct TableFinder {
    settings: ResolvedTableSettings,
    edges: Vec<Edge>,
}

impl TableFinder {
    /// `edges` are the page's derived edges (see [`crate::edges::derive_edges`]);
    /// `chars` feed the text strategy.
    pub fn new(chars: &[Char], edges: &[Edge], page_bbox: BBox, settings: &TableSettings) -> Result<Self> {
        let settings = settings.resolve()?;
        let words = if settings.vertical_strategy == Strategy::Text
            || settings.horizontal_strategy == Strategy::Text
        {
            WordExtractor::extract(chars, &settings.text_options)
        } else {
            Vec::new()
        };

        let mut gathered = Self::axis_edges(
            &settings,
            Orientation::Vertical,
            edges,
            &words,
            &page_bbox,
        );
        gathered.extend(Self::axis_edges(
            &settings,
            Orientation::Horizontal,
            edges,
            &words,
            &page_bbox,
        ));
        let raw = gathered.len();

        let merged = merge_edges(
            gathered,
            settings.snap_x_tolerance,
            settings.snap_y_tolerance,
            settings.join_x_tolerance,
            settings.join_y_tolerance,
        );
        let edges = filter_edges(&merged, None, None, settings.edge_min_length);
        debug!(raw, merged = merged.len(), kept = edges.len(), "gathered table edges");

        Ok(Self { settings, edges })
    }

    fn axis_edges(
        settings: &ResolvedTableSettings,
        orientation: Orientation,
        page_edges: &[Edge],
        words: &[Word],
        page_bbox: &BBox,
    ) -> Vec<Edge> {
        let (strategy, explicit, min_words) = match orientation {
            Orientation::Vertical => (
                settings.vertical_strategy,
                &settings.explicit_vertical_lines,
                settings.min_words_vertical,
            ),
            Orientation::Horizontal => (
                settings.horizontal_strategy,
                &settings.explicit_horizontal_lines,
                settings.min_words_horizontal,
            ),
        };
        let prefilter = settings.edge_min_length_prefilter;

        let mut base = match strategy {
            Strategy::Lines => filter_edges(page_edges, Some(orientation), None, prefilter),
            Strategy::LinesStrict => {
                filter_edges(page_edges, Some(orientation), Some(EdgeSource::Line), prefilter)
            }
            Strategy::Text => match orientation {
                Orientation::Vertical => words_to_edges_v(words, min_words),
                Orientation::Horizontal => words_to_edges_h(words, min_words),
            },
            Strategy::Explicit => Vec::new(),
        };
        trace!(%orientation, %strategy, edges = base.len(), "strategy edges");
        base.extend(explicit_lines_to_edges(explicit, orientation, page_bbox));
        base
    }

    pub fn settings(&self) -> &ResolvedTableSettings {
        &self.settings
    }

    /// Merged edges the pipeline works from.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn intersections(&self) -> IntersectionMap {
        edges_to_intersections(
            &self.edges,
            self.settings.intersection_x_tolerance,
            self.settings.intersection_y_tolerance,
        )
    }

    pub fn cells(&self) -> Vec<BBox> {
        intersections_to_cells(&self.intersections())
    }

    /// Run the pipeline: intersections, cells, then tables.
    pub fn find_tables(&self) -> Vec<Table> {
        let span = debug_span!("find_tables", edges = self.edges.len());
        let _enter = span.enter();

        let intersections = self.intersections();
        let cells = intersections_to_cells(&intersections);
        let tables: Vec<Table> = cells_to_tables(&cells).into_iter().map(Table::new).collect();
        debug!(
            intersections = intersections.len(),
            cells = cells.len(),
            tables = tables.len(),
            "found tables"
        );
        tables
    }

    /// The largest table, if any. See [`best_table`].
    pub fn find_table(&self) -> Option<Table> {
        best_table(&self.find_tables()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::derive_edges;
    use crate::geometry::Point;
    use crate::shapes::Line;

    const PAGE: BBox = BBox {
        x0: 0.0,
        top: 0.0,
        x1: 612.0,
        bottom: 792.0,
    };

    fn make_h_edge(x0: f64, y: f64, x1: f64) -> Edge {
        Edge::horizontal(x0, y, x1, EdgeSource::Line)
    }

    fn make_v_edge(x: f64, top: f64, bottom: f64) -> Edge {
        Edge::vertical(x, top, bottom, EdgeSource::Line)
    }

    fn make_char(text: &str, x0: f64, top: f64, x1: f64, bottom: f64) -> Char {
        Char::new(text, BBox::new(x0, top, x1, bottom), "TestFont", 12.0)
    }

    fn make_word_chars(text: &str, x0: f64, top: f64) -> Vec<Char> {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                let x = x0 + i as f64 * 5.0;
                make_char(&c.to_string(), x, top, x + 5.0, top + 10.0)
            })
            .collect()
    }

    /// Ruling lines for a `rows` by `cols` grid of `size`-point cells at (x, y).
    fn grid_lines(x: f64, y: f64, rows: usize, cols: usize, size: f64) -> Vec<Line> {
        let (w, h) = (cols as f64 * size, rows as f64 * size);
        let mut lines = Vec::new();
        for r in 0..=rows {
            let ry = y + r as f64 * size;
            lines.push(Line::new(x, ry, x + w, ry));
        }
        for c in 0..=cols {
            let cx = x + c as f64 * size;
            lines.push(Line::new(cx, y, cx, y + h));
        }
        lines
    }

    fn find(edges: &[Edge], settings: &TableSettings) -> Vec<Table> {
        TableFinder::new(&[], edges, PAGE, settings).unwrap().find_tables()
    }

    #[test]
    fn test_intersections_with_tolerance() {
        let edges = vec![make_h_edge(10.0, 50.0, 100.0), make_v_edge(8.0, 52.0, 200.0)];
        let map = edges_to_intersections(&edges, 3.0, 3.0);
        assert_eq!(map.len(), 1);
        let (&(x, y), vertex) = map.iter().next().unwrap();
        assert_eq!((x.0, y.0), (8.0, 50.0));
        assert_eq!(vertex.v.len(), 1);
        assert_eq!(vertex.h.len(), 1);

        assert!(edges_to_intersections(&edges, 1.0, 3.0).is_empty());
        assert!(edges_to_intersections(&edges, 3.0, 1.0).is_empty());
    }

    #[test]
    fn test_unit_square_is_one_cell_and_no_table() {
        let edges = vec![
            make_h_edge(0.0, 0.0, 10.0),
            make_h_edge(0.0, 10.0, 10.0),
            make_v_edge(0.0, 0.0, 10.0),
            make_v_edge(10.0, 0.0, 10.0),
        ];
        let map = edges_to_intersections(&edges, 3.0, 3.0);
        assert_eq!(map.len(), 4);
        let cells = intersections_to_cells(&map);
        assert_eq!(cells, vec![BBox::new(0.0, 0.0, 10.0, 10.0)]);
        assert!(cells_to_tables(&cells).is_empty());
    }

    #[test]
    fn test_collinear_but_distinct_edges_do_not_connect() {
        // Left side is two separate segments that meet only at y=5.
        let edges = vec![
            make_h_edge(0.0, 0.0, 10.0),
            make_h_edge(0.0, 10.0, 10.0),
            make_v_edge(0.0, 0.0, 4.0),
            make_v_edge(0.0, 6.0, 10.0),
            make_v_edge(10.0, 0.0, 10.0),
        ];
        let map = edges_to_intersections(&edges, 0.5, 0.5);
        assert!(intersections_to_cells(&map).is_empty());
    }

    #[test]
    fn test_grid_yields_all_cells_in_one_table() {
        let (rows, cols) = (4, 3);
        let edges = derive_edges(&grid_lines(50.0, 100.0, rows, cols, 20.0), &[], &[]);
        let tables = find(&edges, &TableSettings::default());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].cells.len(), rows * cols);
        assert_eq!(tables[0].bbox(), Some(BBox::new(50.0, 100.0, 110.0, 180.0)));
        let table_rows = tables[0].rows();
        assert_eq!(table_rows.len(), rows);
        assert!(table_rows.iter().all(|r| r.cells.len() == cols && r.cells.iter().all(Option::is_some)));
        assert_eq!(tables[0].columns().len(), cols);
    }

    #[test]
    fn test_short_divider_yields_spanning_cell() {
        // Inner divider at x=10 only reaches y=5, so the top row spans both columns.
        let edges = vec![
            make_h_edge(0.0, 0.0, 20.0),
            make_h_edge(0.0, 10.0, 20.0),
            make_h_edge(0.0, 20.0, 20.0),
            make_v_edge(0.0, 0.0, 20.0),
            make_v_edge(10.0, 0.0, 5.0),
            make_v_edge(20.0, 0.0, 20.0),
        ];
        let map = edges_to_intersections(&edges, 3.0, 3.0);
        let cells = intersections_to_cells(&map);
        assert_eq!(
            cells,
            vec![BBox::new(0.0, 0.0, 20.0, 10.0), BBox::new(0.0, 10.0, 20.0, 20.0)]
        );
    }

    #[test]
    fn test_smallest_cell_prefers_nearest_below_then_nearest_right() {
        // 2x2 grid: from the top-left vertex only the top-left cell is built.
        let edges = derive_edges(&grid_lines(0.0, 0.0, 2, 2, 10.0), &[], &[]);
        let map = edges_to_intersections(&edges, 3.0, 3.0);
        let cells = intersections_to_cells(&map);
        assert_eq!(cells[0], BBox::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(cells.len(), 4);
    }

    #[test]
    fn test_cells_to_tables_groups_by_corner() {
        let cells = vec![
            BBox::new(100.0, 100.0, 110.0, 110.0),
            BBox::new(0.0, 0.0, 10.0, 10.0),
            BBox::new(10.0, 10.0, 20.0, 20.0), // shares only a corner
            BBox::new(110.0, 100.0, 120.0, 110.0),
            BBox::new(300.0, 300.0, 310.0, 310.0), // lonely
        ];
        let tables = cells_to_tables(&cells);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0], vec![cells[1], cells[2]]);
        assert_eq!(tables[1], vec![cells[0], cells[3]]);
        assert!(tables.iter().all(|t| t.len() > 1));
    }

    #[test]
    fn test_rows_and_columns_with_gaps() {
        let table = Table::new(vec![
            BBox::new(0.0, 10.0, 10.0, 20.0),
            BBox::new(10.0, 0.0, 20.0, 10.0),
            BBox::new(0.0, 0.0, 10.0, 10.0),
        ]);
        let rows = table.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].cells,
            vec![
                Some(BBox::new(0.0, 0.0, 10.0, 10.0)),
                Some(BBox::new(10.0, 0.0, 20.0, 10.0))
            ]
        );
        assert_eq!(rows[1].cells, vec![Some(BBox::new(0.0, 10.0, 10.0, 20.0)), None]);
        assert_eq!(rows[1].bbox(), Some(BBox::new(0.0, 10.0, 10.0, 20.0)));

        let cols = table.columns();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[1].cells, vec![Some(BBox::new(10.0, 0.0, 20.0, 10.0)), None]);
    }

    #[test]
    fn test_extract_assigns_chars_by_midpoint() {
        let table = Table::new(vec![
            BBox::new(0.0, 0.0, 50.0, 20.0),
            BBox::new(50.0, 0.0, 100.0, 20.0),
            BBox::new(0.0, 20.0, 50.0, 40.0),
        ]);
        let mut chars = make_word_chars("ab", 5.0, 5.0);
        // midpoint x = 50.0: belongs to the right cell
        chars.push(make_char("c", 47.5, 5.0, 52.5, 15.0));
        chars.extend(make_word_chars("x y", 55.0, 5.0));
        let rows = table.extract(&chars, &TextOptions::default());
        assert_eq!(
            rows,
            vec![
                vec![Some("ab".to_string()), Some("cx y".to_string())],
                vec![Some(String::new()), None],
            ]
        );
    }

    #[test]
    fn test_lines_strict_ignores_rect_edges() {
        let rects = vec![
            Rect::new(0.0, 0.0, 50.0, 20.0),
            Rect::new(50.0, 0.0, 100.0, 20.0),
        ];
        let edges = derive_edges(&[], &rects, &[]);
        assert_eq!(find(&edges, &TableSettings::default()).len(), 1);
        let strict = TableSettings::with_strategy(Strategy::LinesStrict);
        assert!(find(&edges, &strict).is_empty());
    }

    #[test]
    fn test_explicit_coordinates_span_page() {
        let settings = TableSettings {
            vertical_strategy: Strategy::Explicit,
            horizontal_strategy: Strategy::Explicit,
            explicit_vertical_lines: vec![10.0.into(), 20.0.into(), 30.0.into()],
            explicit_horizontal_lines: vec![5.0.into(), 15.0.into()],
            ..TableSettings::default()
        };
        let finder = TableFinder::new(&[], &[], PAGE, &settings).unwrap();
        assert!(finder.edges().iter().all(|e| e.source == EdgeSource::Explicit));
        let tables = finder.find_tables();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].bbox(), Some(BBox::new(10.0, 5.0, 30.0, 15.0)));
    }

    #[test]
    fn test_explicit_edge_like_lines() {
        let lines = vec![
            ExplicitLine::Rect(BBox::new(0.0, 0.0, 10.0, 10.0)),
            ExplicitLine::Curve(vec![Point::new(20.0, 0.0), Point::new(20.0, 10.0), Point::new(30.0, 10.0)]),
            ExplicitLine::Edge(make_h_edge(0.0, 50.0, 10.0)),
        ];
        let v = explicit_lines_to_edges(&lines, Orientation::Vertical, &PAGE);
        assert_eq!(v.len(), 3);
        let h = explicit_lines_to_edges(&lines, Orientation::Horizontal, &PAGE);
        assert_eq!(h.len(), 4);
        assert!(h.iter().all(|e| e.source == EdgeSource::Explicit));
    }

    #[test]
    fn test_explicit_lines_added_to_lines_strategy() {
        let mut edges = vec![make_h_edge(0.0, 0.0, 100.0), make_h_edge(0.0, 20.0, 100.0)];
        edges.push(make_v_edge(0.0, 0.0, 20.0));
        let settings = TableSettings {
            explicit_vertical_lines: vec![50.0.into(), 100.0.into()],
            ..TableSettings::default()
        };
        let tables = find(&edges, &settings);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].cells.len(), 2);
    }

    #[test]
    fn test_explicit_with_one_line_fails() {
        let settings = TableSettings {
            vertical_strategy: Strategy::Explicit,
            explicit_vertical_lines: vec![10.0.into()],
            ..TableSettings::default()
        };
        let err = TableFinder::new(&[], &[], PAGE, &settings).unwrap_err();
        assert!(matches!(err, crate::error::PlumbError::ConfigurationError(_)));
    }

    #[test]
    fn test_text_strategy_infers_grid() {
        let mut chars = Vec::new();
        for (r, top) in [0.0, 20.0, 40.0].into_iter().enumerate() {
            for (c, x0) in [0.0, 50.0, 100.0].into_iter().enumerate() {
                chars.extend(make_word_chars(&format!("{}{r}", ["a", "b", "c"][c]), x0, top));
            }
        }
        let finder = TableFinder::new(&chars, &[], PAGE, &TableSettings::with_strategy(Strategy::Text)).unwrap();
        let v_edges: Vec<f64> = finder
            .edges()
            .iter()
            .filter(|e| e.orientation == Some(Orientation::Vertical))
            .map(|e| e.x0)
            .collect();
        assert_eq!(v_edges, vec![0.0, 50.0, 100.0, 110.0]);

        let table = finder.find_table().unwrap();
        // Each word row contributes a top and bottom edge: 6 lines, 5 rows of cells.
        assert_eq!(table.cells.len(), 15);
        let text = table.extract(&chars, &TextOptions::default());
        assert_eq!(text.len(), 5);
        assert_eq!(text[0], vec![Some("a0".into()), Some("b0".into()), Some("c0".into())]);
        assert_eq!(text[1], vec![Some(String::new()); 3]);
        assert_eq!(text[4], vec![Some("a2".into()), Some("b2".into()), Some("c2".into())]);
    }

    #[test]
    fn test_words_to_edges_h_threshold() {
        let words = WordExtractor::extract(
            &[make_word_chars("ab", 0.0, 0.0), make_word_chars("cd", 40.0, 30.0)].concat(),
            &Default::default(),
        );
        assert_eq!(words_to_edges_h(&words, 1).len(), 4);
        assert!(words_to_edges_h(&words, 2).is_empty());
        let edges = words_to_edges_h(&words, 1);
        assert!(edges.iter().all(|e| e.x0 == 0.0 && e.x1 == 50.0));
    }

    #[test]
    fn test_best_table_prefers_most_cells_then_top_left() {
        let small = Table::new(vec![BBox::new(0.0, 0.0, 10.0, 10.0), BBox::new(10.0, 0.0, 20.0, 10.0)]);
        let big = Table::new(vec![
            BBox::new(0.0, 100.0, 10.0, 110.0),
            BBox::new(10.0, 100.0, 20.0, 110.0),
            BBox::new(20.0, 100.0, 30.0, 110.0),
        ]);
        let right = Table::new(vec![BBox::new(50.0, 0.0, 60.0, 10.0), BBox::new(60.0, 0.0, 70.0, 10.0)]);
        let tables = vec![right.clone(), small.clone(), big.clone()];
        assert_eq!(best_table(&tables), Some(&big));
        assert_eq!(best_table(&[right, small.clone()]), Some(&small));
        assert_eq!(best_table(&[]), None);
    }

    #[test]
    fn test_no_edges_no_tables() {
        let finder = TableFinder::new(&[], &[], PAGE, &TableSettings::default()).unwrap();
        assert!(finder.edges().is_empty());
        assert!(finder.find_tables().is_empty());
        assert!(finder.find_table().is_none());
    }

    fn horizontal_spans(finder: &TableFinder) -> Vec<(f64, f64, f64)> {
        finder
            .edges()
            .iter()
            .filter(|e| e.orientation == Some(Orientation::Horizontal))
            .map(|e| (e.x0, e.top, e.x1))
            .collect()
    }

    #[test]
    fn test_edge_min_length_drops_short_stub() {
        let edges = vec![make_h_edge(400.0, 300.0, 402.0)];
        let finder = TableFinder::new(&[], &edges, PAGE, &TableSettings::default()).unwrap();
        assert!(horizontal_spans(&finder).is_empty());

        let settings = TableSettings {
            edge_min_length: 1.5,
            ..TableSettings::default()
        };
        let finder = TableFinder::new(&[], &edges, PAGE, &settings).unwrap();
        assert_eq!(horizontal_spans(&finder), vec![(400.0, 300.0, 402.0)]);
    }

    #[test]
    fn test_prefilter_removes_fragment_before_join() {
        let edges = vec![
            make_h_edge(0.0, 50.0, 10.0),
            make_h_edge(12.5, 50.0, 13.2),
            make_h_edge(15.5, 50.0, 30.0),
        ];
        let finder = TableFinder::new(&[], &edges, PAGE, &TableSettings::default()).unwrap();
        assert_eq!(
            horizontal_spans(&finder),
            vec![(0.0, 50.0, 10.0), (15.5, 50.0, 30.0)]
        );

        let settings = TableSettings {
            edge_min_length_prefilter: 0.5,
            ..TableSettings::default()
        };
        let finder = TableFinder::new(&[], &edges, PAGE, &settings).unwrap();
        assert_eq!(horizontal_spans(&finder), vec![(0.0, 50.0, 30.0)]);
    }

    #[test]
    fn test_min_words_vertical_threshold() {
        let mut chars = Vec::new();
        for top in [0.0, 20.0, 40.0, 60.0] {
            chars.extend(make_word_chars("aa", 0.0, top));
        }
        for top in [0.0, 20.0] {
            chars.extend(make_word_chars("bb", 100.0, top));
        }
        let vertical_xs = |min_words: usize| {
            let settings = TableSettings {
                vertical_strategy: Strategy::Text,
                min_words_vertical: min_words,
                ..TableSettings::default()
            };
            let finder = TableFinder::new(&chars, &[], PAGE, &settings).unwrap();
            let mut xs: Vec<f64> = finder
                .edges()
                .iter()
                .filter(|e| e.orientation == Some(Orientation::Vertical))
                .map(|e| e.x0)
                .collect();
            xs.sort_by(f64::total_cmp);
            xs
        };
        assert_eq!(vertical_xs(4), vec![0.0, 10.0]);
        assert_eq!(vertical_xs(2), vec![0.0, 100.0, 110.0]);
    }

    #[test]
    fn test_near_miss_grid_forms_one_table() {
        let edges = vec![
            make_h_edge(100.0, 100.0, 300.0),
            make_h_edge(100.0, 101.5, 300.0),
            make_h_edge(101.5, 120.0, 298.5),
            make_h_edge(100.0, 140.0, 300.0),
            make_v_edge(100.0, 100.0, 140.0),
            make_v_edge(201.5, 100.0, 118.0),
            make_v_edge(201.5, 120.0, 140.0),
            make_v_edge(300.0, 98.5, 141.0),
        ];
        let tables = find(&edges, &TableSettings::default());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].cells.len(), 4);
        assert_eq!(tables[0].rows().len(), 2);
        assert_eq!(tables[0].columns().len(), 2);
    }
}

//! plumbline-core: backend-independent geometry, table detection and text
//! assembly for pages already parsed into characters and painted shapes.
//!
//! This crate provides the page primitives ([`Char`], [`Line`], [`Rect`],
//! [`Curve`]) and the algorithms that work on them: tolerance clustering,
//! edge merging, the intersection and cell engine behind [`TableFinder`],
//! word extraction, and simple or layout-preserving text with regex search.
//! Every algorithm is a synchronous function over immutable inputs.
//!
//! ```
//! use plumbline_core::{BBox, Line, TableFinder, TableSettings, derive_edges};
//!
//! let mut lines = Vec::new();
//! for y in [0.0, 20.0, 40.0] {
//!     lines.push(Line::new(0.0, y, 100.0, y));
//! }
//! for x in [0.0, 50.0, 100.0] {
//!     lines.push(Line::new(x, 0.0, x, 40.0));
//! }
//! let edges = derive_edges(&lines, &[], &[]);
//! let page = BBox::new(0.0, 0.0, 612.0, 792.0);
//! let finder = TableFinder::new(&[], &edges, page, &TableSettings::default()).unwrap();
//! let tables = finder.find_tables();
//! assert_eq!(tables.len(), 1);
//! assert_eq!(tables[0].cells.len(), 4);
//! ```

pub mod clustering;
pub mod edges;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod page_object;
pub mod search;
pub mod settings;
pub mod shapes;
pub mod table;
pub mod text;
pub mod words;

pub use clustering::{cluster_list, cluster_objects, make_cluster_dict};
pub use edges::{
    Edge, EdgeSource, derive_edges, edge_from_line, edges_from_curve, edges_from_rect,
    filter_edges, join_edge_group, merge_edges, move_edge, snap_edges,
};
pub use error::{PlumbError, Result};
pub use geometry::{
    BBox, HasBBox, Orientation, Point, crop_to_bbox, objects_to_bbox, outside_bbox, within_bbox,
};
pub use layout::{TextMap, TextOptions, extract_text, extract_text_simple};
pub use page_object::PageObject;
pub use search::{SearchMatch, SearchOptions, search_chars};
pub use settings::{ExplicitLine, ResolvedTableSettings, Strategy, TableSettings};
pub use shapes::{Color, Curve, Line, Rect};
pub use table::{
    CellGroup, Intersection, IntersectionMap, Table, TableFinder, TableText, best_table, cells_to_tables,
    edges_to_intersections, intersections_to_cells, words_to_edges_h, words_to_edges_v,
};
pub use text::{Char, TextDirection};
pub use words::{Word, WordExtractor, WordOptions};

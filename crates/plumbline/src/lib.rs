//! plumbline: find tables, words and text in document pages with precise coordinates.
//!
//! This is the public API facade. Pages come from an external parser as
//! characters and painted shapes; [`Page`] holds them, memoizes derived
//! edges and words, and runs the algorithms from `plumbline-core`.
//!
//! # Architecture
//!
//! - **plumbline-core**: backend-independent types and algorithms
//! - **plumbline** (this crate): [`Page`], [`CroppedPage`] and [`Document`]
//!
//! # Features
//!
//! - `serde`: load [`Document`]s from JSON page dumps and serialize results
//! - `parallel`: [`Document::extract_tables_parallel`] on the rayon pool

mod cropped_page;
mod document;
mod error;
mod page;

pub use plumbline_core;
pub use plumbline_core::{
    BBox, Char, Curve, Edge, Line, Orientation, PageObject, PlumbError, Rect, SearchMatch, SearchOptions,
    Strategy, Table, TableFinder, TableSettings, TableText, TextOptions, Word, WordOptions,
};

pub use cropped_page::CroppedPage;
pub use document::Document;
pub use error::DocumentError;
pub use page::{Page, PageData};

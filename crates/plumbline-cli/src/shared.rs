use std::fmt::Display;
use std::path::Path;

use plumbline::{BBox, Document, Page};
use serde_json::{Value, json};

use crate::page_range::PageRange;

/// Report a fatal error and map it to the process exit code.
pub fn fail(err: impl Display) -> i32 {
    eprintln!("Error: {err}");
    1
}

/// Load a page dump with user-friendly error messages.
pub fn open_dump(file: &Path) -> Result<Document, i32> {
    if !file.exists() {
        return Err(fail(format!("file not found: {}", file.display())));
    }
    Document::open(file).map_err(fail)
}

/// The selected pages of `doc`, or all of them when no range was given.
pub fn selected_pages<'a>(doc: &'a Document, pages: Option<&PageRange>) -> Result<Vec<&'a Page>, i32> {
    let indices = match pages {
        Some(range) => range.indices(doc.page_count()).map_err(fail)?,
        None => (0..doc.page_count()).collect(),
    };
    indices
        .into_iter()
        .map(|i| doc.page(i).map_err(fail))
        .collect()
}

pub fn bbox_json(bbox: &BBox) -> Value {
    json!({
        "x0": bbox.x0,
        "top": bbox.top,
        "x1": bbox.x1,
        "bottom": bbox.bottom,
    })
}

/// Escape a string for CSV output.
///
/// Fields containing commas, double quotes or newlines are quoted, with
/// inner quotes doubled.
pub fn csv_escape(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

use std::path::Path;

use plumbline::plumbline_core::Result as PlumbResult;
use plumbline::{BBox, Page, PageData, TableSettings, TableText};
use serde_json::json;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::page_range::PageRange;
use crate::shared::{bbox_json, csv_escape, fail, open_dump, selected_pages};

/// One extracted table with where it was found.
struct Found {
    page: usize,
    bbox: Option<BBox>,
    rows: TableText,
}

pub fn run(
    file: &Path,
    pages: Option<&PageRange>,
    overrides: &[(String, String)],
    best: bool,
    format: OutputFormat,
) -> Result<(), i32> {
    let settings = build_settings(overrides)?;
    let doc = open_dump(file)?;

    let mut found = Vec::new();
    for page in selected_pages(&doc, pages)? {
        found.extend(page_tables(page, &settings, best).map_err(fail)?);
    }
    debug!(tables = found.len(), "extracted tables");

    match format {
        OutputFormat::Text => write_grid(&found),
        OutputFormat::Json => write_json(&found),
        OutputFormat::Csv => write_csv(&found),
    }
    Ok(())
}

fn build_settings(overrides: &[(String, String)]) -> Result<TableSettings, i32> {
    let mut settings = TableSettings::default();
    for (key, value) in overrides {
        settings.set(key, value).map_err(fail)?;
    }
    // surface configuration errors before reading the dump
    settings.resolve().map_err(fail)?;
    Ok(settings)
}

fn page_tables(page: &Page, settings: &TableSettings, best: bool) -> PlumbResult<Vec<Found>> {
    let finder = page.table_finder(settings)?;
    let tables = if best {
        finder.find_table().into_iter().collect()
    } else {
        finder.find_tables()
    };
    let text_options = finder.settings().cell_text_options();
    Ok(tables
        .iter()
        .map(|table| Found {
            page: page.page_number() + 1,
            bbox: table.bbox(),
            rows: table.extract(page.chars(), &text_options),
        })
        .collect())
}

fn cell_str(cell: &Option<String>) -> &str {
    cell.as_deref().unwrap_or("")
}

fn write_grid(found: &[Found]) {
    for (n, table) in found.iter().enumerate() {
        match table.bbox {
            Some(b) => println!(
                "--- Table {} (page {}, bbox: [{:.1}, {:.1}, {:.1}, {:.1}]) ---",
                n + 1,
                table.page,
                b.x0,
                b.top,
                b.x1,
                b.bottom,
            ),
            None => println!("--- Table {} (page {}) ---", n + 1, table.page),
        }

        let col_count = table.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![1usize; col_count];
        for row in &table.rows {
            for (ci, cell) in row.iter().enumerate() {
                widths[ci] = widths[ci].max(cell_str(cell).chars().count());
            }
        }
        for row in &table.rows {
            let cells: Vec<String> = (0..col_count)
                .map(|ci| {
                    let text = row.get(ci).map_or("", cell_str);
                    format!("{text:<width$}", width = widths[ci])
                })
                .collect();
            println!("| {} |", cells.join(" | "));
        }
        println!();
    }

    if found.is_empty() {
        println!("No tables found.");
    }
}

fn write_json(found: &[Found]) {
    let tables: Vec<_> = found
        .iter()
        .map(|t| {
            json!({
                "page": t.page,
                "bbox": t.bbox.as_ref().map(bbox_json),
                "rows": t.rows,
            })
        })
        .collect();
    println!("{}", serde_json::Value::Array(tables));
}

fn write_csv(found: &[Found]) {
    for (n, table) in found.iter().enumerate() {
        if n > 0 {
            println!();
        }
        for row in &table.rows {
            let cells: Vec<String> = row.iter().map(|c| csv_escape(cell_str(c))).collect();
            println!("{}", cells.join(","));
        }
    }
}

use std::path::Path;

use plumbline::{Page, PageData, WordOptions};
use serde_json::json;

use crate::cli::OutputFormat;
use crate::page_range::PageRange;
use crate::shared::{bbox_json, csv_escape, open_dump, selected_pages};

pub fn run(
    file: &Path,
    pages: Option<&PageRange>,
    x_tolerance: f64,
    y_tolerance: f64,
    split_at_punctuation: Option<&str>,
    format: OutputFormat,
) -> Result<(), i32> {
    let doc = open_dump(file)?;
    let pages = selected_pages(&doc, pages)?;
    let opts = WordOptions {
        x_tolerance,
        y_tolerance,
        split_at_punctuation: split_at_punctuation.unwrap_or_default().to_string(),
        ..WordOptions::default()
    };

    match format {
        OutputFormat::Text => write_text(&pages, &opts),
        OutputFormat::Json => write_json(&pages, &opts),
        OutputFormat::Csv => write_csv(&pages, &opts),
    }
    Ok(())
}

fn write_text(pages: &[&Page], opts: &WordOptions) {
    println!("page\ttext\tx0\ttop\tx1\tbottom\tdoctop\tdirection");
    for page in pages {
        for w in page.extract_words(opts) {
            println!(
                "{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{}",
                page.page_number() + 1,
                w.text,
                w.bbox.x0,
                w.bbox.top,
                w.bbox.x1,
                w.bbox.bottom,
                w.doctop,
                w.direction.as_str(),
            );
        }
    }
}

fn write_json(pages: &[&Page], opts: &WordOptions) {
    let mut all_words = Vec::new();
    for page in pages {
        for w in page.extract_words(opts) {
            all_words.push(json!({
                "page": page.page_number() + 1,
                "text": w.text,
                "bbox": bbox_json(&w.bbox),
                "doctop": w.doctop,
                "upright": w.upright,
                "direction": w.direction.as_str(),
            }));
        }
    }
    println!("{}", serde_json::Value::Array(all_words));
}

fn write_csv(pages: &[&Page], opts: &WordOptions) {
    println!("page,text,x0,top,x1,bottom");
    for page in pages {
        for w in page.extract_words(opts) {
            println!(
                "{},{},{:.2},{:.2},{:.2},{:.2}",
                page.page_number() + 1,
                csv_escape(&w.text),
                w.bbox.x0,
                w.bbox.top,
                w.bbox.x1,
                w.bbox.bottom,
            );
        }
    }
}

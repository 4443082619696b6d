use std::path::Path;

use plumbline::{PageData, SearchOptions, TextOptions};
use serde_json::json;

use crate::cli::TextFormat;
use crate::page_range::PageRange;
use crate::shared::{bbox_json, fail, open_dump, selected_pages};

/// Matching behavior requested on the command line.
#[derive(Debug, Clone, Copy)]
pub struct SearchFlags {
    pub literal: bool,
    pub ignore_case: bool,
    pub layout: bool,
}

pub fn run(
    file: &Path,
    pattern: &str,
    pages: Option<&PageRange>,
    flags: SearchFlags,
    format: TextFormat,
) -> Result<(), i32> {
    let doc = open_dump(file)?;
    let opts = SearchOptions {
        regex: !flags.literal,
        case_sensitive: !flags.ignore_case,
        return_chars: false,
        ..SearchOptions::default()
    };
    let text_options = TextOptions {
        layout: flags.layout,
        ..TextOptions::default()
    };

    let mut hits = Vec::new();
    for page in selected_pages(&doc, pages)? {
        let matches = page.search(pattern, &opts, &text_options).map_err(fail)?;
        hits.extend(matches.into_iter().map(|m| (page.page_number() + 1, m)));
    }

    match format {
        TextFormat::Text => {
            println!("page\ttext\tx0\ttop\tx1\tbottom");
            for (page, m) in &hits {
                println!(
                    "{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
                    page,
                    m.text.replace('\n', "\\n"),
                    m.bbox.x0,
                    m.bbox.top,
                    m.bbox.x1,
                    m.bbox.bottom,
                );
            }
        }
        TextFormat::Json => {
            let all: Vec<_> = hits
                .iter()
                .map(|(page, m)| {
                    json!({
                        "page": page,
                        "text": m.text,
                        "groups": m.groups,
                        "bbox": bbox_json(&m.bbox),
                        "char_indices": m.char_indices,
                    })
                })
                .collect();
            println!("{}", serde_json::Value::Array(all));
        }
    }
    Ok(())
}

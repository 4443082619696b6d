use std::path::Path;

use plumbline::{PageData, TextOptions};
use serde_json::json;

use crate::cli::TextFormat;
use crate::page_range::PageRange;
use crate::shared::{open_dump, selected_pages};

pub fn run(
    file: &Path,
    pages: Option<&PageRange>,
    layout: bool,
    format: TextFormat,
) -> Result<(), i32> {
    let doc = open_dump(file)?;
    let text_options = TextOptions {
        layout,
        ..TextOptions::default()
    };

    for page in selected_pages(&doc, pages)? {
        let text = page.extract_text(&text_options);
        let number = page.page_number() + 1;
        match format {
            TextFormat::Text => {
                println!("--- Page {number} ---");
                println!("{text}");
            }
            TextFormat::Json => {
                println!("{}", json!({ "page": number, "text": text }));
            }
        }
    }
    Ok(())
}

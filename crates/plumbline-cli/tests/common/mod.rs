//! Page dump fixtures shared by the CLI integration tests.

#![allow(dead_code)]

use std::io::Write;

use assert_cmd::Command;
use serde_json::{Value, json};
use tempfile::NamedTempFile;

pub const PAGE_HEIGHT: f64 = 792.0;

pub fn cmd() -> Command {
    Command::cargo_bin("plumbline").unwrap()
}

/// Chars 6pt wide and 10pt tall, laid left to right from `x0`.
pub fn text_chars(text: &str, x0: f64, top: f64, page_offset: f64) -> Vec<Value> {
    text.chars()
        .enumerate()
        .map(|(i, c)| {
            let x = x0 + i as f64 * 6.0;
            json!({
                "text": c.to_string(),
                "bbox": {"x0": x, "top": top, "x1": x + 6.0, "bottom": top + 10.0},
                "doctop": page_offset + top,
                "fontname": "Helvetica",
                "size": 10.0,
            })
        })
        .collect()
}

/// Page 1: heading "Invoice 2024" and a ruled 2x2 table (A B / C D).
/// Page 2: the line "Total: 42.50".
pub fn invoice_dump() -> Value {
    let mut chars = text_chars("Invoice 2024", 100.0, 50.0, 0.0);
    for (label, x, y) in [("A", 110.0, 105.0), ("B", 210.0, 105.0), ("C", 110.0, 125.0), ("D", 210.0, 125.0)] {
        chars.extend(text_chars(label, x, y, 0.0));
    }
    let mut lines = Vec::new();
    for y in [100.0, 120.0, 140.0] {
        lines.push(json!({"x0": 100.0, "top": y, "x1": 300.0, "bottom": y}));
    }
    for x in [100.0, 200.0, 300.0] {
        lines.push(json!({"x0": x, "top": 100.0, "x1": x, "bottom": 140.0}));
    }

    json!({
        "pages": [
            {"width": 612.0, "height": PAGE_HEIGHT, "chars": chars, "lines": lines},
            {"width": 612.0, "height": PAGE_HEIGHT, "chars": text_chars("Total: 42.50", 100.0, 30.0, PAGE_HEIGHT)},
        ]
    })
}

pub fn write_dump(dump: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(dump.to_string().as_bytes()).unwrap();
    file
}

pub fn invoice_file() -> NamedTempFile {
    write_dump(&invoice_dump())
}

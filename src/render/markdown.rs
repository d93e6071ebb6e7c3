//! Markdown bodies for county and state documents.
//!
//! County pages list every layer as a bulleted block. State pages are
//! tabular: one table of counties, one table per layer type, with the
//! `conform` block squeezed into a single cell.

use crate::naming::{capitalize, sanitize_filename};
use crate::record::{Layer, Record};
use serde_json::Value;
use std::fmt::Write;

const NO_DESCRIPTION: &str = "No description available.";

pub fn render_county(record: &Record) -> String {
    let mut md = String::new();
    let _ = write!(
        md,
        "# {} County\n\n**State:** {}\n\n**GEOID:** {}\n\n",
        record.name(),
        record.state_name().unwrap_or_default(),
        record.geoid().unwrap_or_default(),
    );
    description(&mut md, record);
    md.push_str("## Layers\n\n");

    let Some(layers) = record.layers.as_ref().filter(|l| !l.is_empty()) else {
        md.push_str("No layers available.\n");
        return md;
    };
    for (layer_type, list) in layers.iter() {
        let _ = write!(md, "### {}\n\n", capitalize(layer_type));
        for (i, layer) in list.iter().enumerate() {
            county_layer(&mut md, i + 1, layer);
        }
    }
    md
}

pub fn render_state(record: &Record) -> String {
    let mut md = String::new();
    let _ = write!(
        md,
        "# {} State\n\n**GEOID:** {}\n\n",
        record.state_name().unwrap_or_default(),
        record.geoid().unwrap_or_default(),
    );
    description(&mut md, record);

    md.push_str("## Counties\n\n");
    if record.counties.is_empty() {
        md.push_str("No counties available.\n");
    } else {
        md.push_str("| County | Link |\n|--------|------|\n");
        for county in &record.counties {
            let name = county.name.as_deref().unwrap_or("Unknown");
            let _ = writeln!(
                md,
                "| {} | [Link](./{}.md) |",
                table_cell(name),
                sanitize_filename(name)
            );
        }
    }

    md.push_str("\n## Layers\n\n");
    if let Some(layers) = &record.layers {
        for (layer_type, list) in layers.iter() {
            let _ = write!(md, "### {}\n\n", capitalize(layer_type));
            md.push_str("| Name | Data URL | Protocol | Conform |\n");
            md.push_str("|------|----------|----------|---------|\n");
            for layer in list {
                let conform = layer
                    .conform
                    .as_ref()
                    .map(compact_conform)
                    .unwrap_or_else(|| "N/A".to_string());
                let _ = writeln!(
                    md,
                    "| {} | [Link]({}) | {} | {} |",
                    table_cell(&layer.name),
                    layer.data.trim(),
                    table_cell(&layer.protocol),
                    table_cell(&conform),
                );
            }
            md.push('\n');
        }
    }
    md
}

fn description(md: &mut String, record: &Record) {
    let text = record
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_DESCRIPTION);
    let _ = write!(md, "## Description\n\n{text}\n\n");
}

fn county_layer(md: &mut String, index: usize, layer: &Layer) {
    let _ = write!(md, "**Layer {}:** {}\n\n", index, layer.name);
    let _ = writeln!(md, "- **Data URL:** [Link]({})", layer.data);
    let _ = writeln!(md, "- **Protocol:** {}", layer.protocol);
    if let Some(website) = layer.website.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(md, "- **Website:** [Link]({website})");
    }
    if let Some(license) = &layer.license {
        let _ = writeln!(md, "- **License:** {}", license_text(license));
    }
    if let Some(compression) = layer.compression.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(md, "- **Compression:** {compression}");
    }
    if let Some(conform) = &layer.conform {
        match conform {
            Value::Object(_) | Value::Array(_) => {
                md.push_str("- **Conform:**\n");
                conform_list(md, conform, 1);
            }
            scalar => {
                let _ = writeln!(md, "- **Conform:** {}", plain(scalar));
            }
        }
    }
    md.push('\n');
}

/// `{text, url}` becomes `text ([Link](url))`; a bare string is used as is.
fn license_text(license: &Value) -> String {
    match license {
        Value::Object(map) => {
            let text = map
                .get("text")
                .map(plain)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "N/A".to_string());
            match map.get("url").map(plain).filter(|u| !u.is_empty()) {
                Some(url) => format!("{text} ([Link]({url}))"),
                None => text,
            }
        }
        other => plain(other),
    }
}

/// Nested bullet list of a conform block, two spaces per level.
///
/// Mappings become `- Key: value` (or `- Key:` plus a deeper list); mappings
/// inside sequences stay on one line as compact JSON.
fn conform_list(md: &mut String, value: &Value, depth: usize) {
    let pad = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                match v {
                    Value::Object(_) | Value::Array(_) => {
                        let _ = writeln!(md, "{pad}- {}:", capitalize(key));
                        conform_list(md, v, depth + 1);
                    }
                    scalar => {
                        let _ = writeln!(md, "{pad}- {}: {}", capitalize(key), plain(scalar));
                    }
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(_) => {
                        let _ = writeln!(md, "{pad}- {item}");
                    }
                    Value::Array(_) => {
                        let _ = writeln!(md, "{pad}-");
                        conform_list(md, item, depth + 1);
                    }
                    scalar => {
                        let _ = writeln!(md, "{pad}- {}", plain(scalar));
                    }
                }
            }
        }
        scalar => {
            let _ = writeln!(md, "{pad}- {}", plain(scalar));
        }
    }
}

/// Single-line JSON with single quotes, safe inside a table cell.
fn compact_conform(conform: &Value) -> String {
    conform.to_string().replace('"', "'")
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn table_cell(text: &str) -> String {
    text.trim()
        .replace(['\r', '\n'], " ")
        .replace('|', "\\|")
}

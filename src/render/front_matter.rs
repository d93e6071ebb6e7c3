//! YAML front matter.
//!
//! The front matter is built line by line from a small tree walk over
//! [`serde_json::Value`], so every nested string goes through the same
//! quoting and every level is indented by the same rule: two spaces per depth.
//!
//! ```yaml
//! ---
//! title: "Los Angeles"
//! geoid: "06037"
//! state: "California"
//! country: "us"
//! county: "Los Angeles"
//! schema: 1
//! layers:
//!   addresses:
//!     - name: "county"
//!       data: "https://example.com/la.zip"
//!       protocol: "http"
//!       conform:
//!         number:
//!           fields:
//!             - "house_number"
//! ---
//! ```
//!
//! Sequence items holding a mapping or sequence put their first line on the
//! dash (`- name: ...`, `- - a`); empty containers render as `{}` / `[]`.

use crate::naming::{quote_yaml, yaml_key};
use crate::record::{Kind, Layer, Record};
use serde_json::{Map, Value};

/// Front matter delimiter.
pub const DELIMITER: &str = "---";

/// Render the front matter block, delimiters included, ending in a newline.
pub fn render(record: &Record, kind: Kind) -> String {
    let mut fm = FrontMatter::default();
    fm.line(DELIMITER.to_string());

    let title = match kind {
        Kind::State => format!("{} State", record.state_name().unwrap_or_default()),
        Kind::County => record.name().to_string(),
    };
    fm.string(0, "title", &title);
    fm.string(0, "geoid", record.geoid().unwrap_or_default());
    fm.string(0, "state", record.state_name().unwrap_or_default());
    fm.string(0, "country", record.country());
    match kind {
        Kind::County => fm.string(0, "county", record.county().unwrap_or_default()),
        Kind::State => fm.string(0, "type", "state"),
    }
    fm.entry(0, "schema", &Value::from(record.schema()));

    if let Some(layers) = &record.layers {
        let tree: Map<String, Value> = layers
            .iter()
            .map(|(t, list)| {
                let items = list.iter().map(|l| Value::Object(layer_fields(l))).collect();
                (t.to_string(), Value::Array(items))
            })
            .collect();
        fm.entry(0, "layers", &Value::Object(tree));
    }

    fm.line(DELIMITER.to_string());
    fm.finish()
}

/// The layer fields that appear in front matter, in display order.
fn layer_fields(layer: &Layer) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("name".into(), Value::from(layer.name.as_str()));
    fields.insert("data".into(), Value::from(layer.data.as_str()));
    fields.insert("protocol".into(), Value::from(layer.protocol.as_str()));
    if let Some(website) = layer.website.as_deref().filter(|s| !s.is_empty()) {
        fields.insert("website".into(), Value::from(website));
    }
    if let Some(license) = &layer.license {
        fields.insert("license".into(), license.clone());
    }
    if let Some(compression) = layer.compression.as_deref().filter(|s| !s.is_empty()) {
        fields.insert("compression".into(), Value::from(compression));
    }
    if let Some(conform) = &layer.conform {
        fields.insert("conform".into(), conform.clone());
    }
    if let Some(county) = &layer.county {
        fields.insert("county".into(), Value::from(county.as_str()));
    }
    fields
}

/// Line accumulator for one front matter block.
#[derive(Default)]
struct FrontMatter {
    lines: Vec<String>,
}

impl FrontMatter {
    fn line(&mut self, line: String) {
        self.lines.push(line);
    }

    fn string(&mut self, depth: usize, key: &str, value: &str) {
        self.line(format!("{}{}: {}", pad(depth), yaml_key(key), quote_yaml(value)));
    }

    /// `key: value` inside a mapping at `depth`.
    fn entry(&mut self, depth: usize, key: &str, value: &Value) {
        let key = yaml_key(key);
        match value {
            Value::Object(map) if !map.is_empty() => {
                self.line(format!("{}{}:", pad(depth), key));
                for (k, v) in map {
                    self.entry(depth + 1, k, v);
                }
            }
            Value::Array(items) if !items.is_empty() => {
                self.line(format!("{}{}:", pad(depth), key));
                for item in items {
                    self.item(depth + 1, item);
                }
            }
            _ => self.line(format!("{}{}: {}", pad(depth), key, inline(value))),
        }
    }

    /// `- value` inside a sequence at `depth`.
    fn item(&mut self, depth: usize, value: &Value) {
        let start = self.lines.len();
        match value {
            Value::Object(map) if !map.is_empty() => {
                for (k, v) in map {
                    self.entry(depth + 1, k, v);
                }
            }
            Value::Array(items) if !items.is_empty() => {
                for item in items {
                    self.item(depth + 1, item);
                }
            }
            _ => {
                self.line(format!("{}- {}", pad(depth), inline(value)));
                return;
            }
        }
        // Hoist the nested block's first line onto the dash. `pad(depth) + "- "`
        // is exactly as wide as `pad(depth + 1)`, so the rest stays aligned.
        let first = &self.lines[start];
        let hoisted = format!("{}- {}", pad(depth), &first[pad(depth + 1).len()..]);
        self.lines[start] = hoisted;
    }

    fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

fn pad(depth: usize) -> String {
    "  ".repeat(depth)
}

/// A value that fits on the key's line: scalars and empty containers.
fn inline(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote_yaml(s),
        Value::Object(_) => "{}".to_string(),
        Value::Array(_) => "[]".to_string(),
    }
}

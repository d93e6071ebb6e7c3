//! The coverage record data model.
//!
//! A record is one JSON descriptor from the source tree. Known fields are
//! typed; anything else is kept in flattened `extra` maps so the canonical
//! JSON encoding reproduces the input. Free-form blocks (`conform`,
//! `license`) stay as [`serde_json::Value`], the recursive
//! scalar | mapping | sequence union the renderer walks.
//!
//! ```json
//! {
//!   "coverage": {
//!     "US Census": { "geoid": "06037", "name": "Los Angeles County", "state": "California" },
//!     "country": "us",
//!     "state": "CA",
//!     "county": "Los Angeles"
//!   },
//!   "schema": 2,
//!   "layers": {
//!     "addresses": [
//!       { "name": "county", "data": "https://...", "protocol": "ESRI",
//!         "conform": { "number": { "fields": ["house_number"] } } }
//!     ]
//!   }
//! }
//! ```

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Layer types every synthesized state record carries, in this order.
pub const KNOWN_LAYER_TYPES: [&str; 3] = ["addresses", "parcels", "buildings"];

/// Schema version assumed for records that do not declare one.
pub const DEFAULT_SCHEMA: u32 = 1;

/// Schema version stamped on synthesized state records.
pub const AGGREGATE_SCHEMA: u32 = 2;

/// Whether a record describes a state or a county.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    State,
    County,
}

impl Kind {
    /// A two-character GEOID is a state; anything else is a county.
    pub fn of_geoid(geoid: &str) -> Self {
        if geoid.chars().count() == 2 {
            Kind::State
        } else {
            Kind::County
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::State => "state",
            Kind::County => "county",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub coverage: Coverage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<Layers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Child county index; only synthesized state records fill this.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub counties: Vec<CountyRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// Declared schema version, or [`DEFAULT_SCHEMA`].
    pub fn schema(&self) -> u32 {
        self.schema.unwrap_or(DEFAULT_SCHEMA)
    }

    pub fn geoid(&self) -> Option<&str> {
        self.coverage.census().and_then(|c| non_empty(&c.geoid))
    }

    /// Display name from the census block.
    pub fn name(&self) -> &str {
        self.coverage
            .census()
            .and_then(|c| non_empty(&c.name))
            .unwrap_or_default()
    }

    /// State name: the census block's `state`, falling back to `coverage.state`.
    pub fn state_name(&self) -> Option<&str> {
        self.coverage
            .census()
            .and_then(|c| non_empty(&c.state))
            .or_else(|| non_empty(&self.coverage.state))
    }

    /// State code as written at `coverage.state`.
    pub fn state_code(&self) -> Option<&str> {
        non_empty(&self.coverage.state)
    }

    pub fn country(&self) -> &str {
        non_empty(&self.coverage.country).unwrap_or_default()
    }

    pub fn county(&self) -> Option<&str> {
        non_empty(&self.coverage.county)
    }

    /// Layer-type names this record declares, in declaration order.
    pub fn layer_types(&self) -> Vec<String> {
        self.layers
            .as_ref()
            .map(|l| l.types().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Geographic identity of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    #[serde(rename = "US Census", default, skip_serializing_if = "Option::is_none")]
    pub us_census: Option<Census>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Coverage {
    pub fn census(&self) -> Option<&Census> {
        self.us_census.as_ref()
    }
}

/// The authoritative-identifier block (`coverage["US Census"]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Census {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geoid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One data source for a layer type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Usually `{text, url}`, occasionally a bare string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,
    /// Field-mapping rules of arbitrary depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conform: Option<Value>,
    /// Source county, set when the layer was pulled into a state aggregate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Lightweight reference from a synthesized state record to a county.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountyRef {
    pub name: Option<String>,
    pub geoid: Option<String>,
    #[serde(default)]
    pub data_types: Vec<String>,
}

/// Layer-type name → ordered layer list, keeping layer types in the order
/// they were declared (or first appended).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layers(Vec<(String, Vec<Layer>)>);

impl Layers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layers with the given types present and empty.
    pub fn with_types<'a>(types: impl IntoIterator<Item = &'a str>) -> Self {
        let mut layers = Self::new();
        for t in types {
            layers.entry(t);
        }
        layers
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, layer_type: &str) -> Option<&[Layer]> {
        self.0
            .iter()
            .find(|(t, _)| t == layer_type)
            .map(|(_, l)| l.as_slice())
    }

    pub fn get_mut(&mut self, layer_type: &str) -> Option<&mut Vec<Layer>> {
        self.0
            .iter_mut()
            .find(|(t, _)| t == layer_type)
            .map(|(_, l)| l)
    }

    /// Mutable list for a layer type, created empty at the end if missing.
    pub fn entry(&mut self, layer_type: &str) -> &mut Vec<Layer> {
        let pos = match self.0.iter().position(|(t, _)| t == layer_type) {
            Some(pos) => pos,
            None => {
                self.0.push((layer_type.to_string(), Vec::new()));
                self.0.len() - 1
            }
        };
        &mut self.0[pos].1
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(t, _)| t.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Layer])> {
        self.0.iter().map(|(t, l)| (t.as_str(), l.as_slice()))
    }
}

impl FromIterator<(String, Vec<Layer>)> for Layers {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Layer>)>>(iter: I) -> Self {
        let mut layers = Self::new();
        for (t, list) in iter {
            layers.entry(&t).extend(list);
        }
        layers
    }
}

impl Serialize for Layers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (t, list) in &self.0 {
            map.serialize_entry(t, list)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Layers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LayersVisitor;

        impl<'de> Visitor<'de> for LayersVisitor {
            type Value = Layers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of layer type to layer list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Layers, A::Error> {
                let mut entries = Vec::new();
                while let Some((t, list)) = access.next_entry::<String, Vec<Layer>>()? {
                    entries.push((t, list));
                }
                Ok(entries.into_iter().collect())
            }
        }

        deserializer.deserialize_map(LayersVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn two_char_geoid_is_state() {
        assert_eq!(Kind::of_geoid("06"), Kind::State);
    }

    #[test]
    fn longer_geoid_is_county() {
        assert_eq!(Kind::of_geoid("06037"), Kind::County);
        assert_eq!(Kind::of_geoid("060"), Kind::County);
    }

    #[test]
    fn short_geoid_is_county() {
        assert_eq!(Kind::of_geoid("6"), Kind::County);
    }

    #[test]
    fn parse_census_block_with_space_in_key() {
        let record: Record = serde_json::from_value(json!({
            "coverage": {
                "US Census": {"geoid": "06037", "name": "Los Angeles", "state": "California"},
                "country": "us",
                "state": "CA",
                "county": "Los Angeles"
            }
        }))
        .unwrap();

        assert_eq!(record.geoid(), Some("06037"));
        assert_eq!(record.name(), "Los Angeles");
        assert_eq!(record.state_name(), Some("California"));
        assert_eq!(record.state_code(), Some("CA"));
        assert_eq!(record.country(), "us");
        assert_eq!(record.county(), Some("Los Angeles"));
    }

    #[test]
    fn state_name_falls_back_to_coverage_state() {
        let record: Record = serde_json::from_value(json!({
            "coverage": {"US Census": {"geoid": "06"}, "state": "ca"}
        }))
        .unwrap();
        assert_eq!(record.state_name(), Some("ca"));
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let record: Record = serde_json::from_value(json!({
            "coverage": {"US Census": {"geoid": "", "state": ""}}
        }))
        .unwrap();
        assert_eq!(record.geoid(), None);
        assert_eq!(record.state_name(), None);
    }

    #[test]
    fn schema_defaults_to_one() {
        let record = Record::default();
        assert_eq!(record.schema(), 1);
        assert_eq!(record.schema, None);
    }

    #[test]
    fn layers_keep_declaration_order() {
        let record: Record = serde_json::from_value(json!({
            "layers": {"parcels": [], "addresses": [], "buildings": []}
        }))
        .unwrap();
        assert_eq!(record.layer_types(), vec!["parcels", "addresses", "buildings"]);
    }

    #[test]
    fn layers_entry_appends_new_types() {
        let mut layers = Layers::with_types(KNOWN_LAYER_TYPES);
        layers.entry("roads").push(Layer::default());
        layers.entry("addresses").push(Layer::default());

        let types: Vec<&str> = layers.types().collect();
        assert_eq!(types, vec!["addresses", "parcels", "buildings", "roads"]);
        assert_eq!(layers.get("addresses").unwrap().len(), 1);
        assert_eq!(layers.get("parcels").unwrap().len(), 0);
    }

    #[test]
    fn unknown_fields_survive_reserialization() {
        let input = json!({
            "coverage": {"US Census": {"geoid": "06037", "fips": "x"}, "ISO 3166": {"alpha2": "US-CA"}},
            "layers": {"addresses": [{"name": "a", "data": "d", "protocol": "http", "attribution": "me"}]},
            "notes": "kept"
        });
        let record: Record = serde_json::from_value(input.clone()).unwrap();
        let output = serde_json::to_value(&record).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn license_may_be_a_plain_string() {
        let layer: Layer = serde_json::from_value(json!({
            "name": "n", "data": "d", "protocol": "http", "license": "CC0"
        }))
        .unwrap();
        assert_eq!(layer.license, Some(json!("CC0")));
    }

    #[test]
    fn malformed_layer_list_is_an_error() {
        let result: Result<Record, _> =
            serde_json::from_value(json!({"layers": {"addresses": "nope"}}));
        assert!(result.is_err());
    }
}

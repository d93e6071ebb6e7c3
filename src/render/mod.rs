//! Record rendering.
//!
//! Two independent, pure encodings of a [`Record`]:
//!
//! | Function | Output |
//! |----------|--------|
//! | [`to_canonical_json`] | Pretty-printed JSON, two-space indent, fields in model order |
//! | [`to_document`] | YAML front matter + Markdown body, shaped by [`Kind`] |
//!
//! Neither touches the filesystem. Missing optional fields degrade to empty
//! sections or placeholders, never to an error.

mod front_matter;
mod markdown;

pub use front_matter::DELIMITER;

use crate::record::{Kind, Record};

/// Structural JSON encoding of `record` as held in memory.
pub fn to_canonical_json(record: &Record) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(record)
}

/// Front matter followed by the Markdown body for `kind`.
pub fn to_document(record: &Record, kind: Kind) -> String {
    let body = match kind {
        Kind::County => markdown::render_county(record),
        Kind::State => markdown::render_state(record),
    };
    format!("{}\n{}", front_matter::render(record, kind), body)
}

/// Split a rendered document into its front matter (without delimiters) and
/// body. `None` when the text does not open with a front matter block.
pub fn split_front_matter(document: &str) -> Option<(&str, &str)> {
    let rest = document.strip_prefix(DELIMITER)?.strip_prefix('\n')?;
    let end = rest.find(&format!("\n{DELIMITER}\n"))?;
    let yaml = &rest[..end + 1];
    let body = &rest[end + DELIMITER.len() + 2..];
    Some((yaml, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use serde_json::json;

    fn front_matter_yaml(doc: &str) -> serde_yaml::Value {
        let (yaml, _) = split_front_matter(doc).expect("front matter block");
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn canonical_json_uses_two_space_indent() {
        let record = state_record("06", "California", "CA");
        let json = to_canonical_json(&record).unwrap();
        assert!(json.starts_with("{\n  \"coverage\": {\n    \"US Census\": {\n      \"geoid\": \"06\""));
    }

    #[test]
    fn canonical_json_round_trips() {
        let mut record = county_record("06037", "Los Angeles", "California", "CA");
        record.description = Some("Line one\nLine \"two\"".into());
        let json = to_canonical_json(&record).unwrap();
        let parsed: crate::record::Record = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn canonical_json_keeps_field_order() {
        let record = county_record("06037", "Los Angeles", "California", "CA");
        let json = to_canonical_json(&record).unwrap();
        let coverage = json.find("\"coverage\"").unwrap();
        let layers = json.find("\"layers\"").unwrap();
        let name = json.find("\"name\": \"county\"").unwrap();
        let data = json.find("\"data\"").unwrap();
        assert!(coverage < layers);
        assert!(name < data);
    }

    #[test]
    fn document_is_front_matter_then_body() {
        let record = county_record("06037", "Los Angeles", "California", "CA");
        let doc = to_document(&record, Kind::County);
        let (_, body) = split_front_matter(&doc).unwrap();
        assert!(doc.starts_with("---\ntitle: \"Los Angeles\"\n"));
        assert!(body.starts_with("\n# Los Angeles County"));
    }

    #[test]
    fn front_matter_parses_as_yaml() {
        let record = county_record("06037", "Los Angeles", "California", "CA");
        let yaml = front_matter_yaml(&to_document(&record, Kind::County));

        assert_eq!(yaml["title"].as_str(), Some("Los Angeles"));
        assert_eq!(yaml["geoid"].as_str(), Some("06037"));
        assert_eq!(yaml["state"].as_str(), Some("California"));
        assert_eq!(yaml["county"].as_str(), Some("Los Angeles"));
        assert_eq!(yaml["schema"].as_u64(), Some(1));
        let fields = &yaml["layers"]["addresses"][0]["conform"]["number"]["fields"];
        assert_eq!(fields[0].as_str(), Some("house_number"));
    }

    #[test]
    fn escaped_strings_parse_back() {
        let mut record = county_record("06037", "Los Angeles", "California", "CA");
        let layers = record.layers.as_mut().unwrap();
        let mut l = layer("The \"Official\" Roll", "https://example.com/a.zip?x=1#y");
        l.license = Some(json!({"text": "Use \"as is\"\nno warranty", "url": "C:\\share\\lic"}));
        l.conform = Some(json!({"street": [{"function": "regexp", "pattern": "^(\\d+): \"(.*)\"$"}]}));
        layers.entry("parcels").push(l);

        let yaml = front_matter_yaml(&to_document(&record, Kind::County));
        let parcel = &yaml["layers"]["parcels"][0];
        assert_eq!(parcel["name"].as_str(), Some("The \"Official\" Roll"));
        assert_eq!(parcel["data"].as_str(), Some("https://example.com/a.zip?x=1#y"));
        assert_eq!(parcel["license"]["text"].as_str(), Some("Use \"as is\" no warranty"));
        assert_eq!(parcel["license"]["url"].as_str(), Some("C:\\share\\lic"));
        assert_eq!(
            parcel["conform"]["street"][0]["pattern"].as_str(),
            Some("^(\\d+): \"(.*)\"$")
        );
    }

    #[test]
    fn keys_that_look_like_scalars_parse_back_as_strings() {
        let mut record = county_record("06037", "Los Angeles", "California", "CA");
        let mut l = layer("codes", "https://example.com/c.zip");
        l.conform = Some(json!({"null": "a", "true": "b", "10": "c"}));
        record.layers.as_mut().unwrap().entry("parcels").push(l);

        let yaml = front_matter_yaml(&to_document(&record, Kind::County));
        let conform = &yaml["layers"]["parcels"][0]["conform"];
        assert_eq!(conform.get("null").and_then(|v| v.as_str()), Some("a"));
        assert_eq!(conform.get("true").and_then(|v| v.as_str()), Some("b"));
        assert_eq!(conform.get("10").and_then(|v| v.as_str()), Some("c"));
    }

    #[test]
    fn control_characters_parse_back() {
        let mut record = county_record("06037", "Los Angeles", "California", "CA");
        let mut l = layer("bell", "https://example.com/b.zip");
        l.license = Some(json!({"text": "bell\u{7}here\ttab"}));
        record.layers.as_mut().unwrap().entry("parcels").push(l);

        let yaml = front_matter_yaml(&to_document(&record, Kind::County));
        assert_eq!(
            yaml["layers"]["parcels"][0]["license"]["text"].as_str(),
            Some("bell\u{7}here\ttab")
        );
    }

    #[test]
    fn state_document_front_matter() {
        let record = state_record("06", "California", "CA");
        let yaml = front_matter_yaml(&to_document(&record, Kind::State));
        assert_eq!(yaml["title"].as_str(), Some("California State"));
        assert_eq!(yaml["type"].as_str(), Some("state"));
        assert!(yaml.get("county").is_none());
    }

    #[test]
    fn split_front_matter_rejects_plain_markdown() {
        assert!(split_front_matter("# Just a heading\n").is_none());
    }
}

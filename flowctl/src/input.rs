//! Collection of entity payloads from `--data` and `--file` arguments.
//!
//! Each input text may hold a single JSON object or an array of objects;
//! multiple inputs are processed as if concatenated into one array, in
//! argument order (`--data` first, then files). All input checks happen
//! before any network call.

use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::Value;

pub fn collect_entities(data: Option<&str>, files: &[PathBuf]) -> Result<Vec<Value>> {
    let mut texts = Vec::new();
    if let Some(data) = data {
        texts.push(data.to_string());
    }
    for path in files {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                bail!("file not found: {}", path.display())
            }
            Err(err) => {
                return Err(err).with_context(|| format!("could not read {}", path.display()));
            }
        };
        texts.push(text);
    }

    if texts.iter().all(|text| text.trim().is_empty()) {
        bail!("Data cannot be empty");
    }

    let mut entities = Vec::new();
    for text in &texts {
        if text.trim().is_empty() {
            continue;
        }
        let value: Value =
            serde_json::from_str(text).context("could not parse JSON input")?;
        match value {
            Value::Array(items) => entities.extend(items),
            other => entities.push(other),
        }
    }

    for entity in &entities {
        if !entity.is_object() {
            bail!("Data must be a JSON object or an array of JSON objects");
        }
    }
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use super::*;

    #[test]
    fn empty_input_is_rejected_before_parsing() {
        let err = collect_entities(None, &[]).unwrap_err();
        assert_eq!(err.to_string(), "Data cannot be empty");
        let err = collect_entities(Some("   "), &[]).unwrap_err();
        assert_eq!(err.to_string(), "Data cannot be empty");
    }

    #[test]
    fn missing_file_is_distinguished_from_other_io_errors() {
        let err = collect_entities(None, &[PathBuf::from("/no/such/file.json")]).unwrap_err();
        assert!(err.to_string().starts_with("file not found:"));
    }

    #[test]
    fn single_object_becomes_one_element() {
        let entities = collect_entities(Some(r#"{"name": "a"}"#), &[]).unwrap();
        assert_eq!(entities, vec![json!({"name": "a"})]);
    }

    #[test]
    fn inputs_concatenate_in_argument_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        let mut file = fs::File::create(&first).unwrap();
        write!(file, r#"[{{"name": "b"}}, {{"name": "c"}}]"#).unwrap();
        let mut file = fs::File::create(&second).unwrap();
        write!(file, r#"{{"name": "d"}}"#).unwrap();

        let entities =
            collect_entities(Some(r#"{"name": "a"}"#), &[first, second]).unwrap();
        let names: Vec<_> = entities
            .iter()
            .map(|entity| entity["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = collect_entities(Some("{not json"), &[]).unwrap_err();
        assert!(err.to_string().contains("could not parse JSON input"));
    }

    #[test]
    fn non_object_elements_are_rejected() {
        let err = collect_entities(Some("[1, 2]"), &[]).unwrap_err();
        assert!(err.to_string().contains("JSON object"));
    }
}

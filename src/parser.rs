//! Input file parsing

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::LoaderError;
use crate::models::OrderRecord;

/// Read a JSON export and decode it into order records.
///
/// The whole file is read into memory. The top level must be an array of
/// objects; anything else is a [`LoaderError::Format`].
pub fn parse_orders(path: &Path) -> Result<Vec<OrderRecord>, LoaderError> {
    tracing::info!("Trying to load data from file {}", path.display());

    let content = fs::read_to_string(path).map_err(|e| {
        let err = match e.kind() {
            ErrorKind::NotFound => LoaderError::NotFound(path.to_path_buf()),
            ErrorKind::InvalidData => LoaderError::Format {
                path: path.to_path_buf(),
                reason: "file is not valid UTF-8".to_string(),
            },
            _ => LoaderError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        };
        tracing::error!("{}", err);
        err
    })?;

    let records = parse_orders_str(&content).map_err(|reason| {
        let err = LoaderError::Format {
            path: path.to_path_buf(),
            reason,
        };
        tracing::error!("JSON decoding error in file {}: {}", path.display(), err);
        err
    })?;

    tracing::info!("Data loaded successfully. Count rows: {}", records.len());
    Ok(records)
}

/// Decode order records from JSON text
pub fn parse_orders_str(content: &str) -> Result<Vec<OrderRecord>, String> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(format!(
                "expected a JSON array of orders, found {}",
                json_kind(&other)
            ));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(format!(
                    "record {} is {}, expected an object",
                    index,
                    json_kind(&item)
                ));
            }
            serde_json::from_value(item).map_err(|e| format!("record {}: {}", index, e))
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_valid_file() {
        let file = write_temp(
            r#"[
                {"order_id":"A1","status":"paid","date":"01.02.2024","amount":99.5,"customer":{"region":"MSK"}},
                {"order_id":"A2","status":"new","date":"15.03.2024","amount":10,"customer":{"region":"SPB"}}
            ]"#,
        );

        let records = parse_orders(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].order_id.as_deref(), Some("A1"));
        assert_eq!(records[1].customer_region(), Some("SPB"));
    }

    #[test]
    fn test_parse_preserves_input_order() {
        let file = write_temp(r#"[{"order_id":"z"},{"order_id":"a"},{"order_id":"m"}]"#);
        let ids: Vec<_> = parse_orders(file.path())
            .unwrap()
            .into_iter()
            .map(|r| r.order_id.unwrap())
            .collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_parse_empty_array() {
        let file = write_temp("[]");
        assert!(parse_orders(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        let err = parse_orders(&path).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(p) if p == path));
    }

    #[test]
    fn test_malformed_json() {
        let file = write_temp(r#"[{"order_id":"A1","#);
        let err = parse_orders(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::Format { .. }));
    }

    #[test]
    fn test_top_level_object_rejected() {
        let err = parse_orders_str(r#"{"order_id":"A1"}"#).unwrap_err();
        assert!(err.contains("expected a JSON array"));
    }

    #[test]
    fn test_non_object_element_rejected() {
        let err = parse_orders_str(r#"[{"order_id":"A1"}, 42]"#).unwrap_err();
        assert!(err.contains("record 1"));
    }

    #[test]
    fn test_wrong_field_type_rejected() {
        let err = parse_orders_str(r#"[{"order_id":"A1","amount":"lots"}]"#).unwrap_err();
        assert!(err.starts_with("record 0"));
    }

    #[test]
    fn test_invalid_utf8_is_format_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[b'[', 0xff, 0xfe, b']']).unwrap();

        let err = parse_orders(file.path()).unwrap_err();
        assert!(
            matches!(err, LoaderError::Format { ref reason, .. } if reason == "file is not valid UTF-8")
        );
    }

    #[test]
    fn test_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = parse_orders(dir.path()).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }
}

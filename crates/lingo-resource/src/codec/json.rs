//! JSON resource codec
//!
//! Uses serde_json. Nested objects become dotted keys; a member named `""`
//! holds the value of a key that is also the parent of other keys.

use serde_json::{Map, Value};
use std::path::Path;

use super::{ResourceCodec, Translations, WriteOptions};
use crate::error::StoreError;

/// Member name carrying an object's own value
const SELF_MEMBER: &str = "";

/// JSON codec
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ResourceCodec for JsonCodec {
    fn decode(&self, content: &str, path: &Path) -> Result<Translations, StoreError> {
        if content.trim().is_empty() {
            return Ok(Translations::new());
        }

        let value: Value = serde_json::from_str(content)
            .map_err(|e| StoreError::parse_error(path, format!("JSON parse error: {e}")))?;
        let Value::Object(root) = value else {
            return Err(StoreError::parse_error(path, "top-level value must be an object"));
        };

        let mut out = Translations::new();
        flatten(&root, "", &mut out, path)?;
        Ok(out)
    }

    fn encode(&self, translations: &Translations, options: WriteOptions, path: &Path) -> Result<String, StoreError> {
        let mut root = Map::new();
        for (key, text) in translations {
            insert_nested(&mut root, key, text, path)?;
        }

        let root = Value::Object(root);
        let encoded = if options.pretty {
            serde_json::to_string_pretty(&root).map(|mut s| {
                s.push('\n');
                s
            })
        } else {
            serde_json::to_string(&root)
        };
        encoded.map_err(|e| StoreError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }
}

fn flatten(map: &Map<String, Value>, prefix: &str, out: &mut Translations, path: &Path) -> Result<(), StoreError> {
    for (name, value) in map {
        let key = match (prefix.is_empty(), name.is_empty()) {
            (_, true) => prefix.to_string(),
            (true, false) => name.clone(),
            (false, false) => format!("{prefix}.{name}"),
        };

        match value {
            Value::Object(children) => flatten(children, &key, out, path)?,
            Value::Array(_) => {
                return Err(StoreError::parse_error(path, format!("arrays are not supported (at '{key}')")));
            }
            _ if key.is_empty() => {
                tracing::warn!(path = %path.display(), "ignoring value without a key");
            }
            Value::String(text) => {
                out.insert(key, text.clone());
            }
            Value::Null => {
                out.insert(key, String::new());
            }
            other => {
                out.insert(key, other.to_string());
            }
        }
    }
    Ok(())
}

fn insert_nested(root: &mut Map<String, Value>, key: &str, text: &str, path: &Path) -> Result<(), StoreError> {
    let segments: Vec<&str> = key.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return Ok(());
    };

    let mut current = root;
    for segment in parents {
        let entry = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            // value of a key that turned out to have children
            let own = entry.take();
            let mut promoted = Map::new();
            promoted.insert(SELF_MEMBER.to_string(), own);
            *entry = Value::Object(promoted);
        }
        current = entry.as_object_mut().ok_or_else(|| StoreError::Encode {
            path: path.to_path_buf(),
            message: format!("cannot nest '{key}'"),
        })?;
    }

    match current.get_mut(*last) {
        Some(Value::Object(children)) => {
            children.insert(SELF_MEMBER.to_string(), Value::String(text.to_string()));
        }
        _ => {
            current.insert((*last).to_string(), Value::String(text.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode(content: &str) -> Translations {
        JsonCodec.decode(content, Path::new("test.json")).unwrap()
    }

    fn encode(translations: &Translations, pretty: bool) -> String {
        JsonCodec
            .encode(translations, WriteOptions { pretty }, Path::new("test.json"))
            .unwrap()
    }

    fn map(pairs: &[(&str, &str)]) -> Translations {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn decode_flattens_nested_objects() {
        let out = decode(r#"{"menu": {"file": {"open": "Open", "close": "Close"}}, "title": "App"}"#);
        assert_eq!(
            out,
            map(&[("menu.file.close", "Close"), ("menu.file.open", "Open"), ("title", "App")])
        );
    }

    #[test]
    fn decode_empty_content_is_empty() {
        assert!(decode("").is_empty());
        assert!(decode("  \n").is_empty());
        assert!(decode("{}").is_empty());
    }

    #[test]
    fn decode_scalars_and_null() {
        let out = decode(r#"{"count": 3, "flag": true, "none": null}"#);
        assert_eq!(out, map(&[("count", "3"), ("flag", "true"), ("none", "")]));
    }

    #[test]
    fn decode_self_member_as_parent_value() {
        let out = decode(r#"{"a": {"": "A", "b": "B"}}"#);
        assert_eq!(out, map(&[("a", "A"), ("a.b", "B")]));
    }

    #[test]
    fn decode_rejects_arrays_and_non_objects() {
        assert!(JsonCodec.decode(r#"{"a": [1]}"#, Path::new("x.json")).is_err());
        assert!(JsonCodec.decode(r#"["a"]"#, Path::new("x.json")).is_err());
        assert!(JsonCodec.decode(r#"{"a": "#, Path::new("x.json")).is_err());
    }

    #[test]
    fn encode_nests_and_sorts() {
        let out = encode(&map(&[("b", "2"), ("a.y", "1"), ("a.x", "0")]), false);
        assert_eq!(out, r#"{"a":{"x":"0","y":"1"},"b":"2"}"#);
    }

    #[test]
    fn encode_dual_role_key_uses_self_member() {
        let original = map(&[("a", "A"), ("a.b", "B")]);
        let out = encode(&original, false);
        assert_eq!(out, r#"{"a":{"":"A","b":"B"}}"#);
        assert_eq!(decode(&out), original);
    }

    #[test]
    fn encode_pretty_is_indented() {
        let out = encode(&map(&[("a", "1")]), true);
        assert_eq!(out, "{\n  \"a\": \"1\"\n}\n");
    }
}

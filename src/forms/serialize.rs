use serde_json::{Map, Value};
use tracing::debug;

/// Collect form fields into a JSON object.
///
/// A field named `name[key]` is stored as `{"name": {"key": value}}`. Only the
/// first bracket pair is interpreted, so `a[b][c]` lands under `a` as `"b"`.
/// Later plain fields overwrite earlier ones with the same name.
pub fn serialize_fields<K, V>(fields: &[(K, V)]) -> Map<String, Value>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut json = Map::new();

    for (key, value) in fields {
        let key = key.as_ref();
        let value = Value::String(value.as_ref().to_string());

        match split_bracket_key(key) {
            Some((main_key, sub_key)) => insert_nested(&mut json, main_key, sub_key, value),
            None => {
                json.insert(key.to_string(), value);
            }
        }
    }

    json
}

/// Split `name[key]` into `("name", "key")`
fn split_bracket_key(key: &str) -> Option<(&str, &str)> {
    let open = key.find('[')?;
    let close = key.find(']')?;

    let main_key = &key[..open];
    let (start, end) = if open < close {
        (open + 1, close)
    } else {
        (close, open + 1)
    };

    Some((main_key, &key[start..end]))
}

fn insert_nested(json: &mut Map<String, Value>, main_key: &str, sub_key: &str, value: Value) {
    let entry = json
        .entry(main_key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));

    // An empty plain value counts as unset and is replaced
    if matches!(entry, Value::String(s) if s.is_empty()) {
        *entry = Value::Object(Map::new());
    }

    match entry {
        Value::Object(nested) => {
            nested.insert(sub_key.to_string(), value);
        }
        _ => {
            debug!(field = main_key, sub_key, "Field already holds a plain value, ignoring nested value");
        }
    }
}

/// Parse an `application/x-www-form-urlencoded` body into ordered fields
pub fn parse_urlencoded(body: &str) -> Result<Vec<(String, String)>, serde_urlencoded::de::Error> {
    serde_urlencoded::from_str(body)
}

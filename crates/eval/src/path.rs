//! Property path resolution.
//!
//! Paths use the familiar accessor syntax of object-path utilities:
//! `a.b`, `a[0].b`, `a["key.with.dots"]`, `list.0`, `name.length`.
//! Resolution never fails; an unresolvable path yields `None`.

use std::borrow::Cow;

use serde_json::Value;

/// Resolve `path` against `root`.
///
/// Values are borrowed from the property bag; synthesized values (the
/// `length` of an array or string, a single character of a string) are
/// owned.
pub fn resolve<'a>(root: Option<&'a Value>, path: &str) -> Option<Cow<'a, Value>> {
    let root = root?;

    // A literal key wins over path syntax.
    if let Value::Object(map) = root {
        if let Some(v) = map.get(path) {
            return Some(Cow::Borrowed(v));
        }
    }

    let mut current = Cow::Borrowed(root);
    for key in parse_keys(path) {
        current = match current {
            Cow::Borrowed(v) => step(v, &key)?,
            Cow::Owned(v) => Cow::Owned(step(&v, &key)?.into_owned()),
        };
    }
    Some(current)
}

/// Split a path into its keys.
pub fn parse_keys(path: &str) -> Vec<String> {
    let mut keys = Vec::new();
    let mut buf = String::new();
    let mut after_bracket = false;
    let mut chars = path.chars().peekable();

    if path.starts_with('.') {
        keys.push(String::new());
        chars.next();
    }

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if !after_bracket || !buf.is_empty() {
                    keys.push(std::mem::take(&mut buf));
                }
                after_bracket = false;
            }
            '[' => {
                if !buf.is_empty() {
                    keys.push(std::mem::take(&mut buf));
                }
                let mut key = String::new();
                let mut closed = false;
                match chars.peek() {
                    Some(&q) if q == '"' || q == '\'' => {
                        chars.next();
                        while let Some(c) = chars.next() {
                            match c {
                                '\\' => {
                                    if let Some(escaped) = chars.next() {
                                        key.push(escaped);
                                    }
                                }
                                c if c == q => break,
                                c => key.push(c),
                            }
                        }
                        // Skip to the closing bracket.
                        for c in chars.by_ref() {
                            if c == ']' {
                                closed = true;
                                break;
                            }
                        }
                    }
                    _ => {
                        for c in chars.by_ref() {
                            if c == ']' {
                                closed = true;
                                break;
                            }
                            key.push(c);
                        }
                        // Only numbers stay whole inside unquoted brackets;
                        // anything else is read as plain dotted segments.
                        if !(closed && is_bracket_number(&key)) && !key.is_empty() {
                            keys.extend(
                                key.split('.')
                                    .filter(|s| !s.is_empty())
                                    .map(str::to_owned),
                            );
                            after_bracket = closed;
                            continue;
                        }
                    }
                }
                keys.push(key);
                after_bracket = closed;
            }
            c => {
                buf.push(c);
                after_bracket = false;
            }
        }
    }

    if !buf.is_empty() || (!after_bracket && path.ends_with('.')) {
        keys.push(buf);
    }
    keys
}

fn step<'a>(value: &'a Value, key: &str) -> Option<Cow<'a, Value>> {
    match value {
        Value::Object(map) => map.get(key).map(Cow::Borrowed),
        Value::Array(items) => {
            if key == "length" {
                return Some(Cow::Owned(Value::from(items.len())));
            }
            items.get(parse_index(key)?).map(Cow::Borrowed)
        }
        Value::String(s) => {
            let units: Vec<u16> = s.encode_utf16().collect();
            if key == "length" {
                return Some(Cow::Owned(Value::from(units.len())));
            }
            let unit = *units.get(parse_index(key)?)?;
            Some(Cow::Owned(Value::String(String::from_utf16_lossy(&[unit]))))
        }
        _ => None,
    }
}

/// `-?\d+(\.\d+)?`
fn is_bracket_number(key: &str) -> bool {
    let digits = key.strip_prefix('-').unwrap_or(key);
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(int) && frac.map_or(true, all_digits)
}

/// Canonical non-negative integer keys only: `"01"` does not index.
fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn get(root: &Value, path: &str) -> Option<Value> {
        resolve(Some(root), path).map(Cow::into_owned)
    }

    #[test]
    fn dotted_path() {
        let props = json!({ "a": { "b": { "c": 1 } } });
        assert_eq!(get(&props, "a.b.c"), Some(json!(1)));
        assert_eq!(get(&props, "a.b"), Some(json!({ "c": 1 })));
        assert_eq!(get(&props, "a.x.c"), None);
    }

    #[test]
    fn bracket_indices() {
        let props = json!({ "items": [{ "name": "first" }, { "name": "second" }] });
        assert_eq!(get(&props, "items[1].name"), Some(json!("second")));
        assert_eq!(get(&props, "items.0.name"), Some(json!("first")));
        assert_eq!(get(&props, "items[2].name"), None);
        assert_eq!(get(&props, "items[01]"), None);
    }

    #[test]
    fn quoted_keys() {
        let props = json!({ "a": { "x.y": 3, "it's": 4 } });
        assert_eq!(get(&props, "a[\"x.y\"]"), Some(json!(3)));
        assert_eq!(get(&props, "a['x.y']"), Some(json!(3)));
        assert_eq!(get(&props, "a['it\\'s']"), Some(json!(4)));
    }

    #[test]
    fn unquoted_bracket_with_dots_is_split() {
        let props = json!({ "a": { "b": { "c": 1 }, "b.c": 2 } });
        assert_eq!(get(&props, "a[b.c]"), Some(json!(1)));
        assert_eq!(get(&props, "a[\"b.c\"]"), Some(json!(2)));
    }

    #[test]
    fn literal_key_wins() {
        let props = json!({ "a.b": "literal", "a": { "b": "nested" } });
        assert_eq!(get(&props, "a.b"), Some(json!("literal")));
    }

    #[test]
    fn length_and_string_indexing() {
        let props = json!({ "list": [1, 2, 3], "name": "héllo" });
        assert_eq!(get(&props, "list.length"), Some(json!(3)));
        assert_eq!(get(&props, "name.length"), Some(json!(5)));
        assert_eq!(get(&props, "name[1]"), Some(json!("é")));
        assert_eq!(get(&props, "name.length.foo"), None);
    }

    #[test]
    fn null_and_missing() {
        let props = json!({ "a": null });
        assert_eq!(get(&props, "a"), Some(json!(null)));
        assert_eq!(get(&props, "a.b"), None);
        assert_eq!(resolve(None, "a"), None);
        assert_eq!(get(&json!(5), "a"), None);
    }

    #[test]
    fn key_splitting() {
        assert_eq!(parse_keys("a.b"), vec!["a", "b"]);
        assert_eq!(parse_keys("a[0].b"), vec!["a", "0", "b"]);
        assert_eq!(parse_keys("a[0][1]"), vec!["a", "0", "1"]);
        assert_eq!(parse_keys("a[key]"), vec!["a", "key"]);
        assert_eq!(parse_keys("a[b.c]"), vec!["a", "b", "c"]);
        assert_eq!(parse_keys("a[b.c].d"), vec!["a", "b", "c", "d"]);
        assert_eq!(parse_keys("a[-1]"), vec!["a", "-1"]);
        assert_eq!(parse_keys("a[1.5]"), vec!["a", "1.5"]);
        assert_eq!(parse_keys("a['b.c']"), vec!["a", "b.c"]);
        assert_eq!(parse_keys(".a"), vec!["", "a"]);
        assert_eq!(parse_keys("a..b"), vec!["a", "", "b"]);
        assert_eq!(parse_keys("a."), vec!["a", ""]);
    }
}

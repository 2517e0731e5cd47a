//! Locating JSON payloads embedded in HTML and searching decoded trees.
//!
//! Platforms inline their bootstrap state in `<script>` tags in several
//! shapes. These helpers cut the JSON out of the surrounding text and find
//! the user-shaped object inside it without knowing the exact path.

use serde_json::Value;

/// Deepest nesting [`find_by_signature`] will descend into.
pub const MAX_SEARCH_DEPTH: usize = 64;

/// Returns the text strictly between the first `start` marker and the next
/// `end` marker after it.
#[must_use]
pub fn extract_between_markers<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = text.find(start)? + start.len();
    let len = text[from..].find(end)?;
    Some(&text[from..from + len])
}

/// Returns the balanced `{...}` object at the start of `s`.
///
/// Brackets inside string literals and escaped quotes are ignored. Returns
/// `None` if `s` does not start with `{` or the object is unterminated.
#[must_use]
pub fn extract_balanced_object(s: &str) -> Option<&str> {
    if !s.starts_with('{') {
        return None;
    }
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape = false;
    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            ']' => depth -= 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Finds `marker` in `text` and returns the balanced object that follows it,
/// skipping whitespace and any `=`/`(` between the marker and the `{`.
///
/// The object must close before the next `</script>`.
#[must_use]
pub fn object_after_marker<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    let script = extract_between_markers(text, marker, "</script>")?;
    let rest = script.trim_start_matches(|c: char| c.is_whitespace() || c == '=' || c == '(');
    extract_balanced_object(rest)
}

/// Depth-first search for the first object satisfying `matches`.
///
/// The root itself is tested first, then object members in key order
/// and array elements by index. Descent stops at [`MAX_SEARCH_DEPTH`].
#[must_use]
pub fn find_by_signature<'a, F>(root: &'a Value, matches: F) -> Option<&'a Value>
where
    F: Fn(&serde_json::Map<String, Value>) -> bool,
{
    search(root, &matches, 0)
}

fn search<'a, F>(value: &'a Value, matches: &F, depth: usize) -> Option<&'a Value>
where
    F: Fn(&serde_json::Map<String, Value>) -> bool,
{
    if depth > MAX_SEARCH_DEPTH {
        return None;
    }
    match value {
        Value::Object(map) => {
            if matches(map) {
                return Some(value);
            }
            map.values().find_map(|child| search(child, matches, depth + 1))
        }
        Value::Array(items) => items.iter().find_map(|child| search(child, matches, depth + 1)),
        _ => None,
    }
}

/// Non-empty string member, trimmed.
#[must_use]
pub fn str_field<'a>(map: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn between_markers_returns_inner_text() {
        let html = r#"<script>window.__DATA__ = {"a":1};</script>"#;
        assert_eq!(
            extract_between_markers(html, "window.__DATA__ = ", ";</script>"),
            Some(r#"{"a":1}"#)
        );
    }

    #[test]
    fn between_markers_missing_end_is_none() {
        assert_eq!(extract_between_markers("start{...", "start", "</script>"), None);
        assert_eq!(extract_between_markers("nothing here", "start", "end"), None);
    }

    #[test]
    fn balanced_object_ignores_braces_in_strings() {
        let s = r#"{"bio":"curly } brace \" and {","n":{"x":[1,2]}} trailing;"#;
        assert_eq!(
            extract_balanced_object(s),
            Some(r#"{"bio":"curly } brace \" and {","n":{"x":[1,2]}}"#)
        );
    }

    #[test]
    fn balanced_object_unterminated_is_none() {
        assert_eq!(extract_balanced_object(r#"{"a":{"b":1}"#), None);
        assert_eq!(extract_balanced_object("[1,2]"), None);
    }

    #[test]
    fn object_after_marker_skips_assignment() {
        let html = r#"<script>window._sharedData = {"config":{}};</script>"#;
        assert_eq!(
            object_after_marker(html, "window._sharedData"),
            Some(r#"{"config":{}}"#)
        );
    }

    #[test]
    fn object_after_marker_stays_inside_its_script() {
        let html = r#"<script>window._sharedData = {"config":</script><script>{"a":1}}</script>"#;
        assert_eq!(object_after_marker(html, "window._sharedData"), None);
    }

    #[test]
    fn find_by_signature_matches_root() {
        let v = json!({"username": "zuck", "biography": "hi"});
        let found = find_by_signature(&v, |m| m.contains_key("username")).unwrap();
        assert_eq!(found["username"], "zuck");
    }

    #[test]
    fn find_by_signature_searches_arrays_and_objects() {
        let v = json!({
            "require": [
                ["ScheduledServerJS", {"__bbox": {"result": {"data": {
                    "user": {"username": "zuck", "full_name": "Mark"}
                }}}}]
            ]
        });
        let found = find_by_signature(&v, |m| {
            str_field(m, "username").is_some() && m.contains_key("full_name")
        })
        .unwrap();
        assert_eq!(found["full_name"], "Mark");
    }

    #[test]
    fn find_by_signature_stops_at_depth_bound() {
        let mut v = json!({"username": "deep", "full_name": "Deep"});
        for _ in 0..(MAX_SEARCH_DEPTH + 10) {
            v = json!({ "next": v });
        }
        assert!(find_by_signature(&v, |m| m.contains_key("username")).is_none());
    }

    #[test]
    fn find_by_signature_without_match_is_none() {
        let v = json!([{"a": 1}, [2, 3], "x", null]);
        assert!(find_by_signature(&v, |m| m.contains_key("username")).is_none());
    }
}

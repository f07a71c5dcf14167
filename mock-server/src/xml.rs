//! bit.ly-style XML encoding of JSON payloads.
//!
//! Keys that cannot be tag names are written as `nodeKeyVal` entries with a
//! `nodeKey` child; scalar values of such entries go in `nodeValue`.

use serde_json::Value;

/// Full `<bitly>` envelope. With `docs`, each top-level result is written as
/// a `<doc>` record instead of under its own key.
pub fn envelope(code: i64, message: &str, status: &str, results: &Value, docs: bool) -> String {
    let mut out = String::from("<bitly>");
    out.push_str(&format!("<errorCode>{code}</errorCode>"));
    out.push_str(&format!("<errorMessage>{}</errorMessage>", escape(message)));
    out.push_str("<results>");
    match results {
        Value::Object(records) if docs => {
            for record in records.values() {
                out.push_str("<doc>");
                fields(&mut out, record);
                out.push_str("</doc>");
            }
        }
        Value::Null => {}
        other => fields(&mut out, other),
    }
    out.push_str("</results>");
    out.push_str(&format!("<statusCode>{}</statusCode>", escape(status)));
    out.push_str("</bitly>");
    out
}

fn fields(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                entry(out, key, value);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                entry(out, &index.to_string(), item);
            }
        }
        scalar => out.push_str(&escape(&text(scalar))),
    }
}

fn entry(out: &mut String, key: &str, value: &Value) {
    if is_tag_name(key) {
        element(out, key, value);
        return;
    }
    out.push_str("<nodeKeyVal>");
    out.push_str(&format!("<nodeKey>{}</nodeKey>", cdata(key)));
    match value {
        Value::Object(_) | Value::Array(_) => fields(out, value),
        scalar => out.push_str(&format!("<nodeValue>{}</nodeValue>", cdata(&text(scalar)))),
    }
    out.push_str("</nodeKeyVal>");
}

/// Arrays are written as index-keyed entries, so a one-item list stays
/// distinct from a plain field.
fn element(out: &mut String, name: &str, value: &Value) {
    out.push_str(&format!("<{name}>"));
    fields(out, value);
    out.push_str(&format!("</{name}>"));
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_tag_name(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    }
}

fn cdata(s: &str) -> String {
    format!("<![CDATA[{}]]>", s.replace("]]>", "]]]]><![CDATA[>"))
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

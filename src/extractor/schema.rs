use crate::error::ExtractionError;
use crate::models::SchemaInfo;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;

static SCRIPT_TYPE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script[type]").expect("script selector should be valid"));

const JSON_LD_MIME: &str = "application/ld+json";

/// Collects `@type` values from a JSON-LD document.
///
/// Looks at the top-level object, every element of a top-level array and
/// every member of an `@graph` list.
fn collect_types(value: &Value, types: &mut Vec<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_types(item, types);
            }
        }
        Value::Object(object) => {
            match object.get("@type") {
                Some(Value::String(name)) => types.push(name.clone()),
                Some(Value::Array(names)) => {
                    types.extend(names.iter().filter_map(Value::as_str).map(str::to_string));
                }
                _ => {}
            }
            if let Some(graph) = object.get("@graph") {
                collect_types(graph, types);
            }
        }
        _ => {}
    }
}

fn parse_block(raw: &str) -> Result<Vec<String>, ExtractionError> {
    let value: Value = serde_json::from_str(raw.trim())?;
    let mut types = Vec::new();
    collect_types(&value, &mut types);
    Ok(types)
}

/// Detects JSON-LD blocks and the schema.org types they declare.
/// Malformed blocks still count as blocks but contribute no types.
pub fn extract_schema(document: &Html) -> SchemaInfo {
    let mut info = SchemaInfo::default();

    let blocks = document.select(&SCRIPT_TYPE_SELECTOR).filter(|element| {
        element
            .value()
            .attr("type")
            .is_some_and(|kind| kind.trim().eq_ignore_ascii_case(JSON_LD_MIME))
    });

    for block in blocks {
        info.count += 1;

        match parse_block(&block.text().collect::<String>()) {
            Ok(types) => {
                for name in types {
                    if !info.types.contains(&name) {
                        info.types.push(name);
                    }
                }
            }
            Err(e) => tracing::debug!(error = %e, "Skipping JSON-LD block"),
        }
    }

    info.detected = info.count > 0;
    info.valid = !info.types.is_empty();
    info
}

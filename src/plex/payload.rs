//! Read-only views over remote payloads.
//!
//! The media server's tree arrives in one of two encodings: attributes sit
//! directly on each item (native JSON), or they are grouped under an
//! attribute holder (`$` or `@attributes`) when the payload was converted
//! from XML. `RawItem` hides the difference behind an ordered list of field
//! accessors.

use super::LiveFetchError;
use serde_json::Value;

/// Collection keys that may hold the items of a `MediaContainer`.
const ITEM_COLLECTIONS: [&str; 4] = ["Metadata", "Video", "Directory", "Track"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldAccess {
    Direct,
    AttributeHolder(&'static str),
}

/// Lookup order for every field: the item itself first, then each holder.
const FIELD_ACCESS_ORDER: [FieldAccess; 3] = [
    FieldAccess::Direct,
    FieldAccess::AttributeHolder("$"),
    FieldAccess::AttributeHolder("@attributes"),
];

impl FieldAccess {
    fn lookup<'a>(&self, item: &'a Value, field: &str) -> Option<&'a Value> {
        match self {
            FieldAccess::Direct => item.get(field),
            FieldAccess::AttributeHolder(holder) => item.get(*holder)?.get(field),
        }
    }
}

/// A body returned by the remote client, already parsed as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPayload(pub Value);

impl RawPayload {
    pub fn from_slice(body: &[u8]) -> Result<Self, LiveFetchError> {
        serde_json::from_slice(body)
            .map(RawPayload)
            .map_err(|e| LiveFetchError::malformed(format!("body is not JSON: {}", e)))
    }

    /// The `MediaContainer` envelope holding the items.
    pub fn container(&self) -> Result<RawItem<'_>, LiveFetchError> {
        match self.0.get("MediaContainer") {
            Some(container @ Value::Object(_)) => Ok(RawItem::new(container)),
            _ => Err(LiveFetchError::malformed("missing MediaContainer")),
        }
    }
}

/// A single or listed value, both read as a list.
pub fn array_or_single(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(item @ Value::Object(_)) => vec![item],
        _ => Vec::new(),
    }
}

/// Base-10 integer from a JSON number or numeric string.
fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn parse_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

#[derive(Debug, Clone, Copy)]
pub struct RawItem<'a> {
    value: &'a Value,
}

impl<'a> RawItem<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// First non-null value for `name` across the accessor strategies.
    pub fn field(&self, name: &str) -> Option<&'a Value> {
        FIELD_ACCESS_ORDER
            .iter()
            .filter_map(|access| access.lookup(self.value, name))
            .find(|v| !v.is_null())
    }

    /// Trimmed non-empty string. Numbers are rendered as text.
    pub fn text(&self, name: &str) -> Option<String> {
        match self.field(name)? {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.field(name).and_then(parse_int)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(parse_float)
    }

    /// Sub-elements such as `Media` or `Genre`, in document order.
    pub fn children(&self, name: &str) -> Vec<RawItem<'a>> {
        array_or_single(self.field(name))
            .into_iter()
            .map(RawItem::new)
            .collect()
    }

    pub fn first_child(&self, name: &str) -> Option<RawItem<'a>> {
        self.children(name).into_iter().next()
    }

    /// The `tag` attribute of every sub-element named `name`.
    pub fn tags(&self, name: &str) -> Vec<String> {
        self.children(name)
            .iter()
            .filter_map(|child| child.text("tag"))
            .collect()
    }

    /// Items held by a container under any of the known collection keys.
    pub fn items(&self) -> Vec<RawItem<'a>> {
        ITEM_COLLECTIONS
            .iter()
            .flat_map(|key| self.children(key))
            .collect()
    }
}

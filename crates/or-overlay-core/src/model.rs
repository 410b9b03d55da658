use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A priced model entry from the upstream catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRecord {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub pricing: Pricing,
}

/// Per-token prices as the API reports them: numeric strings, absent when
/// the model has no published price.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<String>,
}

/// Parse one raw catalog entry. Returns `None` when the entry has no id.
pub fn parse_record(data: &Value) -> Option<ModelRecord> {
    let id = data.get("id")?.as_str()?.to_string();
    let name = data.get("name").and_then(|v| v.as_str()).map(String::from);
    let pricing = data.get("pricing");

    Some(ModelRecord {
        id,
        name,
        pricing: Pricing {
            prompt: pricing.and_then(|p| price_str(p.get("prompt")?)),
            completion: pricing.and_then(|p| price_str(p.get("completion")?)),
        },
    })
}

/// Parse the catalog response body, `{ "data": [entry, ...] }`.
/// Entries without an id are skipped; a missing or malformed `data` array
/// yields an empty list.
pub fn parse_catalog(body: &Value) -> Vec<ModelRecord> {
    body.get("data")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(parse_record).collect())
        .unwrap_or_default()
}

// The API reports prices as strings; tolerate plain numbers too.
fn price_str(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

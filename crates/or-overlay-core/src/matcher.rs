use once_cell::sync::Lazy;
use regex::Regex;

use crate::lookup::{strip_version, PricingCatalog};
use crate::model::ModelRecord;

/// Leading path segments that are navigation pages, never model ids.
pub const SKIP_PREFIXES: &[&str] = &[
    "docs", "chat", "models", "rankings", "pricing", "apps",
    "settings", "keys", "activity", "credits", "api", "providers",
    "about", "announcements", "careers", "partners", "privacy",
    "terms", "support", "enterprise", "sdk",
];

static MODEL_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^/([a-z0-9_-]+)/([a-z0-9._-]+)").expect("valid regex"));

/// Resolve a link path like `/google/gemini-3-flash-preview` to a catalog
/// record.
///
/// Staged, first hit wins: exact `provider/slug` id, then bare slug, then
/// both again with a version-stripped slug. Each probe tries the key as
/// given and lowercased. Pure function of `(path, catalog)`.
pub fn resolve_path<'a>(path: &str, catalog: &'a PricingCatalog) -> Option<&'a ModelRecord> {
    let caps = MODEL_PATH.captures(path)?;
    let provider = caps.get(1)?.as_str();
    let slug = caps.get(2)?.as_str();

    if SKIP_PREFIXES.contains(&provider.to_lowercase().as_str()) {
        return None;
    }

    if let Some(model) = catalog.lookup_id(&format!("{provider}/{slug}")) {
        return Some(model);
    }
    if let Some(model) = catalog.lookup_slug(slug) {
        return Some(model);
    }

    // The path may carry a date or version suffix the catalog doesn't.
    let stripped = strip_version(slug);
    if stripped != slug {
        if let Some(model) = catalog.lookup_id(&format!("{provider}/{stripped}")) {
            return Some(model);
        }
        if let Some(model) = catalog.lookup_slug(&stripped) {
            return Some(model);
        }
    }

    None
}

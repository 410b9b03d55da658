use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::ModelRecord;

static TRAILING_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-\d{8}$").expect("valid regex"));
static TRAILING_MONTH_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-\d{2}-\d{2}$").expect("valid regex"));
static TRAILING_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-v?\d+(\.\d+)*$").expect("valid regex"));

/// Remove a trailing 8-digit date (`-20251217`), `-MM-DD`, or version
/// (`-v2`, `-1.5`) suffix. The three replacements run in sequence, so a
/// date strip can expose a version suffix that is then stripped as well.
/// Strings without any such suffix come back unchanged.
pub fn strip_version(s: &str) -> String {
    let s = TRAILING_DATE.replace(s, "").into_owned();
    let s = TRAILING_MONTH_DAY.replace(&s, "").into_owned();
    TRAILING_VERSION.replace(&s, "").into_owned()
}

/// Catalog of priced models plus derived lookup keys.
///
/// `byId` and `bySlug` hold indices into `models`, so every derived key for
/// a record resolves to the same entry. Built once per fetch cycle and
/// read-only afterward. Later records overwrite earlier ones for any shared
/// derived key: last in catalog order wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingCatalog {
    pub models: Vec<ModelRecord>,
    #[serde(rename = "byId")]
    by_id: HashMap<String, usize>,
    #[serde(rename = "bySlug")]
    by_slug: HashMap<String, usize>,
}

impl PricingCatalog {
    /// Build the lookup tables from a fetched model list, in catalog order.
    ///
    /// Each record is indexed by id and lowercased id, by version-stripped
    /// id when that differs, by the slug part of a two-part `provider/name`
    /// id (cased, lowercased, and version-stripped), and by its lowercased
    /// display name. Records with an empty id are not indexed.
    pub fn build(models: Vec<ModelRecord>) -> Self {
        let mut by_id = HashMap::new();
        let mut by_slug = HashMap::new();

        for (idx, model) in models.iter().enumerate() {
            if model.id.is_empty() {
                continue;
            }

            by_id.insert(model.id.clone(), idx);
            by_id.insert(model.id.to_lowercase(), idx);

            let stripped = strip_version(&model.id);
            if stripped != model.id {
                by_id.insert(stripped.to_lowercase(), idx);
                by_id.insert(stripped, idx);
            }

            let parts: Vec<&str> = model.id.split('/').collect();
            if let [_, name] = parts[..] {
                by_slug.insert(name.to_string(), idx);
                by_slug.insert(name.to_lowercase(), idx);

                let stripped = strip_version(name);
                if stripped != name {
                    by_slug.insert(stripped.to_lowercase(), idx);
                    by_slug.insert(stripped, idx);
                }
            }

            if let Some(name) = &model.name {
                by_slug.insert(name.to_lowercase(), idx);
            }
        }

        Self {
            models,
            by_id,
            by_slug,
        }
    }

    /// Probe the id table with the key as given, then lowercased.
    pub fn lookup_id(&self, key: &str) -> Option<&ModelRecord> {
        self.by_id
            .get(key)
            .or_else(|| self.by_id.get(key.to_lowercase().as_str()))
            .and_then(|&idx| self.models.get(idx))
    }

    /// Probe the slug table with the key as given, then lowercased.
    pub fn lookup_slug(&self, key: &str) -> Option<&ModelRecord> {
        self.by_slug
            .get(key)
            .or_else(|| self.by_slug.get(key.to_lowercase().as_str()))
            .and_then(|&idx| self.models.get(idx))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pricing;

    fn record(id: &str, name: Option<&str>) -> ModelRecord {
        ModelRecord {
            id: id.to_string(),
            name: name.map(String::from),
            pricing: Pricing::default(),
        }
    }

    #[test]
    fn strips_date_suffixes() {
        assert_eq!(
            strip_version("gemini-3-flash-preview-20251217"),
            "gemini-3-flash-preview"
        );
        assert_eq!(strip_version("claude-sonnet-20250514"), "claude-sonnet");
    }

    #[test]
    fn strips_month_day_suffixes() {
        assert_eq!(strip_version("gpt-4-turbo-04-09"), "gpt-4-turbo");
    }

    #[test]
    fn strips_version_suffixes() {
        assert_eq!(strip_version("gemini-pro-v2"), "gemini-pro");
        assert_eq!(strip_version("command-r-v1.5"), "command-r");
        assert_eq!(strip_version("llama-3.1"), "llama");
    }

    #[test]
    fn strip_chains_exposed_suffixes() {
        // The date strip leaves a trailing "-4", which the version strip
        // then removes.
        assert_eq!(strip_version("gpt-4-20251217"), "gpt");
    }

    #[test]
    fn strip_leaves_unsuffixed_strings_alone() {
        for s in ["gemini-3-flash-preview", "gpt-4o", "r1", "mixtral-8x7b"] {
            assert_eq!(strip_version(s), s);
        }
    }

    #[test]
    fn two_part_ids_round_trip_through_slug() {
        let catalog = PricingCatalog::build(vec![record("OpenAI/GPT-4", None)]);
        assert_eq!(catalog.lookup_slug("GPT-4").expect("cased slug").id, "OpenAI/GPT-4");
        assert!(catalog.lookup_slug("gpt-4").is_some());
        assert!(catalog.lookup_id("openai/gpt-4").is_some());
        assert!(catalog.lookup_id("OpenAI/GPT-4").is_some());
    }

    #[test]
    fn display_name_registered_lowercased() {
        let catalog = PricingCatalog::build(vec![record("google/gemini-pro", Some("Gemini Pro"))]);
        assert!(catalog.lookup_slug("gemini pro").is_some());
        assert!(catalog.lookup_slug("Gemini Pro").is_some());
    }

    #[test]
    fn later_records_win_shared_derived_keys() {
        let catalog = PricingCatalog::build(vec![
            record("openai/gpt-4-20240101", None),
            record("openai/gpt-4-20250101", None),
        ]);
        // Both ids strip to the same derived keys; the later record wins.
        let m = catalog.lookup_slug("gpt").expect("stripped slug");
        assert_eq!(m.id, "openai/gpt-4-20250101");
    }

    #[test]
    fn empty_ids_are_not_indexed() {
        let catalog = PricingCatalog::build(vec![record("", None), record("a/b", None)]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.lookup_id("a/b").is_some());
        assert!(catalog.lookup_slug("b").is_some());
    }

    #[test]
    fn only_two_part_ids_get_slugs() {
        let catalog = PricingCatalog::build(vec![
            record("standalone-model", None),
            record("a/b/c", None),
        ]);
        assert!(catalog.lookup_id("standalone-model").is_some());
        assert!(catalog.lookup_slug("standalone-model").is_none());
        assert!(catalog.lookup_id("a/b/c").is_some());
        assert!(catalog.lookup_slug("c").is_none());
    }
}

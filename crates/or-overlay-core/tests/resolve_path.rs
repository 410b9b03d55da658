use or_overlay_core::matcher::{resolve_path, SKIP_PREFIXES};
use or_overlay_core::model::{ModelRecord, Pricing};
use or_overlay_core::PricingCatalog;

fn record(id: &str) -> ModelRecord {
    ModelRecord {
        id: id.to_string(),
        name: None,
        pricing: Pricing {
            prompt: Some("0.00003".into()),
            completion: Some("0.00006".into()),
        },
    }
}

fn catalog() -> PricingCatalog {
    PricingCatalog::build(vec![
        record("openai/gpt-4"),
        record("google/gemini-3-flash-preview"),
    ])
}

#[test]
fn exact_id_match() {
    let catalog = catalog();
    let model = resolve_path("/openai/gpt-4", &catalog).expect("exact id");
    assert_eq!(model.id, "openai/gpt-4");
}

#[test]
fn case_insensitive_match() {
    let catalog = catalog();
    let model = resolve_path("/OpenAI/GPT-4", &catalog).expect("cased path");
    assert_eq!(model.id, "openai/gpt-4");
}

#[test]
fn date_suffixed_path_falls_back_to_stripped_slug() {
    let catalog = catalog();
    let model = resolve_path("/google/gemini-3-flash-preview-20251217", &catalog)
        .expect("date-suffixed path");
    assert_eq!(model.id, "google/gemini-3-flash-preview");
}

#[test]
fn versioned_path_resolves_to_base_model() {
    let catalog = catalog();
    let model = resolve_path("/openai/gpt-4-20251217", &catalog).expect("date-suffixed id");
    assert_eq!(model.id, "openai/gpt-4");
}

#[test]
fn slug_matches_under_a_foreign_provider() {
    let catalog = catalog();
    let model = resolve_path("/azure/gpt-4", &catalog).expect("slug fallback");
    assert_eq!(model.id, "openai/gpt-4");
}

#[test]
fn exact_id_beats_slug_fallback() {
    let catalog = PricingCatalog::build(vec![record("openai/gpt-4"), record("mirror/gpt-4")]);
    // bySlug["gpt-4"] points at the mirror (last record wins), but the
    // exact-id stage fires first.
    let model = resolve_path("/openai/gpt-4", &catalog).expect("exact id");
    assert_eq!(model.id, "openai/gpt-4");
    let fallback = resolve_path("/unknown/gpt-4", &catalog).expect("slug");
    assert_eq!(fallback.id, "mirror/gpt-4");
}

#[test]
fn deny_list_rejects_navigation_paths() {
    let catalog = catalog();
    for prefix in SKIP_PREFIXES {
        let path = format!("/{prefix}/quickstart");
        assert!(
            resolve_path(&path, &catalog).is_none(),
            "{path} must never match"
        );
    }
}

#[test]
fn non_model_paths_do_not_match() {
    let catalog = catalog();
    assert!(resolve_path("", &catalog).is_none());
    assert!(resolve_path("/", &catalog).is_none());
    assert!(resolve_path("/single-segment", &catalog).is_none());
    assert!(resolve_path("relative/path", &catalog).is_none());
}

#[test]
fn deeper_paths_still_resolve() {
    // The pattern is prefix-anchored only; extra segments are ignored.
    let catalog = catalog();
    assert!(resolve_path("/openai/gpt-4/versions", &catalog).is_some());
}

#[test]
fn unknown_models_yield_nothing() {
    let catalog = catalog();
    assert!(resolve_path("/anthropic/claude-nonexistent", &catalog).is_none());
}

//! Browser overlay: pricing badges for model links.
//!
//! Compiled to wasm and injected as a content script. Fetches the pricing
//! catalog (cached in localStorage), matches `a[href^="/"]` links against
//! it, and inserts badge elements next to matches. A debounced
//! MutationObserver re-runs the annotator after SPA navigation.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    console, Document, Element, MutationObserver, MutationObserverInit, Response, Window,
};

use or_overlay_core::badge::{
    badge_for, BadgeLabel, BADGE_CLASS, INPUT_CLASS, OUTPUT_CLASS, PROCESSED_ATTR, SEP_CLASS,
};
use or_overlay_core::cache::{self, CACHE_KEY};
use or_overlay_core::matcher::resolve_path;
use or_overlay_core::model::{parse_catalog, ModelRecord};
use or_overlay_core::{PricingCatalog, PRICING_API};

const DEBOUNCE_MS: i32 = 200;

thread_local! {
    static CATALOG: RefCell<Option<Rc<PricingCatalog>>> = RefCell::new(None);
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    spawn_local(async {
        if let Err(err) = init().await {
            // Never break the host page; an unannotated page is the only
            // consequence of a failed init.
            console::error_2(&"[OR Pricing] init failed:".into(), &err);
        }
    });
}

async fn init() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() == "loading" {
        wait_for_dom_ready(&document).await;
    }

    let catalog = Rc::new(load_catalog(&window).await?);
    console::log_1(&format!("[OR Pricing] loaded {} models", catalog.len()).into());
    CATALOG.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&catalog)));

    let annotated = annotate_document(&document, &catalog);
    if annotated > 0 {
        console::log_1(&format!("[OR Pricing] annotated {annotated} links").into());
    }
    observe_changes(&document, catalog)
}

async fn wait_for_dom_ready(document: &Document) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let _ = document.add_event_listener_with_callback("DOMContentLoaded", &resolve);
    });
    let _ = JsFuture::from(promise).await;
}

// ---------------------------------------------------------------------------
// Catalog loading (localStorage cache, then network)
// ---------------------------------------------------------------------------

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

async fn load_catalog(window: &Window) -> Result<PricingCatalog, JsValue> {
    if let Some(catalog) = load_cached(window) {
        console::log_1(&"[OR Pricing] using cached data".into());
        return Ok(catalog);
    }
    let models = fetch_models(window).await?;
    let catalog = PricingCatalog::build(models);
    store_cache(window, &catalog);
    Ok(catalog)
}

fn load_cached(window: &Window) -> Option<PricingCatalog> {
    let storage = window.local_storage().ok().flatten()?;
    let raw = storage.get_item(CACHE_KEY).ok().flatten()?;
    match cache::parse_entry(&raw) {
        Some(entry) if entry.is_fresh(now_ms()) => Some(entry.data),
        Some(_) => None,
        None => {
            // Malformed entries are cleared so the next load starts clean.
            let _ = storage.remove_item(CACHE_KEY);
            None
        }
    }
}

fn store_cache(window: &Window, catalog: &PricingCatalog) {
    let Some(storage) = window.local_storage().ok().flatten() else {
        return;
    };
    if let Ok(raw) = cache::encode(catalog, now_ms()) {
        // Quota and disabled-storage failures are ignored.
        let _ = storage.set_item(CACHE_KEY, &raw);
    }
}

async fn fetch_models(window: &Window) -> Result<Vec<ModelRecord>, JsValue> {
    let resp: Response = JsFuture::from(window.fetch_with_str(PRICING_API))
        .await?
        .dyn_into()?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!(
            "pricing API returned HTTP {}",
            resp.status()
        )));
    }
    let text = JsFuture::from(resp.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("pricing API returned a non-text body"))?;
    let body: serde_json::Value =
        serde_json::from_str(&text).map_err(|err| JsValue::from_str(&err.to_string()))?;
    Ok(parse_catalog(&body))
}

// ---------------------------------------------------------------------------
// Annotator
// ---------------------------------------------------------------------------

/// Scan the document for model links and insert badges. Idempotent: links
/// are marked with `data-or-priced` and skipped on later passes.
fn annotate_document(document: &Document, catalog: &PricingCatalog) -> usize {
    let links = match document.query_selector_all(r#"a[href^="/"]"#) {
        Ok(list) => list,
        Err(_) => return 0,
    };

    let mut annotated = 0;
    for i in 0..links.length() {
        let Some(node) = links.get(i) else { continue };
        let Ok(link) = node.dyn_into::<Element>() else {
            continue;
        };

        if link.get_attribute(PROCESSED_ATTR).is_some() {
            continue;
        }
        if matches!(link.query_selector(&format!(".{BADGE_CLASS}")), Ok(Some(_))) {
            continue;
        }
        let Some(href) = link.get_attribute("href") else {
            continue;
        };
        let Some(model) = resolve_path(&href, catalog) else {
            continue;
        };
        let Ok(badge) = build_badge(document, model) else {
            continue;
        };

        // Plain text links take the badge inside for alignment; links with
        // child elements get it inserted after, leaving their markup intact.
        if link.child_element_count() == 0 {
            let _ = link.append_child(&badge);
        } else {
            let _ = link.after_with_node_1(&badge);
        }
        let _ = link.set_attribute(PROCESSED_ATTR, "true");
        annotated += 1;
    }
    annotated
}

/// Build the badge element from the core render plan. All text lands via
/// `set_text_content`, so model-supplied strings cannot inject markup.
fn build_badge(document: &Document, model: &ModelRecord) -> Result<Element, JsValue> {
    let plan = badge_for(model);
    let badge = document.create_element("span")?;
    badge.set_class_name(&plan.class_attr());
    badge.set_attribute("title", &plan.title)?;

    match &plan.label {
        BadgeLabel::Free => badge.set_text_content(Some("FREE")),
        BadgeLabel::Prices { input, output } => {
            badge.append_child(&price_span(document, INPUT_CLASS, input)?.into())?;
            badge.append_child(&price_span(document, SEP_CLASS, "/")?.into())?;
            badge.append_child(&price_span(document, OUTPUT_CLASS, output)?.into())?;
        }
    }
    Ok(badge)
}

fn price_span(document: &Document, class: &str, text: &str) -> Result<Element, JsValue> {
    let span = document.create_element("span")?;
    span.set_class_name(class);
    span.set_text_content(Some(text));
    Ok(span)
}

// ---------------------------------------------------------------------------
// Change watcher
// ---------------------------------------------------------------------------

/// Re-run the annotator after DOM mutation bursts (SPA navigation). Each
/// batch cancels and re-arms a single 200 ms timer; annotation never runs
/// inside the observer callback itself.
fn observe_changes(document: &Document, catalog: Rc<PricingCatalog>) -> Result<(), JsValue> {
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

    let on_timer = {
        let pending = Rc::clone(&pending);
        Closure::<dyn FnMut()>::new(move || {
            pending.set(None);
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let annotated = annotate_document(&document, &catalog);
            if annotated > 0 {
                console::log_1(&format!("[OR Pricing] annotated {annotated} links").into());
            }
        })
    };

    let on_mutations = {
        let pending = Rc::clone(&pending);
        Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |_mutations: js_sys::Array, _observer: MutationObserver| {
                let Some(window) = web_sys::window() else { return };
                if let Some(handle) = pending.take() {
                    window.clear_timeout_with_handle(handle);
                }
                if let Ok(handle) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    on_timer.as_ref().unchecked_ref(),
                    DEBOUNCE_MS,
                ) {
                    pending.set(Some(handle));
                }
            },
        )
    };

    let observer = MutationObserver::new(on_mutations.as_ref().unchecked_ref())?;
    let opts = MutationObserverInit::new();
    opts.set_child_list(true);
    opts.set_subtree(true);
    observer.observe_with_options(&body, &opts)?;

    // The watcher runs for the page's lifetime; leak the callback (and the
    // timer closure it owns) instead of dropping them.
    on_mutations.forget();
    Ok(())
}

// ---------------------------------------------------------------------------
// Console debug hook
// ---------------------------------------------------------------------------

/// Resolve a link path against the live catalog, for use from the page
/// console. Returns the matched record, or `null` before init or when
/// nothing matches.
#[wasm_bindgen]
pub fn lookup(path: &str) -> JsValue {
    CATALOG.with(|slot| {
        match slot
            .borrow()
            .as_deref()
            .and_then(|catalog| resolve_path(path, catalog))
        {
            Some(model) => serde_wasm_bindgen::to_value(model).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    })
}

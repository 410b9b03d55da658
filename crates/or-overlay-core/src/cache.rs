use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lookup::PricingCatalog;

/// Storage key used by the browser overlay.
pub const CACHE_KEY: &str = "or_pricing_cache";

/// Cached catalogs go stale after one hour.
pub const CACHE_TTL_MS: u64 = 60 * 60 * 1000;

/// A persisted catalog snapshot. Replaced wholesale on refresh, never
/// partially updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: PricingCatalog,
    pub timestamp: u64,
}

impl CacheEntry {
    pub fn new(data: PricingCatalog, now_ms: u64) -> Self {
        Self {
            data,
            timestamp: now_ms,
        }
    }

    /// An entry is fresh while `now − timestamp < TTL`.
    pub fn is_fresh(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.timestamp) < CACHE_TTL_MS
    }
}

/// Decode a persisted entry. `None` means malformed; staleness is left to
/// the caller so it can clear only truly bad entries.
pub fn parse_entry(raw: &str) -> Option<CacheEntry> {
    serde_json::from_str(raw).ok()
}

/// Serialize a catalog snapshot taken at `now_ms`.
pub fn encode(catalog: &PricingCatalog, now_ms: u64) -> Result<String> {
    #[derive(Serialize)]
    struct EntryRef<'a> {
        data: &'a PricingCatalog,
        timestamp: u64,
    }
    Ok(serde_json::to_string(&EntryRef {
        data: catalog,
        timestamp: now_ms,
    })?)
}

#[cfg(feature = "network")]
pub use native::{cache_path, cached_timestamp, load, now_ms, store};

#[cfg(feature = "network")]
mod native {
    use std::path::PathBuf;

    use super::{encode, parse_entry};
    use crate::lookup::PricingCatalog;

    const CACHE_FILE: &str = "catalog.json";

    /// Cache directory for overlay data files, created on demand.
    fn cache_dir() -> Option<PathBuf> {
        let dir = dirs::cache_dir()?.join("or-overlay");
        if !dir.exists() {
            std::fs::create_dir_all(&dir).ok()?;
        }
        Some(dir)
    }

    /// Path of the cached catalog file, if a cache directory is available.
    pub fn cache_path() -> Option<PathBuf> {
        Some(cache_dir()?.join(CACHE_FILE))
    }

    /// Milliseconds since the epoch.
    pub fn now_ms() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Read the cached catalog if present, well-formed and fresh.
    /// Malformed files are removed best-effort.
    pub fn load(now_ms: u64) -> Option<PricingCatalog> {
        let path = cache_path()?;
        let raw = std::fs::read_to_string(&path).ok()?;
        match parse_entry(&raw) {
            Some(entry) if entry.is_fresh(now_ms) => {
                tracing::debug!(models = entry.data.len(), "using cached catalog");
                Some(entry.data)
            }
            Some(_) => {
                tracing::debug!("cached catalog is stale");
                None
            }
            None => {
                tracing::warn!(path = %path.display(), "removing malformed catalog cache");
                let _ = std::fs::remove_file(&path);
                None
            }
        }
    }

    /// Persist a catalog snapshot. Failures are logged and swallowed;
    /// caching is an optimization, not a correctness requirement.
    pub fn store(catalog: &PricingCatalog, now_ms: u64) {
        let Some(path) = cache_path() else { return };
        let raw = match encode(catalog, now_ms) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(%err, "failed to encode catalog cache");
                return;
            }
        };
        if let Err(err) = std::fs::write(&path, raw) {
            tracing::warn!(%err, "failed to write catalog cache");
        }
    }

    /// Timestamp of the current cache entry, fresh or not.
    pub fn cached_timestamp() -> Option<u64> {
        let raw = std::fs::read_to_string(cache_path()?).ok()?;
        Some(parse_entry(&raw)?.timestamp)
    }
}

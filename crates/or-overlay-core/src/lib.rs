pub mod badge;
pub mod cache;
pub mod error;
pub mod lookup;
pub mod matcher;
pub mod model;
pub mod pricing;

#[cfg(feature = "network")]
pub mod api;

pub use error::{OverlayError, Result};
pub use lookup::PricingCatalog;
pub use model::{ModelRecord, Pricing};
pub use pricing::PriceTier;

/// Fixed catalog endpoint; responds with JSON `{ "data": [model, ...] }`.
pub const PRICING_API: &str = "https://openrouter.ai/api/v1/models";

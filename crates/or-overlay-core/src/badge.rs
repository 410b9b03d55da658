use crate::model::ModelRecord;
use crate::pricing::{format_price, price_tier, PriceTier};

/// CSS class of the badge element.
pub const BADGE_CLASS: &str = "or-price-badge";
/// Classes of the compact label's child spans.
pub const INPUT_CLASS: &str = "or-price-in";
pub const SEP_CLASS: &str = "or-price-sep";
pub const OUTPUT_CLASS: &str = "or-price-out";
/// Attribute marking a link as already annotated. Set once, never cleared.
pub const PROCESSED_ATTR: &str = "data-or-priced";

/// Render plan for one pricing badge. Surfaces turn this into DOM nodes or
/// terminal output; the plan itself carries no markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub tier: PriceTier,
    pub title: String,
    pub label: BadgeLabel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeLabel {
    Free,
    /// Compact `$in/$out` pair.
    Prices { input: String, output: String },
}

impl Badge {
    /// Full class attribute, e.g. `or-price-badge tier-mid`.
    pub fn class_attr(&self) -> String {
        format!("{BADGE_CLASS} tier-{}", self.tier.as_str())
    }
}

/// Build the badge plan for a model. The tier follows the input price.
pub fn badge_for(model: &ModelRecord) -> Badge {
    let input = format_price(model.pricing.prompt.as_deref());
    let output = format_price(model.pricing.completion.as_deref());
    let tier = price_tier(model.pricing.prompt.as_deref());

    Badge {
        title: format!("Input: {input}/M · Output: {output}/M tokens"),
        label: if tier == PriceTier::Free {
            BadgeLabel::Free
        } else {
            BadgeLabel::Prices { input, output }
        },
        tier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pricing;

    fn record(prompt: Option<&str>, completion: Option<&str>) -> ModelRecord {
        ModelRecord {
            id: "test/model".into(),
            name: None,
            pricing: Pricing {
                prompt: prompt.map(String::from),
                completion: completion.map(String::from),
            },
        }
    }

    #[test]
    fn free_models_get_the_free_label() {
        let badge = badge_for(&record(None, None));
        assert_eq!(badge.tier, PriceTier::Free);
        assert_eq!(badge.label, BadgeLabel::Free);
        assert_eq!(badge.class_attr(), "or-price-badge tier-free");
        assert_eq!(badge.title, "Input: FREE/M · Output: FREE/M tokens");
    }

    #[test]
    fn paid_models_get_the_price_pair() {
        let badge = badge_for(&record(Some("0.00003"), Some("0.00006")));
        assert_eq!(badge.tier, PriceTier::Frontier);
        assert_eq!(badge.class_attr(), "or-price-badge tier-frontier");
        assert_eq!(
            badge.label,
            BadgeLabel::Prices {
                input: "$30".into(),
                output: "$60".into(),
            }
        );
        assert_eq!(badge.title, "Input: $30/M · Output: $60/M tokens");
    }

    #[test]
    fn tier_follows_the_input_price() {
        let badge = badge_for(&record(Some("0.0000001"), Some("0.00006")));
        assert_eq!(badge.tier, PriceTier::Cheap);
    }

    #[test]
    fn free_input_wins_even_with_paid_output() {
        let badge = badge_for(&record(Some("0"), Some("0.00006")));
        assert_eq!(badge.label, BadgeLabel::Free);
        assert_eq!(badge.title, "Input: FREE/M · Output: $60/M tokens");
    }
}

/// Discrete pricing bucket, derived from the input (prompt) price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTier {
    Free,
    Cheap,
    Mid,
    Premium,
    Frontier,
}

impl PriceTier {
    /// Lowercase tier name as used in badge CSS classes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Cheap => "cheap",
            Self::Mid => "mid",
            Self::Premium => "premium",
            Self::Frontier => "frontier",
        }
    }
}

impl std::fmt::Display for PriceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

enum Parsed {
    Free,
    Unparsable,
    PerMillion(f64),
}

fn classify(price: Option<&str>) -> Parsed {
    let raw = match price {
        Some(s) => s,
        None => return Parsed::Free,
    };
    if raw.is_empty() || raw == "0" {
        return Parsed::Free;
    }
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Parsed::PerMillion(v * 1_000_000.0),
        _ => Parsed::Unparsable,
    }
}

/// Tier for a raw per-token price string. Total: absent, `"0"` and empty
/// input are free; unparsable input lands in `Cheap` rather than failing.
pub fn price_tier(price: Option<&str>) -> PriceTier {
    match classify(price) {
        Parsed::Free => PriceTier::Free,
        Parsed::Unparsable => PriceTier::Cheap,
        Parsed::PerMillion(m) => {
            if m < 0.50 {
                PriceTier::Cheap
            } else if m < 2.0 {
                PriceTier::Mid
            } else if m < 5.0 {
                PriceTier::Premium
            } else {
                PriceTier::Frontier
            }
        }
    }
}

/// Display string for a raw per-token price, in $ per million tokens.
/// Unparsable input renders as a `"?"` placeholder.
pub fn format_price(price: Option<&str>) -> String {
    match classify(price) {
        Parsed::Free => "FREE".to_string(),
        Parsed::Unparsable => "?".to_string(),
        Parsed::PerMillion(m) => {
            if m < 0.01 {
                "<$0.01".to_string()
            } else if m < 1.0 {
                format!("${m:.2}")
            } else if m < 10.0 {
                format!("${m:.1}")
            } else {
                format!("${}", m.round())
            }
        }
    }
}

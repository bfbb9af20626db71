use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ApprovalError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Share of the resale price paid to the consignor
    pub payout_rate: f64,
    /// Share of the resale price entered as the listing price; the rest is shipping
    pub listing_share: f64,
    /// How far the current listing share may drift and still be recognised as ours
    pub share_tolerance: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            payout_rate: 0.70,
            listing_share: 0.70,
            share_tolerance: 0.02,
        }
    }
}

impl PricingConfig {
    /// Resale price implied by the listing/shipping fields, if they carry our split.
    pub fn suggested_price(&self, listing: f64, shipping: f64) -> Option<ResalePrice> {
        let total = listing + shipping;
        if !total.is_finite() || total <= 0.0 {
            return None;
        }
        ((listing / total - self.listing_share).abs() < self.share_tolerance)
            .then_some(ResalePrice(total))
    }
}

/// A validated, strictly positive resale price.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ResalePrice(f64);

impl ResalePrice {
    /// Keep digits and dots, read the leading decimal number, require it to be above zero.
    pub fn parse(raw: &str) -> Result<Self, ApprovalError> {
        let sanitized = sanitize(raw);
        match leading_number(&sanitized).and_then(|n| n.parse::<f64>().ok()) {
            Some(value) if value.is_finite() && value > 0.0 => Ok(Self(value)),
            _ => Err(ApprovalError::InvalidPrice(raw.to_string())),
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn payout(&self, pricing: &PricingConfig) -> f64 {
        round_cents(self.0 * pricing.payout_rate)
    }

    /// `(listing, shipping)` amounts to enter in the listing form.
    pub fn split(&self, pricing: &PricingConfig) -> (f64, f64) {
        let listing = round_cents(self.0 * pricing.listing_share);
        (listing, round_cents(self.0 - listing))
    }
}

impl fmt::Display for ResalePrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", cents(self.0))
    }
}

pub(crate) fn cents(amount: f64) -> String {
    format!("{amount:.2}")
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub(crate) fn sanitize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// Longest prefix that reads as a decimal number: digits with at most one dot.
fn leading_number(s: &str) -> Option<&str> {
    let end = s
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .nth(1)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len());
    let number = &s[..end];
    number.chars().any(|c| c.is_ascii_digit()).then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_noise_is_stripped() {
        assert_eq!(ResalePrice::parse("$1,200.50").unwrap().value(), 1200.5);
        assert_eq!(ResalePrice::parse(" 80 ").unwrap().value(), 80.0);
        assert_eq!(ResalePrice::parse("1.2.3").unwrap().value(), 1.2);
        assert_eq!(ResalePrice::parse(".5").unwrap().value(), 0.5);
    }

    #[test]
    fn zero_and_garbage_are_rejected() {
        for raw in ["", "0", "0.00", "abc", ".", "-"] {
            assert!(
                matches!(ResalePrice::parse(raw), Err(ApprovalError::InvalidPrice(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn payout_and_split_round_to_cents() {
        let pricing = PricingConfig::default();
        let price = ResalePrice::parse("99.99").unwrap();

        assert_eq!(price.payout(&pricing), 69.99);
        let (listing, shipping) = price.split(&pricing);
        assert_eq!(cents(listing), "69.99");
        assert_eq!(cents(shipping), "30.00");
        assert_eq!(price.to_string(), "99.99");
    }

    #[test]
    fn suggestion_requires_our_split() {
        let pricing = PricingConfig::default();
        assert_eq!(
            pricing.suggested_price(70.0, 30.0).map(|p| p.value()),
            Some(100.0)
        );
        assert_eq!(
            pricing.suggested_price(71.0, 29.0).map(|p| p.value()),
            Some(100.0)
        );
        assert!(pricing.suggested_price(50.0, 50.0).is_none());
        assert!(pricing.suggested_price(0.0, 0.0).is_none());
    }
}

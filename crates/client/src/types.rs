//! Domain types shared by the stores, the API client, and the snapshot
//! cache.
//!
//! All wire-facing types serialize camelCase: the commerce API speaks
//! camelCase JSON, and local snapshots reuse the same shape so a cached
//! collection and a remote collection are interchangeable at hydrate time.

use fixhub_core::{Price, ProductId};
use serde::{Deserialize, Serialize};

/// A product or repair service as selected for the cart.
///
/// Carries the price snapshot and display fields captured at add time, so
/// rendering the cart never requires another catalog round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Selected option key (e.g., storage size). `None` for products
    /// without options.
    #[serde(default)]
    pub variant: Option<String>,
    /// Price at selection time.
    pub unit_price: Price,
    /// Display title.
    pub title: String,
    /// Display image URL.
    #[serde(default)]
    pub image: Option<String>,
}

/// One row in the cart: a product/variant/quantity combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Catalog identifier of the underlying product or service.
    pub product_id: ProductId,
    /// Selected option key distinguishing otherwise-identical products.
    #[serde(default)]
    pub variant: Option<String>,
    /// Always >= 1 inside the store.
    pub quantity: u32,
    /// Price snapshot taken at add time; never re-fetched.
    pub unit_price: Price,
    /// Display title captured at add time.
    pub title: String,
    /// Display image URL captured at add time.
    #[serde(default)]
    pub image: Option<String>,
}

impl CartLine {
    /// Build a line from an add-to-cart selection.
    pub(crate) fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            variant: product.variant.clone(),
            quantity,
            unit_price: product.unit_price,
            title: product.title.clone(),
            image: product.image.clone(),
        }
    }

    /// Line identity: same product AND same variant (`None` only equals
    /// `None`).
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, variant: Option<&str>) -> bool {
        self.product_id == *product_id && self.variant.as_deref() == variant
    }

    /// `unit_price` x `quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// A saved-for-later item. No quantity or variant dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    /// Catalog identifier. At most one entry per id.
    pub product_id: ProductId,
    /// Display title captured at save time.
    pub title: String,
    /// Price snapshot taken at save time.
    pub price: Price,
    /// Display image URL.
    #[serde(default)]
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use fixhub_core::CurrencyCode;
    use rust_decimal::Decimal;

    use super::*;

    fn line(variant: Option<&str>) -> CartLine {
        CartLine {
            product_id: ProductId::new("iphone-13-screen"),
            variant: variant.map(ToOwned::to_owned),
            quantity: 2,
            unit_price: Price::new(Decimal::new(8900, 2), CurrencyCode::USD),
            title: "iPhone 13 screen replacement".to_owned(),
            image: None,
        }
    }

    #[test]
    fn test_identity_requires_matching_variant() {
        let l = line(Some("oled"));
        assert!(l.matches(&ProductId::new("iphone-13-screen"), Some("oled")));
        assert!(!l.matches(&ProductId::new("iphone-13-screen"), Some("lcd")));
        assert!(!l.matches(&ProductId::new("iphone-13-screen"), None));
        assert!(!l.matches(&ProductId::new("iphone-14-screen"), Some("oled")));
    }

    #[test]
    fn test_none_variant_only_matches_none() {
        let l = line(None);
        assert!(l.matches(&ProductId::new("iphone-13-screen"), None));
        assert!(!l.matches(&ProductId::new("iphone-13-screen"), Some("oled")));
    }

    #[test]
    fn test_line_total() {
        let l = line(None);
        assert_eq!(l.line_total().amount, Decimal::new(17800, 2));
    }

    #[test]
    fn test_cart_line_wire_format_is_camel_case() {
        let json = serde_json::to_value(line(Some("oled"))).expect("serialize");
        assert!(json.get("productId").is_some());
        assert!(json.get("unitPrice").is_some());
        assert!(json.get("product_id").is_none());
    }
}

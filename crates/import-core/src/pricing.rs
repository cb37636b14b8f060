//! Tier prices and custom options.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a price value is an absolute amount or a percentage discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    Fixed,
    Percent,
}

impl PriceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceType::Fixed => "fixed",
            PriceType::Percent => "percent",
        }
    }
}

/// A quantity-break price for one customer group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierPrice {
    /// Customer group name; `None` applies to all groups.
    pub customer_group: Option<String>,
    /// Minimum quantity at which this price kicks in.
    pub qty: u32,
    pub price: Decimal,
    pub price_type: PriceType,
}

impl TierPrice {
    pub fn new(customer_group: Option<String>, qty: u32, price: Decimal, price_type: PriceType) -> Self {
        TierPrice {
            customer_group,
            qty,
            price,
            price_type,
        }
    }
}

/// A customizable option the buyer fills in or picks when ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomOption {
    pub title: String,
    pub required: bool,
    /// Sku suffix appended to the product sku when the option is chosen.
    pub sku: Option<String>,
    pub price: Option<Decimal>,
    pub price_type: PriceType,
}

impl CustomOption {
    pub fn new(title: &str, required: bool) -> Self {
        CustomOption {
            title: title.to_string(),
            required,
            sku: None,
            price: None,
            price_type: PriceType::Fixed,
        }
    }

    pub fn with_price(mut self, price: Decimal, price_type: PriceType) -> Self {
        self.price = Some(price);
        self.price_type = price_type;
        self
    }

    pub fn with_sku(mut self, sku: &str) -> Self {
        self.sku = Some(sku.trim().to_string());
        self
    }
}

//! JSONL file source: one product object per line.
//!
//! Parse failures never abort the run; a line that does not parse
//! becomes a placeholder record rejected with the parse error, so the
//! result callback reports it under its line number like any other
//! rejected record.

use anyhow::{Context, Result};
use import_core::{
    CustomOption, ImageRole, LinkKind, PriceType, Product, ProductType, StoreView, TierPrice,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::config::{EmptyValueStrategy, ImportConfig};
use crate::importer::Importer;

/// One product as it appears on an input line. Unknown fields are
/// ignored so exports carrying extra columns keep working.
#[derive(Debug, Deserialize)]
pub struct ProductRow {
    pub sku: String,
    #[serde(rename = "type", default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(default)]
    pub special_price: Option<serde_json::Value>,
    #[serde(default)]
    pub url_key: Option<String>,
    #[serde(default)]
    pub attribute_set: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub websites: Option<Vec<String>>,
    #[serde(default)]
    pub qty: Option<serde_json::Value>,
    #[serde(default)]
    pub in_stock: Option<bool>,
    #[serde(default)]
    pub related: Option<Vec<String>>,
    #[serde(default)]
    pub up_sell: Option<Vec<String>>,
    #[serde(default)]
    pub cross_sell: Option<Vec<String>>,
    #[serde(default)]
    pub tier_prices: Option<Vec<TierPriceRow>>,
    #[serde(default)]
    pub options: Option<Vec<CustomOptionRow>>,
    #[serde(default)]
    pub images: Option<Vec<ImageRow>>,
    /// Per-store-view overrides keyed by scope code.
    #[serde(default)]
    pub store_views: Option<BTreeMap<String, ScopeRow>>,
}

#[derive(Debug, Deserialize)]
pub struct ScopeRow {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(default)]
    pub special_price: Option<serde_json::Value>,
    #[serde(default)]
    pub url_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TierPriceRow {
    #[serde(default)]
    pub customer_group: Option<String>,
    pub qty: u32,
    pub price: serde_json::Value,
    #[serde(default)]
    pub price_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CustomOptionRow {
    pub title: String,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(default)]
    pub price_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImageRow {
    pub source: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

/// A numeric input field: explicitly empty, or a parsed value.
enum DecimalField {
    Empty,
    Value(Decimal),
}

/// Stage every line of a JSONL file into the importer.
pub async fn import_file(importer: &mut Importer, path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let config = importer.config().clone();

    let mut lines = 0u64;
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let line_number = index as u64 + 1;
        let product = parse_line(&line, line_number, &config);
        importer.import(product).await?;
        lines += 1;
    }
    info!(lines, source = %path.display(), "source file staged");
    Ok(())
}

/// Turn one input line into a staging record. Never fails: malformed
/// lines yield a rejected placeholder record carrying the parse error.
pub fn parse_line(line: &str, line_number: u64, config: &ImportConfig) -> Product {
    match serde_json::from_str::<ProductRow>(line) {
        Ok(row) => product_from_row(row, line_number, config),
        Err(e) => {
            let mut product = Product::new("", ProductType::Simple);
            product.line_number = line_number;
            product.add_error(format!("invalid JSON: {e}"));
            product
        }
    }
}

fn product_from_row(row: ProductRow, line_number: u64, config: &ImportConfig) -> Product {
    let product_type = match row.product_type.as_deref() {
        None => Ok(ProductType::Simple),
        Some(s) => ProductType::try_from(s),
    };
    let mut product = match product_type {
        Ok(t) => Product::new(&row.sku, t),
        Err(e) => {
            let mut product = Product::new(&row.sku, ProductType::Simple);
            product.add_error(e);
            product.line_number = line_number;
            return product;
        }
    };
    product.line_number = line_number;

    if let Some(name) = &row.attribute_set {
        product.set_attribute_set_by_name(name);
    }
    if let Some(paths) = row.categories {
        product.set_categories_by_path(paths);
    }
    if let Some(codes) = row.websites {
        product.set_websites_by_code(codes);
    }

    apply_scope_fields(
        &mut product,
        import_core::GLOBAL_STORE_VIEW_CODE,
        &ScopeRow {
            name: row.name,
            description: row.description,
            short_description: row.short_description,
            price: row.price,
            special_price: row.special_price,
            url_key: row.url_key,
        },
        config,
    );
    if let Some(store_views) = row.store_views {
        for (scope, fields) in &store_views {
            apply_scope_fields(&mut product, scope, fields, config);
        }
    }

    // An error leaves the record permanently rejected and no longer
    // mutable; stop filling it in.
    if !product.is_ok() {
        return product;
    }

    if let Some(qty) = &row.qty {
        match parse_decimal(qty) {
            Ok(DecimalField::Value(qty)) => product.default_stock().set_qty(qty),
            Ok(DecimalField::Empty) => {}
            Err(e) => {
                product.add_error(format!("invalid qty: {e}"));
                return product;
            }
        }
    }
    if let Some(in_stock) = row.in_stock {
        product.default_stock().set_is_in_stock(in_stock);
    }

    if let Some(skus) = row.related {
        product.set_linked_skus(LinkKind::Related, skus);
    }
    if let Some(skus) = row.up_sell {
        product.set_linked_skus(LinkKind::UpSell, skus);
    }
    if let Some(skus) = row.cross_sell {
        product.set_linked_skus(LinkKind::CrossSell, skus);
    }

    if let Some(rows) = row.tier_prices {
        let mut tiers = Vec::with_capacity(rows.len());
        for tier in rows {
            match tier_price_from_row(tier) {
                Ok(t) => tiers.push(t),
                Err(e) => product.add_error(format!("invalid tier price: {e}")),
            }
        }
        if product.is_ok() {
            product.set_tier_prices(tiers);
        }
    }

    if let Some(rows) = row.options {
        let mut options = Vec::with_capacity(rows.len());
        for option in rows {
            match option_from_row(option) {
                Ok(o) => options.push(o),
                Err(e) => product.add_error(format!("invalid custom option: {e}")),
            }
        }
        if product.is_ok() {
            product.set_custom_options(options);
        }
    }

    if let Some(rows) = row.images {
        for image_row in rows {
            if !product.is_ok() {
                break;
            }
            let mut bad_role = None;
            {
                let image = product.add_image(&image_row.source);
                if let Some(label) = &image_row.label {
                    image.set_label(label);
                }
                for role in image_row.roles.as_deref().unwrap_or_default() {
                    match ImageRole::try_from(role.as_str()) {
                        Ok(role) => {
                            image.add_role(role);
                        }
                        Err(e) => bad_role = Some(e),
                    }
                }
            }
            if let Some(e) = bad_role {
                product.add_error(e);
            }
        }
    }

    product
}

fn apply_scope_fields(product: &mut Product, scope: &str, fields: &ScopeRow, config: &ImportConfig) {
    if !product.is_ok() {
        return;
    }
    // Decimal fields are parsed before the bag is touched so a parse
    // error rejects the record without leaving a half-filled scope.
    let price = fields.price.as_ref().map(parse_decimal).transpose();
    let special_price = fields.special_price.as_ref().map(parse_decimal).transpose();
    let (price, special_price) = match (price, special_price) {
        (Ok(p), Ok(s)) => (p, s),
        (Err(e), _) | (_, Err(e)) => {
            product.add_error(format!("invalid price in scope {scope}: {e}"));
            return;
        }
    };

    let view = product.store_view(scope);
    if let Some(name) = &fields.name {
        view.set_name(name);
    }
    if let Some(description) = &fields.description {
        view.set_description(description);
    }
    if let Some(description) = &fields.short_description {
        view.set_short_description(description);
    }
    if let Some(url_key) = &fields.url_key {
        view.set_url_key(url_key);
    }
    apply_decimal(view, import_core::attr::PRICE, price, config.empty_numeric_strategy);
    apply_decimal(
        view,
        import_core::attr::SPECIAL_PRICE,
        special_price,
        config.empty_numeric_strategy,
    );
}

fn apply_decimal(
    view: &mut StoreView,
    code: &str,
    field: Option<DecimalField>,
    strategy: EmptyValueStrategy,
) {
    match field {
        None => {}
        Some(DecimalField::Value(value)) => view.set_decimal(code, value),
        Some(DecimalField::Empty) => match strategy {
            EmptyValueStrategy::Ignore => {}
            EmptyValueStrategy::Remove => view.remove_attribute(code),
        },
    }
}

fn tier_price_from_row(row: TierPriceRow) -> Result<TierPrice, String> {
    let price = match parse_decimal(&row.price)? {
        DecimalField::Value(price) => price,
        DecimalField::Empty => return Err("price must not be empty".to_string()),
    };
    Ok(TierPrice::new(
        row.customer_group,
        row.qty,
        price,
        parse_price_type(row.price_type.as_deref())?,
    ))
}

fn option_from_row(row: CustomOptionRow) -> Result<CustomOption, String> {
    let mut option = CustomOption::new(&row.title, row.required.unwrap_or(false));
    if let Some(sku) = &row.sku {
        option = option.with_sku(sku);
    }
    if let Some(price) = &row.price {
        if let DecimalField::Value(price) = parse_decimal(price)? {
            option = option.with_price(price, parse_price_type(row.price_type.as_deref())?);
        }
    }
    Ok(option)
}

fn parse_price_type(s: Option<&str>) -> Result<PriceType, String> {
    match s {
        None | Some("fixed") => Ok(PriceType::Fixed),
        Some("percent") => Ok(PriceType::Percent),
        Some(other) => Err(format!("unknown price type: {other}")),
    }
}

fn parse_decimal(value: &serde_json::Value) -> Result<DecimalField, String> {
    match value {
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(DecimalField::Empty),
        serde_json::Value::String(s) => Decimal::from_str(s.trim())
            .map(DecimalField::Value)
            .map_err(|e| format!("{s}: {e}")),
        serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
            .map(DecimalField::Value)
            .map_err(|e| format!("{n}: {e}")),
        serde_json::Value::Null => Ok(DecimalField::Empty),
        other => Err(format!("expected a number, got {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use import_core::attr;

    #[test]
    fn parses_a_full_line() {
        let line = r#"{
            "sku": " CHAIR-01 ", "type": "simple", "name": "Walnut Chair",
            "price": "129.90", "attribute_set": "Furniture",
            "categories": ["Home/Living Room"], "websites": ["base"],
            "qty": 25, "in_stock": true,
            "related": ["TABLE-01"],
            "tier_prices": [{"qty": 10, "price": "99.90"}],
            "store_views": {"de": {"name": "Stuhl Walnuss"}}
        }"#;
        let product = parse_line(line, 3, &ImportConfig::default());

        assert!(product.is_ok(), "errors: {:?}", product.errors());
        assert_eq!(product.sku(), "CHAIR-01");
        assert_eq!(product.line_number, 3);
        assert_eq!(product.linked_skus(LinkKind::Related), Some(&["TABLE-01".to_string()][..]));
        assert_eq!(product.tier_prices().values().map(|v| v.len()), Some(1));
        let scopes: Vec<&str> = product.store_views().map(|(c, _)| c).collect();
        assert_eq!(scopes, vec![import_core::GLOBAL_STORE_VIEW_CODE, "de"]);
    }

    #[test]
    fn malformed_line_becomes_a_rejected_placeholder() {
        let product = parse_line("{not json", 17, &ImportConfig::default());
        assert!(!product.is_ok());
        assert_eq!(product.line_number, 17);
        assert!(product.errors()[0].starts_with("invalid JSON"));
    }

    #[test]
    fn unknown_product_type_is_rejected() {
        let product = parse_line(r#"{"sku": "a", "type": "bundle"}"#, 1, &ImportConfig::default());
        assert!(!product.is_ok());
    }

    #[test]
    fn empty_price_honors_the_remove_strategy() {
        let config = ImportConfig {
            empty_numeric_strategy: EmptyValueStrategy::Remove,
            ..ImportConfig::default()
        };
        let mut product = parse_line(r#"{"sku": "a", "price": ""}"#, 1, &config);
        assert!(product.is_ok());
        assert_eq!(product.global().removals(), &[attr::PRICE.to_string()]);
    }

    #[test]
    fn empty_price_is_skipped_by_default() {
        let mut product = parse_line(r#"{"sku": "a", "price": ""}"#, 1, &ImportConfig::default());
        assert!(product.is_ok());
        assert!(product.global().attribute(attr::PRICE).is_none());
        assert!(product.global().removals().is_empty());
    }

    #[test]
    fn numeric_price_is_accepted() {
        let mut product = parse_line(r#"{"sku": "a", "price": 12.5}"#, 1, &ImportConfig::default());
        assert!(product.is_ok());
        assert_eq!(
            product.global().attribute(attr::PRICE).map(|v| v.to_column_value()),
            Some("12.5".to_string())
        );
    }
}

//! The product staging record.

use crate::links::{LinkKind, LinkSet};
use crate::media::Image;
use crate::pricing::{CustomOption, TierPrice};
use crate::refs::{AttributeSetRef, CategoryRef, WebsiteRef};
use crate::scope::StoreView;
use crate::stock::StockRecord;
use crate::update::FieldUpdate;

/// Scope code of the distinguished global (store-wide) attribute scope.
pub const GLOBAL_STORE_VIEW_CODE: &str = "global";

/// Name of the distinguished default stock.
pub const DEFAULT_STOCK_NAME: &str = "default";

/// Concrete kind of an importable product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductType {
    Simple,
    Configurable,
    Grouped,
}

impl ProductType {
    /// Stable name stored in the product table's `type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Simple => "simple",
            ProductType::Configurable => "configurable",
            ProductType::Grouped => "grouped",
        }
    }

    /// Whether products of this kind carry buyer-facing options by default.
    pub fn has_options(&self) -> bool {
        matches!(self, ProductType::Configurable)
    }
}

impl TryFrom<&str> for ProductType {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "simple" => Ok(ProductType::Simple),
            "configurable" => Ok(ProductType::Configurable),
            "grouped" => Ok(ProductType::Grouped),
            other => Err(format!("unknown product type: {other}")),
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a staging record.
///
/// `Staging` is the only state in which the record may be mutated through
/// its accessors. The pipeline moves a record to `Validated` once every
/// deferred reference is resolved and no errors were recorded, then to
/// `Committed` when the chunk containing it was accepted by the store.
/// Any recorded error moves it to `Rejected`, permanently: there is no
/// way back to the commit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Staging,
    Validated,
    Committed,
    Rejected,
}

/// One product import candidate.
///
/// Created by the caller with a sku, filled through the accessors while
/// staging, consumed read-only by the resolution stage and the commit
/// path, and discarded after the result callback fires.
#[derive(Debug, Clone)]
pub struct Product {
    sku: String,
    product_type: ProductType,
    /// Position tag correlating failures back to the caller's input;
    /// 0 means unknown.
    pub line_number: u64,
    id: Option<u64>,
    attribute_set: AttributeSetRef,
    categories: CategoryRef,
    websites: WebsiteRef,
    store_views: Vec<(String, StoreView)>,
    stocks: Vec<(String, StockRecord)>,
    images: Vec<Image>,
    linked_skus: LinkSet<String>,
    linked_ids: LinkSet<u64>,
    tier_prices: FieldUpdate<TierPrice>,
    custom_options: FieldUpdate<CustomOption>,
    errors: Vec<String>,
    warnings: Vec<String>,
    state: RecordState,
}

impl Product {
    /// Create a record for `sku`. The sku is trimmed once here and
    /// immutable afterwards; the global scope entry exists from the start.
    pub fn new(sku: &str, product_type: ProductType) -> Self {
        Product {
            sku: sku.trim().to_string(),
            product_type,
            line_number: 0,
            id: None,
            attribute_set: AttributeSetRef::Unset,
            categories: CategoryRef::Unset,
            websites: WebsiteRef::Unset,
            store_views: vec![(GLOBAL_STORE_VIEW_CODE.to_string(), StoreView::new())],
            stocks: Vec::new(),
            images: Vec::new(),
            linked_skus: LinkSet::default(),
            linked_ids: LinkSet::default(),
            tier_prices: FieldUpdate::Untouched,
            custom_options: FieldUpdate::Untouched,
            errors: Vec::new(),
            warnings: Vec::new(),
            state: RecordState::Staging,
        }
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn product_type(&self) -> ProductType {
        self.product_type
    }

    /// Persisted row id, once known. Populated by the commit path after
    /// the record is matched to (or inserted as) a stored row.
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    pub fn state(&self) -> RecordState {
        self.state
    }

    /// True while no error was recorded.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record an error. The record leaves the commit path for good; only
    /// an already committed record keeps its state.
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        if self.state != RecordState::Committed {
            self.state = RecordState::Rejected;
        }
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Mark the record ready for commit. Called by the pipeline once all
    /// deferred references are resolved and no errors were recorded.
    pub fn mark_validated(&mut self) {
        assert_eq!(
            self.state,
            RecordState::Staging,
            "product {} cannot be validated from state {:?}",
            self.sku,
            self.state
        );
        assert!(
            self.errors.is_empty(),
            "product {} has errors and cannot be validated",
            self.sku
        );
        self.state = RecordState::Validated;
    }

    /// Mark the record committed. Called by the pipeline after the chunk
    /// containing it was accepted.
    pub fn mark_committed(&mut self) {
        assert_eq!(
            self.state,
            RecordState::Validated,
            "product {} cannot be committed from state {:?}",
            self.sku,
            self.state
        );
        self.state = RecordState::Committed;
    }

    /// Override bag for a store-view scope, created empty on first
    /// reference. Codes are trimmed, so `" b2c "` and `"b2c"` address the
    /// same bag.
    pub fn store_view(&mut self, code: &str) -> &mut StoreView {
        self.assert_staging();
        let code = code.trim();
        let idx = match self.store_views.iter().position(|(c, _)| c == code) {
            Some(idx) => idx,
            None => {
                self.store_views.push((code.to_string(), StoreView::new()));
                self.store_views.len() - 1
            }
        };
        &mut self.store_views[idx].1
    }

    /// Shorthand for the distinguished global scope entry.
    pub fn global(&mut self) -> &mut StoreView {
        self.store_view(GLOBAL_STORE_VIEW_CODE)
    }

    /// All scopes in insertion order, the global scope first.
    pub fn store_views(&self) -> impl Iterator<Item = (&str, &StoreView)> {
        self.store_views.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Inventory record for the distinguished default stock, created on
    /// first reference.
    pub fn default_stock(&mut self) -> &mut StockRecord {
        self.stock(DEFAULT_STOCK_NAME)
    }

    /// Inventory record for a named stock, created on first reference.
    pub fn stock(&mut self, name: &str) -> &mut StockRecord {
        self.assert_staging();
        let name = name.trim();
        let idx = match self.stocks.iter().position(|(n, _)| n == name) {
            Some(idx) => idx,
            None => {
                self.stocks.push((name.to_string(), StockRecord::default()));
                self.stocks.len() - 1
            }
        };
        &mut self.stocks[idx].1
    }

    pub fn stocks(&self) -> impl Iterator<Item = (&str, &StockRecord)> {
        self.stocks.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn set_attribute_set_id(&mut self, id: u64) {
        self.assert_staging();
        if self.attribute_set.is_unresolved() {
            self.add_warning("attribute set id overwrites a previously set attribute set name");
        }
        self.attribute_set = AttributeSetRef::Id(id);
    }

    pub fn set_attribute_set_by_name(&mut self, name: &str) {
        self.assert_staging();
        if self.attribute_set.id().is_some() {
            self.add_warning("attribute set name overwrites a previously set attribute set id");
        }
        self.attribute_set = AttributeSetRef::Named(name.trim().to_string());
    }

    pub fn attribute_set(&self) -> &AttributeSetRef {
        &self.attribute_set
    }

    /// Replace an unresolved attribute set name with its id. Called by the
    /// resolution stage; does not count as a caller overwrite.
    pub fn resolve_attribute_set(&mut self, id: u64) {
        self.attribute_set = AttributeSetRef::Id(id);
    }

    pub fn set_category_ids(&mut self, ids: Vec<u64>) {
        self.assert_staging();
        if self.categories.is_unresolved() {
            self.add_warning("category ids overwrite previously set category paths");
        }
        self.categories = CategoryRef::Ids(ids);
    }

    /// Reference categories by name path (segments joined by the import's
    /// configured separator), e.g. `["Books/Novels", "Books/Sci-Fi"]`.
    pub fn set_categories_by_path(&mut self, paths: Vec<String>) {
        self.assert_staging();
        if self.categories.ids().is_some() {
            self.add_warning("category paths overwrite previously set category ids");
        }
        self.categories = CategoryRef::Paths(paths.into_iter().map(|p| p.trim().to_string()).collect());
    }

    pub fn categories(&self) -> &CategoryRef {
        &self.categories
    }

    pub fn resolve_categories(&mut self, ids: Vec<u64>) {
        self.categories = CategoryRef::Ids(ids);
    }

    pub fn set_website_ids(&mut self, ids: Vec<u64>) {
        self.assert_staging();
        if self.websites.is_unresolved() {
            self.add_warning("website ids overwrite previously set website codes");
        }
        self.websites = WebsiteRef::Ids(ids);
    }

    pub fn set_websites_by_code(&mut self, codes: Vec<String>) {
        self.assert_staging();
        if self.websites.ids().is_some() {
            self.add_warning("website codes overwrite previously set website ids");
        }
        self.websites = WebsiteRef::Codes(codes.into_iter().map(|c| c.trim().to_string()).collect());
    }

    pub fn websites(&self) -> &WebsiteRef {
        &self.websites
    }

    pub fn resolve_websites(&mut self, ids: Vec<u64>) {
        self.websites = WebsiteRef::Ids(ids);
    }

    /// Stage an image reference; returns the new entry for role and label
    /// assignment. Append-only.
    pub fn add_image(&mut self, source_path: &str) -> &mut Image {
        self.assert_staging();
        self.images.push(Image::new(source_path));
        let idx = self.images.len() - 1;
        &mut self.images[idx]
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Reference linked products of one kind by sku. Entries are trimmed;
    /// an empty list clears all stored links of that kind, while never
    /// calling this for a kind leaves its stored links untouched.
    pub fn set_linked_skus(&mut self, kind: LinkKind, skus: Vec<String>) {
        self.assert_staging();
        self.linked_skus
            .set(kind, skus.into_iter().map(|s| s.trim().to_string()).collect());
    }

    pub fn set_linked_ids(&mut self, kind: LinkKind, ids: Vec<u64>) {
        self.assert_staging();
        self.linked_ids.set(kind, ids);
    }

    /// Linked skus of one kind; `None` while the kind was never set.
    pub fn linked_skus(&self, kind: LinkKind) -> Option<&[String]> {
        self.linked_skus.values(kind)
    }

    /// Resolved linked ids of one kind; `None` (not an empty slice) while
    /// the kind was never set.
    pub fn linked_ids(&self, kind: LinkKind) -> Option<&[u64]> {
        self.linked_ids.values(kind)
    }

    /// Replace tier prices; an empty list clears stored ones. Never
    /// calling this leaves stored tier prices untouched.
    pub fn set_tier_prices(&mut self, tier_prices: Vec<TierPrice>) {
        self.assert_staging();
        self.tier_prices = FieldUpdate::set(tier_prices);
    }

    pub fn tier_prices(&self) -> &FieldUpdate<TierPrice> {
        &self.tier_prices
    }

    /// Replace custom options, with the same absent-vs-empty semantics as
    /// tier prices.
    pub fn set_custom_options(&mut self, options: Vec<CustomOption>) {
        self.assert_staging();
        self.custom_options = FieldUpdate::set(options);
    }

    pub fn custom_options(&self) -> &FieldUpdate<CustomOption> {
        &self.custom_options
    }

    fn assert_staging(&self) {
        assert_eq!(
            self.state,
            RecordState::Staging,
            "product {} can no longer be modified in state {:?}",
            self.sku,
            self.state
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::attr;
    use rust_decimal::Decimal;

    #[test]
    fn sku_is_trimmed_at_construction() {
        let product = Product::new("  SKU-001  ", ProductType::Simple);
        assert_eq!(product.sku(), "SKU-001");
    }

    #[test]
    fn global_scope_exists_from_the_start() {
        let product = Product::new("a", ProductType::Simple);
        let codes: Vec<&str> = product.store_views().map(|(c, _)| c).collect();
        assert_eq!(codes, vec![GLOBAL_STORE_VIEW_CODE]);
    }

    #[test]
    fn store_view_lookup_trims_and_returns_same_bag() {
        let mut product = Product::new("a", ProductType::Simple);
        product.store_view(" b2c ").set_name("Name for B2C");

        // Same trimmed code addresses the same bag.
        let view = product.store_view("b2c");
        assert_eq!(
            view.attribute(attr::NAME).and_then(|v| v.as_text()),
            Some("Name for B2C")
        );
        assert_eq!(product.store_views().count(), 2);
    }

    #[test]
    fn default_stock_is_vivified_once() {
        let mut product = Product::new("a", ProductType::Simple);
        product.default_stock().set_qty(Decimal::from(10));
        product.default_stock().set_is_in_stock(true);

        let stocks: Vec<&str> = product.stocks().map(|(n, _)| n).collect();
        assert_eq!(stocks, vec![DEFAULT_STOCK_NAME]);
    }

    #[test]
    fn unset_link_kind_returns_none_not_empty() {
        let mut product = Product::new("a", ProductType::Simple);
        assert_eq!(product.linked_ids(LinkKind::Related), None);

        product.set_linked_ids(LinkKind::Related, vec![]);
        assert_eq!(product.linked_ids(LinkKind::Related), Some(&[][..]));
        assert_eq!(product.linked_ids(LinkKind::UpSell), None);
    }

    #[test]
    fn linked_skus_are_trimmed() {
        let mut product = Product::new("a", ProductType::Simple);
        product.set_linked_skus(LinkKind::CrossSell, vec![" x ".to_string(), "y".to_string()]);
        assert_eq!(
            product.linked_skus(LinkKind::CrossSell),
            Some(&["x".to_string(), "y".to_string()][..])
        );
    }

    #[test]
    fn tier_prices_absent_vs_empty() {
        let mut product = Product::new("a", ProductType::Simple);
        assert!(product.tier_prices().is_untouched());

        product.set_tier_prices(vec![]);
        assert_eq!(product.tier_prices().values(), Some(&[][..]));
    }

    #[test]
    fn error_rejects_the_record() {
        let mut product = Product::new("a", ProductType::Simple);
        product.add_error("category not found: Shoes/Running");

        assert!(!product.is_ok());
        assert_eq!(product.state(), RecordState::Rejected);
        assert_eq!(product.errors().len(), 1);
    }

    #[test]
    fn conflicting_reference_forms_are_flagged() {
        let mut product = Product::new("a", ProductType::Simple);
        product.set_categories_by_path(vec!["Books/Novels".to_string()]);
        product.set_category_ids(vec![42]);

        assert_eq!(product.categories().ids(), Some(&[42u64][..]));
        assert_eq!(product.warnings().len(), 1);
    }

    #[test]
    fn resolution_does_not_warn() {
        let mut product = Product::new("a", ProductType::Simple);
        product.set_attribute_set_by_name("Defaults");
        product.resolve_attribute_set(9);

        assert_eq!(product.attribute_set().id(), Some(9));
        assert!(product.warnings().is_empty());
    }

    #[test]
    #[should_panic(expected = "can no longer be modified")]
    fn mutation_after_validation_panics() {
        let mut product = Product::new("a", ProductType::Simple);
        product.mark_validated();
        product.set_category_ids(vec![1]);
    }

    #[test]
    fn lifecycle_happy_path() {
        let mut product = Product::new("a", ProductType::Simple);
        assert_eq!(product.state(), RecordState::Staging);
        product.mark_validated();
        assert_eq!(product.state(), RecordState::Validated);
        product.mark_committed();
        assert_eq!(product.state(), RecordState::Committed);
    }

    #[test]
    fn rejection_after_validation() {
        let mut product = Product::new("a", ProductType::Simple);
        product.mark_validated();
        product.add_error("batch write failed");
        assert_eq!(product.state(), RecordState::Rejected);
    }
}

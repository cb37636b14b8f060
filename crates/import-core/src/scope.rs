//! Per-store-view attribute override bags.

use rust_decimal::Decimal;

/// Attribute codes used by the typed setters on [`StoreView`].
pub mod attr {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const SHORT_DESCRIPTION: &str = "short_description";
    pub const PRICE: &str = "price";
    pub const SPECIAL_PRICE: &str = "special_price";
    pub const URL_KEY: &str = "url_key";
    pub const META_TITLE: &str = "meta_title";
    pub const STATUS: &str = "status";
    pub const VISIBILITY: &str = "visibility";
}

/// A single attribute value inside a store-view override bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Text(String),
    Decimal(Decimal),
    Integer(i64),
}

impl AttributeValue {
    /// String form written to the attribute value column.
    pub fn to_column_value(&self) -> String {
        match self {
            AttributeValue::Text(s) => s.clone(),
            AttributeValue::Decimal(d) => d.to_string(),
            AttributeValue::Integer(i) => i.to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True for a textual value that is empty after trimming. Such values
    /// are subject to the import's empty-value strategy.
    pub fn is_empty_text(&self) -> bool {
        matches!(self, AttributeValue::Text(s) if s.trim().is_empty())
    }
}

/// Attribute overrides for one scope (the global scope or a named store
/// view).
///
/// The bag preserves insertion order so that flattened value rows come out
/// in a deterministic order. Setting an attribute twice overwrites in
/// place. Next to plain values the bag tracks explicit removals: an
/// attribute the caller wants deleted from the store rather than skipped.
#[derive(Debug, Clone, Default)]
pub struct StoreView {
    attributes: Vec<(String, AttributeValue)>,
    removals: Vec<String>,
}

impl StoreView {
    pub fn new() -> Self {
        StoreView::default()
    }

    pub fn set_name(&mut self, name: &str) {
        self.set_text(attr::NAME, name);
    }

    pub fn set_description(&mut self, description: &str) {
        self.set_text(attr::DESCRIPTION, description);
    }

    pub fn set_short_description(&mut self, description: &str) {
        self.set_text(attr::SHORT_DESCRIPTION, description);
    }

    pub fn set_meta_title(&mut self, title: &str) {
        self.set_text(attr::META_TITLE, title);
    }

    pub fn set_url_key(&mut self, url_key: &str) {
        self.set_text(attr::URL_KEY, url_key);
    }

    pub fn set_price(&mut self, price: Decimal) {
        self.set_decimal(attr::PRICE, price);
    }

    pub fn set_special_price(&mut self, price: Decimal) {
        self.set_decimal(attr::SPECIAL_PRICE, price);
    }

    /// Set a textual attribute under an arbitrary code.
    pub fn set_text(&mut self, code: &str, value: &str) {
        self.insert(code, AttributeValue::Text(value.to_string()));
    }

    /// Set a decimal attribute under an arbitrary code.
    pub fn set_decimal(&mut self, code: &str, value: Decimal) {
        self.insert(code, AttributeValue::Decimal(value));
    }

    /// Set an integer attribute under an arbitrary code.
    pub fn set_integer(&mut self, code: &str, value: i64) {
        self.insert(code, AttributeValue::Integer(value));
    }

    /// Record that the attribute's stored value must be removed for this
    /// scope. Clears any staged value for the same code.
    pub fn remove_attribute(&mut self, code: &str) {
        self.attributes.retain(|(c, _)| c != code);
        if !self.removals.iter().any(|c| c == code) {
            self.removals.push(code.to_string());
        }
    }

    /// Drop a staged value without recording a removal. Used by the
    /// empty-value "ignore" strategy.
    pub fn drop_attribute(&mut self, code: &str) {
        self.attributes.retain(|(c, _)| c != code);
    }

    pub fn attribute(&self, code: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, v)| v)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Attribute codes flagged for explicit removal.
    pub fn removals(&self) -> &[String] {
        &self.removals
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.removals.is_empty()
    }

    fn insert(&mut self, code: &str, value: AttributeValue) {
        self.removals.retain(|c| c != code);
        match self.attributes.iter_mut().find(|(c, _)| c == code) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((code.to_string(), value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_twice_overwrites_in_place() {
        let mut view = StoreView::new();
        view.set_name("First");
        view.set_price(Decimal::new(1099, 2));
        view.set_name("Second");

        assert_eq!(
            view.attribute(attr::NAME),
            Some(&AttributeValue::Text("Second".to_string()))
        );
        // Order of first insertion is preserved.
        let codes: Vec<&str> = view.attributes().map(|(c, _)| c).collect();
        assert_eq!(codes, vec![attr::NAME, attr::PRICE]);
    }

    #[test]
    fn removal_clears_staged_value() {
        let mut view = StoreView::new();
        view.set_description("old text");
        view.remove_attribute(attr::DESCRIPTION);

        assert!(view.attribute(attr::DESCRIPTION).is_none());
        assert_eq!(view.removals(), &[attr::DESCRIPTION.to_string()]);

        // Setting again cancels the pending removal.
        view.set_description("new text");
        assert!(view.removals().is_empty());
    }

    #[test]
    fn empty_text_detection() {
        assert!(AttributeValue::Text("  ".to_string()).is_empty_text());
        assert!(!AttributeValue::Text("x".to_string()).is_empty_text());
        assert!(!AttributeValue::Integer(0).is_empty_text());
    }
}

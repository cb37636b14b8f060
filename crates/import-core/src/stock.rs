//! Stock / inventory records.

use rust_decimal::Decimal;

/// Inventory data for one product in one stock.
///
/// Every field is optional: a field left `None` was not part of the
/// import and must not overwrite the stored value on re-import. The
/// commit path maps `None` to NULL and folds it away with COALESCE in
/// its update clause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockRecord {
    qty: Option<Decimal>,
    is_in_stock: Option<bool>,
    min_sale_qty: Option<Decimal>,
    max_sale_qty: Option<Decimal>,
}

impl StockRecord {
    pub fn set_qty(&mut self, qty: Decimal) {
        self.qty = Some(qty);
    }

    pub fn set_is_in_stock(&mut self, in_stock: bool) {
        self.is_in_stock = Some(in_stock);
    }

    pub fn set_min_sale_qty(&mut self, qty: Decimal) {
        self.min_sale_qty = Some(qty);
    }

    pub fn set_max_sale_qty(&mut self, qty: Decimal) {
        self.max_sale_qty = Some(qty);
    }

    pub fn qty(&self) -> Option<Decimal> {
        self.qty
    }

    pub fn is_in_stock(&self) -> Option<bool> {
        self.is_in_stock
    }

    pub fn min_sale_qty(&self) -> Option<Decimal> {
        self.min_sale_qty
    }

    pub fn max_sale_qty(&self) -> Option<Decimal> {
        self.max_sale_qty
    }

    /// True when no field was set; such records produce no row at all.
    pub fn is_empty(&self) -> bool {
        *self == StockRecord::default()
    }
}

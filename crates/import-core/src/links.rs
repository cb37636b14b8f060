//! Product-to-product link kinds.

use crate::update::FieldUpdate;

/// Closed set of product link kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Related,
    UpSell,
    CrossSell,
}

impl LinkKind {
    pub const ALL: [LinkKind; 3] = [LinkKind::Related, LinkKind::UpSell, LinkKind::CrossSell];

    /// Stable name used in the link table's `kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Related => "related",
            LinkKind::UpSell => "up_sell",
            LinkKind::CrossSell => "cross_sell",
        }
    }
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-kind link updates for one product.
///
/// Each kind carries its own [`FieldUpdate`], so touching one kind never
/// affects the others: on re-import, a kind the caller did not set leaves
/// the stored links of that kind alone.
#[derive(Debug, Clone)]
pub struct LinkSet<T> {
    related: FieldUpdate<T>,
    up_sell: FieldUpdate<T>,
    cross_sell: FieldUpdate<T>,
}

impl<T> Default for LinkSet<T> {
    fn default() -> Self {
        LinkSet {
            related: FieldUpdate::Untouched,
            up_sell: FieldUpdate::Untouched,
            cross_sell: FieldUpdate::Untouched,
        }
    }
}

impl<T> LinkSet<T> {
    pub fn get(&self, kind: LinkKind) -> &FieldUpdate<T> {
        match kind {
            LinkKind::Related => &self.related,
            LinkKind::UpSell => &self.up_sell,
            LinkKind::CrossSell => &self.cross_sell,
        }
    }

    /// Overwrite the update for one kind. An empty value list means
    /// "clear all stored links of this kind".
    pub fn set(&mut self, kind: LinkKind, values: Vec<T>) {
        *self.slot_mut(kind) = FieldUpdate::set(values);
    }

    /// Values for one kind; `None` while the kind was never set.
    pub fn values(&self, kind: LinkKind) -> Option<&[T]> {
        self.get(kind).values()
    }

    fn slot_mut(&mut self, kind: LinkKind) -> &mut FieldUpdate<T> {
        match kind {
            LinkKind::Related => &mut self.related,
            LinkKind::UpSell => &mut self.up_sell,
            LinkKind::CrossSell => &mut self.cross_sell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_kind_is_not_an_empty_one() {
        let mut links: LinkSet<u64> = LinkSet::default();
        assert_eq!(links.values(LinkKind::Related), None);

        links.set(LinkKind::Related, vec![]);
        assert_eq!(links.values(LinkKind::Related), Some(&[][..]));
        // The other kinds stay untouched.
        assert_eq!(links.values(LinkKind::UpSell), None);
        assert_eq!(links.values(LinkKind::CrossSell), None);
    }

    #[test]
    fn setting_one_kind_leaves_others_alone() {
        let mut links: LinkSet<u64> = LinkSet::default();
        links.set(LinkKind::UpSell, vec![7, 8]);

        assert_eq!(links.values(LinkKind::UpSell), Some(&[7u64, 8][..]));
        assert_eq!(links.values(LinkKind::Related), None);
    }
}

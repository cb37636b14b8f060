//! Deferred references to named entities.
//!
//! Import records may reference attribute sets, categories and websites
//! either by numeric id or by the human-readable form (name, path, code).
//! Each reference is a closed enum holding exactly one of the two forms,
//! so "which form is authoritative" is decided by the type instead of by
//! convention. The resolution stage replaces the named form with ids
//! before a record may be committed.

/// Reference to the attribute set a product belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AttributeSetRef {
    /// No attribute set supplied; an existing product keeps its current one.
    #[default]
    Unset,
    /// Resolved numeric id.
    Id(u64),
    /// Attribute set name awaiting resolution.
    Named(String),
}

impl AttributeSetRef {
    pub fn id(&self) -> Option<u64> {
        match self {
            AttributeSetRef::Id(id) => Some(*id),
            _ => None,
        }
    }

    /// True while the reference still carries a name instead of an id.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, AttributeSetRef::Named(_))
    }
}

/// Reference to the categories a product is assigned to.
///
/// The named form is an ordered sequence of category paths, segments
/// joined by the import's configured separator (e.g. `Books/Novels`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryRef {
    #[default]
    Unset,
    Ids(Vec<u64>),
    Paths(Vec<String>),
}

impl CategoryRef {
    pub fn ids(&self) -> Option<&[u64]> {
        match self {
            CategoryRef::Ids(ids) => Some(ids),
            _ => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, CategoryRef::Paths(_))
    }
}

/// Reference to the websites a product is visible on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WebsiteRef {
    #[default]
    Unset,
    Ids(Vec<u64>),
    Codes(Vec<String>),
}

impl WebsiteRef {
    pub fn ids(&self) -> Option<&[u64]> {
        match self {
            WebsiteRef::Ids(ids) => Some(ids),
            _ => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, WebsiteRef::Codes(_))
    }
}

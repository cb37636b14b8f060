//! Three-way update intent for collection-valued attributes.

/// Caller intent for a collection-valued attribute such as product links,
/// tier prices or custom options.
///
/// `Untouched` means the attribute was not part of this import and any
/// previously stored rows must be left alone. `Clear` means every stored
/// row must be removed. `Set` replaces the stored rows with the given
/// values. The distinction between `Untouched` and `Clear` is load-bearing
/// for idempotent re-imports and must survive all the way to the commit
/// path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    /// Not part of this import; leave stored data alone.
    #[default]
    Untouched,
    /// Remove all stored entries.
    Clear,
    /// Replace stored entries with these values.
    Set(Vec<T>),
}

impl<T> FieldUpdate<T> {
    /// Build an update from a caller-supplied value list. An empty list is
    /// normalized to `Clear`, matching the "present but empty means clear
    /// everything" input convention.
    pub fn set(values: Vec<T>) -> Self {
        if values.is_empty() {
            FieldUpdate::Clear
        } else {
            FieldUpdate::Set(values)
        }
    }

    /// The values this update carries: `None` for `Untouched`, an empty
    /// slice for `Clear`.
    pub fn values(&self) -> Option<&[T]> {
        match self {
            FieldUpdate::Untouched => None,
            FieldUpdate::Clear => Some(&[]),
            FieldUpdate::Set(values) => Some(values),
        }
    }

    pub fn is_untouched(&self) -> bool {
        matches!(self, FieldUpdate::Untouched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_and_clear_are_distinct() {
        let untouched: FieldUpdate<u64> = FieldUpdate::Untouched;
        let cleared: FieldUpdate<u64> = FieldUpdate::set(vec![]);

        assert_eq!(untouched.values(), None);
        assert_eq!(cleared.values(), Some(&[][..]));
        assert_ne!(untouched, cleared);
    }

    #[test]
    fn set_keeps_values_in_order() {
        let update = FieldUpdate::set(vec![3u64, 1, 2]);
        assert_eq!(update.values(), Some(&[3u64, 1, 2][..]));
    }
}

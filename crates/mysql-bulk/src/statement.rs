//! Placeholder templating and chunk planning for multi-row statements.
//!
//! Everything here is pure: the statement text and the chunk boundaries
//! are computed without touching the connection, so the size-bounding
//! contract is unit-testable on its own.

/// Comma-separated parameter marks: `?,?,?`.
pub fn marks(count: usize) -> String {
    assert!(count > 0, "a mark list needs at least one value");
    let mut s = String::with_capacity(count * 2 - 1);
    s.push('?');
    for _ in 1..count {
        s.push_str(",?");
    }
    s
}

/// Row-tuple mark groups: `(?,?),(?,?),(?,?)` for three rows of two
/// columns.
pub fn row_group_marks(column_count: usize, row_count: usize) -> String {
    assert!(column_count > 0, "a row group needs at least one column");
    assert!(row_count > 0, "a row group needs at least one row");
    let template = format!("({})", marks(column_count));
    let mut s = String::with_capacity((template.len() + 1) * row_count);
    s.push_str(&template);
    for _ in 1..row_count {
        s.push(',');
        s.push_str(&template);
    }
    s
}

/// Split a flat, row-major value buffer into row-aligned chunks of at
/// most `chunk_rows` rows each. The final chunk may be shorter; a chunk
/// of zero rows is never produced. Panics when the buffer length is not
/// a multiple of the column count, which is caller misuse, not data.
pub fn row_chunks<T>(values: &[T], column_count: usize, chunk_rows: usize) -> impl Iterator<Item = &[T]> {
    assert!(column_count > 0, "row chunking needs at least one column");
    assert!(chunk_rows > 0, "chunk size must be at least one row");
    assert_eq!(
        values.len() % column_count,
        0,
        "value count {} is not a multiple of the column count {}",
        values.len(),
        column_count
    );
    values.chunks(column_count * chunk_rows)
}

/// Key-list chunks for batched deletes, one placeholder per key.
pub fn key_chunks<T>(keys: &[T], chunk_rows: usize) -> impl Iterator<Item = &[T]> {
    assert!(chunk_rows > 0, "chunk size must be at least one key");
    keys.chunks(chunk_rows)
}

/// Backtick-quoted, comma-separated column list.
pub fn quoted_columns(columns: &[&str]) -> String {
    assert!(!columns.is_empty(), "a statement needs at least one column");
    columns
        .iter()
        .map(|c| format!("`{c}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_are_comma_separated() {
        assert_eq!(marks(1), "?");
        assert_eq!(marks(4), "?,?,?,?");
    }

    #[test]
    fn row_groups_repeat_the_tuple() {
        assert_eq!(row_group_marks(2, 3), "(?,?),(?,?),(?,?)");
        assert_eq!(row_group_marks(1, 1), "(?)");
    }

    #[test]
    fn placeholder_count_matches_columns_times_rows() {
        let group = row_group_marks(5, 7);
        assert_eq!(group.matches('?').count(), 5 * 7);
    }

    #[test]
    fn chunks_respect_the_row_budget() {
        // 2500 rows of 3 columns with a budget of 1000 rows per statement.
        let values: Vec<u32> = (0..2500 * 3).collect();
        let row_counts: Vec<usize> = row_chunks(&values, 3, 1000).map(|c| c.len() / 3).collect();
        assert_eq!(row_counts, vec![1000, 1000, 500]);
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_chunk() {
        let values: Vec<u32> = (0..1000 * 2).collect();
        let row_counts: Vec<usize> = row_chunks(&values, 2, 1000).map(|c| c.len() / 2).collect();
        assert_eq!(row_counts, vec![1000]);
    }

    #[test]
    fn empty_batch_produces_no_chunks() {
        let values: Vec<u32> = Vec::new();
        assert_eq!(row_chunks(&values, 4, 1000).count(), 0);
    }

    #[test]
    fn key_chunks_split_the_key_list() {
        let keys: Vec<u32> = (0..3500).collect();
        let counts: Vec<usize> = key_chunks(&keys, 1000).map(|c| c.len()).collect();
        assert_eq!(counts, vec![1000, 1000, 1000, 500]);
    }

    #[test]
    #[should_panic(expected = "not a multiple of the column count")]
    fn misaligned_values_are_a_defect() {
        let values: Vec<u32> = (0..7).collect();
        let _ = row_chunks(&values, 3, 1000).count();
    }

    #[test]
    fn columns_are_backtick_quoted() {
        assert_eq!(quoted_columns(&["sku", "type"]), "`sku`, `type`");
    }
}

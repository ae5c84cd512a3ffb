//! Utility functions for SQLite storage operations.

/// Bound parameters SQLite accepts in one statement on older builds
/// (`SQLITE_MAX_VARIABLE_NUMBER`).
pub const SQLITE_MAX_PARAMS: usize = 999;

/// Splits `rows` into batches whose multi-row `INSERT` stays under
/// [`SQLITE_MAX_PARAMS`], given `columns` bound values per row.
pub fn chunk_for_sqlite<T>(rows: &[T], columns: usize) -> impl Iterator<Item = &[T]> {
    rows.chunks((SQLITE_MAX_PARAMS / columns.max(1)).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_respect_parameter_limit() {
        let rows: Vec<u32> = (0..450).collect();
        let chunks: Vec<_> = chunk_for_sqlite(&rows, 5).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 199);
        assert!(chunks.iter().all(|c| c.len() * 5 <= SQLITE_MAX_PARAMS));
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let rows: Vec<u32> = Vec::new();
        assert_eq!(chunk_for_sqlite(&rows, 5).count(), 0);
    }
}

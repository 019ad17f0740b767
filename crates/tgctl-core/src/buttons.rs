pub const DEFAULT_COLUMNS: usize = 2;

/// Split `"Yes, No,Maybe"` into trimmed labels, dropping empties.
pub fn parse_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Arrange labels into rows of `columns` buttons (at least one per row).
pub fn arrange(labels: &[String], columns: usize) -> Vec<Vec<String>> {
    labels
        .chunks(columns.max(1))
        .map(<[String]>::to_vec)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_trims() {
        assert_eq!(parse_labels(" Yes, No ,, Maybe "), vec!["Yes", "No", "Maybe"]);
        assert!(parse_labels(" , ").is_empty());
    }

    #[test]
    fn arranges_in_columns() {
        let labels = parse_labels("a,b,c,d,e");
        let rows = arrange(&labels, DEFAULT_COLUMNS);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], vec!["e".to_string()]);

        assert_eq!(arrange(&labels, 0).len(), 5);
        assert_eq!(arrange(&labels, 10).len(), 1);
    }
}

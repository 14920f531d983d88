// src/csl/multi.rs
//
// Cells like `programs` or `alt_names` hold several values joined by `;`.
// The upstream feed never escapes the delimiter inside a value.

/// Separator between values inside a multi-valued cell.
pub const MULTI_DELIMITER: char = ';';

/// Split a multi-valued cell. Segments are trimmed; empty ones are dropped.
pub fn split_multi(cell: &str) -> Vec<String> {
    cell.split(MULTI_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Inverse of [`split_multi`] for canonical values.
pub fn join_multi<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(MULTI_DELIMITER.to_string().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_semicolon() {
        assert_eq!(split_multi("SDN;SSI"), vec!["SDN", "SSI"]);
    }

    #[test]
    fn trims_and_drops_empty_segments() {
        assert_eq!(
            split_multi(" UKRAINE-EO13662; ;RUSSIA-EO14024;; "),
            vec!["UKRAINE-EO13662", "RUSSIA-EO14024"]
        );
        assert!(split_multi("").is_empty());
        assert!(split_multi(" ; ").is_empty());
    }

    #[test]
    fn canonical_cells_survive_split_then_join() {
        for cell in [
            "SDN",
            "SDN;SSI",
            "123 Main St, Springfield, US;Box 7, Moscow, RU",
            "Passport 1234, Russia;Tax ID No. 77-01",
        ] {
            assert_eq!(join_multi(&split_multi(cell)), cell);
        }
    }

    #[test]
    fn join_of_nothing_is_empty() {
        let none: [&str; 0] = [];
        assert_eq!(join_multi(&none), "");
    }
}

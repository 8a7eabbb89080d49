//! Family number search.

use thiserror::Error;

/// How many numbers past the typed start a search covers.
pub const SEARCH_WINDOW: i64 = 8;

/// Inclusive range of family numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberRange {
    pub start: i64,
    pub end: i64,
}

impl NumberRange {
    pub fn exact(n: i64) -> Self {
        Self { start: n, end: n }
    }

    /// Range between two bounds given in any order.
    pub fn between(a: i64, b: i64) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn contains(&self, n: i64) -> bool {
        self.start <= n && n <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchInputError {
    #[error("search input is empty")]
    Empty,
    #[error("search input {0:?} does not start with a family number")]
    NotANumber(String),
}

/// Turn typed search input into the range to query: `"12"` searches `[12, 20]`.
///
/// Only the leading digits count (`"12a"` is 12). Zero is not a family
/// number and is rejected like non-numeric input.
pub fn parse_search_input(input: &str) -> Result<NumberRange, SearchInputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SearchInputError::Empty);
    }
    match leading_int(trimmed) {
        Some(start) if start != 0 => Ok(NumberRange {
            start,
            end: start.saturating_add(SEARCH_WINDOW),
        }),
        _ => Err(SearchInputError::NotANumber(input.to_string())),
    }
}

/// Lenient integer prefix: optional sign followed by at least one digit.
pub fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    rest[..digits].parse::<i64>().ok().map(|n| sign * n)
}

/// Range from repeated `number` query values. Values that are not
/// integers are dropped; no valid value means no filter.
pub fn range_from_params<S: AsRef<str>>(values: &[S]) -> Option<NumberRange> {
    let numbers: Vec<i64> = values
        .iter()
        .filter_map(|v| {
            let parsed = v.as_ref().trim().parse::<i64>();
            if parsed.is_err() {
                tracing::debug!(value = v.as_ref(), "ignoring malformed number filter");
            }
            parsed.ok()
        })
        .collect();
    match numbers.as_slice() {
        [] => None,
        [n] => Some(NumberRange::exact(*n)),
        [first, .., last] => Some(NumberRange::between(*first, *last)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_window() {
        assert_eq!(parse_search_input("12"), Ok(NumberRange { start: 12, end: 20 }));
        assert_eq!(parse_search_input(" 7 "), Ok(NumberRange { start: 7, end: 15 }));
    }

    #[test]
    fn test_lenient_prefix() {
        assert_eq!(parse_search_input("12abc").map(|r| r.start), Ok(12));
        assert_eq!(leading_int("-3x"), Some(-3));
        assert_eq!(leading_int("abc"), None);
    }

    #[test]
    fn test_rejected_inputs() {
        assert_eq!(parse_search_input(""), Err(SearchInputError::Empty));
        assert!(matches!(parse_search_input("Meier"), Err(SearchInputError::NotANumber(_))));
        assert!(matches!(parse_search_input("0"), Err(SearchInputError::NotANumber(_))));
    }

    #[test]
    fn test_range_from_params() {
        assert_eq!(range_from_params(&["12", "20"]), Some(NumberRange { start: 12, end: 20 }));
        assert_eq!(range_from_params(&["20", "12"]), Some(NumberRange { start: 12, end: 20 }));
        assert_eq!(range_from_params(&["5"]), Some(NumberRange::exact(5)));
        assert_eq!(range_from_params(&["x", "9"]), Some(NumberRange::exact(9)));
        assert_eq!(range_from_params::<&str>(&[]), None);
        assert_eq!(range_from_params(&["abc"]), None);
    }
}

//! Filter keys and option ordering.

use std::cmp::Ordering;

use crate::vocab::trailing_segment;
use crate::DimOption;

/// Trailing ids excluded from the classification filter ("not determinable", "not specified").
const HIDDEN_CLASSIFICATION_IDS: [&str; 2] = ["99", "-1"];
const TOTAL_ID: &str = "Total";

/// Persisted filter key for a dimension path: trimmed, whitespace replaced by `-`, parentheses
/// dropped. IRIs normally pass through unchanged.
pub fn sanitize_filter_key(dim_path: &str) -> String {
    dim_path
        .trim()
        .chars()
        .filter(|c| !matches!(c, '(' | ')'))
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect()
}

/// Move options named "Total" to the front, keeping fetch order otherwise.
pub fn total_first(options: &mut [DimOption]) {
    options.sort_by_key(|o| !o.is_total());
}

/// Order options for the classification filter control.
///
/// The `Total` member comes first, members with trailing id `99` or `-1` are dropped and the rest
/// sort ascending by the numeric value of their trailing id. Non-numeric ids sort after numeric
/// ones, by text.
pub fn classification_filter_order(options: &[DimOption]) -> Vec<&DimOption> {
    let mut total = Vec::new();
    let mut rest = Vec::new();
    for option in options {
        let id = trailing_segment(&option.value);
        if id == TOTAL_ID {
            total.push(option);
        } else if !HIDDEN_CLASSIFICATION_IDS.contains(&id) {
            rest.push(option);
        }
    }
    rest.sort_by(|a, b| compare_ids(trailing_segment(&a.value), trailing_segment(&b.value)));
    total.truncate(1);
    total.extend(rest);
    total
}

fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

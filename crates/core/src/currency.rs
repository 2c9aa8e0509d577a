//! Display Helpers for Amounts and Rates
//!
//! Single place for rupee and percentage formatting, so the dashboard and
//! the sanction letter never disagree.

/// Format a whole-rupee amount with Indian digit grouping.
///
/// The last three digits form one group and every group above that has two
/// digits: `500000` becomes `₹5,00,000`, `12345678` becomes `₹1,23,45,678`.
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("₹{}", digits);
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("₹{},{}", groups.join(","), tail)
}

/// Format an annual interest rate, e.g. `9.5` as `9.5%` and `10.0` as `10%`
pub fn format_rate(rate_percent: f64) -> String {
    format!("{}%", rate_percent)
}

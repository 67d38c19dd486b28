//! Number formatting for quantities, sums and differences.

use crate::models::delta::Trend;

/// Format a quantity or sum for display.
///
/// `None` and zero both render as `"-"`: an empty holding and an unknown
/// one look the same. Everything else gets two decimals and thousands
/// separators.
pub fn format_number(value: Option<f64>) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if v == 0.0 || !v.is_finite() => "-".to_string(),
        Some(v) => group_thousands(v),
    }
}

/// Format a signed difference, prefixing `+` when positive.
pub fn format_difference(difference: f64) -> String {
    let formatted = group_thousands(difference);
    if difference > 0.0 && formatted != "0.00" {
        format!("+{formatted}")
    } else {
        formatted
    }
}

/// Icon for the direction of a sum against its previous value.
pub fn trend_icon(trend: Trend) -> &'static str {
    trend.icon()
}

/// Two decimals, comma-grouped integer part, leading `-` for negatives.
/// Values that round to zero never carry a sign.
fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit as char);
    }

    let is_zero = fixed == "0.00";
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

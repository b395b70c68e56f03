//! Display helpers shared by the report and the advisor answers.

use rust_decimal::Decimal;

/// Renders `value` rounded half-to-even to exactly `dp` decimal places.
pub fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp(dp);
    rounded.rescale(dp);
    rounded.to_string()
}

/// `$1,234` style currency with thousands separators; negative values render as `-$1,234`.
pub fn currency(value: Decimal, dp: u32) -> String {
    let rendered = fixed(value.abs(), dp);
    let (whole, fraction) = match rendered.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (rendered.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let rounded = value.round_dp(dp);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    match fraction {
        Some(fraction) => format!("{sign}${grouped}.{fraction}"),
        None => format!("{sign}${grouped}"),
    }
}

pub fn percent(value: Decimal, dp: u32) -> String {
    format!("{}%", fixed(value, dp))
}

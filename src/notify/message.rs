//! Alert message formatting

use rust_decimal::Decimal;

/// Build the alert text: drop percentage, current price and a Slack-style link
pub fn format_alert(price: Decimal, deviation: Decimal, currency: &str, url: &str) -> String {
    format!(
        "💰 Price down {:.1}%! Now {}{}\n<{}|View product page>",
        deviation.round_dp(1),
        currency,
        format_price(price),
        url
    )
}

/// Group the integer part in thousands: `1980` -> `1,980`, `1234.50` -> `1,234.5`
pub fn format_price(price: Decimal) -> String {
    let normalized = price.round_dp(2).normalize();
    let text = normalized.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if normalized.is_sign_negative() && !normalized.is_zero() {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

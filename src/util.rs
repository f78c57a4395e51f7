/// Keep only the ASCII decimal digits of a raw identifier.
pub fn sanitize_id(raw: &str) -> String {
    raw.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

/// Format an amount as Thai baht with two fraction digits, e.g. `฿1,234.50`.
pub fn format_currency(amount: f64) -> String {
    let fixed = format_fixed(amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{sign}฿{}.{fraction}", group_thousands(whole))
}

/// Plain two-decimal rendering used in summaries and payload amounts.
pub fn format_fixed(amount: f64) -> String {
    format!("{:.2}", round_cents(amount))
}

/// Round to whole satang, ties away from zero.
///
/// `{:.2}` alone rounds exact ties to even, so `2.625` would become `2.62`.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
#[path = "util_tests.rs"]
mod tests;

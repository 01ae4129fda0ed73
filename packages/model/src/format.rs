//! Display formatting for amounts, PV and timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// `1234567.5` → `"1,234,567.50"`.
pub fn money(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let sign = if negative && cents > 0 { "-" } else { "" };
    format!("{sign}{whole}.{:02}", cents % 100)
}

/// Money with a currency prefix, e.g. `"₦ 1,500.00"` or `"USD 20.00"`.
pub fn money_in(value: f64, currency: Option<&str>) -> String {
    match currency.filter(|c| !c.is_empty()) {
        Some(currency) => format!("{currency} {}", money(value)),
        None => money(value),
    }
}

/// PV is shown without decimals unless it has a fractional part.
pub fn pv(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{} PV", group_thousands(value.abs() as u64))
    } else {
        format!("{value:.2} PV")
    }
}

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if n < 1000 {
            groups.push(n.to_string());
            break;
        }
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.reverse();
    groups.join(",")
}

/// Render a backend timestamp as `"12 Mar 2024, 14:05"`.
///
/// Accepts RFC 3339, `"YYYY-MM-DD HH:MM:SS"` and bare dates; anything else is
/// shown as received.
pub fn timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d %b %Y, %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return dt.format("%d %b %Y, %H:%M").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%d %b %Y").to_string();
    }
    raw.to_string()
}

pub fn opt_timestamp(raw: Option<&str>) -> String {
    raw.map(timestamp).unwrap_or_else(|| "—".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_grouping() {
        assert_eq!(money(0.0), "0.00");
        assert_eq!(money(1234567.5), "1,234,567.50");
        assert_eq!(money(-20.256), "-20.26");
        assert_eq!(money(999.999), "1,000.00");
        assert_eq!(money_in(5.0, Some("USD")), "USD 5.00");
    }

    #[test]
    fn pv_values() {
        assert_eq!(pv(1500.0), "1,500 PV");
        assert_eq!(pv(12.5), "12.50 PV");
    }

    #[test]
    fn timestamps() {
        assert_eq!(timestamp("2024-03-12T14:05:00.000000Z"), "12 Mar 2024, 14:05");
        assert_eq!(timestamp("2024-03-12 14:05:09"), "12 Mar 2024, 14:05");
        assert_eq!(timestamp("2024-03-12"), "12 Mar 2024");
        assert_eq!(timestamp("yesterday"), "yesterday");
        assert_eq!(opt_timestamp(None), "—");
    }
}

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Placeholder for missing values in display output
const NOT_AVAILABLE: &str = "N/A";

/// Format a phone number for display
/// Normalizes Costa Rican numbers to XXXX-XXXX, keeping the +506 prefix if present
pub fn format_phone(phone: &str) -> String {
    // Extract just the digits
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        8 => format!("{}-{}", &digits[0..4], &digits[4..8]),
        11 if digits.starts_with("506") => {
            format!("+506 {}-{}", &digits[3..7], &digits[7..11])
        }
        _ => phone.to_string(), // Return original if can't format
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an amount in Costa Rican colones, e.g. `₡1 234 567,50`.
/// Missing and zero amounts render as N/A.
pub fn format_currency(amount: Option<f64>) -> String {
    let amount = match amount {
        Some(a) if a != 0.0 && a.is_finite() => a,
        _ => return NOT_AVAILABLE.to_string(),
    };

    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    // Group thousands with spaces
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}₡{},{:02}", sign, grouped, fraction)
}

/// Format an ISO date or timestamp as dd/mm/yyyy
pub fn format_date(date: &str) -> String {
    let date = date.trim();
    if date.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return dt.format("%d/%m/%Y").to_string();
    }
    // Timestamps without an offset, as the database returns them
    if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%d/%m/%Y").to_string();
    }
    let day: String = date.chars().take(10).collect();
    match NaiveDate::parse_from_str(&day, "%Y-%m-%d") {
        Ok(d) => d.format("%d/%m/%Y").to_string(),
        Err(_) => date.to_string(),
    }
}

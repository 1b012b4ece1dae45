/// Quantity formatting for stock and movement tables

/// Up to three decimals, trailing zeros trimmed: 12.500 -> "12.5"
pub fn format_quantity(value: f64) -> String {
    if !value.is_finite() {
        return "—".to_string();
    }
    let s = format!("{:.3}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

pub fn format_quantity_unit(value: f64, unit: &str) -> String {
    if unit.trim().is_empty() {
        format_quantity(value)
    } else {
        format!("{} {}", format_quantity(value), unit.trim())
    }
}

/// Parse a quantity typed by the user; accepts "," as decimal separator
pub fn parse_quantity(input: &str) -> Option<f64> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(12.5), "12.5");
        assert_eq!(format_quantity(3.0), "3");
        assert_eq!(format_quantity(0.1234), "0.123");
        assert_eq!(format_quantity(-0.0001), "0");
        assert_eq!(format_quantity(f64::NAN), "—");
        assert_eq!(format_quantity_unit(2.0, "m"), "2 m");
        assert_eq!(format_quantity_unit(2.0, " "), "2");
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(" 2,5 "), Some(2.5));
        assert_eq!(parse_quantity("10"), Some(10.0));
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_quantity("inf"), None);
    }
}

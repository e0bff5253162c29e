//! Display formatting for addresses and balances

/// EGLD is denominated in 10^-18 units
pub const NATIVE_DECIMALS: u32 = 18;

pub const NATIVE_TICKER: &str = "EGLD";

/// Shorten an address to `first…last` with `chars` kept on each side.
pub fn format_address(address: &str, chars: usize) -> String {
    let count = address.chars().count();
    if address.is_empty() || count <= chars * 2 {
        return address.to_string();
    }

    let head: String = address.chars().take(chars).collect();
    let tail: String = address.chars().skip(count - chars).collect();
    format!("{}...{}", head, tail)
}

/// Convert a raw integer amount into a decimal string with `precision`
/// fractional digits. Digits beyond `precision` are truncated.
///
/// Returns `None` if `raw` is not an unsigned integer.
pub fn format_balance(raw: &str, decimals: u32, precision: usize) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = raw.trim_start_matches('0');
    let decimals = decimals as usize;

    let (whole, fraction) = if digits.len() > decimals {
        digits.split_at(digits.len() - decimals)
    } else {
        ("", digits)
    };

    let whole = if whole.is_empty() { "0" } else { whole };
    let fraction = format!("{:0>width$}", fraction, width = decimals);

    if precision == 0 {
        return Some(whole.to_string());
    }

    let mut fraction: String = fraction.chars().take(precision).collect();
    while fraction.len() < precision {
        fraction.push('0');
    }

    Some(format!("{}.{}", whole, fraction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_address() {
        let address = "erd1qqqqqqqqqqqqqpgq5774jcntdqkzv62tlvvhfn2y7eevpty6mvlszk3dla";
        assert_eq!(format_address(address, 4), "erd1...3dla");
        assert_eq!(format_address("erd1abc", 4), "erd1abc");
        assert_eq!(format_address("", 4), "");
    }

    #[test]
    fn test_format_balance() {
        assert_eq!(
            format_balance("1500000000000000000", NATIVE_DECIMALS, 4).as_deref(),
            Some("1.5000")
        );
        assert_eq!(
            format_balance("123456789", NATIVE_DECIMALS, 4).as_deref(),
            Some("0.0000")
        );
        assert_eq!(
            format_balance("98765432100000000000000", NATIVE_DECIMALS, 4).as_deref(),
            Some("98765.4321")
        );
        assert_eq!(format_balance("0", NATIVE_DECIMALS, 2).as_deref(), Some("0.00"));
        assert_eq!(format_balance("42", 0, 0).as_deref(), Some("42"));
    }

    #[test]
    fn test_format_balance_truncates() {
        // 0.99999 stays below 1
        assert_eq!(
            format_balance("999990000000000000", NATIVE_DECIMALS, 4).as_deref(),
            Some("0.9999")
        );
    }

    #[test]
    fn test_format_balance_rejects_garbage() {
        assert_eq!(format_balance("-1", NATIVE_DECIMALS, 4), None);
        assert_eq!(format_balance("1.5", NATIVE_DECIMALS, 4), None);
        assert_eq!(format_balance("", NATIVE_DECIMALS, 4), None);
    }
}

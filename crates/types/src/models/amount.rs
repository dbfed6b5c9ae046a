//! Decimal-string amount conversion and display formatting
//!
//! Token amounts travel as integer strings in the token's smallest unit
//! and are converted at the edges using the token's decimal precision.
//! Arithmetic is done in u128; values that overflow are treated as
//! invalid input.

/// Formatted zero balance placeholder shown when nothing is known
pub const ZERO_BALANCE: &str = "0.0000";

const BALANCE_FRACTION_DIGITS: usize = 4;
const QUOTE_FRACTION_DIGITS: usize = 8;

fn pow10(exp: u8) -> Option<u128> {
	10u128.checked_pow(exp as u32)
}

/// Convert a human decimal string (e.g., "0.1") to its smallest-unit
/// integer string. Returns `None` for empty, malformed, non-positive or
/// overflowing input. Fractional digits beyond the token's precision are
/// truncated.
pub fn to_smallest_unit(value: &str, decimals: u8) -> Option<String> {
	let normalized = value.trim();
	if normalized.is_empty() {
		return None;
	}

	let (whole, fraction) = match normalized.split_once('.') {
		Some((w, f)) => (w, f),
		None => (normalized, ""),
	};

	if whole.is_empty() && fraction.is_empty() {
		return None;
	}
	if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
		return None;
	}

	let scale = pow10(decimals)?;
	let whole_part: u128 = if whole.is_empty() {
		0
	} else {
		whole.parse().ok()?
	};

	let mut fraction_digits: String = fraction.chars().take(decimals as usize).collect();
	while fraction_digits.len() < decimals as usize {
		fraction_digits.push('0');
	}
	let fraction_part: u128 = if fraction_digits.is_empty() {
		0
	} else {
		fraction_digits.parse().ok()?
	};

	let total = whole_part.checked_mul(scale)?.checked_add(fraction_part)?;
	if total == 0 {
		return None;
	}
	Some(total.to_string())
}

fn split_units(raw: u128, decimals: u8) -> (u128, String) {
	match pow10(decimals) {
		Some(scale) if scale > 1 => {
			let whole = raw / scale;
			let fraction = raw % scale;
			let mut digits = fraction.to_string();
			while digits.len() < decimals as usize {
				digits.insert(0, '0');
			}
			(whole, digits)
		},
		_ => (raw, String::new()),
	}
}

/// Format a smallest-unit integer string for quote display: trailing
/// zeros trimmed, at most 8 fractional digits. Malformed input renders
/// as "0".
pub fn format_from_smallest(value: &str, decimals: u8) -> String {
	let Ok(raw) = value.trim().parse::<u128>() else {
		return "0".to_string();
	};

	let (whole, fraction) = split_units(raw, decimals);
	let trimmed: String = fraction
		.trim_end_matches('0')
		.chars()
		.take(QUOTE_FRACTION_DIGITS)
		.collect();

	if trimmed.is_empty() {
		whole.to_string()
	} else {
		format!("{}.{}", whole, trimmed)
	}
}

/// Format a raw balance for display with exactly 4 fractional digits
/// (truncated, not rounded)
pub fn format_balance(raw: u128, decimals: u8) -> String {
	let (whole, fraction) = split_units(raw, decimals);
	let mut digits: String = fraction.chars().take(BALANCE_FRACTION_DIGITS).collect();
	while digits.len() < BALANCE_FRACTION_DIGITS {
		digits.push('0');
	}
	format!("{}.{}", whole, digits)
}

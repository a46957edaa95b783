use crate::config::CurrencySettings;

/// Separates the currency symbol from the amount, as pt-BR number
/// formatting does.
const SYMBOL_SPACE: char = '\u{a0}';

/// Formats amounts per the configured currency convention
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyFormatter {
    settings: CurrencySettings,
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new(CurrencySettings::default())
    }
}

impl CurrencyFormatter {
    pub fn new(settings: CurrencySettings) -> Self {
        Self { settings }
    }

    /// Format `value` as e.g. `R$ 1.234,50`. Non-finite values format as zero.
    pub fn format(&self, value: f64) -> String {
        let value = if value.is_finite() { value } else { 0.0 };
        let rounded = format_cents(value.abs());
        let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
        let grouped = group_digits(whole, self.settings.group_separator);

        // -0.001 rounds to 0.00 and must not print a sign
        let negative = value < 0.0 && rounded.bytes().any(|b| matches!(b, b'1'..=b'9'));
        format!(
            "{}{}{}{}{}{}",
            if negative { "-" } else { "" },
            self.settings.symbol,
            SYMBOL_SPACE,
            grouped,
            self.settings.decimal_separator,
            frac
        )
    }

    /// Coerce raw input text and format it; malformed input formats as zero
    pub fn format_text(&self, text: &str) -> String {
        self.format(coerce_amount(text))
    }
}

/// Round to cents with ties going away from zero (`10.125` becomes `10.13`).
/// Values too large to scale are returned unchanged.
pub fn round_cents(value: f64) -> f64 {
    let scaled = (value * 100.0).round();
    if scaled.is_finite() {
        scaled / 100.0
    } else {
        value
    }
}

/// Two-decimal text of `value`, rounded with [`round_cents`]
pub fn format_cents(value: f64) -> String {
    format!("{:.2}", round_cents(value))
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

/// Read a decimal from the start of `text` the way a lenient numeric input
/// does: leading whitespace is skipped, the first `,` counts as the decimal
/// point, and anything after the longest numeric prefix is ignored.
/// Returns `None` when there is no numeric prefix at all.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let normalized = text.trim_start().replacen(',', ".", 1);
    let bytes = normalized.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    normalized[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read an amount for totals and reports. Anything unparsable or negative
/// counts as zero; this never fails.
pub fn coerce_amount(text: &str) -> f64 {
    match parse_decimal(text) {
        Some(value) if value >= 0.0 => value,
        _ => {
            if !text.trim().is_empty() {
                tracing::trace!(input = text, "amount coerced to zero");
            }
            0.0
        }
    }
}

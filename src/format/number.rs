//! Number formatting in the en-US conventions (`1,234.568`).

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NumberStyle {
    #[default]
    Decimal,
    /// Value is a fraction: `0.25` renders as `25%`
    Percent,
    /// ISO 4217 currency code, e.g. `USD`
    Currency(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberOptions {
    pub style: NumberStyle,
    pub minimum_fraction_digits: Option<usize>,
    pub maximum_fraction_digits: Option<usize>,
    /// Thousands separators; defaults to true
    pub use_grouping: Option<bool>,
}

/// Fraction digits are capped here, past which scaling by a power of ten overflows
const MAX_FRACTION_DIGITS: usize = 100;

impl NumberOptions {
    fn fraction_digits(&self) -> (usize, usize) {
        let (default_min, default_max) = match self.style {
            NumberStyle::Decimal => (0, 3),
            NumberStyle::Percent => (0, 0),
            NumberStyle::Currency(_) => (2, 2),
        };

        let min = self
            .minimum_fraction_digits
            .unwrap_or(default_min)
            .min(MAX_FRACTION_DIGITS);
        let max = self
            .maximum_fraction_digits
            .unwrap_or(default_max)
            .min(MAX_FRACTION_DIGITS)
            .max(min);
        (min.min(max), max)
    }
}

/// Format a number; empty for a missing value
pub fn format_number(value: Option<f64>, options: &NumberOptions) -> String {
    let Some(value) = value else {
        return String::new();
    };

    if value.is_nan() {
        return "NaN".to_string();
    }

    let scaled = match options.style {
        NumberStyle::Percent => value * 100.0,
        _ => value,
    };

    let negative = scaled.is_sign_negative() && scaled != 0.0;
    let digits = if scaled.is_infinite() {
        "∞".to_string()
    } else {
        let (min, max) = options.fraction_digits();
        render_digits(scaled.abs(), min, max, options.use_grouping.unwrap_or(true))
    };

    let body = match &options.style {
        NumberStyle::Decimal => digits,
        NumberStyle::Percent => format!("{}%", digits),
        NumberStyle::Currency(code) => match currency_symbol(code) {
            Some(symbol) => format!("{}{}", symbol, digits),
            None => format!("{}\u{a0}{}", code.to_uppercase(), digits),
        },
    };

    if negative {
        format!("-{}", body)
    } else {
        body
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code.to_uppercase().as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

/// Round half away from zero to `max` places, then trim trailing zeros down to `min`
fn render_digits(value: f64, min: usize, max: usize, grouping: bool) -> String {
    let factor = 10f64.powi(max as i32);
    let scaled = value * factor;
    // Values this large have no fractional part left to round
    let rounded = if scaled.is_finite() {
        scaled.round() / factor
    } else {
        value
    };

    let fixed = format!("{:.*}", max, rounded);
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer.to_string(), fraction.to_string()),
        None => (fixed, String::new()),
    };

    let mut fraction = fraction;
    while fraction.len() > min && fraction.ends_with('0') {
        fraction.pop();
    }

    let integer = if grouping { group_thousands(&integer) } else { integer };

    if fraction.is_empty() {
        integer
    } else {
        format!("{}.{}", integer, fraction)
    }
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

use regex::Regex;

/// A single number: optional sign, digits, at most one decimal separator.
///
/// Both `.` and `,` are accepted as the decimal separator, so thousands
/// grouping is not supported (`1,234` reads as 1.234).
const NUMBER_PATTERN: &str = r"[+-]?[0-9]+(?:[.,][0-9]+)?";

/// Extracts the first number from recognized text.
///
/// Surrounding labels and units are ignored ("Score: 42 pts" reads as 42).
/// Returns `None` when the text contains no digits; this is the normal
/// "no value" outcome for an obscured or blank region, not an error.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    if !has_digits(text) {
        return None;
    }

    // OCR often reports U+2212 for a rendered minus sign
    let normalized = text.replace('\u{2212}', "-");

    let number_regex = Regex::new(NUMBER_PATTERN).ok()?;
    let token = number_regex.find(&normalized)?.as_str();

    token.replace(',', ".").parse::<f64>().ok()
}

/// Returns true if the text could yield a value.
pub fn has_digits(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

//! Text and rounding helpers shared by the scorer, the dosing calculator and
//! the HTTP layer.

/// Normalize a free-text category ("Very High", " Food Grain ") to its key
/// form ("very_high", "food_grain")
pub fn category_key(raw: &str) -> String {
    raw.trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Title case in the style of "pre-sowing" -> "Pre-Sowing":
/// every letter that follows a non-letter is upper-cased, the rest lower-cased.
/// Underscores become spaces.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;

    for c in raw.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}

/// Round to a fixed number of decimal places (half away from zero)
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_key() {
        assert_eq!(category_key("Very High"), "very_high");
        assert_eq!(category_key("  food grain "), "food_grain");
        assert_eq!(category_key("loamy"), "loamy");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("pre-sowing"), "Pre-Sowing");
        assert_eq!(title_case("food_grain"), "Food Grain");
        assert_eq!(title_case("very_high"), "Very High");
        assert_eq!(title_case("SANDY"), "Sandy");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.345, 1), 12.3);
        assert_eq!(round_to(241.0 * 2.0, 1), 482.0);
        assert_eq!(round_to(0.125, 2), 0.13);
    }
}

//! Text helpers for turning scraped listing text into domain values.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Separators tried, in order, when splitting a match title into teams.
const TEAM_SEPARATORS: [&str; 4] = [" x ", " vs ", " - ", " @ "];

/// Parse a displayed odd such as `"@ 2,75"` into a decimal.
///
/// Unparseable input yields zero, which later fails listing validation.
pub fn parse_odd_value(text: &str) -> Decimal {
    parse_amount(text)
}

/// Parse a displayed stake such as `"R$ 50,00"` into a decimal.
pub fn parse_bet_value(text: &str) -> Decimal {
    parse_amount(text)
}

fn parse_amount(text: &str) -> Decimal {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let normalized = cleaned.replacen(',', ".", 1);
    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

/// Split a match title into `(home, away)`.
///
/// Recognizes `"A x B"`, `"A vs B"`, `"A - B"` and `"A @ B"` (case-insensitive).
/// Falls back to splitting the words in half.
pub fn extract_teams_from_title(title: &str) -> (String, String) {
    let lower = title.to_lowercase();
    for separator in TEAM_SEPARATORS {
        // Lowercasing can change byte offsets for some scripts; only trust
        // the index when both strings line up.
        if lower.len() != title.len() {
            break;
        }
        if let Some(idx) = lower.find(separator) {
            let home = title[..idx].trim();
            let away = title[idx + separator.len()..].trim();
            if !home.is_empty() && !away.is_empty() {
                return (home.to_string(), away.to_string());
            }
        }
    }

    let words: Vec<&str> = title.split(' ').collect();
    let mid = words.len().div_ceil(2);
    (words[..mid].join(" "), words[mid..].join(" "))
}

/// Collapse whitespace and drop anything but word characters, spaces, `.` and `-`.
pub fn sanitize_text(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace() || *c == '.' || *c == '-')
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_comma_decimal_odds() {
        assert_eq!(parse_odd_value("@ 2,75"), dec!(2.75));
        assert_eq!(parse_odd_value("3.10x"), dec!(3.10));
    }

    #[test]
    fn parses_currency_stakes() {
        assert_eq!(parse_bet_value("R$ 50,00"), dec!(50.00));
        assert_eq!(parse_bet_value("Máx: R$ 200"), dec!(200));
    }

    #[test]
    fn unparseable_amount_is_zero() {
        assert_eq!(parse_odd_value("indisponível"), Decimal::ZERO);
        assert_eq!(parse_bet_value(""), Decimal::ZERO);
    }

    #[test]
    fn splits_titles_on_known_separators() {
        assert_eq!(
            extract_teams_from_title("Flamengo x Vasco"),
            ("Flamengo".to_string(), "Vasco".to_string())
        );
        assert_eq!(
            extract_teams_from_title("Real Madrid VS Barcelona"),
            ("Real Madrid".to_string(), "Barcelona".to_string())
        );
        assert_eq!(
            extract_teams_from_title("Lakers @ Celtics"),
            ("Lakers".to_string(), "Celtics".to_string())
        );
    }

    #[test]
    fn falls_back_to_halving_words() {
        assert_eq!(
            extract_teams_from_title("Santos Corinthians Final"),
            ("Santos Corinthians".to_string(), "Final".to_string())
        );
    }

    #[test]
    fn sanitize_collapses_whitespace_and_symbols() {
        assert_eq!(sanitize_text("  Super   Odd!!  2.5 "), "Super Odd 2.5");
        assert_eq!(sanitize_text("Aumento\n- 50%"), "Aumento - 50");
    }
}

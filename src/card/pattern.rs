//! Parsing and validation of generation patterns like `BIN|MM|YYYY|CVV`

use regex::Regex;

use crate::error::Result;
use crate::{internal_error, validation_error};

/// Whether `bin` is a 6 to 16 digit BIN candidate
pub fn is_valid_bin(bin: &str) -> bool {
    (6..=16).contains(&bin.len()) && bin.bytes().all(|b| b.is_ascii_digit())
}

/// Check a BIN candidate, with a message suitable for the user
pub fn validate_bin(bin: &str) -> Result<()> {
    if is_valid_bin(bin) {
        Ok(())
    } else {
        Err(validation_error!("Invalid BIN '{}': must be 6 to 16 digits", bin))
    }
}

/// Check an expiry month (`01`-`12`)
pub fn validate_month(month: &str) -> Result<()> {
    let re = Regex::new(r"^(0[1-9]|1[0-2])$").map_err(|e| internal_error!("invalid pattern regex: {}", e))?;
    if re.is_match(month) {
        Ok(())
    } else {
        Err(validation_error!("Invalid month '{}': must be 01 to 12", month))
    }
}

/// Check an expiry year (`YY` or `202Y`/`203Y`)
pub fn validate_year(year: &str) -> Result<()> {
    let re = Regex::new(r"^([0-9]{2}|20[2-3][0-9])$")
        .map_err(|e| internal_error!("invalid pattern regex: {}", e))?;
    if re.is_match(year) {
        Ok(())
    } else {
        Err(validation_error!("Invalid year '{}': must be YY or YYYY", year))
    }
}

/// Check a CVV (3 or 4 digits)
pub fn validate_cvv(cvv: &str) -> Result<()> {
    let re = Regex::new(r"^[0-9]{3,4}$").map_err(|e| internal_error!("invalid pattern regex: {}", e))?;
    if re.is_match(cvv) {
        Ok(())
    } else {
        Err(validation_error!("Invalid CVV '{}': must be 3 or 4 digits", cvv))
    }
}

/// A validated generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenPattern {
    pub bin: String,
    pub month: Option<String>,
    /// Always four digits once parsed
    pub year: Option<String>,
    pub cvv: Option<String>,
}

impl GenPattern {
    /// Parse user input such as `477349002646|05|2027|123`, `4773490026xx 05/27 rnd`
    /// or `477349 2027 05`.
    ///
    /// `|` and whitespace both separate fields. Trailing `x` placeholders are
    /// stripped from the BIN, any other field containing `x` (or equal to
    /// `rnd`) counts as not given, `MM/YY` is split, two-digit years are
    /// widened to `20YY`, and a year given before the month is swapped back.
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().replace('|', " ");
        let tokens: Vec<&str> = normalized.split_whitespace().collect();

        let bin = tokens
            .first()
            .map(|b| b.trim_end_matches(['x', 'X']).to_string())
            .unwrap_or_default();

        let raw: Vec<&str> = match tokens.get(1).and_then(|t| t.split_once('/')) {
            Some((m, y)) => [m, y].into_iter().chain(tokens.iter().skip(2).copied()).collect(),
            None => tokens.iter().skip(1).copied().collect(),
        };
        let field = |i: usize| raw.get(i).and_then(|f| placeholder_to_none(f));

        let mut month = field(0);
        let mut year = field(1);
        let cvv = field(2);

        if let (Some(m), Some(y)) = (&month, &year) {
            if looks_like_year(m) && looks_like_month(y) {
                std::mem::swap(&mut month, &mut year);
            }
        }

        if let Some(y) = year.as_mut() {
            if y.len() == 2 {
                y.insert_str(0, "20");
            }
        }

        validate_bin(&bin)?;
        if let Some(m) = &month {
            validate_month(m)?;
        }
        if let Some(y) = &year {
            validate_year(y)?;
        }
        if let Some(c) = &cvv {
            validate_cvv(c)?;
        }

        Ok(Self {
            bin,
            month,
            year,
            cvv,
        })
    }

    /// Two-digit form of the year, as printed on cards
    pub fn short_year(&self) -> Option<&str> {
        self.year.as_deref().map(|y| &y[y.len().saturating_sub(2)..])
    }

    /// First six digits, used for the BIN info lookup
    pub fn lookup_prefix(&self) -> &str {
        self.bin.get(..6).unwrap_or(&self.bin)
    }
}

fn placeholder_to_none(field: &str) -> Option<String> {
    let field = field.trim();
    if field.is_empty() || field.contains(['x', 'X']) || field.eq_ignore_ascii_case("rnd") {
        None
    } else {
        Some(field.to_string())
    }
}

fn looks_like_year(value: &str) -> bool {
    value.len() == 4
        && value.starts_with("20")
        && matches!(value.as_bytes()[2], b'2'..=b'3')
        && value.as_bytes()[3].is_ascii_digit()
}

fn looks_like_month(value: &str) -> bool {
    validate_month(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_validation() {
        assert!(is_valid_bin("411111"));
        assert!(is_valid_bin("4111111111111111"));
        assert!(!is_valid_bin("41111"));
        assert!(!is_valid_bin("41111111111111111"));
        assert!(!is_valid_bin("41111a"));
        assert!(!is_valid_bin(""));
    }

    #[test]
    fn test_full_pattern() {
        let pattern = GenPattern::parse("477349002646|05|2027|123").unwrap();
        assert_eq!(pattern.bin, "477349002646");
        assert_eq!(pattern.month.as_deref(), Some("05"));
        assert_eq!(pattern.year.as_deref(), Some("2027"));
        assert_eq!(pattern.short_year(), Some("27"));
        assert_eq!(pattern.cvv.as_deref(), Some("123"));
        assert_eq!(pattern.lookup_prefix(), "477349");
    }

    #[test]
    fn test_bin_only() {
        let pattern = GenPattern::parse("  457173xxxx ").unwrap();
        assert_eq!(pattern.bin, "457173");
        assert_eq!(pattern.month, None);
        assert_eq!(pattern.year, None);
        assert_eq!(pattern.cvv, None);
    }

    #[test]
    fn test_combined_expiry_and_two_digit_year() {
        let pattern = GenPattern::parse("457173 07/29 4321").unwrap();
        assert_eq!(pattern.month.as_deref(), Some("07"));
        assert_eq!(pattern.year.as_deref(), Some("2029"));
        assert_eq!(pattern.cvv.as_deref(), Some("4321"));
    }

    #[test]
    fn test_year_before_month_is_swapped() {
        let pattern = GenPattern::parse("457173|2028|11").unwrap();
        assert_eq!(pattern.month.as_deref(), Some("11"));
        assert_eq!(pattern.year.as_deref(), Some("2028"));
    }

    #[test]
    fn test_placeholder_expiry_keeps_cvv_position() {
        let pattern = GenPattern::parse("457173|xx/xx|123").unwrap();
        assert_eq!(pattern.month, None);
        assert_eq!(pattern.year, None);
        assert_eq!(pattern.cvv.as_deref(), Some("123"));
    }

    #[test]
    fn test_placeholders_are_ignored() {
        let pattern = GenPattern::parse("457173|xx|xxxx|rnd").unwrap();
        assert_eq!(pattern.month, None);
        assert_eq!(pattern.year, None);
        assert_eq!(pattern.cvv, None);
    }

    #[test]
    fn test_invalid_fields_rejected() {
        assert!(GenPattern::parse("").is_err());
        assert!(GenPattern::parse("12345").is_err());
        assert!(GenPattern::parse("457173|13|2027").is_err());
        assert!(GenPattern::parse("457173|05|2045").is_err());
        assert!(GenPattern::parse("457173|05|27|12").is_err());

        let err = GenPattern::parse("457173|00").unwrap_err();
        assert!(err.to_string().contains("month"));
    }
}

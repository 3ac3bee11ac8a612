//! Luhn-valid card synthesis from a BIN prefix

use chrono::Datelike;
use rand::rngs::ThreadRng;

use super::entropy::Entropy;
use super::luhn::check_digit;
use super::pattern::{validate_cvv, validate_month, validate_year, GenPattern};
use crate::error::Result;
use crate::types::{CardCandidate, SynthesisConfig};

/// Fixed expiry/CVV values that replace the generated ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardOverrides {
    month: Option<String>,
    year: Option<String>,
    cvv: Option<String>,
}

impl CardOverrides {
    /// No overrides; every field is random
    pub fn none() -> Self {
        Self::default()
    }

    /// Validate and normalize overrides. Years may be `YY` or `YYYY` and are
    /// kept as their last two digits.
    pub fn new(month: Option<&str>, year: Option<&str>, cvv: Option<&str>) -> Result<Self> {
        if let Some(m) = month {
            validate_month(m)?;
        }
        if let Some(y) = year {
            validate_year(y)?;
        }
        if let Some(c) = cvv {
            validate_cvv(c)?;
        }

        Ok(Self {
            month: month.map(str::to_string),
            year: year.map(|y| y[y.len() - 2..].to_string()),
            cvv: cvv.map(str::to_string),
        })
    }

    pub fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    pub fn cvv(&self) -> Option<&str> {
        self.cvv.as_deref()
    }
}

impl TryFrom<&GenPattern> for CardOverrides {
    type Error = crate::error::BinForgeError;

    fn try_from(pattern: &GenPattern) -> Result<Self> {
        Self::new(
            pattern.month.as_deref(),
            pattern.year.as_deref(),
            pattern.cvv.as_deref(),
        )
    }
}

/// Produces card candidates for a BIN.
///
/// Callers validate the prefix (6 to 16 digits) beforehand. Prefixes longer
/// than `total_length - 1` are cut so the check digit still lands at
/// `total_length`.
pub struct CardSynthesizer<E: Entropy = ThreadRng> {
    entropy: E,
    config: SynthesisConfig,
    current_year: i32,
}

impl CardSynthesizer<ThreadRng> {
    /// Synthesizer backed by the thread-local generator
    pub fn new() -> Self {
        Self::with_entropy(rand::thread_rng())
    }
}

impl Default for CardSynthesizer<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entropy> CardSynthesizer<E> {
    /// Synthesizer drawing from `entropy`
    pub fn with_entropy(entropy: E) -> Self {
        Self {
            entropy,
            config: SynthesisConfig::default(),
            current_year: chrono::Local::now().year(),
        }
    }

    pub fn with_config(mut self, config: SynthesisConfig) -> Self {
        self.config = config;
        self
    }

    /// Pin the year that expiry dates are drawn relative to
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// One candidate. Random month, year and CVV are always drawn, then
    /// replaced by any override, so the draw sequence does not depend on
    /// which overrides are set.
    pub fn synthesize(&mut self, prefix: &str, overrides: &CardOverrides) -> CardCandidate {
        let number = self.card_number(prefix);
        let mut expiry_month = self.month();
        let mut expiry_year = self.year();
        let mut cvv = self.cvv();

        if let Some(m) = overrides.month() {
            expiry_month = m.to_string();
        }
        if let Some(y) = overrides.year() {
            expiry_year = y.to_string();
        }
        if let Some(c) = overrides.cvv() {
            cvv = c.to_string();
        }

        CardCandidate {
            number,
            expiry_month,
            expiry_year,
            cvv,
        }
    }

    /// `count` independent candidates
    pub fn synthesize_batch(
        &mut self,
        prefix: &str,
        overrides: &CardOverrides,
        count: usize,
    ) -> Vec<CardCandidate> {
        (0..count).map(|_| self.synthesize(prefix, overrides)).collect()
    }

    fn card_number(&mut self, prefix: &str) -> String {
        let body_len = self.config.total_length.saturating_sub(1);
        let mut number: String = prefix.chars().take(body_len).collect();

        while number.len() < body_len {
            let digit = self.entropy.next_in(0, 9);
            number.push(char::from(b'0' + digit as u8));
        }

        // A completing digit exists for every digit string; '0' only covers
        // a prefix that slipped past validation with a non-digit in it.
        let check = check_digit(&number).unwrap_or('0');
        number.push(check);
        number
    }

    fn month(&mut self) -> String {
        format!("{:02}", self.entropy.next_in(1, 12))
    }

    fn year(&mut self) -> String {
        let base = self.current_year.max(0) as u32;
        let year = self.entropy.next_in(base + 1, base + 10);
        format!("{:02}", year % 100)
    }

    fn cvv(&mut self) -> String {
        self.entropy.next_in(100, 999).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::entropy::SequenceEntropy;
    use crate::card::luhn::luhn_valid;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_output_is_luhn_valid_for_every_prefix_length() {
        let mut synth = CardSynthesizer::with_entropy(StdRng::seed_from_u64(42));
        let digits = "4571736012345678";
        for len in 6..=16 {
            for _ in 0..50 {
                let card = synth.synthesize(&digits[..len], &CardOverrides::none());
                assert_eq!(card.number.len(), 16, "prefix length {}", len);
                assert!(luhn_valid(&card.number), "{} invalid", card.number);
                assert!(card.number.starts_with(&digits[..len.min(15)]));
            }
        }
    }

    #[test]
    fn test_random_fields_in_range() {
        let mut synth = CardSynthesizer::with_entropy(StdRng::seed_from_u64(1)).with_current_year(2026);
        for _ in 0..500 {
            let card = synth.synthesize("457173", &CardOverrides::none());
            let month: u32 = card.expiry_month.parse().unwrap();
            let year: u32 = card.expiry_year.parse().unwrap();
            let cvv: u32 = card.cvv.parse().unwrap();
            assert_eq!(card.expiry_month.len(), 2);
            assert!((1..=12).contains(&month));
            assert!((27..=36).contains(&year));
            assert!((100..=999).contains(&cvv));
        }
    }

    #[test]
    fn test_exact_digits_from_scripted_entropy() {
        // nine pad digits, then month, year, cvv
        let entropy = SequenceEntropy::new(vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 7, 2030, 321]);
        let mut synth = CardSynthesizer::with_entropy(entropy).with_current_year(2026);

        let card = synth.synthesize("411111", &CardOverrides::none());
        assert_eq!(card.number, "4111110000000005");
        assert_eq!(card.expiry_month, "07");
        assert_eq!(card.expiry_year, "30");
        assert_eq!(card.cvv, "321");
        assert!(luhn_valid(&card.number));
    }

    #[test]
    fn test_overrides_do_not_change_draws() {
        let script = vec![5, 1, 9, 3, 3, 8, 0, 2, 6, 11, 2029, 777];
        let mut plain = CardSynthesizer::with_entropy(SequenceEntropy::new(script.clone()))
            .with_current_year(2026);
        let mut fixed = CardSynthesizer::with_entropy(SequenceEntropy::new(script))
            .with_current_year(2026);
        let overrides = CardOverrides::new(Some("07"), Some("2031"), Some("4444")).unwrap();

        let a = plain.synthesize("520000", &CardOverrides::none());
        let b = fixed.synthesize("520000", &overrides);

        assert_eq!(a.number, b.number);
        assert_eq!(b.expiry_month, "07");
        assert_eq!(b.expiry_year, "31");
        assert_eq!(b.cvv, "4444");
        assert_eq!(a.expiry_month, "11");
    }

    #[test]
    fn test_fixed_month_always_applied() {
        let mut synth = CardSynthesizer::new();
        let overrides = CardOverrides::new(Some("07"), None, None).unwrap();
        for card in synth.synthesize_batch("457173", &overrides, 25) {
            assert_eq!(card.expiry_month, "07");
        }
    }

    #[test]
    fn test_sixteen_digit_prefix_keeps_length() {
        let mut synth = CardSynthesizer::new();
        let card = synth.synthesize("4111111111111112", &CardOverrides::none());
        assert_eq!(card.number, "4111111111111111");
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        assert!(CardOverrides::new(Some("13"), None, None).is_err());
        assert!(CardOverrides::new(None, Some("2"), None).is_err());
        assert!(CardOverrides::new(None, None, Some("12")).is_err());
    }

    #[test]
    fn test_overrides_from_pattern() {
        let pattern = GenPattern::parse("457173|05|2027|123").unwrap();
        let overrides = CardOverrides::try_from(&pattern).unwrap();
        assert_eq!(overrides.month(), Some("05"));
        assert_eq!(overrides.year(), Some("27"));
        assert_eq!(overrides.cvv(), Some("123"));
    }

    #[test]
    fn test_batch_size() {
        let mut synth = CardSynthesizer::new();
        assert_eq!(synth.synthesize_batch("457173", &CardOverrides::none(), 10).len(), 10);
        assert!(synth.synthesize_batch("457173", &CardOverrides::none(), 0).is_empty());
    }
}

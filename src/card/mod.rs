//! Card number synthesis

pub mod entropy;
pub mod luhn;
pub mod pattern;
pub mod synthesizer;

pub use entropy::{Entropy, SequenceEntropy};
pub use luhn::{check_digit, luhn_valid};
pub use pattern::{is_valid_bin, validate_bin, GenPattern};
pub use synthesizer::{CardOverrides, CardSynthesizer};

/// Upper bound on cards per generation request
pub const MAX_BATCH_SIZE: usize = 100;

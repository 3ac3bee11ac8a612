//! bin-forge - BIN resolution and Luhn-valid card synthesis
//!
//! A local BIN database imported from CSV, backed by two remote lookup
//! services, plus a generator for checksum-valid card numbers.

pub mod card;
pub mod config;
pub mod error;
pub mod resolver;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{BinForgeError, Result};
pub use types::{
    BinLookup, BinRecord, CardCandidate, LookupTier, MetricsSnapshot, ResolvedBinInfo,
    ResolverConfig, SynthesisConfig, TierOutcome, UNKNOWN,
};

// Re-export main functionality
pub use card::{CardOverrides, CardSynthesizer, GenPattern};
pub use config::AppConfig;
pub use resolver::{BinResolver, BinSource};
pub use store::{RecordStore, StoreState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}

//! bin-forge - BIN lookups and Luhn-valid card generation from the command line

use anyhow::Context;
use bin_forge::{
    card::{validate_bin, MAX_BATCH_SIZE},
    config::AppConfig,
    resolver::BinResolver,
    store::RecordStore,
    types::{BinLookup, CardCandidate, ResolvedBinInfo},
    BinForgeError, CardOverrides, CardSynthesizer, GenPattern,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::process;
use std::sync::Arc;
use std::time::Duration;

const RULE: &str = "─━─━─━─━─━─━─━─━─━─━─━─━─";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bin_forge=info".into()),
        )
        .init();

    if let Err(e) = bin_forge::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    let args: Vec<String> = env::args().skip(1).collect();

    if let Err(e) = run(&args).await {
        match e.downcast_ref::<BinForgeError>() {
            Some(err) => eprintln!("{}", err.user_message()),
            None => eprintln!("❌ Error: {:#}", e),
        }
        process::exit(1);
    }
}

async fn run(args: &[String]) -> anyhow::Result<()> {
    let Some((command, rest)) = args.split_first() else {
        print_help();
        return Ok(());
    };

    match command.as_str() {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "version" | "--version" | "-V" => {
            println!("bin-forge {}", bin_forge::VERSION);
            Ok(())
        }
        "bin" => run_bin(rest).await,
        "gen" => run_gen(rest).await,
        other => Err(BinForgeError::cli(format!("Unknown command '{}'", other)).into()),
    }
}

/// `bin <BIN>...`
async fn run_bin(args: &[String]) -> anyhow::Result<()> {
    if args.is_empty() {
        return Err(BinForgeError::cli("Usage: bin-forge bin <BIN> [<BIN>...]").into());
    }
    for bin in args {
        validate_bin(bin)?;
    }

    let config = AppConfig::from_env().context("reading configuration")?;
    let resolver = build_resolver(&config).await;

    let lookups = resolver.resolve_many(args).await;
    for lookup in &lookups {
        display_lookup(lookup);
    }

    let metrics = resolver.get_metrics_snapshot();
    tracing::debug!(
        lookups = metrics.lookups,
        local_hits = metrics.local_hits,
        remote_hits = metrics.remote_hits,
        avg_ms = metrics.avg_lookup_time_ms(),
        "Lookup summary"
    );

    Ok(())
}

/// `gen <PATTERN> [--count N]`
async fn run_gen(args: &[String]) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("reading configuration")?;

    let mut count = config.synthesis.batch_size;
    let mut pattern_parts = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--count" | "-n" => {
                let value = iter
                    .next()
                    .ok_or_else(|| BinForgeError::cli("--count needs a value"))?;
                count = value
                    .parse::<usize>()
                    .map_err(|_| BinForgeError::cli(format!("Invalid count '{}'", value)))?
                    .clamp(1, MAX_BATCH_SIZE);
            }
            _ => pattern_parts.push(arg.as_str()),
        }
    }

    if pattern_parts.is_empty() {
        return Err(BinForgeError::cli(
            "Usage: bin-forge gen BIN|MM|YYYY|CVV [--count N]  (e.g. 477349002646|05|2027|123)",
        )
        .into());
    }

    let pattern = GenPattern::parse(&pattern_parts.join(" "))?;
    let overrides = CardOverrides::try_from(&pattern)?;

    let cards = CardSynthesizer::new()
        .with_config(config.synthesis)
        .synthesize_batch(&pattern.bin, &overrides, count);

    let resolver = build_resolver(&config).await;
    let info = resolver.resolve(pattern.lookup_prefix()).await;

    display_generated(&pattern, &cards, &info);
    Ok(())
}

async fn build_resolver(config: &AppConfig) -> BinResolver {
    let store = Arc::new(RecordStore::new());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Loading BIN database {}", config.database_path.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let loaded = store.load(&config.database_path).await;
    spinner.finish_and_clear();

    if !loaded {
        eprintln!(
            "⚠️  BIN database not available at {}; using remote lookups only",
            config.database_path.display()
        );
    }

    BinResolver::with_config(store, config.resolver.clone(), config.endpoints.clone())
}

fn display_lookup(lookup: &BinLookup) {
    let info = &lookup.info;
    println!();
    println!("🔍 BIN: {}", lookup.prefix);
    if !lookup.is_resolved() {
        println!("❌ No information found for this BIN");
        return;
    }
    println!("🏦 Bank: {}", info.bank_or_unknown());
    println!("💳 Brand: {}", info.brand_or_unknown());
    println!("🌍 Country: {}", country_line(info));
    println!("📱 Type: {}", info.card_type_or_unknown());
    println!("⭐ Level: {}", info.level_or_unknown());
    println!("📡 Source: {} ({}ms)", lookup.tier, lookup.duration.as_millis());
}

fn display_generated(pattern: &GenPattern, cards: &[CardCandidate], info: &ResolvedBinInfo) {
    println!(
        "BIN -» {}xxxx|{}|{}|{}",
        pattern.bin,
        pattern.month.as_deref().unwrap_or("xx"),
        pattern.short_year().unwrap_or("xx"),
        pattern.cvv.as_deref().unwrap_or("rnd"),
    );
    println!("{}", RULE);
    for card in cards {
        println!("{}", card);
    }
    println!("{}", RULE);
    println!(
        "• Info -» {} - {} - {}",
        info.brand_or_unknown(),
        info.card_type_or_unknown(),
        info.level_or_unknown()
    );
    println!("• Bank -» {}", info.bank_or_unknown());
    println!("• Country -» {}", country_line(info));
}

fn country_line(info: &ResolvedBinInfo) -> String {
    match info.country_flag() {
        Some(flag) => format!("{} {} ({})", info.country_or_unknown(), flag, info.country_code_or_unknown()),
        None => format!("{} ({})", info.country_or_unknown(), info.country_code_or_unknown()),
    }
}

fn print_help() {
    println!("🔥 bin-forge - BIN lookups and Luhn-valid card generation");
    println!("═══════════════════════════════════════════════════════");
    println!();
    println!("USAGE:");
    println!("    bin-forge bin <BIN> [<BIN>...]          Look up issuer info (6-16 digits)");
    println!("    bin-forge gen <PATTERN> [--count N]     Generate cards (default 10, max {})", MAX_BATCH_SIZE);
    println!();
    println!("PATTERN:");
    println!("    BIN|MM|YYYY|CVV  e.g. 477349002646|05|2027|123");
    println!("    Fields after the BIN are optional; use xx or rnd for random values.");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    BIN_FORGE_DB               Path to the BIN CSV (default: bin-list-data.csv)");
    println!("    BIN_FORGE_OFFLINE          Skip remote lookups (true/false)");
    println!("    BIN_FORGE_TIER_TIMEOUT_MS  Timeout per remote lookup (default: 3000)");
    println!("    BIN_FORGE_GEN_COUNT        Cards per gen request (default: 10)");
    println!("    BINLIST_BASE_URL           Override the binlist endpoint");
    println!("    BINTABLE_BASE_URL          Override the bintable endpoint");
    println!("    BINTABLE_API_KEY           Enables the bintable fallback");
    println!("    RUST_LOG                   Log filter (default: bin_forge=info)");
}

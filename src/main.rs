use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use stable_match::config::{LoggingSettings, Mode, Settings};
use stable_match::core::{CustomLists, GaleShapley, Pool};
use stable_match::models::{CountReport, MatchReport, PoolReport};
use stable_match::MatchError;
use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Errors that end a driver run
#[derive(Debug, Error)]
enum DriverError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),
}

/// Build a pool, assign preference lists, then match or count stable matchings
///
/// Every flag overrides the matching configuration key.
#[derive(Debug, Parser)]
#[command(name = "stable-match", version)]
struct Cli {
    /// Configuration file used instead of config/default.toml and config/local.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Participants per group (pool.size)
    #[arg(short = 'n', long)]
    size: Option<usize>,

    /// worst_case, randomized, many_stable or custom (pool.strategy)
    #[arg(short, long)]
    strategy: Option<String>,

    /// Seed for the randomized strategy (pool.seed)
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with lists for the custom strategy (pool.custom_file)
    #[arg(long)]
    custom_file: Option<String>,

    /// match or count (matching.mode)
    #[arg(short, long)]
    mode: Option<String>,

    /// a or b (matching.proposing_group)
    #[arg(short = 'p', long)]
    proposing_group: Option<String>,

    /// advance or retry (matching.rejection_policy)
    #[arg(long)]
    rejection_policy: Option<String>,

    /// text or json (logging.report)
    #[arg(short, long)]
    report: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Vec<(&'static str, String)> {
        let mut overrides = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(value) = value {
                overrides.push((key, value));
            }
        };

        push("pool.size", self.size.map(|v| v.to_string()));
        push("pool.strategy", self.strategy.clone());
        push("pool.seed", self.seed.map(|v| v.to_string()));
        push("pool.custom_file", self.custom_file.clone());
        push("matching.mode", self.mode.clone());
        push("matching.proposing_group", self.proposing_group.clone());
        push("matching.rejection_policy", self.rejection_policy.clone());
        push("logging.report", self.report.clone());
        overrides
    }
}

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }
}

fn render<T: Serialize + Display>(report: &T, format: &str) -> Result<String, DriverError> {
    if format == "json" {
        Ok(serde_json::to_string_pretty(report)?)
    } else {
        Ok(report.to_string())
    }
}

fn run(settings: &Settings) -> Result<String, DriverError> {
    let mut pool = Pool::new(settings.pool.size)?;

    let custom = settings
        .pool
        .custom_file
        .as_ref()
        .map(CustomLists::load)
        .transpose()?;

    let seed = settings.pool.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    settings
        .pool
        .strategy
        .apply(&mut pool, &mut rng, custom.as_ref())?;

    info!(
        "Pool of size {} populated with {:?} preference lists (seed {})",
        pool.size(),
        settings.pool.strategy,
        seed
    );

    let matching = &settings.matching;
    match matching.mode {
        Mode::Match => {
            let outcome = GaleShapley::new(&mut pool, matching.proposing_group)
                .with_policy(matching.rejection_policy)
                .run()?;

            let report = MatchReport {
                proposing_group: matching.proposing_group,
                rounds: outcome.rounds,
                proposals: outcome.proposals,
                stable: outcome.stable,
                pool: PoolReport::from_pool(&pool),
            };
            render(&report, &settings.logging.report)
        }
        Mode::Count => {
            if pool.size() > matching.max_brute_force_size {
                return Err(MatchError::configuration(format!(
                    "refusing to brute-force a pool of size {} (limit {})",
                    pool.size(),
                    matching.max_brute_force_size
                ))
                .into());
            }

            let report = CountReport {
                size: pool.size(),
                stable_matchings: pool.count_stable_matchings(),
            };
            render(&report, &settings.logging.report)
        }
    }
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match Settings::load_with(cli.config.as_deref(), &cli.overrides()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings.logging);
    info!("Configuration loaded successfully");

    match run(&settings) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

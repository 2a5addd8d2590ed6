//! Economy simulator CLI.
//!
//! Run Monte Carlo simulations against the engine to analyze pacing.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                    # Default: 100 runs to 5 infinities
//!   cargo run --bin simulate -- -n 20 -i 2     # 20 runs to 2 infinities
//!   cargo run --bin simulate -- --seed 42      # Reproducible run

use antimatter_core::build_info;
use antimatter_core::simulator::{run_simulation, SimConfig};
use std::env;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let config = match parse_args(&args) {
        Some(config) => config,
        None => {
            print_help();
            return ExitCode::SUCCESS;
        }
    };

    info!(version = %build_info::version_string(), "Starting simulator");
    info!(
        runs = config.num_runs,
        target_infinities = config.target_infinities,
        max_ticks = config.max_ticks_per_run,
        tick_ms = config.tick_ms,
        challenges = config.simulate_challenges,
        doom_after = ?config.doom_after_infinities,
        seed = ?config.seed,
        "Configuration"
    );

    let report = match run_simulation(&config) {
        Ok(report) => report,
        Err(err) => {
            error!(code = err.error_code(), %err, "Simulation aborted");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", report.to_text());

    // Optionally save JSON report
    if args.iter().any(|a| a == "--json") {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        if let Err(err) = std::fs::write(&filename, report.to_json()) {
            error!(%err, %filename, "Failed to write JSON report");
            return ExitCode::FAILURE;
        }
        info!(%filename, "JSON report saved");
    }
    ExitCode::SUCCESS
}

/// `None` when help was requested.
fn parse_args(args: &[String]) -> Option<SimConfig> {
    let mut config = SimConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(100);
                    i += 1;
                }
            }
            "-i" | "--infinities" => {
                if i + 1 < args.len() {
                    config.target_infinities = args[i + 1].parse().unwrap_or(5);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-t" | "--ticks" => {
                if i + 1 < args.len() {
                    config.max_ticks_per_run = args[i + 1].parse().unwrap_or(200_000);
                    i += 1;
                }
            }
            "--tick-ms" => {
                if i + 1 < args.len() {
                    if let Ok(ms) = args[i + 1].parse::<f64>() {
                        if ms.is_finite() && ms > 0.0 {
                            config.tick_ms = ms;
                        }
                    }
                    i += 1;
                }
            }
            "--no-challenges" => {
                config.simulate_challenges = false;
            }
            "--doom" => {
                config.doom_after_infinities = Some(1);
                if i + 1 < args.len() {
                    if let Ok(after) = args[i + 1].parse::<u64>() {
                        config.doom_after_infinities = Some(after);
                        i += 1;
                    }
                }
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "-h" | "--help" => return None,
            "--quick" => {
                config = SimConfig::quick();
            }
            "--doom-cycle" => {
                config = SimConfig::doom_cycle_test();
            }
            "--challenges" => {
                config = SimConfig::challenge_sweep(config.num_runs);
            }
            _ => {}
        }
        i += 1;
    }

    Some(config)
}

fn print_help() {
    println!("Antimatter Economy Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>         Number of simulation runs (default: 100)");
    println!("    -i, --infinities <I>   Infinities a run must reach (default: 5)");
    println!("    -s, --seed <S>         Random seed for reproducibility");
    println!("    -t, --ticks <T>        Max ticks per run (default: 200,000)");
    println!("    --tick-ms <MS>         Milliseconds per tick (default: 50)");
    println!("    --no-challenges        Never enter challenges");
    println!("    --doom [I]             Enter doom after I infinities (default: 1)");
    println!("    -v, --verbose          Log every finished run");
    println!("    --json                 Save JSON report");
    println!("    --quick                Quick test (20 short runs to first infinity)");
    println!("    --doom-cycle           Runs that spend most of their time doomed");
    println!("    --challenges           Long runs with challenges always on");
    println!("    -h, --help             Show this help");
    println!();
    println!("Logging follows RUST_LOG (default: info) and goes to stderr.");
}

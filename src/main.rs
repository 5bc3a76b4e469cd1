//! Plinko audit entry point
//!
//! Native: drops balls headlessly and reports the landing distribution.
//! Web builds use the `web` module bindings instead.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use clap::Parser;

    use plinko_sim::audit::{AuditReport, run_audit};
    use plinko_sim::sim::{BoardConfig, RiskLevel, format_multiplier};
    use plinko_sim::{PlinkoError, Settings};

    /// Monte Carlo audit of a Plinko board
    #[derive(Debug, Parser)]
    #[command(name = "plinko-audit", version, about)]
    pub struct Args {
        /// Risk level (low, medium, high); overrides the settings file
        #[arg(long)]
        risk: Option<RiskLevel>,
        /// Peg rows (8, 12 or 16); overrides the settings file
        #[arg(long)]
        rows: Option<u8>,
        /// Number of balls to drop
        #[arg(long, default_value_t = 10_000)]
        drops: u32,
        /// RNG seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// JSON settings file (board size, physics tuning)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    }

    pub fn run(args: Args) -> Result<(), PlinkoError> {
        let mut settings = match &args.settings {
            Some(path) => Settings::load_from(path)?,
            None => Settings::default(),
        };
        if let Some(risk) = args.risk {
            settings.risk = risk;
        }
        if let Some(rows) = args.rows {
            settings.rows = rows;
        }

        let config: BoardConfig = settings.board_config()?;
        let report = run_audit(config, args.drops, args.seed, settings.tuning)?;

        if args.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| PlinkoError::InvalidConfiguration(e.to_string()))?;
            println!("{json}");
        } else {
            print_table(&report);
        }
        Ok(())
    }

    fn print_table(report: &AuditReport) {
        println!(
            "{} risk, {} rows, {} drops (seed {})",
            report.config.risk.as_str(),
            report.config.rows,
            report.drops,
            report.seed
        );
        println!("{:>5} {:>8} {:>8} {:>9} {:>9}", "slot", "mult", "count", "observed", "binomial");
        let observed = report.frequencies();
        let expected = report.expected_frequencies();
        for (i, count) in report.histogram.iter().enumerate() {
            println!(
                "{:>5} {:>8} {:>8} {:>8.3}% {:>8.3}%",
                i,
                format_multiplier(report.multipliers[i]),
                count,
                observed[i] * 100.0,
                expected.get(i).copied().unwrap_or(0.0) * 100.0
            );
        }
        println!(
            "return: observed {:.4}, binomial {:.4}; faulted {}",
            report.observed_return, report.binomial_return, report.faulted
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    plinko_sim::platform::init_logging();
    let args = cli::Args::parse();
    log::info!("Plinko audit (native) starting...");

    if let Err(e) = cli::run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use crosscheck::{OutputFormat, ScenarioConfig, commands, init_logging, load_records};
use crosscheck_core::records::RatioFormula;

#[derive(Parser, Debug)]
#[command(name = "crosscheck")]
#[command(about = "Cross-check efficiency and sensitivity analysis")]
struct Args {
    /// Scenario file (YAML); the reference scenario is used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Per-project a_hat / b_dir from exported review records
    Extract {
        /// JSON array of change records
        records: PathBuf,
        #[arg(long, value_enum)]
        formula: Option<Formula>,
        /// Project left out of the second pooled row (repeatable)
        #[arg(long = "exclude")]
        exclude: Vec<String>,
    },
    /// Breakdown and efficiency at the scenario's base point
    Evaluate,
    /// ±20% tornado sweep
    Tornado,
    /// Tornado plus standardized sensitivities from a Monte Carlo reference
    Sensitivity {
        #[arg(long)]
        samples: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Monte Carlo summary and histogram of cost per success
    MonteCarlo {
        #[arg(long)]
        samples: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        bins: Option<usize>,
    },
    /// All four grade × schedule combinations
    Scenarios,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Formula {
    Durations,
    DefectSignals,
}

impl From<Formula> for RatioFormula {
    fn from(formula: Formula) -> Self {
        match formula {
            Formula::Durations => RatioFormula::Durations,
            Formula::DefectSignals => RatioFormula::DefectSignals,
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level)?;

    let mut config = ScenarioConfig::load_or_default(args.config.as_deref())?;
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let output = match args.command {
        Command::Extract {
            records,
            formula,
            exclude,
        } => {
            if let Some(formula) = formula {
                config.ratio_formula = formula.into();
            }
            if !exclude.is_empty() {
                config.pooled_exclude = exclude;
            }
            commands::extract(load_records(&records)?, &config, format)?
        }
        Command::Evaluate => commands::evaluate(&config, format)?,
        Command::Tornado => commands::tornado(&config, format)?,
        Command::Sensitivity { samples, seed } => {
            config.samples = samples.unwrap_or(config.samples);
            config.seed = seed.unwrap_or(config.seed);
            commands::sensitivity(&config, format)?
        }
        Command::MonteCarlo {
            samples,
            seed,
            bins,
        } => {
            config.samples = samples.unwrap_or(config.samples);
            config.seed = seed.unwrap_or(config.seed);
            config.histogram_bins = bins.unwrap_or(config.histogram_bins);
            commands::monte_carlo(&config, format)?
        }
        Command::Scenarios => commands::scenarios(&config, format)?,
    };

    println!("{}", output.trim_end());
    tracing::debug!("done");
    Ok(())
}

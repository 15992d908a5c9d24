use clap::Parser;
use luxe_valuation::app::batch::{run_batch, ReportFormat};
use luxe_valuation::utils::{logger, validation::Validate};
use luxe_valuation::EngineConfig;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

#[derive(Parser)]
#[command(name = "batch-appraise")]
#[command(about = "Appraise a CSV of candidate purchases with TOML-configured rates and fees")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "valuation.toml")]
    config: String,

    /// CSV with columns brand,serial,market_average_eur,max_bid_eur
    #[arg(short, long)]
    input: String,

    /// Report destination; stdout when omitted
    #[arg(short, long)]
    output: Option<String>,

    /// csv or json
    #[arg(short, long, default_value = "csv")]
    format: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON log lines regardless of the config
    #[arg(long)]
    json_logs: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match EngineConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if args.json_logs || config.json_logs() {
        logger::init_json_logger(args.verbose, config.log_level());
    } else {
        logger::init_cli_logger(args.verbose, config.log_level());
    }

    tracing::info!("🚀 Starting batch appraisal");
    tracing::info!("📁 Configuration: {}", args.config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let format: ReportFormat = args.format.parse()?;
    let input = BufReader::new(File::open(&args.input)?);

    let summary = match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            let summary = run_batch(&config, &config, input, &mut writer, format, None)?;
            writer.flush()?;
            tracing::info!("📁 Report saved to: {}", path);
            summary
        }
        None => {
            let stdout = std::io::stdout();
            run_batch(&config, &config, input, stdout.lock(), format, None)?
        }
    };

    eprintln!(
        "✅ Appraised {} rows: {} good, {} caution, {} stop, {} neutral, {} rejected",
        summary.processed,
        summary.good,
        summary.caution,
        summary.stop,
        summary.neutral,
        summary.rejected
    );

    Ok(())
}

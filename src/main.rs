use clap::Parser;
use luxe_valuation::config::Command;
use luxe_valuation::utils::error::{ErrorSeverity, Result};
use luxe_valuation::utils::{logger, validation::Validate};
use luxe_valuation::{
    appraise, calculate_landed_cost, calculate_max_buy_price, calculate_serial_pricing_guidance,
    decode_serial_to_year, derive_sourcing_decision, AppraisalRequest, CliConfig, EngineConfig,
    LandedCostInput, MaxBuyInput, RateSource,
};
use serde::Serialize;

fn main() {
    let cli = CliConfig::parse();

    // [logging] settings come from the file
    let config = load_config(&cli);
    match &config {
        Ok(config) if config.json_logs() => {
            logger::init_json_logger(cli.verbose, config.log_level())
        }
        Ok(config) => logger::init_cli_logger(cli.verbose, config.log_level()),
        Err(_) => logger::init_cli_logger(cli.verbose, None),
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = config.and_then(|config| run(cli, &config)) {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn load_config(cli: &CliConfig) -> Result<EngineConfig> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: CliConfig, config: &EngineConfig) -> Result<()> {
    if let Some(path) = &cli.config {
        tracing::info!("📁 Configuration loaded from: {}", path.display());
    }
    let rates: &dyn RateSource = config;
    let default_costs = config.cost_parameters_with(rates)?;

    match cli.command {
        Command::Landed {
            base_price,
            sell_price,
            costs,
        } => {
            let input = LandedCostInput {
                base_price,
                target_sell_price_eur: sell_price,
                costs: costs.apply(default_costs)?,
            };
            print_json(&calculate_landed_cost(&input))
        }
        Command::MaxBuy {
            sell_price,
            margin,
            costs,
        } => {
            let input = MaxBuyInput {
                target_sell_price_eur: sell_price,
                desired_margin_pct: margin.unwrap_or_else(|| config.desired_margin_pct()),
                costs: costs.apply(default_costs)?,
            };
            let max_buy = calculate_max_buy_price(&input);
            if max_buy <= 0.0 {
                eprintln!("⚠️  No purchase price reaches the target margin under these costs");
            }
            print_json(&serde_json::json!({
                "currency": input.costs.currency,
                "maxBuyPrice": max_buy,
                "feasible": max_buy > 0.0,
            }))
        }
        Command::Decode { brand, serial } => print_json(&decode_serial_to_year(&serial, brand)),
        Command::Value {
            brand,
            serial,
            market_average,
            current_year,
        } => {
            let decode = decode_serial_to_year(&serial, brand);
            let guidance = calculate_serial_pricing_guidance(
                market_average,
                &decode,
                current_year.or(config.current_year()),
            );
            print_json(&serde_json::json!({
                "decode": decode,
                "guidance": guidance,
            }))
        }
        Command::Decide {
            max_bid,
            max_buy,
            serial_max_pay,
        } => print_json(&derive_sourcing_decision(max_bid, max_buy, serial_max_pay)),
        Command::Appraise {
            brand,
            serial,
            market_average,
            max_bid,
            margin,
            current_year,
            costs,
        } => {
            let request = AppraisalRequest {
                brand,
                serial,
                market_average_eur: market_average,
                max_bid_eur: max_bid,
                costs: Some(costs.apply(default_costs)?),
                desired_margin_pct: margin.unwrap_or_else(|| config.desired_margin_pct()),
                current_year: current_year.or(config.current_year()),
            };
            print_json(&appraise(&request, None))
        }
    }
}

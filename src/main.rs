use clap::Parser;
use trust_score::utils::error::ErrorSeverity;
use trust_score::utils::{logger, validation::Validate};
use trust_score::{AggregationEngine, CliConfig, HttpProviderClient, OutputFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(config.verbose(), config.json_logs());
    tracing::info!("Starting trust-score v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Effective config: {:?}", config);

    let prepared = config.validate().and_then(|_| {
        let lookup = cli.lookup()?;
        let client = HttpProviderClient::from_config(&config.provider)?;
        let engine = AggregationEngine::from_config(client.clone(), client, &config)?;
        Ok((lookup, engine))
    });
    let (lookup, engine) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    match engine.get_trust_score(&lookup).await {
        Ok(result) => {
            match cli.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Text => println!(
                    "{} ({}): trust score {:.1}",
                    result.domain, result.id, result.trust_score
                ),
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Trust score failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 4, // 沒有評論可計分
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

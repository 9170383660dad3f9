use clap::Parser;
use poi_harvest::core::engine::dry_run_lines;
use poi_harvest::utils::error::ErrorSeverity;
use poi_harvest::utils::{logger, validation::Validate};
use poi_harvest::{CliConfig, HarvestConfig, HarvestEngine, LocalStorage, OverpassClient, TokioWaiter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting poi-harvest");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.resolve().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if cli.dry_run {
        perform_dry_run(&config);
        return Ok(());
    }

    let source = OverpassClient::new(config.source.endpoint.clone());
    let storage = LocalStorage::new(config.output_path());
    let engine = HarvestEngine::new(source, storage, TokioWaiter, config);

    match engine.run().await {
        Ok(summary) => {
            println!(
                "✅ Processed {} regions ({} failed), {} total records",
                summary.regions_processed, summary.regions_failed, summary.total_records
            );
            println!("📁 Worldwide output saved to: {}", summary.worldwide_artifact);
            tracing::debug!(
                "Run took {}s",
                (summary.finished_at - summary.started_at).num_seconds()
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Harvest failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

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

    Ok(())
}

fn perform_dry_run(config: &HarvestConfig) {
    for line in dry_run_lines(config) {
        println!("{}", line);
    }
    println!("🔍 Dry run complete, nothing was fetched or written.");
}

use clap::Parser;
use lucky_draw::app::session::lines_channel;
use lucky_draw::core::ConfigProvider;
use lucky_draw::utils::error::ErrorSeverity;
use lucky_draw::utils::{logger, validation::Validate};
use lucky_draw::{
    CliConfig, DrawEngine, HttpSubmissionSource, LocalStorage, LuckyDraw, LuckyDrawError,
    Session, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting lucky-draw");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(config) => run(config, &cli).await,
                Err(e) => Err(e),
            }
        }
        None => run(cli.clone(), &cli).await,
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ lucky-draw failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run<C: ConfigProvider + Validate>(
    config: C,
    cli: &CliConfig,
) -> Result<(), LuckyDrawError> {
    config.validate()?;
    tracing::info!("✅ Configuration validated, polling {}", config.api_endpoint());

    let monitor_enabled = cli.monitor || config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let source = HttpSubmissionSource::from_config(&config)?;
    let engine = DrawEngine::new(
        source,
        config.field_keys().clone(),
        LuckyDraw::new(config.min_entries()),
    )
    .with_refresh_interval(config.refresh_interval())
    .with_monitoring(monitor_enabled);
    let storage = LocalStorage::new(config.output_path().to_string());
    let mut session = Session::new(engine, storage);

    let mut stdout = std::io::stdout();
    if cli.once {
        return session.run_once(cli.draw, cli.export, &mut stdout).await;
    }

    // stdin 在獨立執行緒讀取，Ctrl-C 時 runtime 不必等它返回
    let lines = lines_channel(std::io::BufReader::new(std::io::stdin()));
    tokio::select! {
        result = session.run(lines, &mut stdout) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("👋 Interrupted, shutting down");
        }
    }

    Ok(())
}

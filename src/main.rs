use boostfy_intake::domain::ports::TaskTracker;
use boostfy_intake::utils::error::{ErrorSeverity, IntakeError};
use boostfy_intake::utils::{logger, validation::Validate};
use boostfy_intake::{build_router, AppConfig, AppState, ClickUpClient, CliConfig, IntakeService};
use clap::Parser;
use tokio::net::TcpListener;

fn exit_code(e: &IntakeError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: IntakeError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e).max(1));
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 設定檔讀取失敗時 logger 還沒初始化，直接輸出到 stderr
    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e).max(1));
        }
    };
    cli.apply_overrides(&mut config);

    logger::init_logger(cli.verbose, config.logging.json);
    tracing::info!("Starting boostfy-intake");
    if cli.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        fail(e);
    }

    let client = ClickUpClient::from_config(&config).unwrap_or_else(|e| fail(e));

    if cli.check_token {
        match client.get_authorized_user().await {
            Ok(authorized) => tracing::info!(
                user_id = authorized.user.id,
                username = authorized.user.username.as_deref().unwrap_or("-"),
                "🔑 ClickUp token accepted"
            ),
            Err(e) => fail(e),
        }
    }

    let bind_addr = config.bind_addr().unwrap_or_else(|e| fail(e));
    let intake = IntakeService::from_config(client, &config);
    let app = build_router(AppState::new(intake));

    let listener = TcpListener::bind(bind_addr)
        .await
        .unwrap_or_else(|e| fail(IntakeError::IoError(e)));
    tracing::info!("🚀 Listening on http://{}", bind_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        fail(IntakeError::IoError(e));
    }

    tracing::info!("✅ Server stopped");
}

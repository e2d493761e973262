//! ETAMS service entry point

use etams::{
    auth::{jwt::JwtService, password::PasswordHasher},
    config::AppConfig,
    db,
    handlers::health,
    middleware::AppState,
    repository::{EmployeeRepository, PgEmployeeRepository, PgTaskRepository, TaskRepository},
    routes,
    services::{AuthService, EmployeeService, TaskService},
    telemetry,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("etams {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // .env files are a development convenience; production sets real
    // environment variables
    if let Ok(profile) = std::env::var("ETAMS_ENV") {
        dotenv::from_filename(format!(".env.{}", profile)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::from_filename(".env.development").ok();
        dotenv::dotenv().ok();
    }

    health::set_start_time();

    // 1. Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. Initialize logging and metrics
    telemetry::init_telemetry(&config);
    telemetry::init_metrics();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ETAMS starting...");

    // 3. Database pool + migrations
    let db_pool = db::create_pool(&config.database).await?;
    db::run_migrations(&db_pool).await?;

    tracing::info!("Database initialized");

    // 4. Wire repositories and services
    let employee_repo: Arc<dyn EmployeeRepository> =
        Arc::new(PgEmployeeRepository::new(db_pool.clone()));
    let task_repo: Arc<dyn TaskRepository> = Arc::new(PgTaskRepository::new(db_pool.clone()));

    let jwt_service = Arc::new(JwtService::from_config(&config)?);
    let password_hasher = Arc::new(PasswordHasher::from_config(&config.security)?);
    let shared_config = Arc::new(config.clone());

    let app_state = Arc::new(AppState {
        config: config.clone(),
        jwt_service: jwt_service.clone(),
        auth_service: Arc::new(AuthService::new(
            employee_repo.clone(),
            jwt_service,
            password_hasher.clone(),
            shared_config.clone(),
        )),
        employee_service: Arc::new(EmployeeService::new(
            employee_repo.clone(),
            task_repo.clone(),
            password_hasher,
            shared_config,
        )),
        task_service: Arc::new(TaskService::new(task_repo, employee_repo.clone())),
        employee_repo,
    });

    // 5. Build the router
    let app = routes::create_router(app_state);

    // 6. Start the server
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "Server listening");

    // 7. Graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.graceful_shutdown_timeout_secs))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Completes when SIGINT/SIGTERM arrives, and arms a watchdog that force-
/// exits if draining in-flight requests exceeds the configured window
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }

    tokio::spawn(async move {
        tokio::time::sleep(tokio::time::Duration::from_secs(timeout_secs)).await;
        tracing::warn!("Graceful shutdown timeout reached, forcing exit");
        std::process::exit(1);
    });
}

fn print_help() {
    println!("etams {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: etams [options]");
    println!();
    println!("Options:");
    println!("  --version     Print version information and exit");
    println!("  --help        Print this help and exit");
    println!();
    println!("Environment variables:");
    println!("  All configuration is environment-driven with the ETAMS_ prefix,");
    println!("  e.g. ETAMS_DATABASE__URL, ETAMS_SECURITY__JWT_SECRET");
}

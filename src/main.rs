use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tokio::sync::watch;
use tonic::transport::Server;
use tracing::{info, warn};

use drivedup_daemon::cors::{build_cors_layer, DEFAULT_CORS_ORIGINS};
use drivedup_daemon::grpc_logging::GrpcLoggingLayer;
use drivedup_daemon::logging::{self, init_logging, parse_rotation, LogConfig, LOG_FILENAME};
use drivedup_daemon::server::proto::drivedup_daemon_server::DrivedupDaemonServer;
use drivedup_daemon::{
    user_config, DriveProvider, DrivedupDaemonService, MemoryProvider, ShutdownSignal,
};

const DEFAULT_ADDR: &str = "127.0.0.1:50061";

/// Drivedup Daemon - drive file and folder replication service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, env = "DRIVEDUP_DAEMON_ADDR", default_value = DEFAULT_ADDR)]
    addr: String,

    /// Comma-separated list of allowed CORS origins.
    /// Use "*" to allow all origins (not recommended for production).
    #[arg(
        long,
        env = "DRIVEDUP_CORS_ORIGINS",
        default_value = DEFAULT_CORS_ORIGINS,
        value_delimiter = ','
    )]
    cors_origins: Vec<String>,

    /// Enable JSON log format (for production/log aggregation)
    #[arg(long, env = "DRIVEDUP_LOG_JSON", default_value = "false")]
    log_json: bool,

    /// Log rotation period: daily, hourly, or never
    #[arg(long, env = "DRIVEDUP_LOG_ROTATION", default_value = "daily")]
    log_rotation: String,

    /// Custom log directory (default: ~/.drivedup/logs)
    #[arg(long, env = "DRIVEDUP_LOG_DIR")]
    log_dir: Option<String>,
}

// Include the file descriptor set for gRPC reflection
pub const FILE_DESCRIPTOR_SET: &[u8] =
    tonic::include_file_descriptor_set!("drivedup_descriptor");

fn report_server_error(
    addr: std::net::SocketAddr,
    log_file: &std::path::Path,
    e: &tonic::transport::Error,
) {
    let err_string = format!("{e:?}");
    if err_string.contains("AddrInUse") {
        eprintln!();
        eprintln!("Error: Failed to start server - address {addr} is already in use");
        eprintln!();
        eprintln!("Another instance of drivedup-daemon may already be running.");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  1. Kill the existing process:   pkill drivedup-daemon");
        eprintln!("  2. Use a different port:        drivedup-daemon --addr 127.0.0.1:50062");
        eprintln!("  3. Check what's using the port: lsof -i :{}", addr.port());
        eprintln!();
    }
    eprintln!();
    eprintln!("Error: Failed to start server: {e}");
    eprintln!();
    eprintln!("Logs: {}", log_file.display());
    eprintln!();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks for colored error output
    color_eyre::install()?;

    // Parse CLI arguments first (before logging, so we can use log config)
    let args = Args::parse();

    let log_dir = args.log_dir.map(PathBuf::from).unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".drivedup")
            .join("logs")
    });

    let log_file = log_dir.join(LOG_FILENAME);
    logging::set_log_file_path(log_file.to_string_lossy().to_string());

    let log_config = LogConfig {
        log_dir,
        json_format: args.log_json,
        rotation: parse_rotation(&args.log_rotation),
        ..LogConfig::default()
    };

    if let Err(e) = init_logging(log_config) {
        eprintln!();
        eprintln!("Error: Failed to initialize logging: {e}");
        eprintln!();
        eprintln!("Logs: {}", log_file.display());
        eprintln!();
        return Err(e);
    }

    // Load user-level config (~/.drivedup/config.toml); file is optional.
    let user_cfg = user_config::load_user_config().unwrap_or_else(|e| {
        warn!("Failed to load user config, using defaults: {e}");
        user_config::UserConfig::default()
    });
    let retry = user_cfg.replication.retry_policy();

    let addr: std::net::SocketAddr = args.addr.parse()?;

    let cors_origins: Vec<String> = args
        .cors_origins
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let allow_all_origins = cors_origins.iter().any(|o| o == "*");

    info!(
        "CORS origins: {}",
        if allow_all_origins {
            "*".to_string()
        } else {
            cors_origins.join(", ")
        }
    );

    let cors = build_cors_layer(cors_origins);

    // Create shutdown signal channel
    let (shutdown_tx, mut shutdown_rx) = watch::channel(ShutdownSignal::None);
    let shutdown_tx = Arc::new(shutdown_tx);

    // The drive backend is injected behind the provider trait; deployments
    // wire in a real drive adapter here.
    let provider: Arc<dyn DriveProvider> = Arc::new(MemoryProvider::new());
    info!("Using the in-memory drive backend");

    let service = DrivedupDaemonService::new(provider, retry, "memory", shutdown_tx.clone());

    // Create reflection service
    let reflection_service = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()?;

    info!("Starting Drivedup daemon on {} (gRPC + gRPC-Web)", addr);

    let server_result = Server::builder()
        .accept_http1(true) // Required for gRPC-Web
        .layer(cors)
        .layer(GrpcLoggingLayer)
        .layer(tonic_web::GrpcWebLayer::new())
        .add_service(reflection_service)
        .add_service(DrivedupDaemonServer::new(service))
        .serve_with_shutdown(addr, async move {
            loop {
                shutdown_rx.changed().await.ok();
                if *shutdown_rx.borrow() == ShutdownSignal::Shutdown {
                    info!("Received shutdown signal, stopping server...");
                    break;
                }
            }
        })
        .await;

    if let Err(e) = server_result {
        report_server_error(addr, &log_file, &e);
        return Err(e.into());
    }

    info!("Drivedup daemon stopped");
    Ok(())
}

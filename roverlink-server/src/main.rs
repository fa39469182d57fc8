use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use roverlink_core::Error;
use roverlink_core::models::Regime;
use roverlink_core::registry::ObserverRegistry;
use roverlink_core::services::CommandService;
use roverlink_core::sources::{LiveSource, MockSource, TelemetrySource};
use roverlink_core::state::RobotState;
use roverlink_core::tasks::spawn_telemetry_task;

mod routes;
use routes::AppContext;

/// Environment variable selecting the data-source regime at process start.
/// Load-time only; the regime never changes at runtime.
const REGIME_ENV: &str = "ROVERLINK_MODE";

#[derive(Parser, Debug, Clone)]
#[command(name = "roverlink")]
#[command(author, version, about = "Roverlink - robot dashboard telemetry backend")]
struct Args {
    /// Address the HTTP/WebSocket server binds to
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: String,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("roverlink=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

fn regime_from_env() -> Regime {
    match std::env::var(REGIME_ENV) {
        Ok(value) => Regime::parse_label(&value).unwrap_or_else(|| {
            warn!("Unrecognized {REGIME_ENV}='{value}'; defaulting to LIVE");
            Regime::Live
        }),
        Err(_) => Regime::Live,
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    let args = Args::parse();
    let regime = regime_from_env();
    info!("Roverlink starting. bind={}, regime={}", args.bind, regime);

    let state = RobotState::new(regime);
    let registry = ObserverRegistry::new();
    let source: Box<dyn TelemetrySource> = match regime {
        Regime::Mock => Box::new(MockSource::new()),
        Regime::Live => Box::new(LiveSource::new()),
    };

    // The loop is the sole driver of outbound telemetry; nothing joins on it.
    let _telemetry_handle = spawn_telemetry_task(state.clone(), registry.clone(), source);

    let ctx = AppContext {
        state: state.clone(),
        registry,
        command_service: Arc::new(CommandService::new(state.clone())),
    };
    state.append_log("[SYS] BOOT_SEQUENCE_COMPLETE".to_string()).await;

    let addr: SocketAddr = args.bind.parse()?;
    let app = routes::build_router(ctx);
    info!("Listening on http://{}", addr);

    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {e}");
            return;
        }
        info!("Ctrl-C detected; shutting down");
        shutdown_handle.graceful_shutdown(None);
    });

    axum_server::Server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    info!("Server shut down.");
    Ok(())
}

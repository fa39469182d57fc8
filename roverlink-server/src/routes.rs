//! roverlink-server/src/routes.rs
//!
//! The axum router and connection handlers: WebSocket push channel, command
//! submission, and the status query.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
    routing::{get, post},
};
use futures_util::{SinkExt, StreamExt};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use roverlink_core::models::{CommandAck, CommandRequest, StatusResponse};
use roverlink_core::registry::ObserverRegistry;
use roverlink_core::services::CommandService;
use roverlink_core::state::RobotState;

/// Bag of handles every route needs, passed by reference into the router at
/// startup.
#[derive(Clone)]
pub struct AppContext {
    pub state: RobotState,
    pub registry: ObserverRegistry,
    pub command_service: Arc<CommandService>,
}

pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/command", post(command_handler))
        .route("/status", get(status_handler))
        .with_state(ctx)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

async fn status_handler(State(ctx): State<AppContext>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online".to_string(),
        linked: ctx.state.is_linked().await,
    })
}

async fn command_handler(
    State(ctx): State<AppContext>,
    Json(cmd): Json<CommandRequest>,
) -> Json<CommandAck> {
    Json(ctx.command_service.handle(cmd).await)
}

async fn ws_handler(State(ctx): State<AppContext>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, ctx))
}

/// Pumps telemetry frames from this observer's outbox onto the socket and
/// drains inbound traffic purely to detect disconnection.
async fn handle_socket(socket: WebSocket, ctx: AppContext) {
    let (id, mut frames) = ctx.registry.subscribe(None).await;
    info!("{id} connected");

    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            maybe_frame = frames.recv() => {
                match maybe_frame {
                    Some(frame) => {
                        if let Err(e) = sink.send(Message::Text(frame.into())).await {
                            debug!("{id} send failed: {e}");
                            break;
                        }
                    }
                    // The registry dropped our outbox after a failed send.
                    None => break,
                }
            }
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!("{id} socket error: {e}");
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    ctx.registry.unsubscribe(id).await;
    info!("{id} disconnected");
}

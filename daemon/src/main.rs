mod buzzer;
mod config;
mod display;
mod error;
mod message_log;
mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use dotnote::store::MessageBoard;

use crate::buzzer::Buzzer;
use crate::config::{CONFIG_PATH, DisplayKind};
use crate::display::{Display, ScrollOptions};
use crate::error::DotnoteError;
use crate::message_log::MessageLog;
use crate::server::ServerState;

async fn shutdown_signal(shutdown_token: CancellationToken) {
    let sigterm = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("failed to listen for SIGINT: {e}");
            }
            info!("received SIGINT, shutting down");
        }
        _ = sigterm => info!("received SIGTERM, shutting down"),
    }
    shutdown_token.cancel();
}

#[tokio::main]
async fn main() -> Result<(), DotnoteError> {
    dotnote::init_logging(log::LevelFilter::Info);

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| CONFIG_PATH.to_string());
    let config = config::parse_config(&config_path)?;

    let board = MessageBoard::new(config.default_message.clone());
    let options = ScrollOptions::from_config(&config);
    let display: Box<dyn Display> = match config.display {
        DisplayKind::Max7219 => Box::new(display::max7219::Max7219Display::new(&config)?),
        DisplayKind::Headless => Box::new(display::headless::HeadlessDisplay::new(&config)),
    };
    info!(
        "initialized {:?} display with {} cascaded blocks",
        config.display, config.cascaded_devices
    );

    let task_tracker = TaskTracker::new();
    let shutdown_token = CancellationToken::new();
    display::run_render_loop(
        &task_tracker,
        display,
        board.clone(),
        options,
        shutdown_token.clone(),
    );

    let buzzer = Buzzer::from_config(&config);
    if config.buzzer_enabled && !buzzer.is_enabled() {
        warn!("continuing without buzzer feedback");
    }
    let state = Arc::new(ServerState {
        board,
        buzzer,
        message_log: MessageLog::from_config(&config),
        message_spacing: config.message_spacing.clone(),
    });
    let app = server::router(state).into_make_service_with_connect_info::<SocketAddr>();

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(DotnoteError::Server)?;
    info!("listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
        .await
        .map_err(DotnoteError::Server)?;

    task_tracker.close();
    task_tracker.wait().await;
    Ok(())
}

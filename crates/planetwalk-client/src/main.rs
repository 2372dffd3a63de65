//! Headless planetwalk client entry point.
//!
//! Loads configuration, initializes structured logging, connects to the
//! state server, and drives a session with the built-in kinematic body and
//! recording scene until Ctrl-C. A windowed build plugs its own physics
//! engine and renderer into the same [`drive`] loop through the
//! [`PhysicsBody`](planetwalk_client::PhysicsBody) and
//! [`ActorScene`](planetwalk_client::ActorScene) seams.
//!
//! Run with: `cargo run -p planetwalk-client -- --server 127.0.0.1 --port 7777`

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use clap::Parser;
use glam::Vec3;
use tracing::{error, info, warn};

use planetwalk_client::{
    KinematicBody, RecordingScene, RunnerConfig, Session, SessionConfig, drive,
};
use planetwalk_config::{CliArgs, Config};
use planetwalk_net::{ReconnectPolicy, StateChannel, reconnect_loop};

fn resolve_server(config: &Config) -> Option<SocketAddr> {
    let target = format!(
        "{}:{}",
        config.network.server_address, config.network.server_port
    );
    match target.to_socket_addrs() {
        Ok(mut addrs) => addrs.next(),
        Err(e) => {
            error!(%target, error = %e, "could not resolve server address");
            None
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().or_else(Config::default_dir);
    let mut config = match &config_dir {
        Some(dir) => Config::load_or_create(dir).unwrap_or_else(|e| {
            eprintln!("config error: {e}; falling back to defaults");
            Config::default()
        }),
        None => Config::default(),
    };
    config.apply_cli_overrides(&args);

    planetwalk_log::init_logging(config_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    info!("planetwalk client starting");
    let Some(addr) = resolve_server(&config) else {
        std::process::exit(1);
    };

    let policy = ReconnectPolicy {
        delay: Duration::from_millis(config.network.reconnect_delay_ms),
    };
    let channel = match StateChannel::connect(addr).await {
        Ok(channel) => channel,
        Err(e) => {
            warn!(%addr, error = %e, "initial connection failed; retrying");
            reconnect_loop(addr, policy).await
        }
    };

    let mut session = Session::new(
        // Spawn above the origin; the first snapshot and gravity settle the
        // body onto the surface.
        KinematicBody::at(Vec3::new(0.0, 100.0, 0.0)),
        RecordingScene::default(),
        SessionConfig::from_config(&config),
    );
    // No windowing layer in the headless build, so the pointer is treated
    // as permanently captured and input ticks always sample.
    session.mouse.set_captured(true);

    let runner_config = RunnerConfig {
        input_interval: Duration::from_millis(config.network.input_interval_ms),
        reconnect: policy,
        ..RunnerConfig::new(addr)
    };

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            let _ = shutdown_tx.send(true);
        }
    });

    let session = drive(session, channel, runner_config, shutdown_rx).await;
    info!(
        remote_actors = session.interpolator().len(),
        "session closed"
    );
}

use clap::Parser;
use tokio_util::sync::CancellationToken;

use epaperd::config;
use epaperd::engine::{DisplayUpdater, StatusCache};
use epaperd::http::{server, AppState};
use epaperd::source::registry;
use epaperd::utils::init_tracing;

/// E-paper display content server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Address to bind to (overrides the config file)
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides the config file)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = init_tracing() {
        eprintln!("failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let cfg = match config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("failed to load {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    let bind = args.bind.unwrap_or(cfg.server.bind);
    let port = args.port.unwrap_or(cfg.server.port);

    let cache = StatusCache::new(cfg.displays.keys().cloned());
    let cancel = CancellationToken::new();

    // One refresh loop per display, all validated before any of them starts
    let mut updaters = Vec::new();
    for (id, display_cfg) in &cfg.displays {
        let source = match registry::new_source(id, display_cfg) {
            Ok(source) => source,
            Err(e) => {
                tracing::error!("invalid display configuration: {}", e);
                std::process::exit(1);
            }
        };
        let slot = match cache.slot(id) {
            Some(slot) => slot,
            None => continue,
        };
        updaters.push(DisplayUpdater::new(
            id.clone(),
            source,
            slot,
            cancel.clone(),
        ));
    }

    tracing::info!("starting {} display updater(s)", updaters.len());
    let mut tasks = Vec::new();
    for updater in updaters {
        tasks.push(tokio::spawn(updater.run()));
    }

    let state = AppState::new(cache, cfg.tokens);
    let server_cancel = cancel.clone();
    let server_task =
        tokio::spawn(async move { server::start(&bind, port, state, server_cancel).await });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down...");
        }
        result = server_task => {
            match result {
                Ok(Err(e)) => tracing::error!("server error: {}", e),
                Err(e) => tracing::error!("server task failed: {}", e),
                Ok(Ok(())) => {}
            }
        }
    }

    cancel.cancel();
    for task in tasks {
        let _ = task.await;
    }
    tracing::info!("bye");
}

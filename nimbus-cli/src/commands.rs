//! CLI command implementations

use std::path::PathBuf;
use std::time::Duration;

use clap::Subcommand;
use nimbus_core::config::NimbusConfig;
use nimbus_core::torrent::{RandomWalkSource, TorrentStatus, spawn_torrent_manager};
use nimbus_core::tracing_setup::init_tracing;
use tracing::Level;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the web dashboard
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
        /// Root directory for simulated downloads
        #[arg(long)]
        download_dir: Option<PathBuf>,
        /// Deterministic simulation seed
        #[arg(long)]
        seed: Option<u64>,
        /// Show debug output on the console
        #[arg(short, long)]
        verbose: bool,
    },
    /// Run one simulated download to completion in the terminal
    Demo {
        /// Magnet link to add
        magnet: String,
        /// Seconds between statistics ticks
        #[arg(long, default_value = "1")]
        interval: u64,
        /// Deterministic simulation seed
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve {
            host,
            port,
            download_dir,
            seed,
            verbose,
        } => serve(host, port, download_dir, seed, verbose).await,
        Commands::Demo {
            magnet,
            interval,
            seed,
        } => demo(magnet, interval, seed).await,
    }
}

async fn serve(
    host: String,
    port: u16,
    download_dir: Option<PathBuf>,
    seed: Option<u64>,
    verbose: bool,
) -> anyhow::Result<()> {
    let console_level = if verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(console_level, None).map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let mut config = NimbusConfig::default();
    if let Some(dir) = download_dir {
        config.storage.download_dir = dir;
    }
    config.simulation.deterministic_seed = seed;

    nimbus_web::run_server(config, host, port)
        .await
        .map_err(|e| anyhow::anyhow!("server failed: {e}"))
}

async fn demo(magnet: String, interval: u64, seed: Option<u64>) -> anyhow::Result<()> {
    let mut config = NimbusConfig::default();
    config.simulation.deterministic_seed = seed;

    let source = RandomWalkSource::new(config.simulation.clone());
    let manager = spawn_torrent_manager(config, source);

    let id = manager.add_magnet(&magnet).await?;
    let view = manager
        .record(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("torrent vanished after add"))?;
    println!("Added {} ({id})", view.name);

    let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));
    loop {
        ticker.tick().await;
        manager.update_statistics().await?;

        let view = manager
            .record(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("torrent vanished mid-download"))?;
        println!(
            "{:>6.1}%  {:>8.1} KB/s  peers {:>2}  seeds {:>3}",
            view.progress, view.download_speed, view.peers, view.seeds
        );

        if view.status == TorrentStatus::Completed {
            println!("Completed: {}", view.name);
            for file in view.files {
                println!("  {} ({} bytes)", file.name, file.size);
            }
            break;
        }
    }

    manager.shutdown().await?;
    Ok(())
}

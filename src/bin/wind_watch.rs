//! Wind oracle watcher.
//!
//! Tails the condition feed and logs every update; given an address, joins
//! once the gate opens. Stands in for the web dashboard when operating the
//! oracle from a terminal.

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use windgate::{
    BaseUrl, ConditionsClient, ConditionsMonitor, JoinClient, JoinController, JoinState,
    MonitorConfig, WalletHandle,
};

#[derive(Parser)]
#[command(name = "wind_watch")]
#[command(version, about = "Watch the wind oracle and join when conditions open", long_about = None)]
struct Cli {
    /// Target a locally running oracle instead of production
    #[arg(long)]
    local: bool,

    /// Wallet address to register once the gate opens
    #[arg(long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let base_url = if cli.local {
        BaseUrl::Localhost
    } else {
        BaseUrl::Production
    };

    let monitor = ConditionsMonitor::new(
        ConditionsClient::new(None, Some(base_url)),
        MonitorConfig::default(),
    );
    let mut updates = monitor.subscribe();
    monitor.start();

    // No real wallet in a terminal session; a provided address stands in
    // for a connected one.
    let (wallet, wallet_watch) = WalletHandle::channel();
    let controller = JoinController::new(
        JoinClient::new(None, Some(base_url)),
        monitor.subscribe(),
        wallet_watch,
    );
    if let Some(address) = &cli.address {
        wallet.connect(address.clone());
    }

    info!("watching wind conditions, ctrl-c to exit");
    // Register the signal listener once, not per loop iteration, so a
    // ctrl-c during update handling is not lost.
    let mut shutdown_signal = std::pin::pin!(tokio::signal::ctrl_c());
    loop {
        tokio::select! {
            _ = &mut shutdown_signal => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                info!(
                    heading = %format!("{} ({:.0}\u{b0})", snapshot.cardinal(), snapshot.direction_degrees),
                    speed = snapshot.speed,
                    open = snapshot.is_open,
                    "conditions"
                );
                if snapshot.is_open {
                    if let Some(address) = &cli.address {
                        match controller.submit(address).await {
                            JoinState::Succeeded(ack) => {
                                info!(message = ?ack.message, "joined");
                            }
                            JoinState::Failed(message) => {
                                warn!(message = %message, "join failed, will retry on next update");
                            }
                            _ => {}
                        }
                    }
                }
            }
        }
    }
    monitor.stop();
    controller.stop();
}

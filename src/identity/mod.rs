//! Wallet session surface consumed by the join controller.
//!
//! The wallet itself (key management, signing, chain configuration) lives in
//! the host application. This crate only observes the connection lifecycle
//! and the connected address, delivered over a watch channel: the host
//! writes through a [`WalletHandle`], the core reads a [`WalletWatch`].

use tokio::sync::watch;

/// Connection lifecycle as reported by the wallet provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletStatus {
    Disconnected,
    Connecting,
    Connected,
    /// Provider-side failure. Distinct from `Disconnected`: an errored
    /// session is not treated as ended.
    Error,
}

/// Snapshot of the wallet session at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSession {
    pub status: WalletStatus,
    pub address: Option<String>,
}

impl WalletSession {
    pub fn disconnected() -> WalletSession {
        WalletSession {
            status: WalletStatus::Disconnected,
            address: None,
        }
    }

    pub fn connecting() -> WalletSession {
        WalletSession {
            status: WalletStatus::Connecting,
            address: None,
        }
    }

    pub fn connected(address: impl Into<String>) -> WalletSession {
        WalletSession {
            status: WalletStatus::Connected,
            address: Some(address.into()),
        }
    }

    /// The session address, only while actually connected.
    pub fn connected_address(&self) -> Option<&str> {
        match self.status {
            WalletStatus::Connected => self.address.as_deref(),
            _ => None,
        }
    }
}

/// Receiving side handed to the core.
pub type WalletWatch = watch::Receiver<WalletSession>;

/// Host-side driver for the wallet session channel.
#[derive(Debug, Clone)]
pub struct WalletHandle {
    tx: watch::Sender<WalletSession>,
}

impl WalletHandle {
    /// Create a channel pair starting out disconnected.
    pub fn channel() -> (WalletHandle, WalletWatch) {
        let (tx, rx) = watch::channel(WalletSession::disconnected());
        (WalletHandle { tx }, rx)
    }

    pub fn set(&self, session: WalletSession) {
        // Subscribers may all be gone during teardown; nothing to do then.
        let _ = self.tx.send(session);
    }

    pub fn connect(&self, address: impl Into<String>) {
        self.set(WalletSession::connected(address));
    }

    pub fn disconnect(&self) {
        self.set(WalletSession::disconnected());
    }

    pub fn subscribe(&self) -> WalletWatch {
        self.tx.subscribe()
    }
}

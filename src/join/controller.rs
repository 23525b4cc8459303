//! Gated single-flight registration controller.
//!
//! Owns the submission lifecycle for the current wallet session:
//! - at most one submission in flight, ever
//! - submission only while the feed reports open conditions and the wallet
//!   is connected with the submitted address
//! - one successful registration per connected session; a disconnect (and
//!   only a disconnect) resets the slate
//! - failures are surfaced with the most specific message available and
//!   wait for an explicit user retry

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    errors::{Error, HttpErrorKind},
    identity::{WalletStatus, WalletWatch},
    join::join_client::JoinResponse,
    join::sink::JoinSink,
    monitor::ConditionsSnapshot,
};

/// Submission lifecycle for the current wallet session.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinState {
    /// Nothing submitted this session.
    Idle,
    /// One call to the join endpoint is in flight.
    Submitting,
    /// Registered. Terminal until the wallet disconnects.
    Succeeded(JoinResponse),
    /// Last attempt failed; awaiting an explicit retry.
    Failed(String),
}

struct SessionSlot {
    state: JoinState,
    // Bumped on every observed disconnect; an in-flight submission whose
    // epoch no longer matches discards its result instead of applying it.
    epoch: u64,
}

/// Drives registrations against a [`JoinSink`], reading the latest
/// conditions snapshot and wallet session to decide eligibility.
///
/// Must be constructed inside a tokio runtime: a background task watches
/// the wallet channel and clears the join state on disconnect.
pub struct JoinController<K: JoinSink + 'static> {
    sink: Arc<K>,
    conditions: watch::Receiver<ConditionsSnapshot>,
    wallet: WalletWatch,
    shared: Arc<Mutex<SessionSlot>>,
    cancel: CancellationToken,
}

impl<K: JoinSink + 'static> JoinController<K> {
    pub fn new(
        sink: K,
        conditions: watch::Receiver<ConditionsSnapshot>,
        wallet: WalletWatch,
    ) -> JoinController<K> {
        let shared = Arc::new(Mutex::new(SessionSlot {
            state: JoinState::Idle,
            epoch: 0,
        }));
        let cancel = CancellationToken::new();
        tokio::spawn(watch_wallet(
            wallet.clone(),
            Arc::clone(&shared),
            cancel.clone(),
        ));
        JoinController {
            sink: Arc::new(sink),
            conditions,
            wallet,
            shared,
            cancel,
        }
    }

    /// Current submission state for this session.
    pub fn state(&self) -> JoinState {
        self.shared.lock().unwrap().state.clone()
    }

    /// Stop watching the wallet channel.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Submit one registration for `address` and drive it to completion.
    ///
    /// Ineligible calls (empty address, closed gate, wallet not connected
    /// with `address`, submission already in flight or already succeeded)
    /// are no-ops that return the state unchanged without touching the
    /// network. The UI is expected to prevent these; the controller refuses
    /// them regardless.
    pub async fn submit(&self, address: &str) -> JoinState {
        if address.is_empty() {
            debug!("join refused: no wallet address");
            return self.state();
        }
        if !self.conditions.borrow().is_open {
            debug!("join refused: conditions are closed");
            return self.state();
        }
        if self.wallet.borrow().connected_address() != Some(address) {
            debug!("join refused: wallet not connected with this address");
            return self.state();
        }

        let epoch = {
            let mut slot = self.shared.lock().unwrap();
            match slot.state {
                JoinState::Idle | JoinState::Failed(_) => {
                    slot.state = JoinState::Submitting;
                    slot.epoch
                }
                JoinState::Submitting => {
                    debug!("join refused: submission already in flight");
                    return slot.state.clone();
                }
                JoinState::Succeeded(_) => {
                    debug!("join refused: already registered this session");
                    return slot.state.clone();
                }
            }
        };

        info!(address, "submitting registration");
        let outcome = self.sink.join(address).await;

        let mut slot = self.shared.lock().unwrap();
        let session_live =
            slot.epoch == epoch && self.wallet.borrow().connected_address() == Some(address);
        if !session_live {
            // The session this result belonged to is gone.
            info!("wallet session ended mid-join, dropping late result");
            if matches!(slot.state, JoinState::Submitting) {
                slot.state = JoinState::Idle;
            }
            return slot.state.clone();
        }

        slot.state = match outcome {
            Ok(ack) => {
                info!("registration accepted");
                JoinState::Succeeded(ack)
            }
            Err(err) => {
                warn!(error = %err, "registration failed");
                JoinState::Failed(failure_message(&err))
            }
        };
        slot.state.clone()
    }
}

impl<K: JoinSink + 'static> Drop for JoinController<K> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn watch_wallet(
    mut wallet: WalletWatch,
    shared: Arc<Mutex<SessionSlot>>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = wallet.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = wallet.borrow_and_update().status;
                if status == WalletStatus::Disconnected {
                    let mut slot = shared.lock().unwrap();
                    slot.epoch += 1;
                    if !matches!(slot.state, JoinState::Idle) {
                        info!("wallet disconnected, clearing join state");
                        slot.state = JoinState::Idle;
                    }
                }
            }
        }
    }
    debug!("wallet watcher stopped");
}

/// Most specific description available for a failed submission: the
/// server's own message when it sent one, otherwise the transport failure
/// with its status code.
fn failure_message(err: &Error) -> String {
    match err {
        Error::JoinRejected { message } => message.clone(),
        Error::Http { status, kind } => {
            let message = match kind {
                HttpErrorKind::Client { message, .. } | HttpErrorKind::Server { message } => {
                    message
                }
            };
            if message.is_empty() {
                format!("join request failed with status {status}")
            } else {
                message.clone()
            }
        }
        other => other.to_string(),
    }
}

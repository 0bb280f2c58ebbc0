//! Session expiry timers — warning window, countdown, and hard logout.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};

use super::manager::SessionCore;

/// Observable state of the session timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// The session is live; the warning deadline is armed.
    Monitoring,
    /// The warning fired; counting down to hard logout.
    Warning {
        /// Seconds left until forced logout.
        remaining_seconds: u64,
    },
    /// The countdown reached zero and the session was force-logged-out.
    Expired,
}

enum LifecycleCommand {
    Extend { ack: oneshot::Sender<bool> },
}

/// Handle to the timer task for one session.
///
/// All timers hang off a single cancel channel, so teardown is one
/// deterministic operation: [`SessionLifecycle::stop`] (or dropping the
/// handle) silences everything at once.
#[derive(Debug)]
pub struct SessionLifecycle {
    state_rx: watch::Receiver<LifecycleState>,
    cmd_tx: mpsc::Sender<LifecycleCommand>,
    cancel_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SessionLifecycle {
    /// Arms the timers for a session valid for `initial_ttl` from now.
    ///
    /// The warning fires `warning_lead` before expiry (immediately if less
    /// than a lead-time remains); a successful extension re-arms with
    /// `full_ttl`. When the countdown drains, the task forces logout on the
    /// shared session core, guarded by `epoch` so a stale timer can never
    /// clear a newer session.
    pub(crate) fn spawn(
        initial_ttl: Duration,
        full_ttl: Duration,
        warning_lead: Duration,
        core: Arc<SessionCore>,
        epoch: u64,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(LifecycleState::Monitoring);
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let task = tokio::spawn(run(
            initial_ttl,
            full_ttl,
            warning_lead,
            core,
            epoch,
            state_tx,
            cmd_rx,
            cancel_rx,
        ));

        Self {
            state_rx,
            cmd_tx,
            cancel_tx,
            task,
        }
    }

    /// The current timer state.
    pub fn state(&self) -> LifecycleState {
        *self.state_rx.borrow()
    }

    /// A receiver for observing timer state transitions.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state_rx.clone()
    }

    /// Requests a re-arm. Returns `false` when the session is not in the
    /// warning window (or has already expired).
    pub async fn extend(&self) -> bool {
        let (ack, ack_rx) = oneshot::channel();
        if self
            .cmd_tx
            .send(LifecycleCommand::Extend { ack })
            .await
            .is_err()
        {
            return false;
        }
        ack_rx.await.unwrap_or(false)
    }

    /// Cancels all timers. Safe to call more than once.
    pub fn stop(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// Whether the timer task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SessionLifecycle {
    fn drop(&mut self) {
        let _ = self.cancel_tx.send(true);
    }
}

#[allow(clippy::too_many_arguments)]
async fn run(
    initial_ttl: Duration,
    full_ttl: Duration,
    warning_lead: Duration,
    core: Arc<SessionCore>,
    epoch: u64,
    state_tx: watch::Sender<LifecycleState>,
    mut cmd_rx: mpsc::Receiver<LifecycleCommand>,
    mut cancel_rx: watch::Receiver<bool>,
) {
    let mut ttl = initial_ttl;

    'armed: loop {
        let _ = state_tx.send(LifecycleState::Monitoring);

        let warning_sleep = time::sleep(ttl.saturating_sub(warning_lead));
        tokio::pin!(warning_sleep);

        loop {
            tokio::select! {
                _ = cancelled(&mut cancel_rx) => return,
                cmd = cmd_rx.recv() => match cmd {
                    // Extension is only meaningful inside the warning window.
                    Some(LifecycleCommand::Extend { ack }) => {
                        let _ = ack.send(false);
                    }
                    None => return,
                },
                _ = &mut warning_sleep => break,
            }
        }

        let mut remaining = warning_lead.min(ttl).as_secs();
        let _ = state_tx.send(LifecycleState::Warning {
            remaining_seconds: remaining,
        });
        info!(remaining_seconds = remaining, "session expiry warning");

        while remaining > 0 {
            tokio::select! {
                _ = cancelled(&mut cancel_rx) => return,
                cmd = cmd_rx.recv() => match cmd {
                    Some(LifecycleCommand::Extend { ack }) => {
                        let _ = ack.send(true);
                        debug!("session extended, re-arming timers");
                        ttl = full_ttl;
                        continue 'armed;
                    }
                    None => return,
                },
                _ = time::sleep(Duration::from_secs(1)) => {
                    remaining -= 1;
                    let _ = state_tx.send(LifecycleState::Warning {
                        remaining_seconds: remaining,
                    });
                }
            }
        }

        let _ = state_tx.send(LifecycleState::Expired);
        warn!("session countdown reached zero, forcing logout");
        core.force_logout(epoch).await;
        return;
    }
}

/// Resolves once the cancel channel carries `true` (or its sender is gone).
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

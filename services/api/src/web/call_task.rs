//! services/api/src/web/call_task.rs
//!
//! Background workers that drive the simulated video call: the connect delay,
//! the once-per-second duration counter, and the upload acknowledgment timeout.
//!
//! Every worker re-checks its cancellation token after taking the session lock.
//! The connection loop cancels the token while it holds that same lock, so once
//! the call view is left no further call message can reach the client.

use crate::{
    config::Config,
    web::{
        protocol::{ServerMessage, SessionSnapshot},
        state::{Outbox, SessionState},
    },
};
use medconnect_core::call::{format_duration, CallSession};
use std::sync::Arc;
use tokio::{
    sync::Mutex,
    time::{interval_at, sleep, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Runs the call simulation until the token is cancelled or the call disappears.
///
/// Waits `call_connect_delay`, marks the call connected, then emits a `CallTick`
/// every `call_tick_interval`.
pub async fn call_process(
    config: Arc<Config>,
    session_state_lock: Arc<Mutex<SessionState>>,
    outbox: Outbox,
    cancellation_token: CancellationToken,
) {
    info!("Call simulation started.");

    tokio::select! {
        _ = cancellation_token.cancelled() => {
            info!("Call ended before connecting.");
            return;
        }
        _ = sleep(config.call_connect_delay) => {}
    }

    {
        let mut session = session_state_lock.lock().await;
        if cancellation_token.is_cancelled() {
            return;
        }
        let Some(call) = session.call.as_mut() else {
            return;
        };
        call.connect();
        if outbox.send(ServerMessage::CallConnected).is_err() {
            return;
        }
        let snapshot = SessionSnapshot::capture(&session);
        if outbox.send(ServerMessage::Snapshot(snapshot)).is_err() {
            return;
        }
    }
    info!("Call connected.");

    let period = config.call_tick_interval;
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => break,
            _ = ticker.tick() => {
                let mut session = session_state_lock.lock().await;
                if cancellation_token.is_cancelled() {
                    break;
                }
                let Some(elapsed_secs) = session.call.as_mut().and_then(CallSession::tick) else {
                    break;
                };
                debug!(elapsed_secs, "Call tick.");
                let tick = ServerMessage::CallTick {
                    elapsed_secs,
                    display: format_duration(elapsed_secs),
                };
                if outbox.send(tick).is_err() {
                    break;
                }
            }
        }
    }

    info!("Call simulation stopped.");
}

/// Hides the upload acknowledgment once `upload_ack_duration` has passed.
pub async fn upload_ack_process(
    config: Arc<Config>,
    session_state_lock: Arc<Mutex<SessionState>>,
    outbox: Outbox,
    cancellation_token: CancellationToken,
) {
    tokio::select! {
        _ = cancellation_token.cancelled() => return,
        _ = sleep(config.upload_ack_duration) => {}
    }

    let mut session = session_state_lock.lock().await;
    if cancellation_token.is_cancelled() {
        return;
    }
    let Some(call) = session.call.as_mut() else {
        return;
    };
    if !call.upload_acknowledged() {
        return;
    }
    call.clear_upload_ack();
    let _ = outbox.send(ServerMessage::Snapshot(SessionSnapshot::capture(&session)));
}

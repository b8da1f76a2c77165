//! services/api/src/web/state.rs
//!
//! Defines the application's shared and session-specific states.

use crate::config::Config;
use medconnect_core::{
    call::CallSession, history::HistoryView, onboarding::OnboardingTour, ports::UserDirectory,
    Appointment, SessionController,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::web::protocol::ServerMessage;

/// Outbound half of a connection. A single writer task drains it into the socket,
/// so messages from the intent loop and from timers keep their send order.
pub type Outbox = mpsc::UnboundedSender<ServerMessage>;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn UserDirectory>,
    pub config: Arc<Config>,
}

//=========================================================================================
// SessionState (Specific to One WebSocket Connection)
//=========================================================================================

/// The state for a single, active WebSocket connection: the session controller plus
/// the view-local state of whichever screen is showing.
pub struct SessionState {
    pub connection_id: Uuid,
    pub controller: SessionController,
    pub onboarding: OnboardingTour,
    pub call: Option<CallSession>,
    pub history: HistoryView,
    /// Cancels the timers of the current video call view.
    pub call_token: CancellationToken,
}

impl SessionState {
    /// Creates a fresh session on the landing screen.
    pub fn new(app_state: &AppState, connection_id: Uuid) -> Self {
        let appointments = if app_state.config.seed_demo_appointment {
            vec![Appointment::demo_seed()]
        } else {
            Vec::new()
        };

        Self {
            connection_id,
            controller: SessionController::with_appointments(appointments),
            onboarding: OnboardingTour::new(),
            call: None,
            history: HistoryView::default(),
            call_token: CancellationToken::new(),
        }
    }
}

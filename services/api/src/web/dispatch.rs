//! services/api/src/web/dispatch.rs
//!
//! Turns one client intent into controller operations.
//!
//! Every intent is checked against the active screen first, so a client can only
//! do what the visible view offers. The reply always ends with a fresh snapshot
//! unless the intent was refused outright. Timer work is not started here; it is
//! handed back as [`Effect`]s for the connection loop to run.

use medconnect_core::{
    auth::{self, AuthError, FieldErrors, LoginForm, RegistrationForm},
    call::CallSession,
    domain::UnknownSpecialty,
    history::{HistoryTab, HistoryView},
    onboarding::{OnboardingTour, TourProgress},
    BookingWizard, Destination, DoctorId, Screen, SessionError, SpecialtyId, UserIdentity,
    WizardError,
};
use tracing::{error, info, warn};

use crate::{
    error::ApiError,
    web::{
        protocol::{ClientMessage, FieldErrorsView, ReceiptView, ServerMessage, SessionSnapshot},
        state::{AppState, SessionState},
    },
};

/// Side effects the connection loop must carry out after an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// The video call view opened: start the connect/tick timers.
    StartCall,
    /// The video call view closed: cancel every timer it owns.
    StopCall,
    /// Hide the upload acknowledgment after its display time.
    ScheduleUploadAckClear,
}

#[derive(Debug, Default)]
pub struct Dispatched {
    pub replies: Vec<ServerMessage>,
    pub effects: Vec<Effect>,
}

enum Rejection {
    Invalid(String),
    Auth(FieldErrors),
    Wizard(String),
}

impl From<WizardError> for Rejection {
    fn from(e: WizardError) -> Self {
        match e {
            WizardError::MissingReason => Rejection::Wizard(e.to_string()),
            other => Rejection::Invalid(other.to_string()),
        }
    }
}

impl From<SessionError> for Rejection {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Wizard(inner) => inner.into(),
            other => Rejection::Invalid(other.to_string()),
        }
    }
}

impl From<AuthError> for Rejection {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Rejected(errors) => Rejection::Auth(errors),
            AuthError::Port(inner) => {
                let err = ApiError::from(inner);
                error!("Account directory failed: {}", err);
                Rejection::Invalid(err.to_string())
            }
        }
    }
}

impl From<UnknownSpecialty> for Rejection {
    fn from(e: UnknownSpecialty) -> Self {
        Rejection::Invalid(e.to_string())
    }
}

/// Applies one intent to the session and collects what must be sent back.
pub async fn handle_client_message(
    app_state: &AppState,
    session: &mut SessionState,
    msg: ClientMessage,
) -> Dispatched {
    let mut dispatched = Dispatched::default();

    match apply(app_state, session, msg, &mut dispatched).await {
        Ok(()) => {}
        Err(Rejection::Invalid(message)) => {
            warn!(connection_id = %session.connection_id, %message, "Intent rejected.");
            dispatched.replies.push(ServerMessage::error(message));
            return dispatched;
        }
        Err(Rejection::Auth(errors)) => {
            dispatched.replies.push(ServerMessage::AuthRejected {
                errors: FieldErrorsView::from(&errors),
            });
            return dispatched;
        }
        // The wizard recorded the inline error, so the snapshot below carries it too.
        Err(Rejection::Wizard(message)) => {
            dispatched.replies.push(ServerMessage::WizardRejected { message });
        }
    }

    if let Some(effect) = sync_views(session) {
        dispatched.effects.push(effect);
    }
    dispatched
        .replies
        .push(ServerMessage::Snapshot(SessionSnapshot::capture(session)));
    dispatched
}

async fn apply(
    app_state: &AppState,
    session: &mut SessionState,
    msg: ClientMessage,
    out: &mut Dispatched,
) -> Result<(), Rejection> {
    match msg {
        ClientMessage::Login { email, password } => {
            expect_screen(session, Screen::Landing)?;
            let form = LoginForm { email, password };
            let user = auth::login(app_state.directory.as_ref(), &form).await?;
            sign_in(session, user);
        }
        ClientMessage::Register {
            name,
            email,
            password,
            confirm_password,
        } => {
            expect_screen(session, Screen::Landing)?;
            let form = RegistrationForm {
                name,
                email,
                password,
                confirm_password,
            };
            let user = auth::register(app_state.directory.as_ref(), &form).await?;
            sign_in(session, user);
        }

        ClientMessage::OnboardingNext => {
            expect_screen(session, Screen::Onboarding)?;
            if session.onboarding.next() == TourProgress::Finished {
                session.controller.complete_onboarding();
            }
        }
        ClientMessage::OnboardingBack => {
            expect_screen(session, Screen::Onboarding)?;
            session.onboarding.back();
        }
        ClientMessage::OnboardingSkip => {
            expect_screen(session, Screen::Onboarding)?;
            session.onboarding.skip();
            session.controller.complete_onboarding();
        }

        ClientMessage::Navigate { target } => {
            expect_signed_in(session)?;
            let destination = target.parse::<Destination>()?;
            session.controller.navigate(destination);
        }
        ClientMessage::Logout => {
            expect_signed_in(session)?;
            session.controller.logout();
            session.onboarding = OnboardingTour::new();
        }
        ClientMessage::Reschedule { appointment_id } => {
            expect_screen(session, Screen::Dashboard)?;
            session.controller.request_reschedule_by_id(appointment_id)?;
        }

        ClientMessage::SelectSpecialty { specialty } => {
            let specialty = specialty.parse::<SpecialtyId>()?;
            wizard(session)?.select_specialty(specialty)?;
        }
        ClientMessage::SelectDoctor { doctor_id } => {
            wizard(session)?.select_doctor(DoctorId::new(doctor_id))?;
        }
        ClientMessage::SelectDate { date } => {
            wizard(session)?.select_date(&date)?;
        }
        ClientMessage::SelectTime { time } => {
            wizard(session)?.select_time(&time)?;
        }
        ClientMessage::SetReason { reason } => {
            wizard(session)?.set_reason(reason)?;
        }
        ClientMessage::WizardNext => {
            wizard(session)?.advance()?;
        }
        ClientMessage::WizardBack => {
            wizard(session)?.back();
        }
        ClientMessage::ConfirmBooking => {
            expect_screen(session, Screen::Booking)?;
            let receipt = session.controller.confirm_booking()?;
            info!(
                connection_id = %session.connection_id,
                rescheduled = receipt.rescheduled,
                "Booking confirmed."
            );
            out.replies.push(ServerMessage::BookingConfirmed {
                receipt: ReceiptView::from(&receipt),
                display_ms: u64::try_from(app_state.config.booking_ack_duration.as_millis())
                    .unwrap_or(u64::MAX),
            });
        }
        ClientMessage::CancelBooking => {
            expect_screen(session, Screen::Booking)?;
            session.controller.cancel_booking();
        }

        ClientMessage::ToggleMic => {
            call(session)?.toggle_mic();
        }
        ClientMessage::ToggleVideo => {
            call(session)?.toggle_video();
        }
        ClientMessage::ToggleChat => {
            call(session)?.toggle_chat();
        }
        ClientMessage::ToggleUpload => {
            call(session)?.toggle_upload();
        }
        ClientMessage::SendChat { text } => {
            if text.trim().is_empty() {
                return Err(Rejection::Invalid("Chat message is empty".to_string()));
            }
            let call = call(session)?;
            call.set_chat_draft(text);
            let text = call.send_chat();
            out.replies.push(ServerMessage::ChatSent { text });
        }
        ClientMessage::UploadFile => {
            if !call(session)?.upload() {
                return Err(Rejection::Invalid("Upload not available: open the upload panel and wait for the last upload to clear".to_string()));
            }
            out.replies.push(ServerMessage::UploadAcknowledged);
            out.effects.push(Effect::ScheduleUploadAckClear);
        }
        ClientMessage::EndCall => {
            expect_screen(session, Screen::VideoCall)?;
            session.controller.navigate(Destination::Dashboard);
        }

        ClientMessage::HistoryTab { tab } => {
            expect_screen(session, Screen::History)?;
            session.history.tab = HistoryTab::parse(&tab)
                .ok_or_else(|| Rejection::Invalid(format!("Unknown history tab: {}", tab)))?;
        }
        ClientMessage::HistorySearch { term } => {
            expect_screen(session, Screen::History)?;
            session.history.search = term;
        }
    }
    Ok(())
}

fn sign_in(session: &mut SessionState, user: UserIdentity) {
    session.onboarding = OnboardingTour::new();
    session.controller.login(user);
}

fn expect_screen(session: &SessionState, expected: Screen) -> Result<(), Rejection> {
    let actual = session.controller.screen();
    if actual == expected {
        Ok(())
    } else {
        Err(Rejection::Invalid(format!(
            "Not available on the {} screen",
            actual
        )))
    }
}

fn expect_signed_in(session: &SessionState) -> Result<(), Rejection> {
    match session.controller.screen() {
        Screen::Landing => Err(Rejection::Invalid("Sign in first".to_string())),
        Screen::Onboarding => Err(Rejection::Invalid("Finish the welcome tour first".to_string())),
        _ => Ok(()),
    }
}

fn wizard(session: &mut SessionState) -> Result<&mut BookingWizard, Rejection> {
    expect_screen(session, Screen::Booking)?;
    Ok(session.controller.wizard_mut()?)
}

fn call(session: &mut SessionState) -> Result<&mut CallSession, Rejection> {
    expect_screen(session, Screen::VideoCall)?;
    session
        .call
        .as_mut()
        .ok_or_else(|| Rejection::Invalid("No call in progress".to_string()))
}

/// Mounts or tears down view-local state to match the active screen.
fn sync_views(session: &mut SessionState) -> Option<Effect> {
    let screen = session.controller.screen();
    if screen != Screen::History {
        session.history = HistoryView::default();
    }
    match (screen == Screen::VideoCall, session.call.is_some()) {
        (true, false) => {
            session.call = Some(CallSession::new());
            Some(Effect::StartCall)
        }
        (false, true) => {
            session.call = None;
            Some(Effect::StopCall)
        }
        _ => None,
    }
}

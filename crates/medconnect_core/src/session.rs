//! crates/medconnect_core/src/session.rs
//!
//! The session controller: the single owner of the active screen, the
//! signed-in user and the appointment book. Views read it and call the
//! operations below. Nothing else writes its fields.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::{Appointment, BookingPayload, UserIdentity};
use crate::wizard::{BookingReceipt, BookingWizard, WizardError};

/// The mutually exclusive top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Landing,
    Onboarding,
    Dashboard,
    Booking,
    VideoCall,
    History,
    Help,
}

impl Screen {
    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Landing => "landing",
            Screen::Onboarding => "onboarding",
            Screen::Dashboard => "dashboard",
            Screen::Booking => "booking",
            Screen::VideoCall => "videocall",
            Screen::History => "history",
            Screen::Help => "help",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Screens reachable through plain navigation once signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Dashboard,
    Booking,
    VideoCall,
    History,
    Help,
}

impl From<Destination> for Screen {
    fn from(destination: Destination) -> Self {
        match destination {
            Destination::Dashboard => Screen::Dashboard,
            Destination::Booking => Screen::Booking,
            Destination::VideoCall => Screen::VideoCall,
            Destination::History => Screen::History,
            Destination::Help => Screen::Help,
        }
    }
}

impl FromStr for Destination {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dashboard" => Ok(Destination::Dashboard),
            "booking" => Ok(Destination::Booking),
            "videocall" => Ok(Destination::VideoCall),
            "history" => Ok(Destination::History),
            "help" => Ok(Destination::Help),
            other => Err(SessionError::UnknownDestination(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Unknown destination: {0}")]
    UnknownDestination(String),
    #[error("Appointment {0} not found")]
    UnknownAppointment(i64),
    #[error("No booking in progress")]
    NoBookingInProgress,
    #[error(transparent)]
    Wizard(#[from] WizardError),
}

/// Which branch `apply_booking_result` took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedBooking {
    Created(Appointment),
    Rescheduled(Appointment),
}

impl AppliedBooking {
    pub fn appointment(&self) -> &Appointment {
        match self {
            AppliedBooking::Created(a) | AppliedBooking::Rescheduled(a) => a,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionController {
    screen: Screen,
    user: Option<UserIdentity>,
    appointments: Vec<Appointment>,
    editing: Option<Appointment>,
    wizard: Option<BookingWizard>,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    pub fn new() -> Self {
        Self::with_appointments(Vec::new())
    }

    /// A fresh session on the landing screen holding `appointments`.
    pub fn with_appointments(appointments: Vec<Appointment>) -> Self {
        Self {
            screen: Screen::Landing,
            user: None,
            appointments,
            editing: None,
            wizard: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn editing(&self) -> Option<&Appointment> {
        self.editing.as_ref()
    }

    pub fn wizard(&self) -> Option<&BookingWizard> {
        self.wizard.as_ref()
    }

    /// Draft edits go through here; the draft only exists on the booking screen.
    pub fn wizard_mut(&mut self) -> Result<&mut BookingWizard, SessionError> {
        self.wizard.as_mut().ok_or(SessionError::NoBookingInProgress)
    }

    pub fn find_appointment(&self, id: i64) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    fn set_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            debug!(from = %self.screen, to = %screen, "Screen changed.");
        }
        if screen != Screen::Booking {
            self.wizard = None;
            self.editing = None;
        }
        self.screen = screen;
    }

    /// Credentials were already checked by the auth form.
    pub fn login(&mut self, user: UserIdentity) {
        info!(email = %user.email, "User signed in.");
        self.user = Some(user);
        self.set_screen(Screen::Onboarding);
    }

    pub fn complete_onboarding(&mut self) {
        self.set_screen(Screen::Dashboard);
    }

    /// Unconditional jump. Entering booking this way starts a new appointment.
    pub fn navigate(&mut self, destination: Destination) {
        if destination == Destination::Booking {
            self.editing = None;
            self.wizard = Some(BookingWizard::new());
        }
        self.set_screen(destination.into());
    }

    /// Ends the session. Appointments go with it.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(email = %user.email, "User signed out.");
        }
        self.appointments.clear();
        self.editing = None;
        self.set_screen(Screen::Landing);
    }

    pub fn request_reschedule(&mut self, appointment: &Appointment) {
        self.wizard = Some(BookingWizard::for_reschedule(appointment));
        self.editing = Some(appointment.clone());
        self.set_screen(Screen::Booking);
    }

    pub fn request_reschedule_by_id(&mut self, id: i64) -> Result<(), SessionError> {
        let appointment = self
            .find_appointment(id)
            .cloned()
            .ok_or(SessionError::UnknownAppointment(id))?;
        self.request_reschedule(&appointment);
        Ok(())
    }

    /// Applies a finished booking: reschedules the appointment being edited,
    /// or appends a new confirmed one. Always lands on the dashboard.
    pub fn apply_booking_result(&mut self, payload: BookingPayload) -> AppliedBooking {
        let applied = match self.editing.take() {
            Some(edited) => match self.appointments.iter_mut().find(|a| a.id == edited.id) {
                Some(existing) => {
                    existing.reschedule(payload);
                    info!(id = existing.id, "Appointment rescheduled.");
                    AppliedBooking::Rescheduled(existing.clone())
                }
                // The edited appointment vanished (only possible via logout,
                // which also drops `editing`). Keep the booking rather than lose it.
                None => self.append(payload),
            },
            None => self.append(payload),
        };
        self.set_screen(Screen::Dashboard);
        applied
    }

    fn append(&mut self, payload: BookingPayload) -> AppliedBooking {
        let appointment = Appointment::from_payload(self.next_appointment_id(), payload);
        info!(id = appointment.id, "Appointment booked.");
        self.appointments.push(appointment.clone());
        AppliedBooking::Created(appointment)
    }

    /// Creation timestamp in milliseconds, bumped past every id already held.
    fn next_appointment_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let highest = self.appointments.iter().map(|a| a.id).max().unwrap_or(0);
        now.max(highest + 1)
    }

    /// Confirms the hosted wizard and applies its payload.
    ///
    /// Validation failures leave both the wizard and the appointments as they were.
    pub fn confirm_booking(&mut self) -> Result<BookingReceipt, SessionError> {
        let wizard = self.wizard_mut()?;
        let rescheduled = wizard.is_rescheduling();
        let payload = wizard.confirm()?;
        let receipt = BookingReceipt::new(&payload, rescheduled);
        self.apply_booking_result(payload);
        Ok(receipt)
    }

    /// Leaves the booking screen, dropping the draft and any edit target.
    pub fn cancel_booking(&mut self) {
        self.editing = None;
        self.wizard = None;
        self.set_screen(Screen::Dashboard);
    }
}

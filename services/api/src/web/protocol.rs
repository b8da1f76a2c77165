//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the API server.
//! The client only ever sends intents; the server answers with read-only snapshots
//! of the session and with event notifications.

use medconnect_core::{
    auth::FieldErrors,
    call::{format_duration, CallPanel, CallSession},
    domain::{Consultation, Doctor, Prescription, Specialty},
    history::HistoryView,
    onboarding::{OnboardingTour, TOUR},
    Appointment, BookingReceipt, BookingWizard, Screen, UserIdentity,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::web::state::SessionState;

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the intents a client can send to the server.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    // --- Landing ---
    Login {
        email: String,
        password: String,
    },
    Register {
        name: String,
        email: String,
        password: String,
        confirm_password: String,
    },

    // --- Onboarding ---
    OnboardingNext,
    OnboardingBack,
    OnboardingSkip,

    // --- Session Controller ---
    Navigate {
        target: String,
    },
    Logout,
    Reschedule {
        appointment_id: i64,
    },

    // --- Booking Wizard ---
    SelectSpecialty {
        specialty: String,
    },
    SelectDoctor {
        doctor_id: String,
    },
    SelectDate {
        date: String,
    },
    SelectTime {
        time: String,
    },
    SetReason {
        reason: String,
    },
    WizardNext,
    WizardBack,
    ConfirmBooking,
    CancelBooking,

    // --- Video Call ---
    ToggleMic,
    ToggleVideo,
    ToggleChat,
    ToggleUpload,
    SendChat {
        text: String,
    },
    UploadFile,
    EndCall,

    // --- Medical History ---
    HistoryTab {
        tab: String,
    },
    HistorySearch {
        term: String,
    },
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The full, current state. Sent after every handled intent.
    Snapshot(SessionSnapshot),

    /// The login or registration form has inline errors.
    AuthRejected { errors: FieldErrorsView },

    /// The wizard refused to confirm. The message belongs next to the reason field.
    WizardRejected { message: String },

    /// A booking was applied. Clients show the receipt for `display_ms`.
    BookingConfirmed { receipt: ReceiptView, display_ms: u64 },

    /// The simulated doctor picked up.
    CallConnected,

    /// One more second of call time.
    CallTick { elapsed_secs: u64, display: String },

    /// A chat line was "sent". Nothing is delivered, it is only echoed back.
    ChatSent { text: String },

    /// The simulated file upload was received.
    UploadAcknowledged,

    /// The intent was malformed or does not apply to the current screen.
    Error { message: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}

//=========================================================================================
// Read-only Views
//=========================================================================================

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UserView {
    pub name: String,
    pub email: String,
}

impl From<&UserIdentity> for UserView {
    fn from(user: &UserIdentity) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AppointmentView {
    pub id: i64,
    pub doctor_id: String,
    pub doctor_name: String,
    pub specialty_id: String,
    pub specialty_name: String,
    pub date: String,
    pub time: String,
    pub status: String,
    pub reason: String,
}

impl From<&Appointment> for AppointmentView {
    fn from(a: &Appointment) -> Self {
        Self {
            id: a.id,
            doctor_id: a.doctor_id.to_string(),
            doctor_name: a.doctor_name.clone(),
            specialty_id: a.specialty_id.to_string(),
            specialty_name: a.specialty_name.clone(),
            date: a.date.clone(),
            time: a.time.clone(),
            status: a.status.as_str().to_string(),
            reason: a.reason.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct SpecialtyView {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<&Specialty> for SpecialtyView {
    fn from(s: &Specialty) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.to_string(),
            description: s.description.to_string(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct DoctorView {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub rating: String,
}

impl From<&Doctor> for DoctorView {
    fn from(d: &Doctor) -> Self {
        Self {
            id: d.id.to_string(),
            name: d.name.to_string(),
            specialty: d.specialty.to_string(),
            rating: d.rating.to_string(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WizardView {
    pub step: u8,
    pub step_label: String,
    pub rescheduling: bool,
    pub specialty: Option<String>,
    pub doctor_id: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub reason: String,
    pub reason_error: Option<String>,
    pub can_advance: bool,
    pub doctor_options: Vec<DoctorView>,
    pub time_options: Vec<String>,
}

impl From<&BookingWizard> for WizardView {
    fn from(w: &BookingWizard) -> Self {
        Self {
            step: w.step().number(),
            step_label: w.step().label().to_string(),
            rescheduling: w.is_rescheduling(),
            specialty: w.specialty().map(|s| s.to_string()),
            doctor_id: w.doctor().map(|d| d.to_string()),
            date: w.date().map(str::to_string),
            time: w.time().map(str::to_string),
            reason: w.reason().to_string(),
            reason_error: w.reason_error().map(str::to_string),
            can_advance: w.can_advance(),
            doctor_options: w.doctor_options().into_iter().map(DoctorView::from).collect(),
            time_options: w.time_options().iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReceiptView {
    pub rescheduled: bool,
    pub headline: String,
    pub date: String,
    pub time: String,
    pub doctor_name: String,
}

impl From<&BookingReceipt> for ReceiptView {
    fn from(r: &BookingReceipt) -> Self {
        Self {
            rescheduled: r.rescheduled,
            headline: r.headline.to_string(),
            date: r.date.clone(),
            time: r.time.clone(),
            doctor_name: r.doctor_name.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct FieldErrorsView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
}

impl From<&FieldErrors> for FieldErrorsView {
    fn from(e: &FieldErrors) -> Self {
        Self {
            name: e.name.map(str::to_string),
            email: e.email.map(str::to_string),
            password: e.password.map(str::to_string),
            confirm_password: e.confirm_password.map(str::to_string),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OnboardingView {
    pub step: usize,
    pub total: usize,
    pub title: String,
    pub description: String,
    pub tip: String,
    pub is_last: bool,
}

impl From<&OnboardingTour> for OnboardingView {
    fn from(tour: &OnboardingTour) -> Self {
        let card = tour.card();
        Self {
            step: tour.step(),
            total: TOUR.len(),
            title: card.title.to_string(),
            description: card.description.to_string(),
            tip: card.tip.to_string(),
            is_last: tour.is_last(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CallView {
    pub connected: bool,
    pub elapsed_secs: u64,
    pub display: String,
    pub mic_on: bool,
    pub video_on: bool,
    pub panel: String,
    pub upload_acknowledged: bool,
}

impl From<&CallSession> for CallView {
    fn from(call: &CallSession) -> Self {
        let panel = match call.panel() {
            CallPanel::Closed => "closed",
            CallPanel::Chat => "chat",
            CallPanel::Upload => "upload",
        };
        Self {
            connected: call.is_connected(),
            elapsed_secs: call.elapsed_secs(),
            display: format_duration(call.elapsed_secs()),
            mic_on: call.mic_on(),
            video_on: call.video_on(),
            panel: panel.to_string(),
            upload_acknowledged: call.upload_acknowledged(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ConsultationView {
    pub id: u32,
    pub date: String,
    pub doctor: String,
    pub specialty: String,
    pub diagnosis: String,
    pub notes: String,
    pub duration: String,
}

impl From<&Consultation> for ConsultationView {
    fn from(c: &Consultation) -> Self {
        Self {
            id: c.id,
            date: c.date.to_string(),
            doctor: c.doctor.to_string(),
            specialty: c.specialty.to_string(),
            diagnosis: c.diagnosis.to_string(),
            notes: c.notes.to_string(),
            duration: c.duration.to_string(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct MedicationView {
    pub name: String,
    pub dosage: String,
    pub duration: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct PrescriptionView {
    pub id: u32,
    pub date: String,
    pub doctor: String,
    pub medications: Vec<MedicationView>,
}

impl From<&Prescription> for PrescriptionView {
    fn from(p: &Prescription) -> Self {
        Self {
            id: p.id,
            date: p.date.to_string(),
            doctor: p.doctor.to_string(),
            medications: p
                .medications
                .iter()
                .map(|m| MedicationView {
                    name: m.name.to_string(),
                    dosage: m.dosage.to_string(),
                    duration: m.duration.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HistoryPanelView {
    pub tab: String,
    pub search: String,
    pub consultations: Vec<ConsultationView>,
    pub prescriptions: Vec<PrescriptionView>,
}

impl From<&HistoryView> for HistoryPanelView {
    fn from(h: &HistoryView) -> Self {
        Self {
            tab: h.tab.as_str().to_string(),
            search: h.search.clone(),
            consultations: h.consultations().into_iter().map(ConsultationView::from).collect(),
            prescriptions: h.prescriptions().into_iter().map(PrescriptionView::from).collect(),
        }
    }
}

/// Everything a client needs to render the active screen.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub screen: String,
    pub user: Option<UserView>,
    pub appointments: Vec<AppointmentView>,
    pub editing_appointment_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wizard: Option<WizardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding: Option<OnboardingView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call: Option<CallView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<HistoryPanelView>,
}

impl SessionSnapshot {
    pub fn capture(session: &SessionState) -> Self {
        let controller = &session.controller;
        let screen = controller.screen();
        Self {
            screen: screen.as_str().to_string(),
            user: controller.user().map(UserView::from),
            appointments: controller
                .appointments()
                .iter()
                .map(AppointmentView::from)
                .collect(),
            editing_appointment_id: controller.editing().map(|a| a.id),
            wizard: controller.wizard().map(WizardView::from),
            onboarding: (screen == Screen::Onboarding)
                .then(|| OnboardingView::from(&session.onboarding)),
            call: session.call.as_ref().map(CallView::from),
            history: (screen == Screen::History).then(|| HistoryPanelView::from(&session.history)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_use_snake_case_tags() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"navigate","target":"booking"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Navigate {
                target: "booking".to_string()
            }
        );

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"onboarding_skip"}"#).unwrap();
        assert_eq!(msg, ClientMessage::OnboardingSkip);

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"reschedule","appointment_id":1}"#).unwrap();
        assert_eq!(msg, ClientMessage::Reschedule { appointment_id: 1 });
    }

    #[test]
    fn unknown_intents_fail_to_parse() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"delete_appointment"}"#).is_err());
    }

    #[test]
    fn server_messages_carry_their_type() {
        let json = serde_json::to_value(ServerMessage::CallTick {
            elapsed_secs: 65,
            display: format_duration(65),
        })
        .unwrap();
        assert_eq!(json["type"], "call_tick");
        assert_eq!(json["display"], "1:05");

        let json = serde_json::to_value(ServerMessage::AuthRejected {
            errors: FieldErrorsView {
                email: Some("Correo o contraseña incorrectos".to_string()),
                ..FieldErrorsView::default()
            },
        })
        .unwrap();
        assert_eq!(json["errors"]["email"], "Correo o contraseña incorrectos");
        assert!(json["errors"].get("password").is_none());
    }
}

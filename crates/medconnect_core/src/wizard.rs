//! crates/medconnect_core/src/wizard.rs
//!
//! The four-step booking wizard.
//!
//! ```text
//! Specialty --advance()--> Doctor --advance()--> Schedule --advance()--> Confirm --confirm()--> payload
//!     ^                      |  ^                   |  ^                    |
//!     +------back()----------+  +------back()-------+  +-------back()-------+
//! ```
//!
//! Every forward transition is guarded by the selections of the current step.
//! Going back never loses a selection. The wizard never touches the
//! controller's appointments; it only produces a [`BookingPayload`].

use tracing::debug;

use crate::catalog;
use crate::domain::{Appointment, BookingPayload, Doctor, DoctorId, SpecialtyId};

pub const REASON_REQUIRED: &str = "Por favor, explica brevemente el motivo de tu consulta";

/// The wizard's position. Ordered, so `step >= WizardStep::Doctor` reads naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Specialty,
    Doctor,
    Schedule,
    Confirm,
}

impl WizardStep {
    /// One-based step number shown in the progress bar.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Specialty => 1,
            WizardStep::Doctor => 2,
            WizardStep::Schedule => 3,
            WizardStep::Confirm => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Specialty => "Especialidad",
            WizardStep::Doctor => "Doctor",
            WizardStep::Schedule => "Fecha y hora",
            WizardStep::Confirm => "Confirmar",
        }
    }

    fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::Specialty => Some(WizardStep::Doctor),
            WizardStep::Doctor => Some(WizardStep::Schedule),
            WizardStep::Schedule => Some(WizardStep::Confirm),
            WizardStep::Confirm => None,
        }
    }

    fn previous(self) -> Option<WizardStep> {
        match self {
            WizardStep::Specialty => None,
            WizardStep::Doctor => Some(WizardStep::Specialty),
            WizardStep::Schedule => Some(WizardStep::Doctor),
            WizardStep::Confirm => Some(WizardStep::Schedule),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Step {0:?} is not complete")]
    StepIncomplete(WizardStep),
    #[error("This action belongs to the {expected:?} step, the wizard is at {actual:?}")]
    WrongStep {
        expected: WizardStep,
        actual: WizardStep,
    },
    #[error("Unknown doctor: {0}")]
    UnknownDoctor(DoctorId),
    #[error("Doctor {doctor} does not attend {specialty}")]
    DoctorNotOffered {
        doctor: DoctorId,
        specialty: SpecialtyId,
    },
    #[error("Date not available: {0}")]
    UnknownDate(String),
    #[error("Time not available: {0}")]
    UnknownTime(String),
    #[error("Choose a date before choosing a time")]
    DateRequired,
    #[error("{}", REASON_REQUIRED)]
    MissingReason,
}

/// The transient acknowledgment shown after a successful confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingReceipt {
    pub rescheduled: bool,
    pub headline: &'static str,
    pub date: String,
    pub time: String,
    pub doctor_name: String,
}

impl BookingReceipt {
    pub fn new(payload: &BookingPayload, rescheduled: bool) -> Self {
        let headline = if rescheduled {
            "Cita reagendada con éxito"
        } else {
            "Cita agendada con éxito"
        };
        Self {
            rescheduled,
            headline,
            date: payload.date.clone(),
            time: payload.time.clone(),
            doctor_name: payload.doctor_name.clone(),
        }
    }
}

/// The in-progress draft of one booking session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingWizard {
    step: WizardStep,
    specialty: Option<SpecialtyId>,
    doctor: Option<DoctorId>,
    date: Option<String>,
    time: Option<String>,
    reason: String,
    reason_error: Option<&'static str>,
    editing: Option<i64>,
}

impl Default for BookingWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingWizard {
    /// An empty draft for a brand-new booking.
    pub fn new() -> Self {
        Self {
            step: WizardStep::Specialty,
            specialty: None,
            doctor: None,
            date: None,
            time: None,
            reason: String::new(),
            reason_error: None,
            editing: None,
        }
    }

    /// A draft pre-seeded from an existing appointment. Still starts at step 1.
    pub fn for_reschedule(appointment: &Appointment) -> Self {
        Self {
            step: WizardStep::Specialty,
            specialty: Some(appointment.specialty_id),
            doctor: Some(appointment.doctor_id.clone()),
            date: Some(appointment.date.clone()),
            time: Some(appointment.time.clone()),
            reason: appointment.reason.clone(),
            reason_error: None,
            editing: Some(appointment.id),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn specialty(&self) -> Option<SpecialtyId> {
        self.specialty
    }

    pub fn doctor(&self) -> Option<&DoctorId> {
        self.doctor.as_ref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn reason_error(&self) -> Option<&'static str> {
        self.reason_error
    }

    /// Id of the appointment this draft reschedules, if any.
    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    pub fn is_rescheduling(&self) -> bool {
        self.editing.is_some()
    }

    /// Doctors offered at step 2: only those of the chosen specialty.
    pub fn doctor_options(&self) -> Vec<&'static Doctor> {
        match self.specialty {
            Some(specialty) => catalog::doctors_for(specialty).collect(),
            None => Vec::new(),
        }
    }

    /// Times are only offered once a date has been picked.
    pub fn time_options(&self) -> &'static [&'static str] {
        if self.date.is_some() {
            &catalog::AVAILABLE_TIMES
        } else {
            &[]
        }
    }

    fn expect_step(&self, expected: WizardStep) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    /// Picks a specialty. Switching to a different one drops the doctor,
    /// who would no longer be on offer.
    pub fn select_specialty(&mut self, specialty: SpecialtyId) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Specialty)?;
        if self.specialty != Some(specialty) {
            if self.doctor.take().is_some() {
                debug!(%specialty, "Specialty changed, doctor selection reset.");
            }
            self.specialty = Some(specialty);
        }
        Ok(())
    }

    pub fn select_doctor(&mut self, doctor_id: DoctorId) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Doctor)?;
        let specialty = self
            .specialty
            .ok_or(WizardError::StepIncomplete(WizardStep::Specialty))?;
        let doctor =
            catalog::doctor(&doctor_id).ok_or_else(|| WizardError::UnknownDoctor(doctor_id.clone()))?;
        if doctor.specialty != specialty {
            return Err(WizardError::DoctorNotOffered {
                doctor: doctor_id,
                specialty,
            });
        }
        self.doctor = Some(doctor_id);
        Ok(())
    }

    pub fn select_date(&mut self, date: &str) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Schedule)?;
        if !catalog::is_available_date(date) {
            return Err(WizardError::UnknownDate(date.to_string()));
        }
        self.date = Some(date.to_string());
        Ok(())
    }

    pub fn select_time(&mut self, time: &str) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Schedule)?;
        if self.date.is_none() {
            return Err(WizardError::DateRequired);
        }
        if !catalog::is_available_time(time) {
            return Err(WizardError::UnknownTime(time.to_string()));
        }
        self.time = Some(time.to_string());
        Ok(())
    }

    /// Edits the consultation reason. Typing clears a pending reason error.
    pub fn set_reason(&mut self, reason: impl Into<String>) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Confirm)?;
        self.reason = reason.into();
        self.reason_error = None;
        Ok(())
    }

    /// Whether the "continue" action of the current step is enabled.
    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::Specialty => self.specialty.is_some(),
            WizardStep::Doctor => self.doctor.is_some(),
            WizardStep::Schedule => self.date.is_some() && self.time.is_some(),
            WizardStep::Confirm => false,
        }
    }

    /// Moves one step forward if the current step's guard holds.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        if !self.can_advance() {
            return Err(WizardError::StepIncomplete(self.step));
        }
        // can_advance() is false on the last step, so next() is always Some here.
        if let Some(next) = self.step.next() {
            debug!(from = self.step.number(), to = next.number(), "Wizard advanced.");
            self.step = next;
        }
        Ok(self.step)
    }

    /// Moves one step back, keeping every selection. No-op on step 1.
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            debug!(from = self.step.number(), to = previous.number(), "Wizard went back.");
            self.step = previous;
        }
        self.step
    }

    /// Validates the reason and resolves the selections into a payload.
    ///
    /// An empty reason leaves the wizard at step 4 with the inline error set.
    pub fn confirm(&mut self) -> Result<BookingPayload, WizardError> {
        self.expect_step(WizardStep::Confirm)?;
        if self.reason.trim().is_empty() {
            self.reason_error = Some(REASON_REQUIRED);
            return Err(WizardError::MissingReason);
        }

        let specialty = self
            .specialty
            .map(catalog::specialty)
            .ok_or(WizardError::StepIncomplete(WizardStep::Specialty))?;
        let doctor_id = self
            .doctor
            .clone()
            .ok_or(WizardError::StepIncomplete(WizardStep::Doctor))?;
        let doctor =
            catalog::doctor(&doctor_id).ok_or_else(|| WizardError::UnknownDoctor(doctor_id.clone()))?;
        if doctor.specialty != specialty.id {
            return Err(WizardError::DoctorNotOffered {
                doctor: doctor_id,
                specialty: specialty.id,
            });
        }
        let (date, time) = match (&self.date, &self.time) {
            (Some(date), Some(time)) => (date.clone(), time.clone()),
            _ => return Err(WizardError::StepIncomplete(WizardStep::Schedule)),
        };

        Ok(BookingPayload {
            specialty_id: specialty.id,
            specialty_name: specialty.name.to_string(),
            doctor_id,
            doctor_name: doctor.name.to_string(),
            date,
            time,
            reason: self.reason.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard_at_confirm() -> BookingWizard {
        let mut wizard = BookingWizard::new();
        wizard.select_specialty(SpecialtyId::Pediatria).unwrap();
        wizard.advance().unwrap();
        wizard.select_doctor(DoctorId::new("3")).unwrap();
        wizard.advance().unwrap();
        wizard.select_date("16 de Diciembre").unwrap();
        wizard.select_time("11:00 AM").unwrap();
        wizard.advance().unwrap();
        wizard
    }

    #[test]
    fn advance_is_blocked_until_each_guard_holds() {
        let mut wizard = BookingWizard::new();
        let before = wizard.clone();
        assert_eq!(
            wizard.advance(),
            Err(WizardError::StepIncomplete(WizardStep::Specialty))
        );
        assert_eq!(wizard, before);

        wizard.select_specialty(SpecialtyId::General).unwrap();
        assert_eq!(wizard.advance(), Ok(WizardStep::Doctor));
        assert_eq!(
            wizard.advance(),
            Err(WizardError::StepIncomplete(WizardStep::Doctor))
        );

        wizard.select_doctor(DoctorId::new("2")).unwrap();
        assert_eq!(wizard.advance(), Ok(WizardStep::Schedule));

        wizard.select_date("17 de Diciembre").unwrap();
        assert!(!wizard.can_advance());
        assert_eq!(
            wizard.advance(),
            Err(WizardError::StepIncomplete(WizardStep::Schedule))
        );
        wizard.select_time("09:00 AM").unwrap();
        assert_eq!(wizard.advance(), Ok(WizardStep::Confirm));
        assert!(!wizard.can_advance());
    }

    #[test]
    fn going_back_preserves_every_selection() {
        let mut wizard = wizard_at_confirm();
        wizard.set_reason("Fiebre").unwrap();

        assert_eq!(wizard.back(), WizardStep::Schedule);
        assert_eq!(wizard.back(), WizardStep::Doctor);
        assert_eq!(wizard.back(), WizardStep::Specialty);
        assert_eq!(wizard.back(), WizardStep::Specialty);

        assert_eq!(wizard.specialty(), Some(SpecialtyId::Pediatria));
        assert_eq!(wizard.doctor(), Some(&DoctorId::new("3")));
        assert_eq!(wizard.date(), Some("16 de Diciembre"));
        assert_eq!(wizard.time(), Some("11:00 AM"));
        assert_eq!(wizard.reason(), "Fiebre");
    }

    #[test]
    fn doctor_must_belong_to_selected_specialty() {
        let mut wizard = BookingWizard::new();
        wizard.select_specialty(SpecialtyId::Dermatologia).unwrap();
        wizard.advance().unwrap();

        let offered: Vec<_> = wizard.doctor_options().iter().map(|d| d.id).collect();
        assert_eq!(offered, vec!["4"]);
        assert_eq!(
            wizard.select_doctor(DoctorId::new("1")),
            Err(WizardError::DoctorNotOffered {
                doctor: DoctorId::new("1"),
                specialty: SpecialtyId::Dermatologia,
            })
        );
        assert_eq!(
            wizard.select_doctor(DoctorId::new("42")),
            Err(WizardError::UnknownDoctor(DoctorId::new("42")))
        );
        assert!(wizard.doctor().is_none());
    }

    #[test]
    fn changing_specialty_resets_doctor() {
        let mut wizard = BookingWizard::new();
        wizard.select_specialty(SpecialtyId::General).unwrap();
        wizard.advance().unwrap();
        wizard.select_doctor(DoctorId::new("1")).unwrap();
        wizard.back();

        wizard.select_specialty(SpecialtyId::General).unwrap();
        assert_eq!(wizard.doctor(), Some(&DoctorId::new("1")));

        wizard.select_specialty(SpecialtyId::Psicologia).unwrap();
        assert!(wizard.doctor().is_none());
        wizard.advance().unwrap();
        assert!(!wizard.can_advance());
    }

    #[test]
    fn times_are_hidden_until_a_date_is_chosen() {
        let mut wizard = BookingWizard::new();
        wizard.select_specialty(SpecialtyId::General).unwrap();
        wizard.advance().unwrap();
        wizard.select_doctor(DoctorId::new("1")).unwrap();
        wizard.advance().unwrap();

        assert!(wizard.time_options().is_empty());
        assert_eq!(wizard.select_time("09:00 AM"), Err(WizardError::DateRequired));

        wizard.select_date("18 de Diciembre").unwrap();
        assert_eq!(wizard.time_options().len(), 6);
        assert_eq!(
            wizard.select_time("08:00 AM"),
            Err(WizardError::UnknownTime("08:00 AM".to_string()))
        );
    }

    #[test]
    fn selections_are_scoped_to_their_step() {
        let mut wizard = BookingWizard::new();
        assert_eq!(
            wizard.select_date("16 de Diciembre"),
            Err(WizardError::WrongStep {
                expected: WizardStep::Schedule,
                actual: WizardStep::Specialty,
            })
        );
        assert!(wizard.confirm().is_err());
    }

    #[test]
    fn blank_reason_keeps_wizard_at_confirm_with_error() {
        let mut wizard = wizard_at_confirm();
        wizard.set_reason("   ").unwrap();

        assert_eq!(wizard.confirm(), Err(WizardError::MissingReason));
        assert_eq!(wizard.step(), WizardStep::Confirm);
        assert_eq!(wizard.reason_error(), Some(REASON_REQUIRED));

        wizard.set_reason("Fiebre").unwrap();
        assert_eq!(wizard.reason_error(), None);
        let payload = wizard.confirm().unwrap();
        assert_eq!(payload.specialty_name, "Pediatría");
        assert_eq!(payload.doctor_name, "Dra. Laura Pérez");
        assert_eq!(payload.date, "16 de Diciembre");
        assert_eq!(payload.time, "11:00 AM");
        assert_eq!(payload.reason, "Fiebre");
    }

    #[test]
    fn reschedule_draft_is_seeded_but_starts_at_step_one() {
        let original = Appointment::demo_seed();
        let mut wizard = BookingWizard::for_reschedule(&original);

        assert_eq!(wizard.step(), WizardStep::Specialty);
        assert!(wizard.is_rescheduling());
        assert_eq!(wizard.editing(), Some(1));
        for _ in 0..3 {
            wizard.advance().unwrap();
        }
        let payload = wizard.confirm().unwrap();
        let mut rebuilt = original.clone();
        rebuilt.reschedule(payload);
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn receipt_headline_depends_on_mode() {
        let mut wizard = wizard_at_confirm();
        wizard.set_reason("Fiebre").unwrap();
        let payload = wizard.confirm().unwrap();

        assert_eq!(BookingReceipt::new(&payload, false).headline, "Cita agendada con éxito");
        let receipt = BookingReceipt::new(&payload, true);
        assert_eq!(receipt.headline, "Cita reagendada con éxito");
        assert_eq!(receipt.doctor_name, "Dra. Laura Pérez");
    }
}

//! crates/medconnect_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any transport or serialization format.

use std::fmt;
use std::str::FromStr;

/// The identity of the signed-in patient. Lives for the whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub name: String,
    pub email: String,
}

impl UserIdentity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

// Only used by the account directory - contains the plain demo password
#[derive(Debug, Clone)]
pub struct Account {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Account {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(self.name.clone(), self.email.clone())
    }
}

/// The medical specialties a patient can book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialtyId {
    General,
    Pediatria,
    Dermatologia,
    Psicologia,
}

impl SpecialtyId {
    pub const ALL: [SpecialtyId; 4] = [
        SpecialtyId::General,
        SpecialtyId::Pediatria,
        SpecialtyId::Dermatologia,
        SpecialtyId::Psicologia,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SpecialtyId::General => "general",
            SpecialtyId::Pediatria => "pediatria",
            SpecialtyId::Dermatologia => "dermatologia",
            SpecialtyId::Psicologia => "psicologia",
        }
    }
}

impl fmt::Display for SpecialtyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown specialty: {0}")]
pub struct UnknownSpecialty(pub String);

impl FromStr for SpecialtyId {
    type Err = UnknownSpecialty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpecialtyId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownSpecialty(s.to_string()))
    }
}

/// Catalog identifier of a doctor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DoctorId(pub String);

impl DoctorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Specialty {
    pub id: SpecialtyId,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Doctor {
    pub id: &'static str,
    pub name: &'static str,
    pub specialty: SpecialtyId,
    pub rating: &'static str,
}

impl Doctor {
    pub fn doctor_id(&self) -> DoctorId {
        DoctorId::new(self.id)
    }
}

/// Lifecycle of a booked appointment. Booking only ever produces `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Confirmed,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "confirmed",
        }
    }
}

/// A confirmed booking owned by the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: i64,
    pub doctor_id: DoctorId,
    pub doctor_name: String,
    pub specialty_id: SpecialtyId,
    pub specialty_name: String,
    pub date: String,
    pub time: String,
    pub status: AppointmentStatus,
    pub reason: String,
}

impl Appointment {
    /// Builds a confirmed appointment from a finished wizard payload.
    pub fn from_payload(id: i64, payload: BookingPayload) -> Self {
        Self {
            id,
            doctor_id: payload.doctor_id,
            doctor_name: payload.doctor_name,
            specialty_id: payload.specialty_id,
            specialty_name: payload.specialty_name,
            date: payload.date,
            time: payload.time,
            status: AppointmentStatus::Confirmed,
            reason: payload.reason,
        }
    }

    /// Overwrites the bookable fields, keeping `id` and `status`.
    pub fn reschedule(&mut self, payload: BookingPayload) {
        self.doctor_id = payload.doctor_id;
        self.doctor_name = payload.doctor_name;
        self.specialty_id = payload.specialty_id;
        self.specialty_name = payload.specialty_name;
        self.date = payload.date;
        self.time = payload.time;
        self.reason = payload.reason;
    }

    /// The sample appointment every fresh demo session starts with.
    pub fn demo_seed() -> Self {
        Self {
            id: 1,
            doctor_id: DoctorId::new("1"),
            doctor_name: "Dra. Ana Martínez".to_string(),
            specialty_id: SpecialtyId::General,
            specialty_name: "Medicina General".to_string(),
            date: "15 de Diciembre".to_string(),
            time: "10:00 AM".to_string(),
            status: AppointmentStatus::Confirmed,
            reason: "Consulta de rutina".to_string(),
        }
    }
}

/// What the booking wizard hands back to the controller on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPayload {
    pub specialty_id: SpecialtyId,
    pub specialty_name: String,
    pub doctor_id: DoctorId,
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    pub reason: String,
}

/// A past consultation shown in the medical history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Consultation {
    pub id: u32,
    pub date: &'static str,
    pub doctor: &'static str,
    pub specialty: &'static str,
    pub diagnosis: &'static str,
    pub notes: &'static str,
    pub duration: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Medication {
    pub name: &'static str,
    pub dosage: &'static str,
    pub duration: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prescription {
    pub id: u32,
    pub date: &'static str,
    pub doctor: &'static str,
    pub medications: &'static [Medication],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specialty_ids_parse_from_their_wire_names() {
        for id in SpecialtyId::ALL {
            assert_eq!(id.as_str().parse::<SpecialtyId>(), Ok(id));
        }
        assert_eq!(
            "cardiologia".parse::<SpecialtyId>(),
            Err(UnknownSpecialty("cardiologia".to_string()))
        );
    }

    #[test]
    fn reschedule_keeps_id_and_status() {
        let mut appointment = Appointment::demo_seed();
        appointment.reschedule(BookingPayload {
            specialty_id: SpecialtyId::Pediatria,
            specialty_name: "Pediatría".to_string(),
            doctor_id: DoctorId::new("3"),
            doctor_name: "Dra. Laura Pérez".to_string(),
            date: "16 de Diciembre".to_string(),
            time: "11:00 AM".to_string(),
            reason: "Fiebre".to_string(),
        });

        assert_eq!(appointment.id, 1);
        assert_eq!(appointment.status, AppointmentStatus::Confirmed);
        assert_eq!(appointment.doctor_name, "Dra. Laura Pérez");
        assert_eq!(appointment.reason, "Fiebre");
    }
}

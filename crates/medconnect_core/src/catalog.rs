//! crates/medconnect_core/src/catalog.rs
//!
//! Immutable reference data offered by the booking wizard: specialties,
//! doctors and the bookable dates and times.

use crate::domain::{Doctor, DoctorId, Specialty, SpecialtyId};

pub const SPECIALTIES: [Specialty; 4] = [
    Specialty {
        id: SpecialtyId::General,
        name: "Medicina General",
        description: "Consultas y chequeos generales",
    },
    Specialty {
        id: SpecialtyId::Pediatria,
        name: "Pediatría",
        description: "Atención médica para niños",
    },
    Specialty {
        id: SpecialtyId::Dermatologia,
        name: "Dermatología",
        description: "Problemas de piel y cabello",
    },
    Specialty {
        id: SpecialtyId::Psicologia,
        name: "Psicología",
        description: "Apoyo emocional y mental",
    },
];

pub const DOCTORS: [Doctor; 5] = [
    Doctor {
        id: "1",
        name: "Dra. Ana Martínez",
        specialty: SpecialtyId::General,
        rating: "4.8",
    },
    Doctor {
        id: "2",
        name: "Dr. Carlos Ruiz",
        specialty: SpecialtyId::General,
        rating: "4.9",
    },
    Doctor {
        id: "3",
        name: "Dra. Laura Pérez",
        specialty: SpecialtyId::Pediatria,
        rating: "5.0",
    },
    Doctor {
        id: "4",
        name: "Dr. Miguel Torres",
        specialty: SpecialtyId::Dermatologia,
        rating: "4.7",
    },
    Doctor {
        id: "5",
        name: "Dra. Sofia Romero",
        specialty: SpecialtyId::Psicologia,
        rating: "4.9",
    },
];

pub const AVAILABLE_DATES: [&str; 6] = [
    "15 de Diciembre",
    "16 de Diciembre",
    "17 de Diciembre",
    "18 de Diciembre",
    "19 de Diciembre",
    "20 de Diciembre",
];

pub const AVAILABLE_TIMES: [&str; 6] = [
    "09:00 AM", "10:00 AM", "11:00 AM", "02:00 PM", "03:00 PM", "04:00 PM",
];

pub fn specialty(id: SpecialtyId) -> &'static Specialty {
    // Every SpecialtyId variant has exactly one catalog entry.
    match id {
        SpecialtyId::General => &SPECIALTIES[0],
        SpecialtyId::Pediatria => &SPECIALTIES[1],
        SpecialtyId::Dermatologia => &SPECIALTIES[2],
        SpecialtyId::Psicologia => &SPECIALTIES[3],
    }
}

pub fn doctor(id: &DoctorId) -> Option<&'static Doctor> {
    DOCTORS.iter().find(|d| d.id == id.as_str())
}

/// The doctors offered once `specialty` has been chosen.
pub fn doctors_for(specialty: SpecialtyId) -> impl Iterator<Item = &'static Doctor> {
    DOCTORS.iter().filter(move |d| d.specialty == specialty)
}

pub fn is_available_date(date: &str) -> bool {
    AVAILABLE_DATES.contains(&date)
}

pub fn is_available_time(time: &str) -> bool {
    AVAILABLE_TIMES.contains(&time)
}

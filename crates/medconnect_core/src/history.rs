//! crates/medconnect_core/src/history.rs
//!
//! The read-only medical history: past consultations and prescriptions,
//! with a tab switch and a free-text filter.

use crate::domain::{Consultation, Medication, Prescription};

pub const CONSULTATIONS: [Consultation; 3] = [
    Consultation {
        id: 1,
        date: "28 de Noviembre, 2024",
        doctor: "Dra. Ana Martínez",
        specialty: "Medicina General",
        diagnosis: "Resfriado común",
        notes: "Paciente presenta síntomas leves de gripe. Se recomienda reposo e hidratación.",
        duration: "25 minutos",
    },
    Consultation {
        id: 2,
        date: "15 de Octubre, 2024",
        doctor: "Dr. Carlos Ruiz",
        specialty: "Medicina General",
        diagnosis: "Control de rutina",
        notes: "Chequeo general. Paciente en buen estado de salud.",
        duration: "20 minutos",
    },
    Consultation {
        id: 3,
        date: "3 de Septiembre, 2024",
        doctor: "Dra. Laura Pérez",
        specialty: "Dermatología",
        diagnosis: "Dermatitis leve",
        notes: "Se prescribe crema tópica. Mejoría esperada en 2 semanas.",
        duration: "30 minutos",
    },
];

pub const PRESCRIPTIONS: [Prescription; 2] = [
    Prescription {
        id: 1,
        date: "28 de Noviembre, 2024",
        doctor: "Dra. Ana Martínez",
        medications: &[Medication {
            name: "Paracetamol 500mg",
            dosage: "Tomar 1 tableta cada 8 horas",
            duration: "5 días",
        }],
    },
    Prescription {
        id: 2,
        date: "3 de Septiembre, 2024",
        doctor: "Dra. Laura Pérez",
        medications: &[Medication {
            name: "Crema hidratante",
            dosage: "Aplicar 2 veces al día",
            duration: "2 semanas",
        }],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryTab {
    #[default]
    Consultations,
    Prescriptions,
}

impl HistoryTab {
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryTab::Consultations => "consultas",
            HistoryTab::Prescriptions => "recetas",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "consultas" => Some(HistoryTab::Consultations),
            "recetas" => Some(HistoryTab::Prescriptions),
            _ => None,
        }
    }
}

fn matches(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Consultations whose doctor, specialty or diagnosis contain `term`.
pub fn search_consultations(term: &str) -> Vec<&'static Consultation> {
    let needle = term.trim().to_lowercase();
    CONSULTATIONS
        .iter()
        .filter(|c| {
            needle.is_empty()
                || matches(c.doctor, &needle)
                || matches(c.specialty, &needle)
                || matches(c.diagnosis, &needle)
        })
        .collect()
}

/// Prescriptions whose doctor or any medication name contain `term`.
pub fn search_prescriptions(term: &str) -> Vec<&'static Prescription> {
    let needle = term.trim().to_lowercase();
    PRESCRIPTIONS
        .iter()
        .filter(|p| {
            needle.is_empty()
                || matches(p.doctor, &needle)
                || p.medications.iter().any(|m| matches(m.name, &needle))
        })
        .collect()
}

/// View state of the history screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryView {
    pub tab: HistoryTab,
    pub search: String,
}

impl HistoryView {
    pub fn consultations(&self) -> Vec<&'static Consultation> {
        search_consultations(&self.search)
    }

    pub fn prescriptions(&self) -> Vec<&'static Prescription> {
        search_prescriptions(&self.search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_returns_everything() {
        assert_eq!(search_consultations("").len(), 3);
        assert_eq!(search_prescriptions("  ").len(), 2);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let ids: Vec<u32> = search_consultations("MARTÍNEZ").iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1]);

        let ids: Vec<u32> = search_consultations("dermat").iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3]);

        let ids: Vec<u32> = search_prescriptions("paracetamol").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn tabs_round_trip_their_names() {
        assert_eq!(HistoryTab::parse("recetas"), Some(HistoryTab::Prescriptions));
        assert_eq!(HistoryTab::parse(HistoryTab::Consultations.as_str()), Some(HistoryTab::Consultations));
        assert_eq!(HistoryTab::parse("notas"), None);
    }
}

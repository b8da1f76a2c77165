//! crates/medconnect_core/src/onboarding.rs
//!
//! The three-card welcome tour shown right after signing in.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourCard {
    pub title: &'static str,
    pub description: &'static str,
    pub tip: &'static str,
}

pub const TOUR: [TourCard; 3] = [
    TourCard {
        title: "Agenda tus citas fácilmente",
        description: "Selecciona el día y hora que prefieras. Puedes cambiar o cancelar tu cita cuando lo necesites.",
        tip: "Te enviaremos un recordatorio antes de cada cita",
    },
    TourCard {
        title: "Consultas por videollamada",
        description: "Habla cara a cara con tu doctor desde donde estés. Solo necesitas internet y una cámara.",
        tip: "Puedes usar tu celular, tablet o computadora",
    },
    TourCard {
        title: "Tu historial siempre disponible",
        description: "Todas tus consultas y recetas se guardan aquí. Puedes verlas cuando quieras.",
        tip: "Tu información está protegida y es privada",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourProgress {
    Showing(usize),
    Finished,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingTour {
    step: usize,
}

impl OnboardingTour {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-based index into [`TOUR`].
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn card(&self) -> &'static TourCard {
        &TOUR[self.step]
    }

    pub fn is_last(&self) -> bool {
        self.step + 1 == TOUR.len()
    }

    /// Shows the next card, or finishes on the last one.
    pub fn next(&mut self) -> TourProgress {
        if self.is_last() {
            TourProgress::Finished
        } else {
            self.step += 1;
            TourProgress::Showing(self.step)
        }
    }

    pub fn back(&mut self) -> TourProgress {
        self.step = self.step.saturating_sub(1);
        TourProgress::Showing(self.step)
    }

    pub fn skip(&mut self) -> TourProgress {
        TourProgress::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tour_finishes_after_last_card() {
        let mut tour = OnboardingTour::new();
        assert_eq!(tour.card().title, "Agenda tus citas fácilmente");
        assert_eq!(tour.next(), TourProgress::Showing(1));
        assert_eq!(tour.next(), TourProgress::Showing(2));
        assert!(tour.is_last());
        assert_eq!(tour.next(), TourProgress::Finished);
        assert_eq!(tour.step(), 2);
    }

    #[test]
    fn back_stops_at_first_card() {
        let mut tour = OnboardingTour::new();
        assert_eq!(tour.back(), TourProgress::Showing(0));
        tour.next();
        assert_eq!(tour.back(), TourProgress::Showing(0));
    }

    #[test]
    fn skip_finishes_immediately() {
        let mut tour = OnboardingTour::new();
        assert_eq!(tour.skip(), TourProgress::Finished);
    }
}

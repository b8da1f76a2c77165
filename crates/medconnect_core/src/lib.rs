pub mod auth;
pub mod call;
pub mod catalog;
pub mod domain;
pub mod history;
pub mod onboarding;
pub mod ports;
pub mod session;
pub mod wizard;

pub use domain::{
    Account, Appointment, AppointmentStatus, BookingPayload, Doctor, DoctorId, Specialty,
    SpecialtyId, UserIdentity,
};
pub use ports::{PortError, PortResult, UserDirectory};
pub use session::{AppliedBooking, Destination, Screen, SessionController, SessionError};
pub use wizard::{BookingReceipt, BookingWizard, WizardError, WizardStep};

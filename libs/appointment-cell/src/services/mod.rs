pub mod appointment;
pub mod gate;

pub use appointment::{AppointmentService, HttpAppointmentService};
pub use gate::{AppointmentGate, GateAction, LifecycleIntent, StatusReading};

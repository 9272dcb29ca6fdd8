//! # Appointment Cell
//!
//! Reads an appointment's lifecycle status and requests the start/end
//! transitions a consultant triggers from the meeting screen. The decision of
//! whether a transition is requested at all lives in [`services::gate`].

pub mod models;
pub mod services;

pub use models::{Appointment, AppointmentStatus, EndAppointmentRequest, StartAppointmentRequest};
pub use services::{
    AppointmentGate, AppointmentService, GateAction, HttpAppointmentService, LifecycleIntent,
    StatusReading,
};

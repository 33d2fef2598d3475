//! Companion SDK
//!
//! This crate provides the public API for the companion module:
//! - `CompanionClientV1` trait for in-process consumers
//! - Model types (`User`, `Connection`, `Appointment`, ...)
//! - Error type (`CompanionError`)

#![forbid(unsafe_code)]

pub mod api;
pub mod errors;
pub mod models;

pub use api::CompanionClientV1;
pub use errors::CompanionError;
pub use models::{
    Appointment, AppointmentStatus, AuthTokens, Caller, Connection, ConnectionStatus, Interest,
    MatchSuggestion, NewAppointment, ProfilePatch, Registration, Role, RoleFilter, UnknownRole,
    User,
};

//! Storage infrastructure for the companion module.

pub mod appointment_repo;
pub mod connection_repo;
pub mod entity;
pub mod interest_repo;
pub mod mapper;
pub mod migrations;
pub mod user_repo;

pub use appointment_repo::SeaOrmAppointmentRepository;
pub use connection_repo::SeaOrmConnectionRepository;
pub use interest_repo::SeaOrmInterestRepository;
pub use user_repo::SeaOrmUserRepository;

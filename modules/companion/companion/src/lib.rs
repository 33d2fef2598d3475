//! Companion module implementation.
//!
//! Matches volunteers with elderly people and institutions by shared
//! interests, tracks connection requests and schedules conversations.
//! The public API is defined in `companion-sdk` and re-exported here.

#![forbid(unsafe_code)]

pub use companion_sdk::{CompanionClientV1, CompanionError};

pub mod module;
pub use module::{CompanionModule, Services, connect_database};

pub mod local_client;

pub mod config;
pub use config::{AuthConfig, CompanionConfig, DatabaseConfig};

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

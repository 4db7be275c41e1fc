//! Core library modules for the taskdeck service.
//!
//! ## Features
//!
//! - **Domain Model**: Task entity with closed status/priority sum types
//! - **Validation**: Pure payload validation with field-attributed failures
//! - **Orchestration**: Use-case service sequencing validation and storage
//! - **Infrastructure**: Configuration and data directory resolution

pub mod config;
pub mod data_storage;
pub mod service;
pub mod task;
pub mod validation;

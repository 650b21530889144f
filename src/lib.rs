//! Registration, review, and document generation for exam invigilator candidates.

pub mod auth;
pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;
pub mod workflows;

//! Repository Module
//!
//! Data access layer for the orchestrator.
//! Each repository maps a domain entity onto the key-value store.

pub mod job;

// Re-export for convenience
pub use job as job_repository;

//! Service Module
//!
//! Business logic layer for the orchestrator.
//! Services orchestrate between repositories and contain domain logic.

pub mod export;
pub mod generation;
pub mod job;

// Re-export for convenience
pub use export as export_service;
pub use generation::GenerationService;
pub use job::{JobError, JobService, JobSettings};

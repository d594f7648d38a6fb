//! Core domain types
//!
//! This module contains the core domain structures used across Casegen services.
//! These types are shared between the orchestrator (which persists jobs), the
//! text crate (which parses and renders test cases) and the CLI.

pub mod job;
pub mod test_case;

//! Casegen Core
//!
//! Core types and abstractions for the Casegen test-case generation service.
//!
//! This crate contains:
//! - Domain types: Core business entities (Job, TestCase, etc.)
//! - DTOs: Data transfer objects exchanged with the API, the CLI and the
//!   generation backend

pub mod domain;
pub mod dto;

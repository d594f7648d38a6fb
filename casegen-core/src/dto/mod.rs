//! Data Transfer Objects
//!
//! This module contains DTOs exchanged between Casegen components: API
//! requests and responses, export requests, generation backend wire types and
//! the flattened issue fields supplied by the issue tracker.

pub mod export;
pub mod generation;
pub mod issue;
pub mod job;

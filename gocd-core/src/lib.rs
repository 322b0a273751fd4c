//! GoCD Core
//!
//! Core types for talking to the pipeline API of a GoCD server.
//!
//! This crate contains:
//! - Domain types: pipelines, templates, stages, materials, run instances and status
//! - DTOs: request envelopes sent to the server

pub mod domain;
pub mod dto;

mod serde_helpers;

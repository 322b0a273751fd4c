//! Core domain types
//!
//! These types mirror the JSON documents exchanged with the GoCD pipeline API.
//! They are plain values: every call to the server produces fresh instances and
//! nothing here tracks identity or caches state between calls.

pub mod instance;
pub mod material;
pub mod pipeline;
pub mod stage;
pub mod status;

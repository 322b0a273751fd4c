//! Data Transfer Objects
//!
//! Request envelopes that wrap domain types for the wire.

pub mod pipeline;

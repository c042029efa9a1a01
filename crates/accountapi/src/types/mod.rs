//! Core types for the Account API
//!
//! Resource types and the JSON envelopes they travel in.

pub use account::*;
pub use envelope::*;

pub mod account;
pub mod envelope;

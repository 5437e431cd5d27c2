//! Output module
//!
//! Outbound glue: the fire-and-forget OSC sink the conditioned
//! parameter batches are handed to.

pub mod osc;

pub use osc::OscSender;

//! Utility modules for the panel server.

pub mod log;

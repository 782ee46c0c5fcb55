//! Shared types used across the daemon

pub mod types;

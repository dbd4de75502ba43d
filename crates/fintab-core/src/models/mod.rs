//! Data models for extraction inputs, outputs and configuration.

pub mod config;
pub mod record;
pub mod region;

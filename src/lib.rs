//! shellwright: an AI terminal assistant.
//!
//! Natural-language intent goes in; shell commands come out through a
//! fixed pipeline of prompt building, provider dispatch, response parsing,
//! risk classification, human confirmation, and bounded execution.

pub mod cli;
pub mod commands;
pub mod core;
pub mod exec;
pub mod gate;
pub mod orchestrator;
pub mod provider;
pub mod synth;

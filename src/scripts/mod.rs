//! Type-safe script argument modules.
//!
//! This module contains structs that implement `ScriptArgs` for each external
//! script. Each struct maps Rust fields to the exact CLI parameters expected
//! by the corresponding PowerShell script.

pub mod onboard;

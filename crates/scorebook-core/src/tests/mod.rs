//! Cross-module tests for the scoring engine.
//!
//! - **Integration tests**: full games through the session, from first
//!   pitch to derived views and reload
//! - **Determinism tests**: derived views are pure folds over the log, and
//!   count invariants hold for arbitrary pitch sequences
//! - **Helper functions**: standard lineups and scripted plays
//!
//! # Test Structure
//!
//! - `determinism.rs`: replay purity and property tests
//! - `integration.rs`: end-to-end scenarios
//! - `helpers.rs`: setup utilities and factory functions

mod determinism;
pub mod helpers;
mod integration;

pub use helpers::*;

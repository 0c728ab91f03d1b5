// src/lib.rs
// =============================================================================
// locale-link-check as a library.
//
// main.rs is a thin wrapper around these modules; keeping them here lets
// other tools reuse the catalog loading and link checking without the CLI.
// =============================================================================

pub mod catalog;
pub mod checker;
pub mod cli;
pub mod config;
pub mod logging;
pub mod report;

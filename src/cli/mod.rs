//! CLI command handlers.
//!
//! Testable handlers invoked by main.rs; the binary itself only parses
//! arguments and maps errors to exit codes.

mod generate;

pub use generate::run_generate;

//! flatconf CLI library
//!
//! Exposes the CLI entry point so it can be embedded by other binaries.

mod cli;

pub use cli::run;

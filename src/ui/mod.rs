//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All command output goes through this module so quiet mode and JSON
//! output are honored consistently. Diagnostics go to stderr; results go
//! to stdout.

pub mod output;

//! Plugin archive CLI library.
//!
//! Exposes argument parsing, the command implementations, and output
//! formatting so they can be tested without spawning the binary.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod commands;
pub mod formatters;
pub mod runner;

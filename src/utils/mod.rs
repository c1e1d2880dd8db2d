//! Generic utility primitives with zero template knowledge.
//!
//! - `command` - Command execution with error handling
//! - `dir` - Directory emptiness, clearing, copying and comparison
//! - `io` - File I/O with consistent error handling
//! - `naming` - Target directory and package name normalization
//! - `shell` - Shell command suggestion formatting

pub mod command;
pub mod dir;
pub mod io;
pub mod naming;
pub mod shell;

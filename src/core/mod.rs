// Public modules
pub mod catalog;
pub mod error;
pub mod fetch;
pub mod generate;
pub mod git;
pub mod manifest;
pub mod package_manager;
pub mod prompt;
pub mod templates;

// Internal modules - not part of public API
pub(crate) mod paths;

// Public modules for CLI access
pub mod defaults;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};

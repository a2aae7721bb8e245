// Re-export command modules
pub mod commands;

// Re-export commonly used types
pub use commands::{CacheSettings, Commands};

//! Channel implementations for the docqa assistant.

pub mod cli;

pub use cli::CliChannel;

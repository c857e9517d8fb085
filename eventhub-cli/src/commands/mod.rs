//! Command implementations for the eventhub CLI

pub mod events;
pub mod serve;

// Re-export main dispatcher functions for flat access from main.rs
pub use events::run_events;
pub use serve::run_serve;

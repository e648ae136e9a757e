//! lettura-store — result stores enforcing one quiz per user and day.

pub mod json;
pub mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

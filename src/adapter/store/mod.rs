//! Alert-state store backends.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

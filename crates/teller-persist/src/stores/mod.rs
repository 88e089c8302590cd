mod memory;
mod file;

pub use memory::MemoryStore;
pub use file::FileStore;

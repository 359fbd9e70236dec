mod file;
mod memory;

pub use file::{FileStore, LOCAL_STORAGE_FILE};
pub use memory::MemoryStore;

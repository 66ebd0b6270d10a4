pub mod file;
pub mod store;
pub mod writer;

pub use file::FileStore;
pub use store::{load_json, save_json, KeyValueStore, MemoryStore, StoreKey};
pub use writer::{BackgroundStore, StoreWriterHandle};

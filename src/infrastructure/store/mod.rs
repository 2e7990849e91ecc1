//! Vector store backends

mod cratedb;
mod in_memory;

pub use cratedb::{CrateDbTables, CrateDbVectorStore};
pub use in_memory::InMemoryVectorStore;

//! Store-backed cache tier implementations

mod exact;
mod semantic;

pub use exact::StoreExactCache;
pub use semantic::StoreSemanticCache;

//! In-memory cache adapters owned by the repositories.

pub mod bounded;
pub mod reference_cache;

pub use bounded::BoundedCache;
pub use reference_cache::ReferenceCache;

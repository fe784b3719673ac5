pub mod in_memory;
pub mod result_cache;
pub mod store;

pub use in_memory::{InMemoryCache, InMemoryCacheConfig};
pub use result_cache::ResultCache;
pub use store::{Cache, CacheExt};

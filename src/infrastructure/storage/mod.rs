pub mod cache;

pub use cache::CachedBackend;

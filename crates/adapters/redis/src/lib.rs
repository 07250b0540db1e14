//! cobalt-adapter-redis - Redis 适配器

pub mod cache;
pub mod connection;

pub use cache::*;
pub use connection::*;

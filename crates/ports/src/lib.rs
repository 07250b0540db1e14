//! cobalt-ports - 基础设施端口定义

pub mod cache;

pub use cache::*;

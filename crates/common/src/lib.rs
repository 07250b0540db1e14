//! cobalt-common - 通用类型和工具库

pub mod tree;
pub mod types;

pub use tree::*;
pub use types::*;

mod resolver;

pub use resolver::{DataScopeResolver, ScopeResult};

//! cobalt-domain-core - 领域模型基础

pub mod entity;

pub use entity::*;

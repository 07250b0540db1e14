//! sys-admin - 后台管理服务
//!
//! 用户、部门、角色、菜单、权限管理，以及核心的鉴权与
//! 数据权限解析引擎。对外暴露应用层服务，传输层由调用方接入。

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod testing;

//! Unit of Work 模式
//!
//! 为批量重分配（角色↔菜单/权限/部门、用户↔角色）提供单事务边界：
//! 删除旧关联与写入新关联要么同时提交，要么同时回滚，
//! 部分替换对外永不可见。

use async_trait::async_trait;
use cobalt_common::UserId;
use cobalt_errors::AppResult;

use crate::domain::department::DepartmentId;
use crate::domain::menu::MenuId;
use crate::domain::role::{DataScope, PermissionId, RoleId};

/// Unit of Work trait
///
/// `lock_role` / `lock_user` 对聚合行加锁，同一角色（或用户）上的
/// 并发重分配串行执行，最后提交的事务完全决定可见状态。
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// 锁定角色行；返回 false 表示角色不存在
    async fn lock_role(&self, role_id: &RoleId) -> AppResult<bool>;

    /// 锁定用户行；返回 false 表示用户不存在
    async fn lock_user(&self, user_id: &UserId) -> AppResult<bool>;

    /// 清空角色的菜单关联
    async fn clear_role_menus(&self, role_id: &RoleId) -> AppResult<()>;

    /// 写入角色的菜单关联
    async fn insert_role_menus(&self, role_id: &RoleId, menu_ids: &[MenuId]) -> AppResult<()>;

    /// 清空角色的权限关联
    async fn clear_role_permissions(&self, role_id: &RoleId) -> AppResult<()>;

    /// 写入角色的权限关联
    async fn insert_role_permissions(
        &self,
        role_id: &RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<()>;

    /// 清空角色的部门关联
    async fn clear_role_departments(&self, role_id: &RoleId) -> AppResult<()>;

    /// 写入角色的部门关联
    async fn insert_role_departments(
        &self,
        role_id: &RoleId,
        department_ids: &[DepartmentId],
    ) -> AppResult<()>;

    /// 更新角色的数据权限范围
    async fn update_role_data_scope(&self, role_id: &RoleId, scope: DataScope) -> AppResult<()>;

    /// 清空用户的角色关联
    async fn clear_user_roles(&self, user_id: &UserId) -> AppResult<()>;

    /// 写入用户的角色关联
    async fn insert_user_roles(&self, user_id: &UserId, role_ids: &[RoleId]) -> AppResult<()>;

    /// 提交事务
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// 回滚事务
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Unit of Work 工厂 trait
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    /// 开始新的事务
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;
}

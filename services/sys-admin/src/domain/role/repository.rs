//! 角色与权限仓储接口

use async_trait::async_trait;
use cobalt_common::UserId;
use cobalt_errors::AppResult;

use super::permission::{Permission, PermissionId};
use super::role::{Role, RoleId};
use crate::domain::department::DepartmentId;
use crate::domain::menu::{Menu, MenuId};

/// 角色仓储接口
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// 创建角色
    async fn create(&self, role: &Role) -> AppResult<()>;

    /// 更新角色
    async fn update(&self, role: &Role) -> AppResult<()>;

    /// 删除角色
    async fn delete(&self, id: &RoleId) -> AppResult<()>;

    /// 根据 ID 查找角色
    async fn find_by_id(&self, id: &RoleId) -> AppResult<Option<Role>>;

    /// 根据代码查找角色
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Role>>;

    /// 根据名称查找角色
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// 列出所有角色，按排序键升序
    async fn list(&self) -> AppResult<Vec<Role>>;

    /// 检查角色是否存在
    async fn exists(&self, id: &RoleId) -> AppResult<bool>;

    /// 统计给定 ID 中实际存在的角色数
    async fn count_by_ids(&self, ids: &[RoleId]) -> AppResult<i64>;
}

/// 权限仓储接口
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// 创建权限
    async fn create(&self, permission: &Permission) -> AppResult<()>;

    /// 更新权限
    async fn update(&self, permission: &Permission) -> AppResult<()>;

    /// 删除权限
    async fn delete(&self, id: &PermissionId) -> AppResult<()>;

    /// 根据 ID 查找权限
    async fn find_by_id(&self, id: &PermissionId) -> AppResult<Option<Permission>>;

    /// 根据代码查找权限
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Permission>>;

    /// 列出所有权限，创建时间倒序
    async fn list(&self) -> AppResult<Vec<Permission>>;

    /// 统计给定 ID 中实际存在的权限数
    async fn count_by_ids(&self, ids: &[PermissionId]) -> AppResult<i64>;
}

/// 角色菜单关联只读接口
#[async_trait]
pub trait RoleMenuRepository: Send + Sync {
    /// 获取角色关联的菜单
    async fn get_role_menus(&self, role_id: &RoleId) -> AppResult<Vec<Menu>>;

    /// 统计引用某菜单的角色数
    async fn count_roles_with_menu(&self, menu_id: &MenuId) -> AppResult<i64>;
}

/// 角色权限关联只读接口
#[async_trait]
pub trait RolePermissionRepository: Send + Sync {
    /// 获取角色关联的权限
    async fn get_role_permissions(&self, role_id: &RoleId) -> AppResult<Vec<Permission>>;

    /// 统计引用某权限的角色数
    async fn count_roles_with_permission(&self, permission_id: &PermissionId) -> AppResult<i64>;
}

/// 角色部门关联只读接口（自定义数据权限用）
#[async_trait]
pub trait RoleDepartmentRepository: Send + Sync {
    /// 获取角色关联的部门 ID 集合
    async fn get_role_department_ids(&self, role_id: &RoleId) -> AppResult<Vec<DepartmentId>>;
}

/// 用户角色关联仓储接口
#[async_trait]
pub trait UserRoleRepository: Send + Sync {
    /// 获取用户的所有角色
    async fn get_user_roles(&self, user_id: &UserId) -> AppResult<Vec<Role>>;

    /// 获取用户的所有权限（聚合所有角色的权限）
    async fn get_user_permissions(&self, user_id: &UserId) -> AppResult<Vec<Permission>>;

    /// 统计持有某角色的用户数
    async fn count_users_with_role(&self, role_id: &RoleId) -> AppResult<i64>;

    /// 失效该用户的角色/权限缓存（无缓存实现为空操作）
    async fn invalidate(&self, user_id: &UserId) -> AppResult<()>;
}

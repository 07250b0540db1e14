//! 角色命令

use crate::domain::department::DepartmentId;
use crate::domain::menu::MenuId;
use crate::domain::role::{DataScope, PermissionId, RoleId};

/// 创建角色命令
#[derive(Debug, Clone)]
pub struct CreateRoleCommand {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub data_scope: Option<DataScope>,
    pub sort_order: i32,
}

/// 更新角色命令
#[derive(Debug, Clone)]
pub struct UpdateRoleCommand {
    pub role_id: RoleId,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: i32,
}

/// 重分配的目标关联种类及新的完整 ID 集合
#[derive(Debug, Clone)]
pub enum RoleAssociation {
    Menus(Vec<MenuId>),
    Permissions(Vec<PermissionId>),
    Departments(Vec<DepartmentId>),
}

/// 关联重分配命令：整体替换角色在某一种类上的全部关联
#[derive(Debug, Clone)]
pub struct ReassignAssociationsCommand {
    pub role_id: RoleId,
    pub association: RoleAssociation,
}

/// 设置数据权限范围命令
#[derive(Debug, Clone)]
pub struct SetDataScopeCommand {
    pub role_id: RoleId,
    pub scope: DataScope,
    pub department_ids: Vec<DepartmentId>,
}

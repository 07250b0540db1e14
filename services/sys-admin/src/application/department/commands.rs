//! 部门命令

use cobalt_common::UserId;

use crate::domain::department::DepartmentId;

/// 创建部门命令
#[derive(Debug, Clone)]
pub struct CreateDepartmentCommand {
    pub parent_id: Option<DepartmentId>,
    pub name: String,
    pub code: Option<String>,
    pub leader_id: Option<UserId>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub sort_order: i32,
}

/// 更新部门命令
#[derive(Debug, Clone)]
pub struct UpdateDepartmentCommand {
    pub department_id: DepartmentId,
    pub parent_id: Option<DepartmentId>,
    pub name: String,
    pub code: Option<String>,
    pub leader_id: Option<UserId>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub sort_order: i32,
}

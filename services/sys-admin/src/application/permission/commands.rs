//! 权限命令

use crate::domain::role::PermissionId;

/// 创建权限命令
#[derive(Debug, Clone)]
pub struct CreatePermissionCommand {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub path: Option<String>,
    pub method: Option<String>,
}

/// 更新权限命令
#[derive(Debug, Clone)]
pub struct UpdatePermissionCommand {
    pub permission_id: PermissionId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub path: Option<String>,
    pub method: Option<String>,
}
